use axum::{extract::Extension, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};
use utoipa::ToSchema;

use crate::sigelo::{
    handlers::{error_response, valid_email, TokenPairResponse},
    Service,
};

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UserLogin {
    email: String,
    password: String,
    app_id: i64,
}

#[utoipa::path(
    post,
    path = "/user/login",
    request_body = UserLogin,
    responses(
        (status = 200, description = "Login successful", body = TokenPairResponse, content_type = "application/json"),
        (status = 400, description = "Invalid email, password or app id", body = String),
        (status = 401, description = "Invalid credentials", body = String),
        (status = 404, description = "Unknown app", body = String),
        (status = 500, description = "Internal error", body = String),
    ),
    tag = "login"
)]
#[instrument(skip(service, payload))]
pub async fn login(
    service: Extension<Arc<Service>>,
    payload: Option<Json<UserLogin>>,
) -> Result<(StatusCode, Json<TokenPairResponse>), (StatusCode, String)> {
    let user: UserLogin = match payload {
        Some(Json(payload)) => payload,
        None => return Err((StatusCode::BAD_REQUEST, "Missing payload".to_string())),
    };

    if !valid_email(&user.email) {
        return Err((StatusCode::BAD_REQUEST, "Invalid email".to_string()));
    }

    if user.password.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Invalid password".to_string()));
    }

    if user.app_id <= 0 {
        return Err((StatusCode::BAD_REQUEST, "Invalid app id".to_string()));
    }

    let pair = service
        .login(&user.email, &user.password, user.app_id)
        .await
        .map_err(|err| error_response(&err))?;

    debug!(app_id = user.app_id, "user logged in");

    Ok((
        StatusCode::OK,
        Json(TokenPairResponse {
            auth_token: pair.auth_token,
            refresh_token: pair.refresh_token,
        }),
    ))
}
