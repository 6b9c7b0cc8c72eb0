use axum::{extract::Extension, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};
use utoipa::ToSchema;

use crate::sigelo::{
    handlers::{error_response, valid_email},
    Service,
};

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UserRegister {
    email: String,
    password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UserRegistered {
    uid: i64,
}

#[utoipa::path(
    post,
    path = "/user/register",
    request_body = UserRegister,
    responses(
        (status = 201, description = "Registration successful", body = UserRegistered, content_type = "application/json"),
        (status = 400, description = "Invalid email or password", body = String),
        (status = 409, description = "User with the specified email already exists", body = String),
        (status = 500, description = "Internal error", body = String),
    ),
    tag = "register"
)]
#[instrument(skip(service, payload))]
pub async fn register(
    service: Extension<Arc<Service>>,
    payload: Option<Json<UserRegister>>,
) -> Result<(StatusCode, Json<UserRegistered>), (StatusCode, String)> {
    let user: UserRegister = match payload {
        Some(Json(payload)) => payload,
        None => return Err((StatusCode::BAD_REQUEST, "Missing payload".to_string())),
    };

    if !valid_email(&user.email) {
        return Err((StatusCode::BAD_REQUEST, "Invalid email".to_string()));
    }

    if user.password.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Invalid password".to_string()));
    }

    let uid = service
        .register(&user.email, &user.password)
        .await
        .map_err(|err| error_response(&err))?;

    debug!(uid, "user registered");

    Ok((StatusCode::CREATED, Json(UserRegistered { uid })))
}
