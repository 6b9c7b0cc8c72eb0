use axum::{extract::Extension, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};
use utoipa::ToSchema;

use crate::sigelo::{
    handlers::{error_response, TokenPairResponse},
    Service,
};

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct TokenRefresh {
    refresh_token: String,
    app_id: i64,
}

#[utoipa::path(
    post,
    path = "/user/refresh",
    request_body = TokenRefresh,
    responses(
        (status = 200, description = "Token pair rotated", body = TokenPairResponse, content_type = "application/json"),
        (status = 400, description = "Missing token or invalid app id", body = String),
        (status = 401, description = "Token expired or invalid", body = String),
        (status = 404, description = "Unknown app", body = String),
        (status = 500, description = "Internal error", body = String),
    ),
    tag = "refresh"
)]
#[instrument(skip(service, payload))]
pub async fn refresh(
    service: Extension<Arc<Service>>,
    payload: Option<Json<TokenRefresh>>,
) -> Result<(StatusCode, Json<TokenPairResponse>), (StatusCode, String)> {
    let request: TokenRefresh = match payload {
        Some(Json(payload)) => payload,
        None => return Err((StatusCode::BAD_REQUEST, "Missing payload".to_string())),
    };

    if request.refresh_token.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Missing token".to_string()));
    }

    if request.app_id <= 0 {
        return Err((StatusCode::BAD_REQUEST, "Invalid app id".to_string()));
    }

    let pair = service
        .refresh(&request.refresh_token, request.app_id)
        .await
        .map_err(|err| error_response(&err))?;

    debug!(app_id = request.app_id, "token pair refreshed");

    Ok((
        StatusCode::OK,
        Json(TokenPairResponse {
            auth_token: pair.auth_token,
            refresh_token: pair.refresh_token,
        }),
    ))
}
