pub mod health;
pub mod login;
pub mod refresh;
pub mod register;

pub use self::health::health;
pub use self::login::login;
pub use self::refresh::refresh;
pub use self::register::register;

// common functions for the handlers
use axum::http::StatusCode;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::error::{AuthError, TokenFault};

/// Token pair returned by both login and refresh.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct TokenPairResponse {
    pub auth_token: String,
    pub refresh_token: String,
}

pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").map_or(false, |re| re.is_match(email))
}

/// Map a classified engine failure to a protocol response.
///
/// Only the error kind (and the expired/bad-format sub-reason) reaches the
/// caller; critical failures come out as a generic message.
pub(crate) fn error_response(err: &AuthError) -> (StatusCode, String) {
    match err {
        AuthError::NotFound { subject } => (StatusCode::NOT_FOUND, format!("{subject} not found")),
        AuthError::AlreadyExists { subject } => {
            (StatusCode::CONFLICT, format!("{subject} already exists"))
        }
        AuthError::InvalidCredentials => {
            (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
        }
        AuthError::InvalidToken(TokenFault::Expired) => {
            (StatusCode::UNAUTHORIZED, "Token expired".to_string())
        }
        AuthError::InvalidToken(TokenFault::BadFormat) => {
            (StatusCode::UNAUTHORIZED, "Invalid token".to_string())
        }
        AuthError::CriticalInternal { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal error".to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(valid_email("user@example.com"));
        assert!(valid_email("first.last@sub.example.org"));

        assert!(!valid_email(""));
        assert!(!valid_email("user"));
        assert!(!valid_email("user@"));
        assert!(!valid_email("user@example"));
        assert!(!valid_email("user @example.com"));
    }

    #[test]
    fn test_error_response_mapping() {
        let (status, message) = error_response(&AuthError::not_found("app 42"));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(message, "app 42 not found");

        let (status, message) = error_response(&AuthError::already_exists("user"));
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(message, "user already exists");

        let (status, message) = error_response(&AuthError::InvalidCredentials);
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message, "Invalid credentials");

        let (status, message) = error_response(&AuthError::InvalidToken(TokenFault::Expired));
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message, "Token expired");

        let (status, message) = error_response(&AuthError::InvalidToken(TokenFault::BadFormat));
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message, "Invalid token");
    }

    #[test]
    fn test_critical_failures_stay_generic() {
        let err = AuthError::critical("PgStore::save_user", "connection reset by peer");
        let (status, message) = error_response(&err);

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Internal error");
        assert!(!message.contains("connection reset"));
    }
}
