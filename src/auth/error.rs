//! Classified failure vocabulary shared by every component.
//!
//! Collaborator failures (store, hasher, token codec) are wrapped into one of
//! these kinds at the point of occurrence; no raw infrastructure error crosses
//! the engine boundary.

use thiserror::Error;

/// Why a token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenFault {
    #[error("token expired")]
    Expired,
    #[error("bad token format")]
    BadFormat,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{subject} not found")]
    NotFound { subject: String },

    #[error("{subject} already exists")]
    AlreadyExists { subject: String },

    /// Unknown email and password mismatch collapse into this kind so the
    /// caller cannot probe for account existence.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid token: {0}")]
    InvalidToken(TokenFault),

    /// Unexpected infrastructure failure. Logged with full context; callers
    /// only ever see a generic failure indication.
    #[error("critical failure in {place}: {cause}")]
    CriticalInternal {
        place: &'static str,
        cause: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl AuthError {
    pub fn not_found(subject: impl Into<String>) -> Self {
        Self::NotFound {
            subject: subject.into(),
        }
    }

    pub fn already_exists(subject: impl Into<String>) -> Self {
        Self::AlreadyExists {
            subject: subject.into(),
        }
    }

    pub fn critical(
        place: &'static str,
        cause: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::CriticalInternal {
            place,
            cause: cause.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_keeps_messages_generic() {
        assert_eq!(
            AuthError::not_found("app 42").to_string(),
            "app 42 not found"
        );
        assert_eq!(
            AuthError::already_exists("user").to_string(),
            "user already exists"
        );
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "invalid credentials"
        );
        assert_eq!(
            AuthError::InvalidToken(TokenFault::Expired).to_string(),
            "invalid token: token expired"
        );
        assert_eq!(
            AuthError::InvalidToken(TokenFault::BadFormat).to_string(),
            "invalid token: bad token format"
        );
    }

    #[test]
    fn critical_carries_place_and_cause() {
        let err = AuthError::critical("hasher::hash", "rng unavailable");
        assert_eq!(
            err.to_string(),
            "critical failure in hasher::hash: rng unavailable"
        );
    }
}
