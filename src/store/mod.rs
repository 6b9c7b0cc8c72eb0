//! Durable lookup and insertion of user and app records.
//!
//! The engine only ever sees this trait; implementations classify their own
//! failures into [`AuthError`] kinds before returning.

pub mod postgres;

use async_trait::async_trait;
use secrecy::SecretString;

use crate::auth::error::AuthError;

/// A registered end user. Created on registration, immutable afterwards.
#[derive(Debug, Clone)]
pub struct User {
    pub uid: i64,
    pub email: String,
    pub pass_hash: String,
}

/// A registered client application, the tenant boundary for issued tokens.
///
/// The two secrets are independent: `auth_secret` signs access tokens,
/// `refresh_secret` signs refresh tokens, and they are never interchanged.
#[derive(Debug, Clone)]
pub struct App {
    pub id: i64,
    pub name: String,
    pub auth_secret: SecretString,
    pub refresh_secret: SecretString,
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Persist a new user, returning the store-assigned id.
    ///
    /// A duplicate email surfaces as `AlreadyExists`; any other failure as
    /// `CriticalInternal`.
    async fn save_user(&self, email: &str, pass_hash: &str) -> Result<i64, AuthError>;

    async fn get_user_by_email(&self, email: &str) -> Result<User, AuthError>;

    async fn get_user_by_id(&self, uid: i64) -> Result<User, AuthError>;

    async fn get_app(&self, id: i64) -> Result<App, AuthError>;
}
