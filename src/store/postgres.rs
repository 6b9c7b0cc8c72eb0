//! Postgres-backed [`Store`].
//!
//! Uniqueness of user emails is enforced by the schema; this module only
//! translates database outcomes into the classified error kinds.

use anyhow::Context;
use async_trait::async_trait;
use secrecy::SecretString;
use sqlx::{postgres::PgPoolOptions, PgPool, Row};
use std::time::Duration;
use tracing::{info_span, Instrument};

use crate::auth::error::AuthError;
use crate::store::{App, Store, User};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to the database and build a store over a fresh pool.
    ///
    /// # Errors
    /// Returns an error if the connection cannot be established.
    pub async fn connect(dsn: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .min_connections(1)
            .max_connections(5)
            .max_lifetime(Duration::from_secs(60 * 2))
            .test_before_acquire(true)
            .connect(dsn)
            .await
            .context("Failed to connect to database")?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl Store for PgStore {
    async fn save_user(&self, email: &str, pass_hash: &str) -> Result<i64, AuthError> {
        let query = "INSERT INTO users (email, pass_hash) VALUES ($1, $2) RETURNING id";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(email)
            .bind(pass_hash)
            .fetch_one(&self.pool)
            .instrument(span)
            .await;

        match row {
            Ok(row) => Ok(row.get("id")),
            Err(err) if is_unique_violation(&err) => Err(AuthError::already_exists("user")),
            Err(err) => Err(AuthError::critical("PgStore::save_user", err)),
        }
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, AuthError> {
        let query = "SELECT id, email, pass_hash FROM users WHERE email = $1";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(email)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .map_err(|err| AuthError::critical("PgStore::get_user_by_email", err))?;

        row.map(|row| User {
            uid: row.get("id"),
            email: row.get("email"),
            pass_hash: row.get("pass_hash"),
        })
        .ok_or_else(|| AuthError::not_found(format!("user {email}")))
    }

    async fn get_user_by_id(&self, uid: i64) -> Result<User, AuthError> {
        let query = "SELECT id, email, pass_hash FROM users WHERE id = $1";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(uid)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .map_err(|err| AuthError::critical("PgStore::get_user_by_id", err))?;

        row.map(|row| User {
            uid: row.get("id"),
            email: row.get("email"),
            pass_hash: row.get("pass_hash"),
        })
        .ok_or_else(|| AuthError::not_found(format!("user {uid}")))
    }

    async fn get_app(&self, id: i64) -> Result<App, AuthError> {
        let query = "SELECT id, name, auth_secret, refresh_secret FROM apps WHERE id = $1";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .map_err(|err| AuthError::critical("PgStore::get_app", err))?;

        row.map(|row| App {
            id: row.get("id"),
            name: row.get("name"),
            auth_secret: SecretString::from(row.get::<String, _>("auth_secret")),
            refresh_secret: SecretString::from(row.get::<String, _>("refresh_secret")),
        })
        .ok_or_else(|| AuthError::not_found(format!("app {id}")))
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}
