//! Authentication and token-lifecycle engine.
//!
//! Orchestrates registration, login and refresh on top of the credential
//! hasher, the token codec and the injected store. Holds no mutable shared
//! state: every operation is a function of its inputs plus the store and the
//! clock, so concurrent invocations never contend.

pub mod error;
pub mod hasher;
pub mod token;

use chrono::Utc;
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::auth::error::{AuthError, TokenFault};
use crate::auth::token::TokenPair;
use crate::store::{App, Store, User};

/// Current-time source, injectable for testability.
pub trait Clock: Send + Sync {
    /// Wall-clock time, Unix seconds.
    fn now_unix(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> i64 {
        Utc::now().timestamp()
    }
}

pub struct AuthService<S, C = SystemClock> {
    store: S,
    clock: C,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl<S, C> AuthService<S, C>
where
    S: Store,
    C: Clock,
{
    pub fn new(store: S, clock: C, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            store,
            clock,
            access_ttl,
            refresh_ttl,
        }
    }

    /// Register a new user, returning the store-assigned id.
    ///
    /// # Errors
    /// `AlreadyExists` for a duplicate email, `CriticalInternal` when hashing
    /// or the store fails unexpectedly.
    pub async fn register(&self, email: &str, password: &str) -> Result<i64, AuthError> {
        debug!("registering new user");

        let pass_hash = hasher::hash(password).map_err(|err| {
            error!("failed to hash password: {err}");
            AuthError::critical("hasher::hash", err)
        })?;

        let uid = match self.store.save_user(email, &pass_hash).await {
            Ok(uid) => uid,
            Err(err @ AuthError::AlreadyExists { .. }) => {
                warn!("user already exists");
                return Err(err);
            }
            Err(err) => {
                error!("failed to save user: {err}");
                return Err(err);
            }
        };

        debug!(uid, "user registered");

        Ok(uid)
    }

    /// Verify credentials and issue a token pair scoped to `app_id`.
    ///
    /// # Errors
    /// `InvalidCredentials` for an unknown email or a wrong password (the two
    /// are indistinguishable to the caller), `NotFound` for an unknown app,
    /// `CriticalInternal` on hasher, codec or store failure.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        app_id: i64,
    ) -> Result<TokenPair, AuthError> {
        debug!("logging in user");

        let user = match self.store.get_user_by_email(email).await {
            Ok(user) => user,
            Err(AuthError::NotFound { .. }) => {
                // An unknown email must look exactly like a wrong password.
                warn!("user not found");
                return Err(AuthError::InvalidCredentials);
            }
            Err(err) => {
                error!("failed to get user from storage: {err}");
                return Err(err);
            }
        };

        match hasher::verify(&user.pass_hash, password) {
            Ok(true) => (),
            Ok(false) => {
                warn!("password mismatch");
                return Err(AuthError::InvalidCredentials);
            }
            Err(err) => {
                error!("failed to verify password: {err}");
                return Err(AuthError::critical("hasher::verify", err));
            }
        }

        let app = match self.store.get_app(app_id).await {
            Ok(app) => app,
            Err(err) => {
                // App misconfiguration, not a user error; never collapsed
                // into InvalidCredentials.
                warn!(app_id, "app lookup failed: {err}");
                return Err(err);
            }
        };

        debug!(uid = user.uid, "user logged in");

        self.issue_pair(&user, &app)
    }

    /// Exchange a refresh token for a brand-new token pair.
    ///
    /// The old refresh token is not invalidated server-side; it stays valid
    /// until its own expiry.
    ///
    /// # Errors
    /// `NotFound` for an unknown app, `InvalidToken` for an expired, forged
    /// or otherwise unusable refresh token, `CriticalInternal` on codec or
    /// store failure.
    pub async fn refresh(&self, refresh_token: &str, app_id: i64) -> Result<TokenPair, AuthError> {
        debug!("refreshing token pair");

        let app = match self.store.get_app(app_id).await {
            Ok(app) => app,
            Err(err) => {
                warn!(app_id, "app lookup failed: {err}");
                return Err(err);
            }
        };

        let uid = match token::validate(refresh_token, &app.refresh_secret, self.clock.now_unix())
        {
            Ok(uid) => uid,
            Err(err) => {
                warn!("refresh token rejected: {err}");
                return Err(err);
            }
        };

        let user = match self.store.get_user_by_id(uid).await {
            Ok(user) => user,
            Err(AuthError::NotFound { .. }) => {
                // A vanished user must be indistinguishable from a forged
                // token.
                warn!(uid, "refresh for unknown user");
                return Err(AuthError::InvalidToken(TokenFault::BadFormat));
            }
            Err(err) => {
                error!("failed to get user from storage: {err}");
                return Err(err);
            }
        };

        debug!(uid = user.uid, "token pair refreshed");

        self.issue_pair(&user, &app)
    }

    fn issue_pair(&self, user: &User, app: &App) -> Result<TokenPair, AuthError> {
        token::issue_pair(
            user,
            app,
            self.access_ttl,
            self.refresh_ttl,
            self.clock.now_unix(),
        )
        .map_err(|err| {
            error!("failed to issue token pair: {err}");
            AuthError::critical("token::issue_pair", err)
        })
    }
}
