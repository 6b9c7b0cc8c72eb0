//! Per-app signing and parsing of access/refresh token pairs.
//!
//! Tokens are self-contained HS256 JWTs; validity is entirely determined by
//! signature and expiry, so there is no server-side session state to consult.

use jsonwebtoken::{
    decode, encode, errors::Error as JwtError, Algorithm, DecodingKey, EncodingKey, Header,
    Validation,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::auth::error::{AuthError, TokenFault};
use crate::store::{App, User};

/// Claims embedded in every issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub id: i64,
    pub email: String,
    pub app_id: i64,
    /// Absolute expiry, Unix seconds, fixed at issuance as `now + ttl`.
    pub exp: i64,
}

/// The access/refresh pair returned by login and refresh.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub auth_token: String,
    pub refresh_token: String,
}

/// Build a fresh token pair for `user`, scoped to `app`.
///
/// The access token is signed with `app.auth_secret`, the refresh token with
/// `app.refresh_secret`; both carry the same id/email/app id.
///
/// # Errors
/// Returns the signer's error on failure, which the engine classifies as a
/// critical internal failure.
pub fn issue_pair(
    user: &User,
    app: &App,
    access_ttl: Duration,
    refresh_ttl: Duration,
    now_unix: i64,
) -> Result<TokenPair, JwtError> {
    let auth_token = sign(user, app.id, &app.auth_secret, access_ttl, now_unix)?;
    let refresh_token = sign(user, app.id, &app.refresh_secret, refresh_ttl, now_unix)?;

    Ok(TokenPair {
        auth_token,
        refresh_token,
    })
}

/// Parse `token`, verify its signature against `secret`, and check expiry
/// against the caller's clock.
///
/// Secret selection is the caller's responsibility: validating a refresh
/// token requires the app's refresh secret, an access token its auth secret.
/// A wrong secret is indistinguishable from a forged token.
///
/// # Errors
/// `InvalidToken(BadFormat)` when the token cannot be parsed, the signature
/// does not verify, or claims are structurally invalid;
/// `InvalidToken(Expired)` when the token parses but `exp <= now_unix`.
pub fn validate(token: &str, secret: &SecretString, now_unix: i64) -> Result<i64, AuthError> {
    let claims = decode_claims(token, secret)?;

    if claims.exp <= now_unix {
        return Err(AuthError::InvalidToken(TokenFault::Expired));
    }

    Ok(claims.id)
}

fn sign(
    user: &User,
    app_id: i64,
    secret: &SecretString,
    ttl: Duration,
    now_unix: i64,
) -> Result<String, JwtError> {
    let claims = TokenClaims {
        id: user.uid,
        email: user.email.clone(),
        app_id,
        exp: now_unix.saturating_add(ttl_seconds(ttl)),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )
}

fn decode_claims(token: &str, secret: &SecretString) -> Result<TokenClaims, AuthError> {
    // Expiry is compared against the injected clock in validate(), not here.
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;

    decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AuthError::InvalidToken(TokenFault::BadFormat))
}

fn ttl_seconds(ttl: Duration) -> i64 {
    i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64ct::{Base64UrlUnpadded, Encoding};

    // Fixed clock keeps the expiry claims stable.
    const NOW: i64 = 1_700_000_000;
    const ACCESS_TTL: Duration = Duration::from_secs(3600);
    const REFRESH_TTL: Duration = Duration::from_secs(86400);

    fn test_user() -> User {
        User {
            uid: 1,
            email: "user@example.com".to_string(),
            pass_hash: "unused".to_string(),
        }
    }

    fn test_app(id: i64) -> App {
        App {
            id,
            name: format!("app-{id}"),
            auth_secret: SecretString::from(format!("auth_secret_{id}")),
            refresh_secret: SecretString::from(format!("refresh_secret_{id}")),
        }
    }

    #[test]
    fn pair_validates_with_matching_secrets() -> Result<(), JwtError> {
        let app = test_app(1);
        let pair = issue_pair(&test_user(), &app, ACCESS_TTL, REFRESH_TTL, NOW)?;

        assert_eq!(validate(&pair.auth_token, &app.auth_secret, NOW).ok(), Some(1));
        assert_eq!(
            validate(&pair.refresh_token, &app.refresh_secret, NOW).ok(),
            Some(1)
        );

        Ok(())
    }

    #[test]
    fn claims_carry_user_app_and_exact_expiry() -> Result<(), JwtError> {
        let app = test_app(7);
        let pair = issue_pair(&test_user(), &app, ACCESS_TTL, REFRESH_TTL, NOW)?;

        let auth_claims = decode_claims(&pair.auth_token, &app.auth_secret).unwrap();
        assert_eq!(auth_claims.id, 1);
        assert_eq!(auth_claims.email, "user@example.com");
        assert_eq!(auth_claims.app_id, 7);
        assert_eq!(auth_claims.exp, NOW + 3600);

        let refresh_claims = decode_claims(&pair.refresh_token, &app.refresh_secret).unwrap();
        assert_eq!(refresh_claims.id, 1);
        assert_eq!(refresh_claims.email, "user@example.com");
        assert_eq!(refresh_claims.app_id, 7);
        assert_eq!(refresh_claims.exp, NOW + 86400);

        Ok(())
    }

    #[test]
    fn cross_app_secrets_are_rejected() -> Result<(), JwtError> {
        let app_a = test_app(1);
        let app_b = test_app(2);
        let pair = issue_pair(&test_user(), &app_a, ACCESS_TTL, REFRESH_TTL, NOW)?;

        assert!(matches!(
            validate(&pair.auth_token, &app_b.auth_secret, NOW),
            Err(AuthError::InvalidToken(TokenFault::BadFormat))
        ));
        assert!(matches!(
            validate(&pair.refresh_token, &app_b.refresh_secret, NOW),
            Err(AuthError::InvalidToken(TokenFault::BadFormat))
        ));

        Ok(())
    }

    #[test]
    fn auth_and_refresh_secrets_are_not_interchangeable() -> Result<(), JwtError> {
        let app = test_app(1);
        let pair = issue_pair(&test_user(), &app, ACCESS_TTL, REFRESH_TTL, NOW)?;

        assert!(matches!(
            validate(&pair.auth_token, &app.refresh_secret, NOW),
            Err(AuthError::InvalidToken(TokenFault::BadFormat))
        ));
        assert!(matches!(
            validate(&pair.refresh_token, &app.auth_secret, NOW),
            Err(AuthError::InvalidToken(TokenFault::BadFormat))
        ));

        Ok(())
    }

    #[test]
    fn expired_token_is_rejected_as_expired() -> Result<(), JwtError> {
        let app = test_app(1);
        let pair = issue_pair(&test_user(), &app, ACCESS_TTL, REFRESH_TTL, NOW)?;

        assert!(matches!(
            validate(&pair.auth_token, &app.auth_secret, NOW + 7200),
            Err(AuthError::InvalidToken(TokenFault::Expired))
        ));

        // exp == now counts as expired, one second earlier does not.
        assert!(matches!(
            validate(&pair.auth_token, &app.auth_secret, NOW + 3600),
            Err(AuthError::InvalidToken(TokenFault::Expired))
        ));
        assert!(validate(&pair.auth_token, &app.auth_secret, NOW + 3599).is_ok());

        Ok(())
    }

    #[test]
    fn truncated_token_is_bad_format() -> Result<(), JwtError> {
        let app = test_app(1);
        let pair = issue_pair(&test_user(), &app, ACCESS_TTL, REFRESH_TTL, NOW)?;

        let truncated = &pair.auth_token[..pair.auth_token.len() - 10];
        assert!(matches!(
            validate(truncated, &app.auth_secret, NOW),
            Err(AuthError::InvalidToken(TokenFault::BadFormat))
        ));

        assert!(matches!(
            validate("not-a-token", &app.auth_secret, NOW),
            Err(AuthError::InvalidToken(TokenFault::BadFormat))
        ));

        Ok(())
    }

    #[test]
    fn tampered_claims_break_the_signature() -> Result<(), JwtError> {
        let app = test_app(1);
        let pair = issue_pair(&test_user(), &app, ACCESS_TTL, REFRESH_TTL, NOW)?;

        let parts: Vec<&str> = pair.auth_token.split('.').collect();
        assert_eq!(parts.len(), 3);

        let claims_json = Base64UrlUnpadded::decode_vec(parts[1]).unwrap();
        let mut claims: TokenClaims = serde_json::from_slice(&claims_json).unwrap();
        claims.id = 999;
        let forged_claims =
            Base64UrlUnpadded::encode_string(&serde_json::to_vec(&claims).unwrap());
        let forged = format!("{}.{}.{}", parts[0], forged_claims, parts[2]);

        assert!(matches!(
            validate(&forged, &app.auth_secret, NOW),
            Err(AuthError::InvalidToken(TokenFault::BadFormat))
        ));

        Ok(())
    }

    #[test]
    fn missing_claims_are_bad_format() {
        #[derive(Serialize)]
        struct PartialClaims {
            id: i64,
            exp: i64,
        }

        let app = test_app(1);
        let token = encode(
            &Header::new(Algorithm::HS256),
            &PartialClaims {
                id: 1,
                exp: NOW + 3600,
            },
            &EncodingKey::from_secret(app.auth_secret.expose_secret().as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            validate(&token, &app.auth_secret, NOW),
            Err(AuthError::InvalidToken(TokenFault::BadFormat))
        ));
    }
}
