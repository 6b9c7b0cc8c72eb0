//! One-way password hashing and verification.

use argon2::{
    password_hash::{
        Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Argon2,
};
use rand::rngs::OsRng;

/// Hash a plaintext password with Argon2id and a fresh per-call salt.
///
/// # Errors
/// Returns an error only when the hashing backend itself fails; the caller
/// classifies that as a critical internal failure, never a user error.
pub fn hash(password: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);

    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Verify a plaintext password against a stored hash.
///
/// `Ok(false)` on mismatch; the caller collapses that with "user not found"
/// so the two outcomes stay indistinguishable.
///
/// # Errors
/// Returns an error when the stored hash cannot be parsed or the backend
/// fails, which is unexpected state rather than a failed login.
pub fn verify(pass_hash: &str, password: &str) -> Result<bool, HashError> {
    let parsed = PasswordHash::new(pass_hash)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(HashError::Password) => Ok(false),
        Err(err) => Err(err),
    }
}
