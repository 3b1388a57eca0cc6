//! Admin password hashing.
//!
//! Hashes are Argon2id PHC strings. Both hashing and verification run on the
//! blocking pool, never on a runtime worker.

use crate::error::{ApiError, ApiResult};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use lazy_static::lazy_static;

lazy_static! {
    /// Verified against when a login names no account, so a miss costs the
    /// same hash work as a wrong password.
    static ref DUMMY_HASH: String = hash_blocking("dummy-password-for-timing").unwrap_or_default();
}

fn hash_blocking(password: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default().hash_password(password.as_bytes(), &salt)?.to_string())
}

fn verify_blocking(password: &str, stored: &str) -> Result<bool, HashError> {
    let parsed = PasswordHash::new(stored)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(HashError::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Hash a new admin password
pub async fn hash_password(password: &str) -> ApiResult<String> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || hash_blocking(&password))
        .await
        .map_err(|e| ApiError::Internal(format!("Password hashing task failed: {}", e)))?
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {}", e)))
}

/// Check a password against a stored hash.
///
/// `Ok(false)` on mismatch; an unparsable stored hash is an internal error.
pub async fn verify_password(password: &str, stored: &str) -> ApiResult<bool> {
    let password = password.to_owned();
    let stored = stored.to_owned();
    tokio::task::spawn_blocking(move || verify_blocking(&password, &stored))
        .await
        .map_err(|e| ApiError::Internal(format!("Password verification task failed: {}", e)))?
        .map_err(|e| ApiError::Internal(format!("Password verification failed: {}", e)))
}

/// Spend one verification's worth of work for a login with no matching account
pub async fn verify_against_dummy(password: &str) {
    let password = password.to_owned();
    let _ = tokio::task::spawn_blocking(move || verify_blocking(&password, &DUMMY_HASH)).await;
}
