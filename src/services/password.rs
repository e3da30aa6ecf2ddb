//! Password handling
//!
//! Registered users keep an Argon2id hash (PHC string) rather than the
//! plaintext, so the persisted user list never contains passwords.

use anyhow::{anyhow, Context, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Minimum length accepted for a new password
pub const MIN_PASSWORD_LEN: usize = 8;

/// Hash a password with Argon2id and a random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("Failed to hash password: {}", e))?;

    Ok(hash.to_string())
}

/// Verify a password against a stored PHC hash.
///
/// `Ok(false)` on mismatch, `Err` only when the stored hash is unusable.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| anyhow!("Invalid password hash format: {}", e))
        .context("Failed to parse password hash")?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow!("Password verification failed: {}", e)),
    }
}

/// Whether `candidate` matches the stored credential of a user.
///
/// Users without a stored hash never match. Unusable hashes are logged and
/// treated as a mismatch.
pub fn credential_matches(stored: Option<&str>, candidate: &str) -> bool {
    let Some(hash) = stored else {
        return false;
    };
    match verify_password(candidate, hash) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!("Stored credential could not be checked: {:#}", e);
            false
        }
    }
}
