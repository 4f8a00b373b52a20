//! Argon2id password hashing and strength checks.
//!
//! Hashes are stored in PHC string format, so the salt and parameters travel
//! with the hash.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use shootdesk_core::error::CoreError;

/// Hash a plaintext password with a random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Check `password` against a stored PHC hash.
///
/// A mismatch is `Ok(false)`; a malformed hash is an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Enforce the configured minimum length (counted in characters).
pub fn validate_password_strength(password: &str, min_length: usize) -> Result<(), CoreError> {
    if password.chars().count() < min_length {
        return Err(CoreError::Validation(format!(
            "Password must be at least {min_length} characters long"
        )));
    }
    Ok(())
}
