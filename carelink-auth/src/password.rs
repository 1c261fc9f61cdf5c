//! Argon2id password hashing.
//!
//! Hashing and verification are CPU-intensive and run on the blocking
//! thread pool so they never stall the async runtime.

use crate::error::IdentityError;
use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Hash a password with a freshly generated salt.
pub async fn hash_password(password: &str) -> Result<String, IdentityError> {
    let password = password.to_string();

    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| IdentityError::Hashing)
    })
    .await
    .map_err(|_| IdentityError::Hashing)?
}

/// Verify a password against a stored hash. Returns `Ok(false)` for a
/// wrong password; errors are reserved for unparseable hashes.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, IdentityError> {
    let password = password.to_string();
    let hash = hash.to_string();

    tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&hash).map_err(|_| IdentityError::Hashing)?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(_) => Err(IdentityError::Hashing),
        }
    })
    .await
    .map_err(|_| IdentityError::Hashing)?
}
