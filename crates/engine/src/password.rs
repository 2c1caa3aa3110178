//! Password hashing.
//!
//! Passwords are stored as Argon2id PHC strings with a random salt. The
//! plaintext is never stored, logged, or returned.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use crate::{EngineError, ResultEngine};

/// Hash `password` with a fresh salt.
pub fn hash(password: &str) -> ResultEngine<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| EngineError::PasswordHash(err.to_string()))
}

/// Check `password` against a stored PHC string.
///
/// A malformed stored hash verifies as `false`.
pub fn verify(password: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// [`hash`] on the blocking pool, keeping Argon2 off the async workers.
pub async fn hash_blocking(password: String) -> ResultEngine<String> {
    tokio::task::spawn_blocking(move || hash(&password))
        .await
        .map_err(|err| EngineError::PasswordHash(err.to_string()))?
}

/// [`verify`] on the blocking pool.
pub async fn verify_blocking(password: String, stored: String) -> ResultEngine<bool> {
    tokio::task::spawn_blocking(move || verify(&password, &stored))
        .await
        .map_err(|err| EngineError::PasswordHash(err.to_string()))
}
