// src/utils/hash.rs

use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{
        Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};

use crate::error::AppError;

/// Stand-in hash verified when the username is unknown, so that a login for a
/// missing account costs one Argon2 run like any other.
static DECOY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_credential("quizgate-decoy").ok());

fn internal(e: HashError) -> AppError {
    tracing::error!("Credential hashing failed: {}", e);
    AppError::InternalServerError("Credential processing failed".to_string())
}

/// Salted Argon2id hash in PHC string form (`$argon2id$v=19$...`).
pub fn hash_credential(credential: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(credential.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(internal)
}

/// `Ok(false)` on a mismatch. Any other failure, such as a stored hash that
/// does not parse, is an internal error rather than a rejected login.
pub fn verify_credential(credential: &str, stored: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(stored).map_err(internal)?;

    match Argon2::default().verify_password(credential.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(HashError::Password) => Ok(false),
        Err(e) => Err(internal(e)),
    }
}

/// Runs a verification whose outcome is discarded.
pub fn verify_against_decoy(credential: &str) {
    if let Some(decoy) = DECOY_HASH.as_deref() {
        let _ = verify_credential(credential, decoy);
    }
}
