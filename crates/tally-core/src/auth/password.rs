use argon2::{
    Argon2, PasswordHash, PasswordVerifier,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};

use crate::error::{AppError, AppResult};

/// Hash a raw password with a fresh random salt.
pub fn hash_password(raw: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(raw.as_bytes(), &salt)
        .map_err(|e| AppError::Password(e.to_string()))?
        .to_string();
    Ok(hash)
}

/// Check a raw password against a stored PHC string. A malformed stored hash
/// never verifies.
pub fn verify_password(raw: &str, stored: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(stored) else {
        tracing::warn!("stored password hash is not a valid PHC string");
        return false;
    };
    Argon2::default()
        .verify_password(raw.as_bytes(), &parsed_hash)
        .is_ok()
}
