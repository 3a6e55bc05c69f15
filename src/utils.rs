use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand_core::OsRng;

use crate::errors::AppError;

/// Minimum accepted password length, enforced before hashing.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Hash a password with argon2id and a fresh random salt. Rejects
/// passwords shorter than [`MIN_PASSWORD_LENGTH`].
pub fn hash_password(password: &str) -> Result<String, AppError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::bad_request(format!(
            "password too short, minimum {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| AppError::internal(format!("password hashing failed: {err}")))?;

    Ok(hash.to_string())
}

/// Check a candidate password against a stored PHC-format hash. A hash
/// that does not parse is a data problem, not a wrong password, and
/// surfaces as an internal error.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|err| AppError::internal(format!("stored password hash unreadable: {err}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
