//! Password hashing and verification.
//!
//! Argon2id with a random per-hash salt. Hashes are PHC strings, so the
//! salt and parameters travel inside the hash itself and verification
//! needs nothing but the stored string.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::RngCore;

use crate::error::{CryptoError, CryptoResult};

/// Hashes a plaintext password.
///
/// # Errors
///
/// Returns a [`CryptoError::Password`] if hashing fails.
pub fn hash(password: &str) -> CryptoResult<String> {
    let mut salt_bytes = [0u8; 16];
    rand::rng().fill_bytes(&mut salt_bytes);

    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|err| CryptoError::Password(err.to_string()))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| CryptoError::Password(err.to_string()))
}

/// Verifies a plaintext password against a stored hash.
///
/// A non-matching password is `Ok(false)`, not an error.
///
/// # Errors
///
/// Returns a [`CryptoError::Password`] if the stored hash cannot be
/// parsed.
pub fn verify(password: &str, hash: &str) -> CryptoResult<bool> {
    let parsed = PasswordHash::new(hash).map_err(|err| CryptoError::Password(err.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hashed = hash("my_secure_password").unwrap();

        assert!(hashed.starts_with("$argon2id$"));
        assert!(verify("my_secure_password", &hashed).unwrap());
        assert!(!verify("wrong_password", &hashed).unwrap());
    }

    #[test]
    fn same_password_hashes_differently() {
        let first = hash("password").unwrap();
        let second = hash("password").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify("password", "not-a-phc-string").is_err());
    }
}
