//! Error types for encryption and password hashing.

use thiserror::Error;

/// Failures produced by the cipher and password modules.
///
/// Messages never include key material, plaintexts or passwords.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Missing or invalid configuration (secret, salt, environment).
    #[error("crypto configuration error: {0}")]
    Config(String),
    /// Key derivation failed.
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),
    /// Encryption failed.
    #[error("encryption failed: {0}")]
    Encrypt(String),
    /// Decryption failed: wrong key, tampered data, or malformed envelope.
    #[error("decryption failed: {0}")]
    Decrypt(String),
    /// Password hashing or hash parsing failed.
    #[error("password hashing failed: {0}")]
    Password(String),
}

/// A specialized `Result` type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;
