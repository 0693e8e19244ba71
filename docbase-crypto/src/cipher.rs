//! Symmetric encryption of opaque byte payloads.
//!
//! AES-GCM-256 with a key derived once from a process-wide secret and
//! salt via Argon2id. Every encryption uses a fresh random 96-bit nonce,
//! carried in the [`Envelope`] next to the ciphertext; the GCM
//! authentication tag stays appended to the ciphertext, so tampering is
//! detected on decrypt.

use aes_gcm::{
    Aes256Gcm, Key, Nonce,
    aead::{Aead, AeadCore, KeyInit, OsRng},
};
use argon2::{Algorithm, Argon2, Version};
use serde::{Deserialize, Serialize};

use crate::error::{CryptoError, CryptoResult};

/// AES-GCM nonce size: 96 bits.
const NONCE_SIZE: usize = 12;
/// Derived key size: 256 bits.
const KEY_SIZE: usize = 32;
/// Minimum salt length accepted for key derivation.
const MIN_SALT_SIZE: usize = 16;
/// Algorithm tag stamped into every envelope.
const ALGORITHM: &str = "AES-GCM-256";

/// Secret material for building an [`Encryptor`].
///
/// The original deployment derived this from process environment at load
/// time; here it is an explicit value handed to the constructor, so tests
/// and embedders control where it comes from. [`CipherConfig::from_env`]
/// reproduces the environment-driven form.
#[derive(Debug, Clone)]
pub struct CipherConfig {
    /// Passphrase the key is derived from.
    pub secret: String,
    /// Key-derivation salt; at least 16 bytes.
    pub salt: String,
}

impl CipherConfig {
    /// Creates a config from explicit secret and salt values.
    pub fn new(secret: impl Into<String>, salt: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            salt: salt.into(),
        }
    }

    /// Reads `ENCRYPTION_PASSWORD` and `ENCRYPTION_SALT` from the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Returns a [`CryptoError::Config`] naming the missing variable.
    pub fn from_env() -> CryptoResult<Self> {
        let secret = std::env::var("ENCRYPTION_PASSWORD")
            .map_err(|_| CryptoError::Config("ENCRYPTION_PASSWORD is not set".to_string()))?;
        let salt = std::env::var("ENCRYPTION_SALT")
            .map_err(|_| CryptoError::Config("ENCRYPTION_SALT is not set".to_string()))?;

        Ok(Self { secret, salt })
    }
}

/// Ciphertext container produced by [`Encryptor::encrypt`].
///
/// Serializable so callers can persist or transmit it as JSON/BSON; the
/// envelope is all [`Encryptor::decrypt`] needs besides the key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    /// Encryption algorithm, always `"AES-GCM-256"`.
    pub algorithm: String,
    /// Random 96-bit nonce, unique per encryption.
    pub nonce: Vec<u8>,
    /// Encrypted payload with the authentication tag appended.
    pub ciphertext: Vec<u8>,
}

/// Stateless encrypt/decrypt pair over one derived key.
pub struct Encryptor {
    cipher: Aes256Gcm,
}

impl Encryptor {
    /// Derives the key from the config and builds the cipher.
    ///
    /// Key derivation runs once here, not per call.
    ///
    /// # Errors
    ///
    /// Returns a [`CryptoError::Config`] for an undersized salt or a
    /// [`CryptoError::KeyDerivation`] if Argon2 fails.
    pub fn new(config: &CipherConfig) -> CryptoResult<Self> {
        if config.salt.len() < MIN_SALT_SIZE {
            return Err(CryptoError::Config(format!(
                "salt must be at least {MIN_SALT_SIZE} bytes"
            )));
        }

        let mut key_bytes = [0u8; KEY_SIZE];
        Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2::Params::default())
            .hash_password_into(
                config.secret.as_bytes(),
                config.salt.as_bytes(),
                &mut key_bytes,
            )
            .map_err(|err| CryptoError::KeyDerivation(err.to_string()))?;

        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key_bytes));
        key_bytes.fill(0);

        Ok(Self { cipher })
    }

    /// Encrypts a byte payload under a fresh random nonce.
    ///
    /// # Errors
    ///
    /// Returns a [`CryptoError::Encrypt`] if the cipher rejects the
    /// input.
    pub fn encrypt(&self, plaintext: &[u8]) -> CryptoResult<Envelope> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext)
            .map_err(|err| CryptoError::Encrypt(err.to_string()))?;

        Ok(Envelope {
            algorithm: ALGORITHM.to_string(),
            nonce: nonce.to_vec(),
            ciphertext,
        })
    }

    /// Decrypts an envelope back into the original bytes.
    ///
    /// # Errors
    ///
    /// Returns a [`CryptoError::Decrypt`] for an unknown algorithm, a
    /// malformed nonce, or a ciphertext that fails authentication
    /// (wrong key or tampered data).
    pub fn decrypt(&self, envelope: &Envelope) -> CryptoResult<Vec<u8>> {
        if envelope.algorithm != ALGORITHM {
            return Err(CryptoError::Decrypt(format!(
                "unsupported algorithm '{}'",
                envelope.algorithm
            )));
        }
        if envelope.nonce.len() != NONCE_SIZE {
            return Err(CryptoError::Decrypt(format!(
                "invalid nonce length {}, expected {NONCE_SIZE}",
                envelope.nonce.len()
            )));
        }

        self.cipher
            .decrypt(Nonce::from_slice(&envelope.nonce), envelope.ciphertext.as_ref())
            .map_err(|_| {
                CryptoError::Decrypt("ciphertext rejected: wrong key or tampered data".to_string())
            })
    }
}
