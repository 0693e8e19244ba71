//! Encryption and password-hashing collaborators for docbase.
//!
//! Two pure transforms, independent of the connection/CRUD core:
//!
//! - [`cipher`] - AES-GCM-256 encryption of opaque byte payloads, keyed by
//!   a process-wide secret and salt handed in as an explicit
//!   [`CipherConfig`](cipher::CipherConfig)
//! - [`password`] - Argon2id password hashing and verification
//!
//! Neither module touches the network or holds state beyond the derived
//! key.

#[allow(unused_extern_crates)]
extern crate self as docbase_crypto;

pub mod cipher;
pub mod error;
pub mod password;

pub use cipher::{CipherConfig, Encryptor, Envelope};
pub use error::{CryptoError, CryptoResult};
