//! Main docbase crate providing a schema-verified document store client.
//!
//! This crate is the primary entry point for users of docbase. It
//! re-exports the core types and provides convenient access to the
//! available backends and collaborators.
//!
//! # Features
//!
//! - **Connect-and-reconcile setup** - One factory call produces a handle
//!   whose declared collections and indexes are guaranteed to exist
//! - **Normalized CRUD surface** - Uniform timestamp defaulting on insert
//!   and explicit materialized-vs-streamed reads
//! - **Multiple backends** - In-memory for development and tests, MongoDB
//!   behind the `mongodb` feature
//! - **Collaborators** - Payload encryption and password hashing
//!   ([`crypto`]), S3 object storage behind the `s3` feature
//!
//! # Quick Start
//!
//! ```ignore
//! use bson::doc;
//! use docbase::{memory::InMemoryBackend, prelude::*};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let schema = Schema::new().collection(
//!         CollectionSpec::new("users")
//!             .index(IndexSpec::new("by_username", doc! { "username": 1 }).unique()),
//!     );
//!
//!     // Ping, reconcile, and get a ready handle.
//!     let client = Client::initialize(InMemoryBackend::new(), &schema).await?;
//!
//!     let id = client
//!         .insert_one("users", doc! { "username": "alice" })
//!         .await?;
//!     println!("inserted {id}");
//!
//!     let found = client
//!         .find_one("users", doc! { "username": "alice" }, FindOptions::new())
//!         .await?;
//!     assert!(found.is_some());
//!
//!     Ok(())
//! }
//! ```
//!
//! Against a real server, use the factory from the `mongodb` feature
//! instead of constructing the backend yourself:
//!
//! ```ignore
//! use docbase::mongodb::create_client;
//! use docbase::prelude::*;
//!
//! let params = ConnectionParams::new("localhost", 27017, "appdata")
//!     .with_credentials("svc_app", "hunter2");
//! let client = create_client(&params, &schema).await?;
//! ```
//!
//! # Backends
//!
//! - [`memory`] - Fast in-memory storage for development and testing
//! - [`mongodb`] - Persistent MongoDB backend (requires the `mongodb` feature)

pub mod prelude;

pub use docbase_core::{backend, client, config, error, reconcile, schema};

// Re-export BSON types for convenience
pub use bson;

/// In-memory backend implementation.
pub mod memory {
    pub use docbase_memory::InMemoryBackend;
}

/// MongoDB backend implementation and client factory.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use docbase_mongodb::{MongoBackend, create_client};
}

/// Payload encryption and password hashing collaborators.
pub mod crypto {
    pub use docbase_crypto::{CipherConfig, CryptoError, Encryptor, Envelope, password};
}

/// S3 object storage collaborator.
///
/// This module is only available when the `s3` feature is enabled.
#[cfg(feature = "s3")]
pub mod s3 {
    pub use docbase_s3::{BlobConfig, BlobError, BlobStore};
}
