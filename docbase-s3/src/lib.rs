//! Object storage collaborator for docbase.
//!
//! Simple key-value remote calls against an S3 bucket, scoped under a key
//! prefix. External to the connection/CRUD core — nothing there depends on
//! this crate; higher-level callers use it next to the database client.
//!
//! # Example
//!
//! ```ignore
//! use docbase_s3::{BlobConfig, BlobStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = BlobStore::new(BlobConfig::from_env("my-bucket", "uploads")).await;
//!
//!     store.put(b"hello".to_vec(), "greeting.txt", "text/plain").await?;
//!     let fetched = store.get("greeting.txt").await?;
//!     assert_eq!(fetched, Some(b"hello".to_vec()));
//!
//!     store.delete("greeting.txt").await?;
//!     assert_eq!(store.get("greeting.txt").await?, None);
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as docbase_s3;

pub mod config;
pub mod error;
pub mod store;

pub use config::BlobConfig;
pub use error::{BlobError, BlobResult};
pub use store::BlobStore;
