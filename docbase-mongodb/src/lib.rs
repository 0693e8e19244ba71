//! MongoDB backend for docbase.
//!
//! This crate provides the MongoDB implementation of the
//! [`DocumentBackend`](docbase_core::backend::DocumentBackend) trait and
//! the [`create_client`] factory that sequences connection establishment,
//! liveness verification and schema reconciliation into one call.
//!
//! # Connection
//!
//! Connections are described by
//! [`ConnectionParams`](docbase_core::config::ConnectionParams); when a
//! non-blank username is present the driver authenticates with it,
//! otherwise the session is unauthenticated. The driver owns all socket
//! handling, pooling and timeouts — timeout failures surface through the
//! normal error taxonomy.
//!
//! # Example
//!
//! ```ignore
//! use bson::doc;
//! use docbase_core::{
//!     config::ConnectionParams,
//!     schema::{CollectionSpec, IndexSpec, Schema},
//! };
//! use docbase_mongodb::create_client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let params = ConnectionParams::new("localhost", 27017, "appdata");
//!     let schema = Schema::new().collection(
//!         CollectionSpec::new("users")
//!             .index(IndexSpec::new("by_username", doc! { "username": 1 }).unique()),
//!     );
//!
//!     let client = create_client(&params, &schema).await?;
//!     client.insert_one("users", doc! { "username": "alice" }).await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as docbase_mongodb;

pub mod store;

pub use store::{MongoBackend, create_client};
