//! Connection, schema reconciliation and CRUD layer for document stores.
//!
//! This crate is the core of the docbase project and provides:
//!
//! - **Connection parameters** ([`config`]) - Caller-supplied description of one database target
//! - **Schema descriptors** ([`schema`]) - Declarative collections-and-indexes layout
//! - **Backend abstraction** ([`backend`]) - The trait concrete stores implement
//! - **Reconciliation** ([`reconcile`]) - Additive, idempotent schema convergence
//! - **Client facade** ([`client`]) - Setup sequencing plus the normalized CRUD surface
//! - **Error handling** ([`error`]) - The connection/schema/query/write failure taxonomy
//!
//! # Example
//!
//! ```ignore
//! use bson::doc;
//! use docbase_core::{
//!     client::Client,
//!     schema::{CollectionSpec, IndexSpec, Schema},
//! };
//!
//! let schema = Schema::new().collection(
//!     CollectionSpec::new("users")
//!         .index(IndexSpec::new("by_username", doc! { "username": 1 }).unique()),
//! );
//!
//! // `backend` is any DocumentBackend implementation.
//! let client = Client::initialize(backend, &schema).await?;
//! let id = client.insert_one("users", doc! { "username": "alice" }).await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as docbase_core;

pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod reconcile;
pub mod schema;
