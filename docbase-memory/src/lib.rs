//! In-memory backend for docbase.
//!
//! Implements the [`DocumentBackend`](docbase_core::backend::DocumentBackend)
//! trait entirely in memory. Useful for development and as the backend the
//! test suite runs the client facade against, with no external store
//! required. Ping always succeeds, inserts assign `ObjectId`s the way the
//! real store does, and index creation records names so reconciliation is
//! observable.

#[allow(unused_extern_crates)]
extern crate self as docbase_memory;

mod matcher;
pub mod store;

pub use store::InMemoryBackend;
