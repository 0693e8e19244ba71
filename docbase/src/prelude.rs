//! Convenient re-exports of commonly used types from docbase.
//!
//! Import this prelude module to quickly access the most frequently used
//! types and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use docbase::prelude::*;
//! ```

pub use docbase_core::{
    backend::{DocumentBackend, DocumentStream, FindQuery},
    client::{Client, FetchMode, FindOptions, FindResult},
    config::ConnectionParams,
    error::{ClientError, ClientResult},
    reconcile::{ReconcileSummary, reconcile},
    schema::{CollectionSpec, IndexProperties, IndexSpec, Schema},
};
