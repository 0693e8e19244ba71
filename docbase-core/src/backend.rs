//! Storage backend abstraction.
//!
//! [`DocumentBackend`] is the seam between the client facade and a concrete
//! store. Implementations wrap a live connection bound to one database and
//! translate each operation into the store's native calls. The trait is the
//! full outbound surface this layer needs: liveness, collection and index
//! enumeration/creation, filtered reads, bulk inserts, and single deletes.
//!
//! # Thread Safety
//!
//! Implementations must be `Send + Sync`; once setup has completed, a
//! backend is used concurrently by every operation on the facade that owns
//! it. No client-side locking is performed — each call relies on the remote
//! store's own concurrency control.

use std::fmt::Debug;

use async_trait::async_trait;
use bson::{Bson, Document};
use futures::stream::BoxStream;

use crate::{error::ClientResult, schema::IndexSpec};

/// A lazy, forward-only, single-pass sequence of matched documents.
///
/// Pulled incrementally from the store; not restartable. A failure while
/// iterating surfaces as an `Err` item, after which the stream should be
/// considered exhausted.
pub type DocumentStream = BoxStream<'static, ClientResult<Document>>;

/// A filtered read, already reduced to what a store executes: filter,
/// optional projection, and skip/limit bounds. Built by the facade from
/// caller-facing [`FindOptions`](crate::client::FindOptions).
#[derive(Debug, Clone, Default)]
pub struct FindQuery {
    /// Filter document; an empty document matches everything.
    pub filter: Document,
    /// Optional projection restricting returned fields.
    pub projection: Option<Document>,
    /// Maximum number of documents to return, if bounded.
    pub limit: Option<u64>,
    /// Number of matched documents to skip before returning results.
    pub skip: Option<u64>,
}

/// Abstract interface to one database of a document store.
///
/// All methods are async and suspend at the point they communicate with
/// the store. No method retries internally; failures are mapped into the
/// [`ClientError`](crate::error::ClientError) taxonomy by the
/// implementation and propagate unchanged.
#[async_trait]
pub trait DocumentBackend: Send + Sync + Debug {
    /// Verifies the connection is live and the server accepts commands.
    ///
    /// A successful open does not guarantee the server accepted the
    /// session; this surfaces authentication and network failures before
    /// the first real operation.
    async fn ping(&self) -> ClientResult<()>;

    /// Lists the names of all collections in the database.
    async fn list_collections(&self) -> ClientResult<Vec<String>>;

    /// Creates a collection. Callers check existence first; creating a
    /// collection that already exists may be an error depending on the
    /// store.
    async fn create_collection(&self, name: &str) -> ClientResult<()>;

    /// Lists the names of the indexes on one collection.
    async fn list_index_names(&self, collection: &str) -> ClientResult<Vec<String>>;

    /// Creates an index with the declared name, keys and properties.
    async fn create_index(&self, collection: &str, index: &IndexSpec) -> ClientResult<()>;

    /// Runs a filtered read and returns a lazy cursor over the matches.
    ///
    /// Materialization, when requested, happens in the facade by draining
    /// the returned stream.
    async fn find(&self, collection: &str, query: FindQuery) -> ClientResult<DocumentStream>;

    /// Inserts documents in one bulk call.
    ///
    /// Returns the store-assigned identifier of every inserted document,
    /// positionally aligned with the input order. Documents are inserted
    /// exactly as given; timestamp defaulting happens in the facade.
    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> ClientResult<Vec<Bson>>;

    /// Deletes at most one document matching the filter.
    ///
    /// Returns whether a document was actually removed; matching nothing
    /// is not an error.
    async fn delete_one(&self, collection: &str, filter: Document) -> ClientResult<bool>;

    /// Releases the underlying connection.
    ///
    /// Called by the factory when setup fails partway, and available to
    /// callers that want an explicit teardown. The default is a no-op for
    /// backends with nothing to release.
    async fn shutdown(self) -> ClientResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}
