//! The client facade: setup sequencing plus the CRUD surface.
//!
//! [`Client`] wraps a [`DocumentBackend`] that has been pinged and
//! schema-reconciled, and exposes the normalized read/write operations on
//! top of it. [`Client::initialize`] is the factory path: it verifies
//! liveness, runs reconciliation to completion, and only then hands the
//! facade back — a client whose mandatory reconciliation failed is never
//! returned, and the backend is released before any setup error
//! propagates.

use bson::{Bson, DateTime, Document};
use futures::TryStreamExt;
use tracing::{debug, warn};

use crate::{
    backend::{DocumentBackend, DocumentStream, FindQuery},
    error::{ClientError, ClientResult},
    reconcile::reconcile,
    schema::Schema,
};

/// Field set to the insert time when the input document lacks it.
pub const CREATED_AT_FIELD: &str = "createdAt";
/// Field unconditionally overwritten with the insert time.
pub const UPDATED_AT_FIELD: &str = "updatedAt";

/// How a read's results are delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchMode {
    /// Collect every match into an ordered, fully-materialized vector.
    #[default]
    Materialize,
    /// Return a lazy, single-pass cursor pulled from the store on demand.
    Stream,
}

/// Options for [`Client::find_many`].
///
/// Defaults: no projection, no limit, no offset, materialized results.
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    /// Optional projection restricting returned fields.
    pub projection: Option<Document>,
    /// Cap on the number of returned documents; `None` means unbounded.
    pub limit: Option<u64>,
    /// Number of matched documents to skip before returning results.
    pub offset: Option<u64>,
    /// Delivery mode, chosen explicitly by the caller.
    pub mode: FetchMode,
}

impl FindOptions {
    /// Creates default options: unbounded, materialized.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts returned fields to the given projection.
    pub fn projection(mut self, projection: Document) -> Self {
        self.projection = Some(projection);
        self
    }

    /// Caps the number of returned documents.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skips the first `offset` matched documents.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Requests a lazy cursor instead of a materialized vector.
    pub fn stream(mut self) -> Self {
        self.mode = FetchMode::Stream;
        self
    }
}

/// Result of [`Client::find_many`], tagged by delivery mode.
///
/// Either a finite, eagerly-collected sequence, or a single-pass,
/// non-restartable lazy one — which of the two is selected by
/// [`FindOptions::mode`], never inferred.
pub enum FindResult {
    /// All matches, in store order.
    Documents(Vec<Document>),
    /// Lazy cursor over the matches; each pull suspends on the store.
    Stream(DocumentStream),
}

impl FindResult {
    /// Unwraps materialized results; `None` if this is a stream.
    pub fn into_documents(self) -> Option<Vec<Document>> {
        match self {
            FindResult::Documents(docs) => Some(docs),
            FindResult::Stream(_) => None,
        }
    }

    /// Unwraps the lazy cursor; `None` if results were materialized.
    pub fn into_stream(self) -> Option<DocumentStream> {
        match self {
            FindResult::Documents(_) => None,
            FindResult::Stream(stream) => Some(stream),
        }
    }
}

/// A ready-to-use handle over one reconciled database.
///
/// The client owns its backend for its whole lifetime; nothing closes the
/// connection implicitly once setup has succeeded. Callers wanting an
/// explicit teardown use [`Client::shutdown`]. The handle is safe for
/// concurrent use — operations perform no client-side locking and rely on
/// the store's own per-call concurrency control.
#[derive(Debug)]
pub struct Client<B: DocumentBackend> {
    backend: B,
}

impl<B: DocumentBackend> Client<B> {
    /// Wraps an already-verified backend without running setup.
    ///
    /// Most callers want [`Client::initialize`], which pings and
    /// reconciles first.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Verifies liveness, reconciles the schema, and returns the facade.
    ///
    /// The two setup steps run strictly in order and to completion; any
    /// caller that awaits this factory observes every declared collection
    /// and index in place before issuing CRUD traffic.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError::Connection`] if the ping fails and a
    /// [`ClientError::Schema`] if reconciliation fails. In both cases the
    /// backend is shut down before the error propagates. Already-created
    /// collections and indexes are not rolled back.
    pub async fn initialize(backend: B, schema: &Schema) -> ClientResult<Self> {
        if let Err(err) = backend.ping().await {
            release(backend).await;
            return Err(err);
        }

        match reconcile(&backend, schema).await {
            Ok(summary) => {
                debug!(
                    tag = "db.schema",
                    collections_created = summary.collections_created.len(),
                    indexes_created = summary.indexes_created.len(),
                    "schema reconciled"
                );
                Ok(Self { backend })
            }
            Err(err) => {
                release(backend).await;
                Err(err)
            }
        }
    }

    /// Runs a filtered read against a collection.
    ///
    /// `offset` skips that many matches, `limit` caps the returned count,
    /// and `options.mode` selects materialized or streamed delivery.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError::Query`] if the read fails, including
    /// mid-stream while materializing. In streamed mode a mid-stream
    /// failure surfaces as an `Err` item on the cursor instead.
    pub async fn find_many(
        &self,
        collection: &str,
        filter: Document,
        options: FindOptions,
    ) -> ClientResult<FindResult> {
        let query = FindQuery {
            filter,
            projection: options.projection,
            limit: options.limit,
            skip: options.offset,
        };

        let stream = self.backend.find(collection, query).await?;

        match options.mode {
            FetchMode::Materialize => Ok(FindResult::Documents(
                stream.try_collect::<Vec<Document>>().await?,
            )),
            FetchMode::Stream => Ok(FindResult::Stream(stream)),
        }
    }

    /// Returns the first document matching the filter, or `None`.
    ///
    /// Equivalent to a materialized [`Client::find_many`] with a limit of
    /// one. No match is not an error.
    pub async fn find_one(
        &self,
        collection: &str,
        filter: Document,
        options: FindOptions,
    ) -> ClientResult<Option<Document>> {
        let options = FindOptions {
            limit: Some(1),
            mode: FetchMode::Materialize,
            ..options
        };

        Ok(self
            .find_many(collection, filter, options)
            .await?
            .into_documents()
            .and_then(|docs| docs.into_iter().next()))
    }

    /// Inserts documents in one bulk call, defaulting timestamps.
    ///
    /// Each document is copied and augmented before the write: `createdAt`
    /// is set to the insert time when absent, `updatedAt` is always
    /// overwritten with it. Returns the store-assigned identifiers in
    /// input order, one per document.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError::Write`] on partial or total failure; no
    /// bookkeeping is attempted beyond what the store's bulk insert
    /// reports.
    pub async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> ClientResult<Vec<Bson>> {
        let now = DateTime::now();
        let documents: Vec<Document> = documents
            .into_iter()
            .map(|doc| stamp_timestamps(doc, now))
            .collect();

        let ids = self.backend.insert_many(collection, documents).await?;
        debug!(
            tag = "db.write",
            collection,
            count = ids.len(),
            "inserted documents"
        );

        Ok(ids)
    }

    /// Inserts one document, returning its store-assigned identifier.
    ///
    /// Same timestamp defaulting as [`Client::insert_many`].
    pub async fn insert_one(&self, collection: &str, document: Document) -> ClientResult<Bson> {
        self.insert_many(collection, vec![document])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                ClientError::write_config("bulk insert of one document returned no identifier")
            })
    }

    /// Deletes at most one document matching the filter.
    ///
    /// Returns whether a document was actually removed; matching zero
    /// documents yields `Ok(false)`, not an error.
    pub async fn delete_one(&self, collection: &str, filter: Document) -> ClientResult<bool> {
        self.backend.delete_one(collection, filter).await
    }

    /// Raw access to the underlying backend, for operations this facade
    /// does not cover.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Releases the underlying connection, consuming the client.
    pub async fn shutdown(self) -> ClientResult<()> {
        self.backend.shutdown().await
    }
}

/// Copies a document, filling `createdAt` when absent and overwriting
/// `updatedAt` unconditionally.
fn stamp_timestamps(mut document: Document, now: DateTime) -> Document {
    if !document.contains_key(CREATED_AT_FIELD) {
        document.insert(CREATED_AT_FIELD, now);
    }
    document.insert(UPDATED_AT_FIELD, now);

    document
}

/// Best-effort backend release on a failed setup; the setup error is what
/// the caller needs to see, so a secondary shutdown failure is only
/// logged.
async fn release<B: DocumentBackend>(backend: B) {
    if let Err(err) = backend.shutdown().await {
        warn!(tag = "db.connect", error = %err, "failed to release connection after setup error");
    }
}

#[cfg(test)]
mod tests {
    use bson::doc;

    use super::*;

    #[test]
    fn stamp_sets_both_fields_when_created_at_absent() {
        let now = DateTime::now();
        let stamped = stamp_timestamps(doc! { "a": 1 }, now);

        assert_eq!(stamped.get(CREATED_AT_FIELD), Some(&Bson::DateTime(now)));
        assert_eq!(stamped.get(UPDATED_AT_FIELD), Some(&Bson::DateTime(now)));
    }

    #[test]
    fn stamp_preserves_existing_created_at() {
        let t0 = DateTime::from_millis(1_500_000_000_000);
        let now = DateTime::now();
        let stamped = stamp_timestamps(doc! { "a": 1, CREATED_AT_FIELD: t0 }, now);

        assert_eq!(stamped.get(CREATED_AT_FIELD), Some(&Bson::DateTime(t0)));
        assert_eq!(stamped.get(UPDATED_AT_FIELD), Some(&Bson::DateTime(now)));
    }

    #[test]
    fn find_options_default_to_materialized_and_unbounded() {
        let options = FindOptions::new();

        assert_eq!(options.mode, FetchMode::Materialize);
        assert!(options.limit.is_none());
        assert!(options.offset.is_none());
        assert!(options.projection.is_none());
    }

    #[test]
    fn find_options_chain() {
        let options = FindOptions::new()
            .projection(doc! { "a": 1 })
            .limit(3)
            .offset(4)
            .stream();

        assert_eq!(options.mode, FetchMode::Stream);
        assert_eq!(options.limit, Some(3));
        assert_eq!(options.offset, Some(4));
    }
}
