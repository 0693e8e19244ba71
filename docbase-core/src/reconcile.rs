//! Additive, idempotent schema reconciliation.
//!
//! [`reconcile`] brings a live database into conformance with a declared
//! [`Schema`]: every declared collection and index exists afterwards, and
//! nothing that was not declared is touched. Existence is checked by name
//! only — an existing index keeps its definition even if the descriptor
//! declares different keys or properties — which makes the pass safe to
//! run on every startup.

use tracing::{debug, trace};

use crate::{
    backend::DocumentBackend,
    error::ClientResult,
    schema::{CollectionSpec, Schema},
};

/// What a reconciliation pass actually created.
///
/// A second pass over an unchanged schema and database returns an empty
/// summary: reconciliation is idempotent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Names of collections created by this pass.
    pub collections_created: Vec<String>,
    /// Indexes created by this pass, as `collection.index` pairs.
    pub indexes_created: Vec<String>,
}

impl ReconcileSummary {
    /// Returns true if the pass created nothing.
    pub fn is_noop(&self) -> bool {
        self.collections_created.is_empty() && self.indexes_created.is_empty()
    }
}

/// Ensures every declared collection and index exists.
///
/// Collections are processed strictly in declaration order, and each
/// operation is awaited before the next starts, so the returned future
/// completes only once every creation has settled on the server.
///
/// # Errors
///
/// Returns a [`ClientError::Schema`](crate::error::ClientError) if the
/// descriptor fails validation or any underlying operation fails. No
/// rollback is attempted; whatever was created before the failure remains.
pub async fn reconcile<B: DocumentBackend>(
    backend: &B,
    schema: &Schema,
) -> ClientResult<ReconcileSummary> {
    schema.validate()?;

    let existing = backend.list_collections().await?;
    debug!(tag = "db.schema", ?existing, "reconciling schema");

    let mut summary = ReconcileSummary::default();

    for collection in &schema.collections {
        if existing.iter().any(|name| name == &collection.name) {
            trace!(
                tag = "db.schema",
                collection = %collection.name,
                "collection already exists"
            );
        } else {
            trace!(
                tag = "db.schema",
                collection = %collection.name,
                "creating collection"
            );
            backend.create_collection(&collection.name).await?;
            summary
                .collections_created
                .push(collection.name.clone());
        }

        reconcile_indexes(backend, collection, &mut summary).await?;
    }

    Ok(summary)
}

/// Creates the declared indexes missing from one collection. Depends on
/// listing that collection's existing index names first.
async fn reconcile_indexes<B: DocumentBackend>(
    backend: &B,
    collection: &CollectionSpec,
    summary: &mut ReconcileSummary,
) -> ClientResult<()> {
    let existing = backend.list_index_names(&collection.name).await?;

    for index in &collection.indexes {
        if existing.iter().any(|name| name == &index.name) {
            trace!(
                tag = "db.schema",
                collection = %collection.name,
                index = %index.name,
                "index already exists"
            );
        } else {
            trace!(
                tag = "db.schema",
                collection = %collection.name,
                index = %index.name,
                "creating index"
            );
            backend.create_index(&collection.name, index).await?;
            summary
                .indexes_created
                .push(format!("{}.{}", collection.name, index.name));
        }
    }

    Ok(())
}
