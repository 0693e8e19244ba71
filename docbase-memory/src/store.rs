//! In-memory backend implementation.
//!
//! Stores collections as insertion-ordered vectors of BSON documents
//! behind async-aware read-write locks. Reads walk the whole collection
//! (no real indexing); index creation only records names so that schema
//! reconciliation behaves exactly as it does against a real store.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use bson::{Bson, Document, oid::ObjectId};
use futures::{StreamExt, stream};
use mea::rwlock::RwLock;

use docbase_core::{
    backend::{DocumentBackend, DocumentStream, FindQuery},
    error::{ClientError, ClientResult},
    schema::IndexSpec,
};

use crate::matcher::matches;

/// Index every collection carries from birth, mirroring the store's
/// implicit primary-key index.
const ID_INDEX: &str = "_id_";

#[derive(Debug)]
struct CollectionData {
    /// Documents in insertion order; `_id` is embedded in each.
    documents: Vec<Document>,
    /// Names of "created" indexes; no index structure is maintained.
    indexes: Vec<String>,
}

impl CollectionData {
    fn new() -> Self {
        Self {
            documents: Vec::new(),
            indexes: vec![ID_INDEX.to_string()],
        }
    }
}

/// Thread-safe in-memory document backend.
///
/// Cloneable; clones share the same underlying data. Intended for
/// development and tests — queries scan every document in a collection,
/// which is fine for the dataset sizes a test suite uses.
///
/// # Example
///
/// ```ignore
/// use bson::doc;
/// use docbase_core::{client::Client, schema::Schema};
/// use docbase_memory::InMemoryBackend;
///
/// let client = Client::initialize(InMemoryBackend::new(), &Schema::new()).await?;
/// client.insert_one("users", doc! { "name": "alice" }).await?;
/// ```
#[derive(Debug, Default, Clone)]
pub struct InMemoryBackend {
    collections: Arc<RwLock<HashMap<String, CollectionData>>>,
}

impl InMemoryBackend {
    /// Creates a new empty backend.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentBackend for InMemoryBackend {
    async fn ping(&self) -> ClientResult<()> {
        Ok(())
    }

    async fn list_collections(&self) -> ClientResult<Vec<String>> {
        Ok(self
            .collections
            .read()
            .await
            .keys()
            .cloned()
            .collect())
    }

    async fn create_collection(&self, name: &str) -> ClientResult<()> {
        self.collections
            .write()
            .await
            .entry(name.to_string())
            .or_insert_with(CollectionData::new);

        Ok(())
    }

    async fn list_index_names(&self, collection: &str) -> ClientResult<Vec<String>> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .map(|data| data.indexes.clone())
            .unwrap_or_default())
    }

    async fn create_index(&self, collection: &str, index: &IndexSpec) -> ClientResult<()> {
        let mut collections = self.collections.write().await;
        let data = collections
            .entry(collection.to_string())
            .or_insert_with(CollectionData::new);

        if !data.indexes.contains(&index.name) {
            data.indexes.push(index.name.clone());
        }

        Ok(())
    }

    async fn find(&self, collection: &str, query: FindQuery) -> ClientResult<DocumentStream> {
        let collections = self.collections.read().await;
        let Some(data) = collections.get(collection) else {
            return Ok(stream::iter(Vec::new()).boxed());
        };

        let skip = query.skip.unwrap_or(0) as usize;
        let take = query
            .limit
            .map(|limit| limit as usize)
            .unwrap_or(usize::MAX);

        let selected: Vec<ClientResult<Document>> = data
            .documents
            .iter()
            .filter(|doc| matches(doc, &query.filter))
            .skip(skip)
            .take(take)
            .cloned()
            .map(|doc| Ok(apply_projection(doc, query.projection.as_ref())))
            .collect();

        Ok(stream::iter(selected).boxed())
    }

    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> ClientResult<Vec<Bson>> {
        let mut collections = self.collections.write().await;
        let data = collections
            .entry(collection.to_string())
            .or_insert_with(CollectionData::new);

        let mut ids = Vec::with_capacity(documents.len());

        for mut document in documents {
            let id = match document.get("_id") {
                Some(id) => id.clone(),
                None => {
                    let id = Bson::ObjectId(ObjectId::new());
                    document.insert("_id", id.clone());
                    id
                }
            };

            if data
                .documents
                .iter()
                .any(|existing| existing.get("_id") == Some(&id))
            {
                return Err(ClientError::write_config(format!(
                    "duplicate _id in collection '{collection}'"
                )));
            }

            data.documents.push(document);
            ids.push(id);
        }

        Ok(ids)
    }

    async fn delete_one(&self, collection: &str, filter: Document) -> ClientResult<bool> {
        let mut collections = self.collections.write().await;
        let Some(data) = collections.get_mut(collection) else {
            return Ok(false);
        };

        match data
            .documents
            .iter()
            .position(|doc| matches(doc, &filter))
        {
            Some(position) => {
                data.documents.remove(position);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Keeps only the fields a projection selects (`{ field: 1 }` form),
/// always retaining `_id` unless explicitly suppressed with `_id: 0`.
fn apply_projection(document: Document, projection: Option<&Document>) -> Document {
    let Some(projection) = projection else {
        return document;
    };
    if projection.is_empty() {
        return document;
    }

    let keep_id = !matches!(projection.get("_id"), Some(Bson::Int32(0)));

    document
        .into_iter()
        .filter(|(key, _)| {
            if key == "_id" {
                keep_id
            } else {
                matches!(projection.get(key), Some(Bson::Int32(1)))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use bson::doc;

    use super::*;

    #[test]
    fn projection_keeps_selected_fields_and_id() {
        let document = doc! { "_id": 7, "a": 1, "b": 2 };
        let projected = apply_projection(document, Some(&doc! { "a": 1 }));

        assert_eq!(projected, doc! { "_id": 7, "a": 1 });
    }

    #[test]
    fn projection_can_suppress_id() {
        let document = doc! { "_id": 7, "a": 1, "b": 2 };
        let projected = apply_projection(document, Some(&doc! { "a": 1, "_id": 0 }));

        assert_eq!(projected, doc! { "a": 1 });
    }

    #[test]
    fn no_projection_returns_document_unchanged() {
        let document = doc! { "_id": 7, "a": 1 };

        assert_eq!(apply_projection(document.clone(), None), document);
    }
}
