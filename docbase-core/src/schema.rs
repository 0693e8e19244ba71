//! Declarative schema descriptors.
//!
//! A [`Schema`] is an ordered list of collections, each with the indexes it
//! requires. Reconciliation treats names as the identity of both
//! collections and indexes: anything already present under a declared name
//! is left untouched, and anything not declared is never dropped. Changing
//! an index's keys or properties therefore requires giving it a new name.

use bson::Document;

use crate::error::{ClientError, ClientResult};

/// Target layout of one database: an ordered sequence of collections.
///
/// # Example
///
/// ```ignore
/// use bson::doc;
/// use docbase_core::schema::{CollectionSpec, IndexSpec, Schema};
///
/// let schema = Schema::new()
///     .collection(
///         CollectionSpec::new("users")
///             .index(IndexSpec::new("by_username", doc! { "username": 1 }).unique())
///             .index(IndexSpec::new("by_role", doc! { "roles": 1 })),
///     )
///     .collection(CollectionSpec::new("sessions"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Schema {
    /// Collections in declaration order; reconciliation walks them in
    /// this order.
    pub collections: Vec<CollectionSpec>,
}

impl Schema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a collection to the schema.
    pub fn collection(mut self, spec: CollectionSpec) -> Self {
        self.collections.push(spec);
        self
    }

    /// Rejects descriptors whose names cannot act as identities:
    /// duplicate collection names, duplicate index names within one
    /// collection, or blank names anywhere.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError::Schema`] describing the first violation.
    pub fn validate(&self) -> ClientResult<()> {
        let mut seen_collections = Vec::with_capacity(self.collections.len());

        for collection in &self.collections {
            if collection.name.trim().is_empty() {
                return Err(ClientError::schema_config("collection name must not be empty"));
            }
            if seen_collections.contains(&collection.name.as_str()) {
                return Err(ClientError::schema_config(format!(
                    "duplicate collection '{}' in schema",
                    collection.name
                )));
            }
            seen_collections.push(collection.name.as_str());

            let mut seen_indexes = Vec::with_capacity(collection.indexes.len());
            for index in &collection.indexes {
                if index.name.trim().is_empty() {
                    return Err(ClientError::schema_config(format!(
                        "collection '{}' declares an index with an empty name",
                        collection.name
                    )));
                }
                if seen_indexes.contains(&index.name.as_str()) {
                    return Err(ClientError::schema_config(format!(
                        "duplicate index '{}' on collection '{}'",
                        index.name, collection.name
                    )));
                }
                seen_indexes.push(index.name.as_str());
            }
        }

        Ok(())
    }
}

/// One collection and the indexes it must carry.
#[derive(Debug, Clone)]
pub struct CollectionSpec {
    /// Collection name, unique within the schema.
    pub name: String,
    /// Required indexes, checked by name.
    pub indexes: Vec<IndexSpec>,
}

impl CollectionSpec {
    /// Creates a collection spec with no indexes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            indexes: Vec::new(),
        }
    }

    /// Appends an index to this collection.
    pub fn index(mut self, index: IndexSpec) -> Self {
        self.indexes.push(index);
        self
    }
}

/// One index: a stable name, the keys it covers, and its properties.
///
/// The name is what reconciliation matches against the live database. An
/// existing index with this name is accepted as-is even if its keys or
/// properties differ from the declaration.
#[derive(Debug, Clone)]
pub struct IndexSpec {
    /// Index name, unique within its collection.
    pub name: String,
    /// Field name to sort-direction/index-type mapping, e.g.
    /// `doc! { "email": 1 }`.
    pub keys: Document,
    /// Index options applied at creation time.
    pub properties: IndexProperties,
}

impl IndexSpec {
    /// Creates an index spec with default properties.
    pub fn new(name: impl Into<String>, keys: Document) -> Self {
        Self {
            name: name.into(),
            keys,
            properties: IndexProperties::default(),
        }
    }

    /// Marks the index as enforcing uniqueness.
    pub fn unique(mut self) -> Self {
        self.properties.unique = Some(true);
        self
    }

    /// Marks the index as sparse (skipping documents missing the keys).
    pub fn sparse(mut self) -> Self {
        self.properties.sparse = Some(true);
        self
    }
}

/// Options applied when an index is created. Unset options fall through
/// to the store's defaults.
#[derive(Debug, Clone, Default)]
pub struct IndexProperties {
    /// Enforce uniqueness of the indexed keys.
    pub unique: Option<bool>,
    /// Skip documents that do not contain the indexed keys.
    pub sparse: Option<bool>,
}
