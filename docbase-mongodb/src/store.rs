//! MongoDB-backed [`DocumentBackend`] and the client factory.
//!
//! [`MongoBackend`] wraps a driver client bound to one database and maps
//! each backend operation onto the driver's native calls. Failures are
//! logged once where they are detected, with a stable `tag` field and the
//! driver error attached, then wrapped into the client error taxonomy.
//! Connection traces carry `host:port/database` only — credentials never
//! reach the log stream.

use async_trait::async_trait;
use bson::{Bson, Document, doc};
use futures::StreamExt;
use mongodb::{
    Client as DriverClient, Collection as MongoCollection, Database, IndexModel,
    options::{ClientOptions, Credential, FindOptions, IndexOptions},
};
use tracing::{debug, error};

use docbase_core::{
    backend::{DocumentBackend, DocumentStream, FindQuery},
    client::Client,
    config::ConnectionParams,
    error::{ClientError, ClientResult},
    schema::{IndexSpec, Schema},
};

/// A live MongoDB connection bound to one database.
#[derive(Debug, Clone)]
pub struct MongoBackend {
    client: DriverClient,
    database: String,
}

impl MongoBackend {
    /// Wraps an already-constructed driver client.
    pub fn new(client: DriverClient, database: impl Into<String>) -> Self {
        Self {
            client,
            database: database.into(),
        }
    }

    /// Builds a backend from connection parameters.
    ///
    /// Credentials are attached only when a non-blank username is given;
    /// otherwise the connection is unauthenticated. The driver opens
    /// sockets lazily, so this performs no I/O beyond option parsing —
    /// liveness is verified by the ping that
    /// [`Client::initialize`] issues next.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError::Connection`] if the parameters are
    /// invalid or the driver rejects them.
    pub async fn from_params(params: &ConnectionParams) -> ClientResult<Self> {
        params.validate()?;

        debug!(tag = "db.connect", target = %params, "connecting to document store");

        let uri = format!("mongodb://{}:{}/", params.host, params.port);
        let mut options = ClientOptions::parse(&uri).await.map_err(|err| {
            error!(tag = "db.connect", target = %params, error = %err, "invalid connection options");
            ClientError::connection("failed to parse connection options", err)
        })?;

        options.app_name = Some(format!("docbase-{}", env!("CARGO_PKG_VERSION")));

        if params.has_credentials() {
            options.credential = Some(
                Credential::builder()
                    .username(params.username.clone())
                    .password(params.password.clone())
                    .build(),
            );
        }

        let client = DriverClient::with_options(options).map_err(|err| {
            error!(tag = "db.connect", target = %params, error = %err, "failed to create client");
            ClientError::connection("failed to create client", err)
        })?;

        Ok(Self::new(client, params.database.clone()))
    }

    /// The database this backend is bound to.
    fn db(&self) -> Database {
        self.client.database(&self.database)
    }

    /// Raw handle to a named collection, for operations the facade does
    /// not cover.
    pub fn collection(&self, name: &str) -> MongoCollection<Document> {
        self.db().collection(name)
    }

    /// The underlying driver database handle.
    pub fn database(&self) -> Database {
        self.db()
    }
}

#[async_trait]
impl DocumentBackend for MongoBackend {
    async fn ping(&self) -> ClientResult<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|err| {
                error!(tag = "db.connect", error = %err, "liveness check failed");
                ClientError::connection("liveness check failed", err)
            })?;

        Ok(())
    }

    async fn list_collections(&self) -> ClientResult<Vec<String>> {
        self.db()
            .list_collection_names()
            .await
            .map_err(|err| {
                error!(tag = "db.schema", error = %err, "failed to list collections");
                ClientError::schema("failed to list collections", err)
            })
    }

    async fn create_collection(&self, name: &str) -> ClientResult<()> {
        self.db()
            .create_collection(name)
            .await
            .map_err(|err| {
                error!(tag = "db.schema", collection = name, error = %err, "failed to create collection");
                ClientError::schema(format!("failed to create collection '{name}'"), err)
            })?;

        Ok(())
    }

    async fn list_index_names(&self, collection: &str) -> ClientResult<Vec<String>> {
        self.collection(collection)
            .list_index_names()
            .await
            .map_err(|err| {
                error!(tag = "db.schema", collection, error = %err, "failed to list indexes");
                ClientError::schema(format!("failed to list indexes on '{collection}'"), err)
            })
    }

    async fn create_index(&self, collection: &str, index: &IndexSpec) -> ClientResult<()> {
        let mut options = IndexOptions::default();
        options.name = Some(index.name.clone());
        options.unique = index.properties.unique;
        options.sparse = index.properties.sparse;

        self.collection(collection)
            .create_index(
                IndexModel::builder()
                    .keys(index.keys.clone())
                    .options(options)
                    .build(),
            )
            .await
            .map_err(|err| {
                error!(
                    tag = "db.schema",
                    collection,
                    index = %index.name,
                    error = %err,
                    "failed to create index"
                );
                ClientError::schema(
                    format!("failed to create index '{}' on '{collection}'", index.name),
                    err,
                )
            })?;

        Ok(())
    }

    async fn find(&self, collection: &str, query: FindQuery) -> ClientResult<DocumentStream> {
        let mut options = FindOptions::default();
        options.projection = query.projection;
        options.limit = query.limit.map(|limit| limit as i64);
        options.skip = query.skip;

        let cursor = self
            .collection(collection)
            .find(query.filter)
            .with_options(options)
            .await
            .map_err(|err| {
                error!(tag = "db.query", collection, error = %err, "find failed");
                ClientError::query(format!("find on '{collection}' failed"), err)
            })?;

        let collection = collection.to_string();

        Ok(cursor
            .map(move |item| {
                item.map_err(|err| {
                    error!(tag = "db.query", collection = %collection, error = %err, "cursor iteration failed");
                    ClientError::query(format!("cursor on '{collection}' failed mid-stream"), err)
                })
            })
            .boxed())
    }

    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> ClientResult<Vec<Bson>> {
        let count = documents.len();
        let result = self
            .collection(collection)
            .insert_many(documents)
            .await
            .map_err(|err| {
                error!(tag = "db.write", collection, count, error = %err, "bulk insert failed");
                ClientError::write(format!("bulk insert into '{collection}' failed"), err)
            })?;

        // inserted_ids is keyed by input position; rebuild the ordered list.
        (0..count)
            .map(|position| {
                result
                    .inserted_ids
                    .get(&position)
                    .cloned()
                    .ok_or_else(|| {
                        ClientError::write_config(format!(
                            "bulk insert into '{collection}' reported no identifier for position {position}"
                        ))
                    })
            })
            .collect()
    }

    async fn delete_one(&self, collection: &str, filter: Document) -> ClientResult<bool> {
        let result = self
            .collection(collection)
            .delete_one(filter)
            .await
            .map_err(|err| {
                error!(tag = "db.write", collection, error = %err, "delete failed");
                ClientError::write(format!("delete on '{collection}' failed"), err)
            })?;

        Ok(result.deleted_count > 0)
    }

    async fn shutdown(self) -> ClientResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

/// Connects, reconciles the schema, and returns a ready client.
///
/// The full setup sequence: validate parameters and build the driver
/// client, verify liveness with an administrative ping, converge the live
/// collection/index layout on the declared schema, and hand back the
/// facade owning the connection. Any failure along the way releases the
/// connection before the error propagates; no retries are attempted at
/// this layer.
///
/// # Errors
///
/// Returns a [`ClientError::Connection`] for parameter, client or ping
/// failures and a [`ClientError::Schema`] when reconciliation fails.
pub async fn create_client(
    params: &ConnectionParams,
    schema: &Schema,
) -> ClientResult<Client<MongoBackend>> {
    let backend = MongoBackend::from_params(params).await?;
    let client = Client::initialize(backend, schema).await?;

    debug!(tag = "db.connect", target = %params, "connected to document store");

    Ok(client)
}
