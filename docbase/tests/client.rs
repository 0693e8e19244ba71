//! End-to-end tests of the client facade against the in-memory backend,
//! plus setup-failure tests against a scripted fake backend.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use bson::{Bson, DateTime, Document, doc};
use futures::StreamExt;

use docbase::memory::InMemoryBackend;
use docbase::prelude::*;

fn datetime(document: &Document, field: &str) -> DateTime {
    match document.get(field) {
        Some(Bson::DateTime(value)) => *value,
        other => panic!("expected datetime in '{field}', got {other:?}"),
    }
}

fn int(document: &Document, field: &str) -> i32 {
    match document.get(field) {
        Some(Bson::Int32(value)) => *value,
        other => panic!("expected int in '{field}', got {other:?}"),
    }
}

fn user_schema() -> Schema {
    Schema::new()
        .collection(
            CollectionSpec::new("users")
                .index(IndexSpec::new("by_username", doc! { "username": 1 }).unique())
                .index(IndexSpec::new("by_role", doc! { "roles": 1 }).sparse()),
        )
        .collection(
            CollectionSpec::new("sessions")
                .index(IndexSpec::new("by_token", doc! { "token": 1 }).unique()),
        )
}

#[tokio::test]
async fn reconcile_creates_everything_once() {
    let backend = InMemoryBackend::new();
    let schema = user_schema();

    let first = reconcile(&backend, &schema).await.unwrap();
    assert_eq!(first.collections_created, vec!["users", "sessions"]);
    assert_eq!(
        first.indexes_created,
        vec!["users.by_username", "users.by_role", "sessions.by_token"]
    );

    // Running again against the same state creates nothing.
    let second = reconcile(&backend, &schema).await.unwrap();
    assert!(second.is_noop());

    let mut collections = backend.list_collections().await.unwrap();
    collections.sort();
    assert_eq!(collections, vec!["sessions", "users"]);

    let indexes = backend.list_index_names("users").await.unwrap();
    assert_eq!(indexes, vec!["_id_", "by_username", "by_role"]);
}

#[tokio::test]
async fn reconcile_leaves_undeclared_state_untouched() {
    let backend = InMemoryBackend::new();

    // State that exists before reconciliation and is not in the schema.
    backend.create_collection("audit_log").await.unwrap();
    backend.create_collection("users").await.unwrap();
    backend
        .create_index(
            "users",
            &IndexSpec::new("legacy_index", doc! { "legacy": 1 }),
        )
        .await
        .unwrap();

    let summary = reconcile(&backend, &user_schema()).await.unwrap();

    // Only what was missing got created; the extras were not reported.
    assert_eq!(summary.collections_created, vec!["sessions"]);
    assert!(!summary.collections_created.contains(&"audit_log".to_string()));

    let mut collections = backend.list_collections().await.unwrap();
    collections.sort();
    assert_eq!(collections, vec!["audit_log", "sessions", "users"]);

    let indexes = backend.list_index_names("users").await.unwrap();
    assert!(indexes.contains(&"legacy_index".to_string()));
}

#[tokio::test]
async fn reconcile_matches_indexes_by_name_only() {
    let backend = InMemoryBackend::new();
    backend.create_collection("users").await.unwrap();
    backend
        .create_index("users", &IndexSpec::new("by_username", doc! { "email": 1 }))
        .await
        .unwrap();

    // Same name, different keys: the existing index is accepted as-is.
    let schema = Schema::new().collection(
        CollectionSpec::new("users")
            .index(IndexSpec::new("by_username", doc! { "username": 1 }).unique()),
    );

    let summary = reconcile(&backend, &schema).await.unwrap();
    assert!(summary.is_noop());
}

#[tokio::test]
async fn insert_defaults_both_timestamps_when_created_at_absent() {
    let client = Client::initialize(InMemoryBackend::new(), &user_schema())
        .await
        .unwrap();

    let id = client
        .insert_one("users", doc! { "username": "alice" })
        .await
        .unwrap();

    let stored = client
        .find_one("users", doc! { "_id": id }, FindOptions::new())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(datetime(&stored, "createdAt"), datetime(&stored, "updatedAt"));
}

#[tokio::test]
async fn insert_preserves_existing_created_at_and_bumps_updated_at() {
    let client = Client::initialize(InMemoryBackend::new(), &user_schema())
        .await
        .unwrap();

    let t0 = DateTime::from_millis(1_600_000_000_000);
    let id = client
        .insert_one("users", doc! { "username": "bob", "createdAt": t0 })
        .await
        .unwrap();

    let stored = client
        .find_one("users", doc! { "_id": id }, FindOptions::new())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(datetime(&stored, "createdAt"), t0);
    assert!(datetime(&stored, "updatedAt") > t0);
}

#[tokio::test]
async fn insert_many_returns_ids_aligned_with_input_order() {
    let client = Client::initialize(InMemoryBackend::new(), &user_schema())
        .await
        .unwrap();

    let ids = client
        .insert_many(
            "users",
            vec![doc! { "a": 1 }, doc! { "a": 2 }, doc! { "a": 3 }],
        )
        .await
        .unwrap();
    assert_eq!(ids.len(), 3);

    for (position, id) in ids.iter().enumerate() {
        let stored = client
            .find_one("users", doc! { "_id": id.clone() }, FindOptions::new())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(int(&stored, "a"), position as i32 + 1);
    }
}

#[tokio::test]
async fn find_many_paginates_in_insertion_order() {
    let client = Client::initialize(InMemoryBackend::new(), &user_schema())
        .await
        .unwrap();

    let documents: Vec<Document> = (1..=10).map(|n| doc! { "n": n }).collect();
    client.insert_many("users", documents).await.unwrap();

    let page = client
        .find_many("users", doc! {}, FindOptions::new().limit(3).offset(4))
        .await
        .unwrap()
        .into_documents()
        .unwrap();

    let ns: Vec<i32> = page.iter().map(|d| int(d, "n")).collect();
    assert_eq!(ns, vec![5, 6, 7]);

    // No bounds returns everything.
    let all = client
        .find_many("users", doc! {}, FindOptions::new())
        .await
        .unwrap()
        .into_documents()
        .unwrap();
    assert_eq!(all.len(), 10);
}

#[tokio::test]
async fn find_many_filters_and_projects() {
    let client = Client::initialize(InMemoryBackend::new(), &user_schema())
        .await
        .unwrap();

    client
        .insert_many(
            "users",
            vec![
                doc! { "username": "alice", "roles": "admin", "age": 34 },
                doc! { "username": "bob", "roles": "user", "age": 51 },
                doc! { "username": "carol", "roles": "admin", "age": 28 },
            ],
        )
        .await
        .unwrap();

    let admins = client
        .find_many(
            "users",
            doc! { "roles": "admin" },
            FindOptions::new().projection(doc! { "username": 1, "_id": 0 }),
        )
        .await
        .unwrap()
        .into_documents()
        .unwrap();

    assert_eq!(
        admins,
        vec![doc! { "username": "alice" }, doc! { "username": "carol" }]
    );

    let older = client
        .find_many("users", doc! { "age": { "$gt": 30 } }, FindOptions::new())
        .await
        .unwrap()
        .into_documents()
        .unwrap();
    assert_eq!(older.len(), 2);
}

#[tokio::test]
async fn find_one_with_no_match_is_none_not_an_error() {
    let client = Client::initialize(InMemoryBackend::new(), &user_schema())
        .await
        .unwrap();

    let found = client
        .find_one("users", doc! { "username": "nobody" }, FindOptions::new())
        .await
        .unwrap();

    assert!(found.is_none());
}

#[tokio::test]
async fn streamed_reads_yield_the_same_finite_sequence() {
    let client = Client::initialize(InMemoryBackend::new(), &user_schema())
        .await
        .unwrap();

    let documents: Vec<Document> = (1..=5).map(|n| doc! { "n": n }).collect();
    client.insert_many("users", documents).await.unwrap();

    let mut stream = client
        .find_many("users", doc! {}, FindOptions::new().stream())
        .await
        .unwrap()
        .into_stream()
        .unwrap();

    let mut seen = Vec::new();
    while let Some(item) = stream.next().await {
        seen.push(int(&item.unwrap(), "n"));
    }

    assert_eq!(seen, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn delete_one_removes_at_most_one_document() {
    let client = Client::initialize(InMemoryBackend::new(), &user_schema())
        .await
        .unwrap();

    client
        .insert_many(
            "users",
            vec![
                doc! { "roles": "temp" },
                doc! { "roles": "temp" },
                doc! { "roles": "temp" },
            ],
        )
        .await
        .unwrap();

    assert!(client.delete_one("users", doc! { "roles": "temp" }).await.unwrap());

    let remaining = client
        .find_many("users", doc! { "roles": "temp" }, FindOptions::new())
        .await
        .unwrap()
        .into_documents()
        .unwrap();
    assert_eq!(remaining.len(), 2);
}

#[tokio::test]
async fn delete_one_with_no_match_reports_zero_affected() {
    let client = Client::initialize(InMemoryBackend::new(), &user_schema())
        .await
        .unwrap();

    let deleted = client
        .delete_one("users", doc! { "username": "nobody" })
        .await
        .unwrap();

    assert!(!deleted);
}

/// Scripted backend for exercising the setup failure paths: fails the
/// requested step and counts shutdown invocations.
#[derive(Debug, Default)]
struct ScriptedBackend {
    fail_ping: bool,
    fail_create_collection: bool,
    shutdowns: Arc<AtomicUsize>,
}

#[async_trait]
impl DocumentBackend for ScriptedBackend {
    async fn ping(&self) -> ClientResult<()> {
        if self.fail_ping {
            return Err(ClientError::connection_config("scripted ping failure"));
        }

        Ok(())
    }

    async fn list_collections(&self) -> ClientResult<Vec<String>> {
        Ok(Vec::new())
    }

    async fn create_collection(&self, name: &str) -> ClientResult<()> {
        if self.fail_create_collection {
            return Err(ClientError::schema_config(format!(
                "scripted failure creating '{name}'"
            )));
        }

        Ok(())
    }

    async fn list_index_names(&self, _collection: &str) -> ClientResult<Vec<String>> {
        Ok(Vec::new())
    }

    async fn create_index(&self, _collection: &str, _index: &IndexSpec) -> ClientResult<()> {
        Ok(())
    }

    async fn find(&self, _collection: &str, _query: FindQuery) -> ClientResult<DocumentStream> {
        Ok(futures::stream::iter(Vec::new()).boxed())
    }

    async fn insert_many(
        &self,
        _collection: &str,
        _documents: Vec<Document>,
    ) -> ClientResult<Vec<Bson>> {
        Ok(Vec::new())
    }

    async fn delete_one(&self, _collection: &str, _filter: Document) -> ClientResult<bool> {
        Ok(false)
    }

    async fn shutdown(self) -> ClientResult<()> {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);

        Ok(())
    }
}

#[tokio::test]
async fn failed_ping_releases_the_connection_exactly_once() {
    let shutdowns = Arc::new(AtomicUsize::new(0));
    let backend = ScriptedBackend {
        fail_ping: true,
        shutdowns: shutdowns.clone(),
        ..Default::default()
    };

    let err = Client::initialize(backend, &user_schema())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Connection { .. }));
    assert_eq!(shutdowns.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_reconcile_releases_the_connection_and_propagates() {
    let shutdowns = Arc::new(AtomicUsize::new(0));
    let backend = ScriptedBackend {
        fail_create_collection: true,
        shutdowns: shutdowns.clone(),
        ..Default::default()
    };

    let err = Client::initialize(backend, &user_schema())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Schema { .. }));
    assert_eq!(shutdowns.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn initialize_rejects_an_invalid_schema_before_any_traffic() {
    let schema = Schema::new()
        .collection(CollectionSpec::new("users"))
        .collection(CollectionSpec::new("users"));

    let err = Client::initialize(InMemoryBackend::new(), &schema)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Schema { .. }));
}
