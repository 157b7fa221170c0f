//! Database Test Utilities
//!
//! In-memory catalogue plus a router wired to a temporary stream store

use mcat_server::db::SqliteCollection;
use mcat_server::ingest::{FsStreamStore, StreamStore};
use mcat_server::AppState;
use sqlx::sqlite::SqlitePoolOptions;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Router under test and the state behind it
///
/// `streams_dir` must be kept alive for the duration of the test.
pub struct TestApp {
    pub router: axum::Router,
    pub collection: Arc<SqliteCollection>,
    pub streams_dir: TempDir,
}

impl TestApp {
    /// Number of objects currently in the stream store
    pub fn stored_objects(&self) -> usize {
        count_files(self.streams_dir.path())
    }

    /// Put `bytes` into the stream store and return the locator
    pub fn store_object(&self, bytes: &[u8]) -> String {
        FsStreamStore::new(self.streams_dir.path())
            .expect("Failed to open stream store")
            .store(&mut std::io::Cursor::new(bytes))
            .expect("Failed to store object")
    }
}

pub fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir).expect("Failed to read dir").count()
}

/// Single-connection in-memory collection with the schema applied
pub async fn create_test_collection() -> Arc<SqliteCollection> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");
    mcat_common::db::init_schema(&pool)
        .await
        .expect("Failed to initialize database schema");
    Arc::new(SqliteCollection::new(pool))
}

/// Create test app with in-memory database and temporary stream store
pub async fn create_test_app() -> TestApp {
    let collection = create_test_collection().await;
    let streams_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = FsStreamStore::new(streams_dir.path()).expect("Failed to open stream store");

    let state = AppState::new(collection.clone(), Arc::new(store), None);
    let router = mcat_server::build_router(state);

    TestApp {
        router,
        collection,
        streams_dir,
    }
}
