//! Fixtures shared by unit tests

mod fixtures;

pub use fixtures::*;

use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;

use crate::db::SqliteCollection;

/// Seeded single-connection in-memory collection
pub async fn memory_collection() -> Arc<SqliteCollection> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");
    mcat_common::db::init_schema(&pool).await.unwrap();
    Arc::new(SqliteCollection::new(pool))
}
