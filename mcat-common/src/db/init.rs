//! Database initialization
//!
//! Opens (or creates) the catalogue database, creates the schema
//! idempotently and seeds the format vocabulary.

use crate::models::FormatKind;
use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Open the catalogue database and make sure the schema exists
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Foreign keys are enabled by sqlx on every pooled connection
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    init_schema(&pool).await?;

    Ok(pool)
}

/// Create all catalogue tables and seed formats (safe to call repeatedly)
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    create_formats_table(pool).await?;
    create_releases_table(pool).await?;
    create_tracks_table(pool).await?;
    create_streams_table(pool).await?;
    create_artists_tables(pool).await?;

    seed_formats(pool).await?;

    Ok(())
}

pub async fn create_formats_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS formats (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_releases_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS releases (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            mbid TEXT NOT NULL DEFAULT '',
            title TEXT NOT NULL DEFAULT '',
            year INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Tracks without a release store NULL in `release_id`
pub async fn create_tracks_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tracks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            mbid TEXT NOT NULL DEFAULT '',
            title TEXT NOT NULL DEFAULT '',
            position INTEGER NOT NULL DEFAULT 0,
            disc INTEGER NOT NULL DEFAULT 0,
            release_id INTEGER REFERENCES releases(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_tracks_release ON tracks(release_id)")
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn create_streams_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS streams (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            path TEXT NOT NULL,
            format_id INTEGER NOT NULL REFERENCES formats(id),
            track_id INTEGER NOT NULL REFERENCES tracks(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_streams_track ON streams(track_id)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Artists plus their many-to-many links to tracks and releases
pub async fn create_artists_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS artists (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS track_artists (
            track_id INTEGER NOT NULL REFERENCES tracks(id) ON DELETE CASCADE,
            artist_id INTEGER NOT NULL REFERENCES artists(id) ON DELETE CASCADE,
            PRIMARY KEY (track_id, artist_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS release_artists (
            release_id INTEGER NOT NULL REFERENCES releases(id) ON DELETE CASCADE,
            artist_id INTEGER NOT NULL REFERENCES artists(id) ON DELETE CASCADE,
            PRIMARY KEY (release_id, artist_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Insert one row per [`FormatKind`]; existing rows keep their ids
pub async fn seed_formats(pool: &SqlitePool) -> Result<()> {
    for kind in FormatKind::ALL {
        sqlx::query("INSERT OR IGNORE INTO formats (name) VALUES (?)")
            .bind(kind.as_str())
            .execute(pool)
            .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database")
    }

    #[tokio::test]
    async fn test_schema_seeds_each_format_once() {
        let pool = memory_pool().await;

        init_schema(&pool).await.unwrap();
        init_schema(&pool).await.unwrap();

        let names: Vec<String> = sqlx::query_scalar("SELECT name FROM formats ORDER BY id")
            .fetch_all(&pool)
            .await
            .unwrap();
        assert_eq!(names, vec!["unknown", "mp3", "ogg", "flac"]);
    }

    #[tokio::test]
    async fn test_init_database_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("mcat.db");

        let pool = init_database(&db_path).await.unwrap();

        assert!(db_path.exists());
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM formats")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 4);
    }
}
