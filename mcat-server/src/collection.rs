//! Catalogue persistence capability
//!
//! The ingestion core and the HTTP handlers only see this trait; the
//! SQLite implementation lives in [`crate::db::SqliteCollection`].

use async_trait::async_trait;
use mcat_common::models::{Format, Release, Track};
use mcat_common::Result;

#[async_trait]
pub trait Collection: Send + Sync {
    /// Resolve a seeded format by name (`Error::NotFound` if absent)
    async fn get_format(&self, name: &str) -> Result<Format>;

    /// Persist a track with its streams and artist links, assigning ids
    async fn create_track(&self, track: &mut Track) -> Result<()>;

    /// Update the scalar fields of an existing track
    async fn save_track(&self, track: &Track) -> Result<()>;

    async fn get_track(&self, id: i64) -> Result<Track>;

    /// Newest first
    async fn tracks(&self, offset: i64, rows: i64) -> Result<Vec<Track>>;

    /// Persist a release together with all nested tracks and streams, assigning ids
    async fn create_release(&self, release: &mut Release) -> Result<()>;

    /// Update the scalar fields of an existing release
    async fn save_release(&self, release: &Release) -> Result<()>;

    async fn get_release(&self, id: i64) -> Result<Release>;

    /// Newest first
    async fn releases(&self, offset: i64, rows: i64) -> Result<Vec<Release>>;
}
