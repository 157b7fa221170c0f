//! SQLite-backed catalogue collection
//!
//! Creation of a track or release runs in one transaction so a graph is
//! either fully visible or absent. Streams already written to the stream
//! store are not touched when a transaction rolls back.

pub mod artists;
pub mod formats;
pub mod releases;
pub mod tracks;

use async_trait::async_trait;
use mcat_common::models::{Format, Release, Track};
use mcat_common::Result;
use sqlx::SqlitePool;
use tracing::info;

use crate::collection::Collection;

#[derive(Debug, Clone)]
pub struct SqliteCollection {
    pool: SqlitePool,
}

impl SqliteCollection {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl Collection for SqliteCollection {
    async fn get_format(&self, name: &str) -> Result<Format> {
        let mut conn = self.pool.acquire().await?;
        formats::format_by_name(&mut conn, name).await
    }

    async fn create_track(&self, track: &mut Track) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        tracks::insert_track(&mut tx, track).await?;
        tx.commit().await?;

        info!(
            track_id = track.id,
            streams = track.streams.len(),
            "Created track '{}'",
            track.title
        );
        Ok(())
    }

    async fn save_track(&self, track: &Track) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        tracks::update_track(&mut conn, track).await
    }

    async fn get_track(&self, id: i64) -> Result<Track> {
        let mut conn = self.pool.acquire().await?;
        tracks::load_track(&mut conn, id).await
    }

    async fn tracks(&self, offset: i64, rows: i64) -> Result<Vec<Track>> {
        let mut conn = self.pool.acquire().await?;
        let ids = tracks::track_page(&mut conn, offset, rows).await?;

        let mut page = Vec::with_capacity(ids.len());
        for id in ids {
            page.push(tracks::load_track(&mut conn, id).await?);
        }
        Ok(page)
    }

    async fn create_release(&self, release: &mut Release) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        releases::insert_release(&mut tx, release).await?;
        tx.commit().await?;

        info!(
            release_id = release.id,
            tracks = release.tracks.len(),
            "Created release '{}'",
            release.title
        );
        Ok(())
    }

    async fn save_release(&self, release: &Release) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        releases::update_release(&mut conn, release).await
    }

    async fn get_release(&self, id: i64) -> Result<Release> {
        let mut conn = self.pool.acquire().await?;
        releases::load_release(&mut conn, id).await
    }

    async fn releases(&self, offset: i64, rows: i64) -> Result<Vec<Release>> {
        let mut conn = self.pool.acquire().await?;
        let ids = releases::release_page(&mut conn, offset, rows).await?;

        let mut page = Vec::with_capacity(ids.len());
        for id in ids {
            page.push(releases::load_release(&mut conn, id).await?);
        }
        Ok(page)
    }
}
