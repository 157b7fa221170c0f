//! Release persistence

use mcat_common::models::Release;
use mcat_common::{Error, Result};
use sqlx::{Row, SqliteConnection};

use super::artists::{link_artists, load_artists, ArtistLink};
use super::tracks::{insert_track, load_track, release_track_ids};

/// Insert a release and its whole nested graph; ids are written back
pub async fn insert_release(conn: &mut SqliteConnection, release: &mut Release) -> Result<()> {
    let result = sqlx::query("INSERT INTO releases (mbid, title, year) VALUES (?, ?, ?)")
        .bind(&release.mbid)
        .bind(&release.title)
        .bind(release.year)
        .execute(&mut *conn)
        .await?;
    release.id = result.last_insert_rowid();

    for track in release.tracks.iter_mut() {
        track.release_id = release.id;
        insert_track(conn, track).await?;
    }

    link_artists(conn, ArtistLink::Release, release.id, &mut release.artists).await?;

    Ok(())
}

pub async fn update_release(conn: &mut SqliteConnection, release: &Release) -> Result<()> {
    let result = sqlx::query("UPDATE releases SET mbid = ?, title = ?, year = ? WHERE id = ?")
        .bind(&release.mbid)
        .bind(&release.title)
        .bind(release.year)
        .bind(release.id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("release {}", release.id)));
    }

    Ok(())
}

/// Load one release with its tracks in archive order
pub async fn load_release(conn: &mut SqliteConnection, id: i64) -> Result<Release> {
    let row = sqlx::query("SELECT id, mbid, title, year FROM releases WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| Error::NotFound(format!("release {}", id)))?;

    let mut release = Release {
        id: row.get("id"),
        mbid: row.get("mbid"),
        title: row.get("title"),
        year: row.get("year"),
        ..Default::default()
    };

    for track_id in release_track_ids(conn, release.id).await? {
        release.add_track(load_track(conn, track_id).await?);
    }
    release.artists = load_artists(conn, ArtistLink::Release, release.id).await?;

    Ok(release)
}

/// One page of release ids, newest first
pub async fn release_page(conn: &mut SqliteConnection, offset: i64, rows: i64) -> Result<Vec<i64>> {
    let ids = sqlx::query_scalar("SELECT id FROM releases ORDER BY id DESC LIMIT ? OFFSET ?")
        .bind(rows)
        .bind(offset)
        .fetch_all(&mut *conn)
        .await?;
    Ok(ids)
}
