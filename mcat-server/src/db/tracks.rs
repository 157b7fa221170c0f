//! Track and stream persistence

use mcat_common::models::{Format, FormatKind, Stream, Track};
use mcat_common::{Error, Result};
use sqlx::{Row, SqliteConnection};

use super::artists::{link_artists, load_artists, ArtistLink};
use super::formats::resolve_stream_format;

/// Insert a track, its streams and artist links; ids are written back
///
/// `release_id == 0` is stored as NULL.
pub async fn insert_track(conn: &mut SqliteConnection, track: &mut Track) -> Result<()> {
    let release_id = (track.release_id != 0).then_some(track.release_id);

    let result = sqlx::query(
        r#"
        INSERT INTO tracks (mbid, title, position, disc, release_id)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&track.mbid)
    .bind(&track.title)
    .bind(track.position)
    .bind(track.disc)
    .bind(release_id)
    .execute(&mut *conn)
    .await?;
    track.id = result.last_insert_rowid();

    for stream in track.streams.iter_mut() {
        stream.track_id = track.id;
        insert_stream(conn, stream).await?;
    }

    link_artists(conn, ArtistLink::Track, track.id, &mut track.artists).await?;

    Ok(())
}

async fn insert_stream(conn: &mut SqliteConnection, stream: &mut Stream) -> Result<()> {
    let format = resolve_stream_format(conn, stream).await?;

    let result = sqlx::query("INSERT INTO streams (path, format_id, track_id) VALUES (?, ?, ?)")
        .bind(&stream.path)
        .bind(format.id)
        .bind(stream.track_id)
        .execute(&mut *conn)
        .await?;

    stream.id = result.last_insert_rowid();
    stream.format_id = format.id;
    stream.format = format;

    Ok(())
}

/// Overwrite the scalar columns of an existing track
pub async fn update_track(conn: &mut SqliteConnection, track: &Track) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE tracks SET mbid = ?, title = ?, position = ?, disc = ?
        WHERE id = ?
        "#,
    )
    .bind(&track.mbid)
    .bind(&track.title)
    .bind(track.position)
    .bind(track.disc)
    .bind(track.id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("track {}", track.id)));
    }

    Ok(())
}

/// Load one track with streams (and their formats) and artists
pub async fn load_track(conn: &mut SqliteConnection, id: i64) -> Result<Track> {
    let row = sqlx::query(
        r#"
        SELECT id, mbid, title, position, disc, release_id
        FROM tracks
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| Error::NotFound(format!("track {}", id)))?;

    let release_id: Option<i64> = row.get("release_id");
    let mut track = Track {
        id: row.get("id"),
        mbid: row.get("mbid"),
        title: row.get("title"),
        position: row.get("position"),
        disc: row.get("disc"),
        release_id: release_id.unwrap_or(0),
        ..Default::default()
    };

    track.streams = load_streams(conn, track.id).await?;
    track.artists = load_artists(conn, ArtistLink::Track, track.id).await?;

    Ok(track)
}

async fn load_streams(conn: &mut SqliteConnection, track_id: i64) -> Result<Vec<Stream>> {
    let rows = sqlx::query(
        r#"
        SELECT s.id, s.path, s.format_id, s.track_id, f.name AS format_name
        FROM streams s
        JOIN formats f ON f.id = s.format_id
        WHERE s.track_id = ?
        ORDER BY s.id
        "#,
    )
    .bind(track_id)
    .fetch_all(&mut *conn)
    .await?;

    rows.iter()
        .map(|row| {
            let format_id: i64 = row.get("format_id");
            let format_name: String = row.get("format_name");
            Ok(Stream {
                id: row.get("id"),
                path: row.get("path"),
                format: Format {
                    id: format_id,
                    name: format_name.parse::<FormatKind>()?,
                },
                format_id,
                track_id: row.get("track_id"),
            })
        })
        .collect()
}

/// Ids of the tracks belonging to a release, in insertion order
pub async fn release_track_ids(conn: &mut SqliteConnection, release_id: i64) -> Result<Vec<i64>> {
    let ids = sqlx::query_scalar("SELECT id FROM tracks WHERE release_id = ? ORDER BY id")
        .bind(release_id)
        .fetch_all(&mut *conn)
        .await?;
    Ok(ids)
}

/// One page of track ids, newest first
pub async fn track_page(conn: &mut SqliteConnection, offset: i64, rows: i64) -> Result<Vec<i64>> {
    let ids = sqlx::query_scalar("SELECT id FROM tracks ORDER BY id DESC LIMIT ? OFFSET ?")
        .bind(rows)
        .bind(offset)
        .fetch_all(&mut *conn)
        .await?;
    Ok(ids)
}
