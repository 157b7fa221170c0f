//! Format lookups

use mcat_common::models::{Format, FormatKind, Stream};
use mcat_common::{Error, Result};
use sqlx::{Row, SqliteConnection};

pub async fn format_by_name(conn: &mut SqliteConnection, name: &str) -> Result<Format> {
    let row = sqlx::query("SELECT id, name FROM formats WHERE name = ?")
        .bind(name)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| Error::NotFound(format!("format '{}'", name)))?;

    format_from_row(&row)
}

pub async fn format_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Format> {
    let row = sqlx::query("SELECT id, name FROM formats WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| Error::NotFound(format!("format {}", id)))?;

    format_from_row(&row)
}

/// Pick the format record a new stream points at
///
/// An explicit `format.id` wins, then `format_id`, then the format name
/// (which is `unknown` for a stream posted without one). An explicit id
/// that names no format is `InvalidInput`.
pub async fn resolve_stream_format(conn: &mut SqliteConnection, stream: &Stream) -> Result<Format> {
    let id = if stream.format.id != 0 {
        stream.format.id
    } else {
        stream.format_id
    };
    if id == 0 {
        return format_by_name(conn, stream.format.name.as_str()).await;
    }

    match format_by_id(conn, id).await {
        Err(Error::NotFound(_)) => Err(Error::InvalidInput(format!("unknown format id {}", id))),
        other => other,
    }
}

pub(crate) fn format_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Format> {
    let name: String = row.get("name");
    Ok(Format {
        id: row.get("id"),
        name: name.parse::<FormatKind>()?,
    })
}
