//! Artist rows and their links to tracks and releases

use mcat_common::models::Artist;
use mcat_common::{Error, Result};
use sqlx::{Row, SqliteConnection};

/// Which link table an artist list belongs to
#[derive(Debug, Clone, Copy)]
pub enum ArtistLink {
    Track,
    Release,
}

impl ArtistLink {
    fn table(self) -> &'static str {
        match self {
            ArtistLink::Track => "track_artists",
            ArtistLink::Release => "release_artists",
        }
    }

    fn owner_column(self) -> &'static str {
        match self {
            ArtistLink::Track => "track_id",
            ArtistLink::Release => "release_id",
        }
    }
}

/// Insert new artists (`id == 0`) and link every artist to `owner_id`
///
/// A non-zero id must name an existing artist, otherwise `InvalidInput`.
pub async fn link_artists(
    conn: &mut SqliteConnection,
    link: ArtistLink,
    owner_id: i64,
    artists: &mut [Artist],
) -> Result<()> {
    for artist in artists.iter_mut() {
        if artist.id == 0 {
            let result = sqlx::query("INSERT INTO artists (name) VALUES (?)")
                .bind(&artist.name)
                .execute(&mut *conn)
                .await?;
            artist.id = result.last_insert_rowid();
        } else if !artist_exists(&mut *conn, artist.id).await? {
            return Err(Error::InvalidInput(format!("unknown artist id {}", artist.id)));
        }

        let sql = format!(
            "INSERT OR IGNORE INTO {} ({}, artist_id) VALUES (?, ?)",
            link.table(),
            link.owner_column()
        );
        sqlx::query(&sql)
            .bind(owner_id)
            .bind(artist.id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

async fn artist_exists(conn: &mut SqliteConnection, id: i64) -> Result<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM artists WHERE id = ?")
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(count > 0)
}

pub async fn load_artists(conn: &mut SqliteConnection, link: ArtistLink, owner_id: i64) -> Result<Vec<Artist>> {
    let sql = format!(
        r#"
        SELECT a.id, a.name
        FROM artists a
        JOIN {} l ON l.artist_id = a.id
        WHERE l.{} = ?
        ORDER BY a.id
        "#,
        link.table(),
        link.owner_column()
    );
    let rows = sqlx::query(&sql).bind(owner_id).fetch_all(&mut *conn).await?;

    Ok(rows
        .iter()
        .map(|row| Artist {
            id: row.get("id"),
            name: row.get("name"),
        })
        .collect())
}
