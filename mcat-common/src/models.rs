//! Catalogue domain models
//!
//! Records are plain data. A freshly built graph carries `id == 0`
//! everywhere; identity is assigned when the graph is handed to the
//! collection for creation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Closed set of audio container types the catalogue recognises
///
/// The `formats` table only maps these names to durable ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    #[default]
    Unknown,
    Mp3,
    Ogg,
    Flac,
}

impl FormatKind {
    /// Every kind, in seeding order
    pub const ALL: [FormatKind; 4] = [
        FormatKind::Unknown,
        FormatKind::Mp3,
        FormatKind::Ogg,
        FormatKind::Flac,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormatKind::Unknown => "unknown",
            FormatKind::Mp3 => "mp3",
            FormatKind::Ogg => "ogg",
            FormatKind::Flac => "flac",
        }
    }

    /// Content type used when a stream of this format is served
    pub fn mime_type(&self) -> &'static str {
        match self {
            FormatKind::Unknown => "application/octet-stream",
            FormatKind::Mp3 => "audio/mpeg",
            FormatKind::Ogg => "audio/ogg",
            FormatKind::Flac => "audio/flac",
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        FormatKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("unknown format name '{}'", s)))
    }
}

/// Seeded format record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Format {
    pub id: i64,
    pub name: FormatKind,
}

/// One durably stored audio payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stream {
    pub id: i64,
    /// Locator returned by the stream store
    pub path: String,
    pub format: Format,
    pub format_id: i64,
    pub track_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Artist {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Track {
    pub id: i64,
    pub mbid: String,
    pub title: String,
    /// Track number, 0 when unknown
    pub position: i64,
    /// Disc number, 0 when unknown
    pub disc: i64,
    pub artists: Vec<Artist>,
    pub streams: Vec<Stream>,
    /// Owning release, 0 for a standalone track
    pub release_id: i64,
}

impl Track {
    pub fn add_stream(&mut self, stream: Stream) {
        self.streams.push(stream);
    }

    pub fn add_artist(&mut self, artist: Artist) {
        self.artists.push(artist);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Release {
    pub id: i64,
    pub mbid: String,
    pub title: String,
    pub year: i64,
    pub tracks: Vec<Track>,
    pub artists: Vec<Artist>,
}

impl Release {
    pub fn add_track(&mut self, track: Track) {
        self.tracks.push(track);
    }

    pub fn add_artist(&mut self, artist: Artist) {
        self.artists.push(artist);
    }
}

/// Partial update of a track's scalar fields
///
/// Fields left out of the request body keep their stored value; the
/// track's streams and artists are never touched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackEdit {
    pub mbid: Option<String>,
    pub title: Option<String>,
    pub position: Option<i64>,
    pub disc: Option<i64>,
}

impl TrackEdit {
    pub fn apply(self, track: &mut Track) {
        if let Some(mbid) = self.mbid {
            track.mbid = mbid;
        }
        if let Some(title) = self.title {
            track.title = title;
        }
        if let Some(position) = self.position {
            track.position = position;
        }
        if let Some(disc) = self.disc {
            track.disc = disc;
        }
    }
}

/// Partial update of a release's scalar fields
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReleaseEdit {
    pub mbid: Option<String>,
    pub title: Option<String>,
    pub year: Option<i64>,
}

impl ReleaseEdit {
    pub fn apply(self, release: &mut Release) {
        if let Some(mbid) = self.mbid {
            release.mbid = mbid;
        }
        if let Some(title) = self.title {
            release.title = title;
        }
        if let Some(year) = self.year {
            release.year = year;
        }
    }
}
