//! Audio tag extraction
//!
//! Parses the embedded tag container of an in-memory or on-disk audio
//! file using lofty and exposes the handful of fields the catalogue uses,
//! plus every raw tag item keyed by its lowercase Vorbis-comment name
//! (`musicbrainz_trackid`, `musicbrainz_albumid`, ...) whatever the container.
//!
//! Keys come back in lofty's canonical spelling. lofty folds the
//! `ORIGINALYEAR` comment into the same item as `ORIGINALDATE`, so a year
//! tagged either way shows up under `originaldate`. Comments lofty has no
//! mapping for keep their own name, lowercased.
//!
//! Extraction is a lookahead: the source is rewound before and after
//! parsing so the same handle can be stored in full afterwards.

use lofty::file::{FileType, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::{Accessor, ItemKey, ItemValue, Tag, TagType};
use mcat_common::models::FormatKind;
use std::collections::BTreeMap;
use std::io::{Read, Seek};

use super::error::{IngestError, IngestResult};

/// Uninterpreted tag value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Text(String),
    Binary(Vec<u8>),
}

impl RawValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Text(text) => Some(text),
            RawValue::Binary(_) => None,
        }
    }
}

/// Tag view of one audio file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    title: String,
    album: String,
    track: Option<u32>,
    disc: Option<u32>,
    file_type: FormatKind,
    raw: BTreeMap<String, RawValue>,
}

impl Metadata {
    /// Build the view from parsed tags, the first tag taking precedence
    pub fn from_tags<'a>(file_type: FormatKind, tags: impl IntoIterator<Item = &'a Tag>) -> Self {
        let mut metadata = Metadata {
            file_type,
            ..Default::default()
        };

        for tag in tags {
            if metadata.title.is_empty() {
                if let Some(title) = tag.title() {
                    metadata.title = title.into_owned();
                }
            }
            if metadata.album.is_empty() {
                if let Some(album) = tag.album() {
                    metadata.album = album.into_owned();
                }
            }
            metadata.track = metadata.track.or_else(|| tag.track());
            metadata.disc = metadata.disc.or_else(|| tag.disk());

            for item in tag.items() {
                let Some(name) = raw_key_name(item.key(), tag.tag_type()) else {
                    continue;
                };
                let value = match item.value() {
                    ItemValue::Text(text) | ItemValue::Locator(text) => RawValue::Text(text.clone()),
                    ItemValue::Binary(bytes) => RawValue::Binary(bytes.clone()),
                };
                metadata.raw.entry(name).or_insert(value);
            }
        }

        metadata
    }

    /// Track title, empty when absent
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Album title, empty when absent
    pub fn album(&self) -> &str {
        &self.album
    }

    pub fn track(&self) -> Option<u32> {
        self.track
    }

    pub fn disc(&self) -> Option<u32> {
        self.disc
    }

    pub fn file_type(&self) -> FormatKind {
        self.file_type
    }

    pub fn raw(&self) -> &BTreeMap<String, RawValue> {
        &self.raw
    }

    /// Text value of a raw item, by lowercase key
    pub fn raw_text(&self, key: &str) -> Option<&str> {
        self.raw.get(key).and_then(RawValue::as_text)
    }
}

/// Tag extraction service
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataExtractor;

impl MetadataExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Parse the tags of `source`
    ///
    /// The stream position is reset to the start before and after parsing.
    pub fn extract<R: Read + Seek>(&self, source: &mut R) -> IngestResult<Metadata> {
        source
            .rewind()
            .map_err(|e| IngestError::UnreadableTags(e.to_string()))?;

        let parsed = Probe::new(&mut *source)
            .guess_file_type()
            .map_err(|e| IngestError::UnreadableTags(e.to_string()))
            .and_then(|probe| {
                probe
                    .read()
                    .map_err(|e| IngestError::UnreadableTags(e.to_string()))
            });

        source
            .rewind()
            .map_err(|e| IngestError::UnreadableTags(e.to_string()))?;

        let tagged_file = parsed?;
        let file_type = format_kind(tagged_file.file_type());

        // Primary tag first so its values win over secondary containers
        let primary_type = tagged_file.primary_tag_type();
        let mut tags: Vec<&Tag> = tagged_file.tags().iter().collect();
        tags.sort_by_key(|tag| tag.tag_type() != primary_type);

        if tags.is_empty() {
            return Err(IngestError::UnreadableTags(format!(
                "no tags found in {:?} container",
                tagged_file.file_type()
            )));
        }

        let metadata = Metadata::from_tags(file_type, tags);

        tracing::debug!(
            title = %metadata.title(),
            album = %metadata.album(),
            track = ?metadata.track(),
            disc = ?metadata.disc(),
            format = %file_type,
            raw_items = metadata.raw().len(),
            "Extracted metadata"
        );

        Ok(metadata)
    }
}

/// Catalogue format of a lofty container type
fn format_kind(file_type: FileType) -> FormatKind {
    match file_type {
        FileType::Mpeg => FormatKind::Mp3,
        FileType::Flac => FormatKind::Flac,
        FileType::Vorbis | FileType::Opus | FileType::Speex => FormatKind::Ogg,
        _ => FormatKind::Unknown,
    }
}

/// Lowercase Vorbis-comment name of an item key
///
/// Keys with no Vorbis equivalent fall back to their name in the tag's
/// own format.
fn raw_key_name(key: &ItemKey, tag_type: TagType) -> Option<String> {
    let name = match key {
        ItemKey::Unknown(name) => Some(name.as_str()),
        key => key
            .map_key(TagType::VorbisComments, false)
            .or_else(|| key.map_key(tag_type, false)),
    }?;

    Some(name.to_ascii_lowercase())
}
