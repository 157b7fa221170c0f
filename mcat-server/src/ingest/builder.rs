//! Track and release assembly from one audio file
//!
//! For every source file: read tags, resolve the format, store the raw
//! bytes, and produce a Track carrying exactly one Stream. Tag parsing and
//! storage are blocking and run on tokio's blocking pool; the source file
//! is moved there and back.

use mcat_common::models::{Release, Stream, Track};
use std::fs::File;
use std::sync::Arc;

use super::error::{IngestError, IngestResult};
use super::metadata::{Metadata, MetadataExtractor};
use super::stream_store::StreamStore;
use crate::collection::Collection;

#[derive(Clone)]
pub struct TrackBuilder {
    collection: Arc<dyn Collection>,
    store: Arc<dyn StreamStore>,
    extractor: MetadataExtractor,
}

impl TrackBuilder {
    pub fn new(collection: Arc<dyn Collection>, store: Arc<dyn StreamStore>) -> Self {
        Self {
            collection,
            store,
            extractor: MetadataExtractor::new(),
        }
    }

    /// Build a standalone track (`release_id == 0`) from one audio file
    pub async fn build_track(&self, source: File) -> IngestResult<Track> {
        let (track, _) = self.assemble(source).await?;
        Ok(track)
    }

    /// Build a track and fold it into `release`
    ///
    /// Release title, mbid and year are overwritten from this file's tags
    /// on every call, so the last file processed wins.
    pub async fn build_into_release(&self, source: File, release: &mut Release) -> IngestResult<()> {
        let (track, metadata) = self.assemble(source).await?;

        release.title = metadata.album().to_string();
        release.mbid = release_mbid(&metadata);
        release.year = release_year(&metadata);
        release.add_track(track);

        Ok(())
    }

    async fn assemble(&self, source: File) -> IngestResult<(Track, Metadata)> {
        let extractor = self.extractor;
        let (source, metadata) = tokio::task::spawn_blocking(move || {
            let mut source = source;
            let metadata = extractor.extract(&mut source);
            (source, metadata)
        })
        .await?;
        let metadata = metadata?;

        let format_name = metadata.file_type().as_str();
        let format = self
            .collection
            .get_format(format_name)
            .await
            .map_err(|source| IngestError::UnresolvableFormat {
                name: format_name.to_string(),
                source,
            })?;

        let mut track = Track {
            title: metadata.title().to_string(),
            position: metadata.track().map(i64::from).unwrap_or(0),
            disc: metadata.disc().map(i64::from).unwrap_or(0),
            mbid: metadata
                .raw_text("musicbrainz_trackid")
                .unwrap_or_default()
                .to_string(),
            ..Default::default()
        };

        let store = Arc::clone(&self.store);
        let path = tokio::task::spawn_blocking(move || {
            let mut source = source;
            store.store(&mut source)
        })
        .await??;

        tracing::debug!(
            title = %track.title,
            position = track.position,
            format = %format.name,
            locator = %path,
            "Built track"
        );

        track.add_stream(Stream {
            path,
            format_id: format.id,
            format,
            ..Default::default()
        });

        Ok((track, metadata))
    }
}

fn release_mbid(metadata: &Metadata) -> String {
    metadata
        .raw_text("musicbrainz_albumid")
        .unwrap_or_default()
        .to_string()
}

/// `originalyear`, else the year part of `originaldate`, else 0
///
/// Vorbis `ORIGINALYEAR` comments reach us as `originaldate`; the
/// `originalyear` key only survives from containers lofty does not map.
fn release_year(metadata: &Metadata) -> i64 {
    if let Some(year) = metadata.raw_text("originalyear") {
        return year.trim().parse().unwrap_or(0);
    }

    metadata
        .raw_text("originaldate")
        .and_then(|date| date.trim().get(..4))
        .and_then(|year| year.parse().ok())
        .unwrap_or(0)
}
