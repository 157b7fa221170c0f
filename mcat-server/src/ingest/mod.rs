//! Upload ingestion
//!
//! Turns an uploaded audio file or zip archive into a persisted track or
//! release:
//!
//! ```text
//! upload ─► spool ─► MetadataExtractor ─► Collection::get_format ─► StreamStore::store
//!                                                                        │
//!                         Collection::create_track / create_release ◄────┘
//! ```

pub mod archive;
pub mod builder;
pub mod error;
pub mod metadata;
pub mod spool;
pub mod stream_store;

pub use archive::ArchiveWalker;
pub use builder::TrackBuilder;
pub use error::{IngestError, IngestResult};
pub use metadata::{Metadata, MetadataExtractor, RawValue};
pub use stream_store::{FsStreamStore, StoreError, StreamReader, StreamStore};

use mcat_common::models::{Release, Track};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::collection::Collection;

/// Entry point for both upload kinds
#[derive(Clone)]
pub struct Ingestor {
    collection: Arc<dyn Collection>,
    builder: TrackBuilder,
    walker: ArchiveWalker,
    spool_dir: Option<PathBuf>,
}

impl Ingestor {
    pub fn new(
        collection: Arc<dyn Collection>,
        store: Arc<dyn StreamStore>,
        spool_dir: Option<PathBuf>,
    ) -> Self {
        let builder = TrackBuilder::new(Arc::clone(&collection), store);
        let walker = ArchiveWalker::new(builder.clone(), spool_dir.clone());
        Self {
            collection,
            builder,
            walker,
            spool_dir,
        }
    }

    /// Directory for request-scoped temp buffers (OS default when `None`)
    pub fn spool_dir(&self) -> Option<&std::path::Path> {
        self.spool_dir.as_deref()
    }

    /// Ingest one audio file as a standalone track
    pub async fn ingest_track(&self, source: File) -> IngestResult<Track> {
        let mut track = self.builder.build_track(source).await.inspect_err(|e| {
            warn!(kind = e.kind(), "Track ingestion failed: {}", e);
        })?;

        self.collection.create_track(&mut track).await?;

        info!(track_id = track.id, title = %track.title, "Ingested track");
        Ok(track)
    }

    /// Ingest a zip archive as one release
    pub async fn ingest_release(&self, source: File) -> IngestResult<Release> {
        let mut release = self.walker.walk(source).await.inspect_err(|e| {
            warn!(kind = e.kind(), "Release ingestion failed: {}", e);
        })?;

        self.collection.create_release(&mut release).await?;

        info!(
            release_id = release.id,
            title = %release.title,
            tracks = release.tracks.len(),
            "Ingested release"
        );
        Ok(release)
    }
}
