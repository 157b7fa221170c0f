//! Zip archive walking
//!
//! Every file entry of an uploaded zip becomes one track of a single
//! release, in archive order. Directory entries are skipped. The first
//! failing entry aborts the walk; streams stored for earlier entries stay
//! in the stream store.

use std::fs::File;
use std::path::PathBuf;
use zip::ZipArchive;

use mcat_common::models::Release;

use super::builder::TrackBuilder;
use super::error::{IngestError, IngestResult};
use super::spool::spool_reader;

#[derive(Clone)]
pub struct ArchiveWalker {
    builder: TrackBuilder,
    spool_dir: Option<PathBuf>,
}

impl ArchiveWalker {
    pub fn new(builder: TrackBuilder, spool_dir: Option<PathBuf>) -> Self {
        Self { builder, spool_dir }
    }

    /// Build an unsaved release from a zip archive
    pub async fn walk(&self, source: File) -> IngestResult<Release> {
        let mut archive = tokio::task::spawn_blocking(move || ZipArchive::new(source))
            .await?
            .map_err(IngestError::InvalidArchive)?;

        let mut release = Release::default();

        for index in 0..archive.len() {
            let spool_dir = self.spool_dir.clone();
            let (returned, entry) = tokio::task::spawn_blocking(move || {
                let entry = spool_entry(&mut archive, index, spool_dir);
                (archive, entry)
            })
            .await?;
            archive = returned;

            let Some((name, buffer)) = entry? else {
                continue;
            };

            tracing::debug!(index, entry = %name, "Processing archive entry");
            self.builder.build_into_release(buffer, &mut release).await?;
        }

        tracing::debug!(
            entries = archive.len(),
            tracks = release.tracks.len(),
            "Walked archive"
        );

        Ok(release)
    }
}

/// Copy entry `index` into a temp buffer; `None` for directories
fn spool_entry(
    archive: &mut ZipArchive<File>,
    index: usize,
    spool_dir: Option<PathBuf>,
) -> IngestResult<Option<(String, File)>> {
    let mut entry = archive
        .by_index(index)
        .map_err(|e| IngestError::ArchiveEntryRead {
            index,
            name: String::new(),
            reason: e.to_string(),
        })?;

    let name = entry.name().to_string();
    if entry.is_dir() {
        return Ok(None);
    }

    let buffer = spool_reader(&mut entry, spool_dir.as_deref()).map_err(|e| IngestError::ArchiveEntryRead {
        index,
        name: name.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some((name, buffer)))
}
