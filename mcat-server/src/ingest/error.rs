//! Ingestion error kinds
//!
//! Every variant is fatal to the request that raised it.

use super::stream_store::StoreError;
use thiserror::Error;

pub type IngestResult<T> = Result<T, IngestError>;

#[derive(Debug, Error)]
pub enum IngestError {
    /// Bytes are not a recognised audio container, or carry no tag
    #[error("Unreadable tags: {0}")]
    UnreadableTags(String),

    /// Extracted file type has no seeded format record
    #[error("Unresolvable format '{name}': {source}")]
    UnresolvableFormat {
        name: String,
        #[source]
        source: mcat_common::Error,
    },

    /// Stream payload could not be stored
    #[error("Stream storage failed: {0}")]
    StorageWrite(#[from] StoreError),

    /// Upload is not a zip archive
    #[error("Invalid archive: {0}")]
    InvalidArchive(#[source] zip::result::ZipError),

    /// One archive entry could not be opened or copied out
    #[error("Failed to read archive entry #{index} ({name}): {reason}")]
    ArchiveEntryRead {
        index: usize,
        name: String,
        reason: String,
    },

    /// Temporary buffer could not be created or filled
    #[error("Spool error: {0}")]
    Spool(#[from] std::io::Error),

    /// Persisting the built records failed
    #[error("Collection error: {0}")]
    Collection(#[from] mcat_common::Error),

    /// Blocking worker panicked or was cancelled
    #[error("Blocking task failed: {0}")]
    Blocking(#[from] tokio::task::JoinError),
}

impl IngestError {
    /// Stable label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            IngestError::UnreadableTags(_) => "unreadable_tags",
            IngestError::UnresolvableFormat { .. } => "unresolvable_format",
            IngestError::StorageWrite(_) => "storage_write_failure",
            IngestError::InvalidArchive(_) => "invalid_archive",
            IngestError::ArchiveEntryRead { .. } => "archive_entry_read_failure",
            IngestError::Spool(_) => "spool_failure",
            IngestError::Collection(_) => "collection_failure",
            IngestError::Blocking(_) => "blocking_task_failure",
        }
    }
}
