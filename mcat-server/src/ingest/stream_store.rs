//! Durable storage of raw audio payloads
//!
//! Payloads are stored under freshly generated UUID v4 names; the name is
//! never derived from content, so storing the same bytes twice yields two
//! objects.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::AsyncRead;
use uuid::Uuid;

/// Async reader over a stored payload
pub type StreamReader = Box<dyn AsyncRead + Send + Unpin>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Object could not be created or fully written
    #[error("Failed to write stream {locator}: {source}")]
    Write {
        locator: String,
        #[source]
        source: io::Error,
    },

    /// No object exists at the locator, or the locator is outside the store
    #[error("Stream not found: {0}")]
    NotFound(String),

    /// Object exists but could not be opened
    #[error("Failed to read stream {locator}: {source}")]
    Read {
        locator: String,
        #[source]
        source: io::Error,
    },
}

/// Storage backend for stream payloads
pub trait StreamStore: Send + Sync {
    /// Persist the whole of `data` under a new name and return its locator
    fn store(&self, data: &mut dyn Read) -> Result<String, StoreError>;

    /// Whether `locator` names an object held by this store
    fn contains(&self, locator: &str) -> bool;

    /// Open a previously stored payload for reading
    ///
    /// Blocking; call from `spawn_blocking` in async contexts.
    fn retrieve(&self, locator: &str) -> Result<StreamReader, StoreError>;
}

/// Stream store backed by a local directory
#[derive(Debug, Clone)]
pub struct FsStreamStore {
    directory: PathBuf,
}

impl FsStreamStore {
    /// Use `directory` as the storage root, creating it if missing
    pub fn new(directory: impl AsRef<Path>) -> io::Result<Self> {
        fs::create_dir_all(directory.as_ref())?;
        let directory = fs::canonicalize(directory.as_ref())?;
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn new_path(&self) -> PathBuf {
        self.directory.join(Uuid::new_v4().to_string())
    }

    /// Canonical path of `locator` if it is a regular file below the root
    fn resolve(&self, locator: &str) -> Option<PathBuf> {
        fs::canonicalize(locator)
            .ok()
            .filter(|path| path.starts_with(&self.directory) && path.is_file())
    }
}

impl StreamStore for FsStreamStore {
    fn store(&self, data: &mut dyn Read) -> Result<String, StoreError> {
        let path = self.new_path();
        let locator = path.to_string_lossy().into_owned();

        match write_new(&path, data) {
            Ok(bytes) => {
                tracing::debug!(locator = %locator, bytes, "Stored stream");
                Ok(locator)
            }
            Err(source) => Err(StoreError::Write { locator, source }),
        }
    }

    fn contains(&self, locator: &str) -> bool {
        self.resolve(locator).is_some()
    }

    fn retrieve(&self, locator: &str) -> Result<StreamReader, StoreError> {
        let Some(path) = self.resolve(locator) else {
            tracing::warn!(locator = %locator, "Refused stream outside the store");
            return Err(StoreError::NotFound(locator.to_string()));
        };

        match File::open(&path) {
            Ok(file) => Ok(Box::new(tokio::fs::File::from_std(file))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(locator.to_string()))
            }
            Err(source) => Err(StoreError::Read {
                locator: locator.to_string(),
                source,
            }),
        }
    }
}

/// Copy `data` into a file that must not exist yet
fn write_new(path: &Path, data: &mut dyn Read) -> io::Result<u64> {
    let mut file = File::options().write(true).create_new(true).open(path)?;
    let written = io::copy(data, &mut file)?;
    file.flush()?;
    file.sync_all()?;
    Ok(written)
}
