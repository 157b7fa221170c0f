//! HTTP API handlers for mcat-server

pub mod health;
pub mod releases;
pub mod tracks;

pub use health::health_routes;
pub use releases::release_routes;
pub use tracks::track_routes;

use mcat_common::models::Track;
use serde::Deserialize;

use crate::AppState;

/// `?offset=&rows=` listing window
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Page {
    pub offset: i64,
    pub rows: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self { offset: 0, rows: 10 }
    }
}

impl Page {
    pub fn validate(self) -> crate::ApiResult<Self> {
        if self.offset < 0 || self.rows < 0 {
            return Err(crate::ApiError::BadRequest(format!(
                "offset and rows must be non-negative (got offset={}, rows={})",
                self.offset, self.rows
            )));
        }
        Ok(self)
    }
}

/// Reject JSON-supplied streams whose path is not an object of the store
pub(crate) fn check_stream_paths(state: &AppState, track: &Track) -> crate::ApiResult<()> {
    match track.streams.iter().find(|s| !state.store.contains(&s.path)) {
        Some(stream) => Err(crate::ApiError::BadRequest(format!(
            "stream path is not a stored object: {}",
            stream.path
        ))),
        None => Ok(()),
    }
}
