//! mcat-server library interface
//!
//! Exposes the ingestion core, the persistence layer and the router so the
//! binary and the integration tests share one wiring.

pub mod api;
pub mod collection;
pub mod db;
pub mod error;
pub mod ingest;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::collection::Collection;
use crate::ingest::{Ingestor, StreamStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub collection: Arc<dyn Collection>,
    pub store: Arc<dyn StreamStore>,
    pub ingestor: Ingestor,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        collection: Arc<dyn Collection>,
        store: Arc<dyn StreamStore>,
        spool_dir: Option<PathBuf>,
    ) -> Self {
        let ingestor = Ingestor::new(Arc::clone(&collection), Arc::clone(&store), spool_dir);
        Self {
            collection,
            store,
            ingestor,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::track_routes())
        .merge(api::release_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
