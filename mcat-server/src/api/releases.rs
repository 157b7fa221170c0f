//! Release API handlers
//!
//! POST /releases/upload, GET|POST /releases, GET|POST /releases/:id

use axum::{
    body::Body,
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use mcat_common::models::{Release, ReleaseEdit};

use super::{check_stream_paths, Page};
use crate::error::{ApiError, ApiResult};
use crate::ingest::spool::spool_stream;
use crate::AppState;

/// POST /releases/upload
///
/// Body is a zip archive; each file entry becomes one track.
pub async fn upload_release(State(state): State<AppState>, body: Body) -> ApiResult<Json<Release>> {
    let upload = spool_stream(body.into_data_stream(), state.ingestor.spool_dir())
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to buffer upload: {}", e)))?;

    let release = state.ingestor.ingest_release(upload).await?;

    Ok(Json(release))
}

/// GET /releases?offset=&rows=
pub async fn list_releases(
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> ApiResult<Json<Vec<Release>>> {
    let page = page.validate()?;
    let releases = state.collection.releases(page.offset, page.rows).await?;
    Ok(Json(releases))
}

/// POST /releases
pub async fn create_release(
    State(state): State<AppState>,
    Json(mut release): Json<Release>,
) -> ApiResult<Json<Release>> {
    release.id = 0;
    for track in release.tracks.iter_mut() {
        track.id = 0;
        for stream in track.streams.iter_mut() {
            stream.id = 0;
        }
        check_stream_paths(&state, track)?;
    }

    state.collection.create_release(&mut release).await?;

    Ok(Json(release))
}

/// GET /releases/:id
pub async fn get_release(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Release>> {
    Ok(Json(state.collection.get_release(id).await?))
}

/// POST /releases/:id
///
/// Partial edit of mbid, title and year.
pub async fn edit_release(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(edit): Json<ReleaseEdit>,
) -> ApiResult<Json<Release>> {
    let mut release = state.collection.get_release(id).await?;
    edit.apply(&mut release);
    state.collection.save_release(&release).await?;

    tracing::info!(release_id = id, "Edited release");
    Ok(Json(release))
}

/// Build release routes
pub fn release_routes() -> Router<AppState> {
    Router::new()
        .route("/releases", get(list_releases).post(create_release))
        .route("/releases/upload", post(upload_release))
        .route("/releases/:id", get(get_release).post(edit_release))
}
