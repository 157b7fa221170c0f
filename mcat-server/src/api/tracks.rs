//! Track API handlers
//!
//! POST /tracks/upload, GET|POST /tracks, GET|POST /tracks/:id,
//! GET /tracks/:id/stream

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use mcat_common::models::{Track, TrackEdit};
use std::sync::Arc;
use tokio_util::io::ReaderStream;

use super::{check_stream_paths, Page};
use crate::error::{ApiError, ApiResult};
use crate::ingest::spool::spool_stream;
use crate::AppState;

/// POST /tracks/upload
///
/// Body is the raw audio file. Responds with the created track.
pub async fn upload_track(State(state): State<AppState>, body: Body) -> ApiResult<Json<Track>> {
    let upload = spool_stream(body.into_data_stream(), state.ingestor.spool_dir())
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to buffer upload: {}", e)))?;

    let track = state.ingestor.ingest_track(upload).await?;

    Ok(Json(track))
}

/// GET /tracks?offset=&rows=
pub async fn list_tracks(
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> ApiResult<Json<Vec<Track>>> {
    let page = page.validate()?;
    let tracks = state.collection.tracks(page.offset, page.rows).await?;
    Ok(Json(tracks))
}

/// POST /tracks
///
/// Creates a track from a JSON body; ids in the body are ignored.
pub async fn create_track(
    State(state): State<AppState>,
    Json(mut track): Json<Track>,
) -> ApiResult<Json<Track>> {
    track.id = 0;
    for stream in track.streams.iter_mut() {
        stream.id = 0;
    }
    check_stream_paths(&state, &track)?;

    state.collection.create_track(&mut track).await?;

    Ok(Json(track))
}

/// GET /tracks/:id
pub async fn get_track(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Track>> {
    Ok(Json(state.collection.get_track(id).await?))
}

/// POST /tracks/:id
///
/// Partial edit of mbid, title, position and disc.
pub async fn edit_track(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(edit): Json<TrackEdit>,
) -> ApiResult<Json<Track>> {
    let mut track = state.collection.get_track(id).await?;
    edit.apply(&mut track);
    state.collection.save_track(&track).await?;

    tracing::info!(track_id = id, "Edited track");
    Ok(Json(track))
}

/// GET /tracks/:id/stream
///
/// Serves the first stream of the track with its format's content type.
pub async fn stream_track(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Response> {
    let track = state.collection.get_track(id).await?;
    let stream = track
        .streams
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::NotFound(format!("track {} has no stream", id)))?;

    let store = Arc::clone(&state.store);
    let locator = stream.path;
    let reader = tokio::task::spawn_blocking(move || store.retrieve(&locator))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok((
        [(header::CONTENT_TYPE, stream.format.name.mime_type())],
        Body::from_stream(ReaderStream::new(reader)),
    )
        .into_response())
}

/// Build track routes
pub fn track_routes() -> Router<AppState> {
    Router::new()
        .route("/tracks", get(list_tracks).post(create_track))
        .route("/tracks/upload", post(upload_track))
        .route("/tracks/:id", get(get_track).post(edit_track))
        .route("/tracks/:id/stream", get(stream_track))
}
