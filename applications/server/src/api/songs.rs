/// Song catalog API routes
use crate::{error::Result, state::AppState};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use cascade_core::{Song, SongId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Upper bound on a single page
pub const MAX_LIMIT: usize = 500;

#[derive(Debug, Deserialize)]
pub struct SongQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}

#[derive(Debug, Serialize)]
pub struct SongsResponse {
    pub songs: Vec<Arc<Song>>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    3
}

#[derive(Debug, Serialize)]
pub struct NextSongResponse {
    pub song: Option<Arc<Song>>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<Arc<Song>>,
}

/// GET /api/songs
pub async fn list_songs(
    State(app_state): State<AppState>,
    Query(query): Query<SongQuery>,
) -> Result<Json<SongsResponse>> {
    let songs: Vec<Arc<Song>> = match query.q {
        Some(q) => app_state.catalog.search(&q),
        None => app_state.catalog.songs().to_vec(),
    };

    let total = songs.len();
    let paginated = songs
        .into_iter()
        .skip(query.offset)
        .take(query.limit.min(MAX_LIMIT))
        .collect();

    Ok(Json(SongsResponse {
        songs: paginated,
        total,
    }))
}

/// GET /api/songs/:id
pub async fn get_song(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<Arc<Song>>> {
    let song = app_state.catalog.require(&SongId::new(id))?;
    Ok(Json(Arc::clone(song)))
}

/// GET /api/songs/:id/next
///
/// Catalog-order successor, the song playback continues with after a
/// recommendation branch. `null` for the last song.
pub async fn get_next_song(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<NextSongResponse>> {
    let id = SongId::new(id);
    app_state.catalog.require(&id)?;

    Ok(Json(NextSongResponse {
        song: app_state.catalog.next_after(&id).cloned(),
    }))
}

/// GET /api/songs/:id/recommendations
pub async fn get_recommendations(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    Query(query): Query<RecommendationQuery>,
) -> Result<Json<RecommendationsResponse>> {
    let song = app_state.catalog.require(&SongId::new(id))?;
    let recommendations = app_state
        .catalog
        .resolve_recommendations(song, query.top_k);

    tracing::debug!(
        "Resolved {} recommendations for '{}'",
        recommendations.len(),
        song.id
    );

    Ok(Json(RecommendationsResponse { recommendations }))
}
