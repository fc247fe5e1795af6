/// Library browsing API routes
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use cascade_catalog::ArtistCount;
use cascade_core::Song;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct LibraryQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    12
}

#[derive(Debug, Serialize)]
pub struct TrendingResponse {
    pub songs: Vec<Arc<Song>>,
}

#[derive(Debug, Serialize)]
pub struct ArtistsResponse {
    pub artists: Vec<ArtistCount>,
}

/// GET /api/library/trending
pub async fn trending(
    State(app_state): State<AppState>,
    Query(query): Query<LibraryQuery>,
) -> Json<TrendingResponse> {
    Json(TrendingResponse {
        songs: app_state.catalog.trending(query.limit).to_vec(),
    })
}

/// GET /api/library/artists
pub async fn popular_artists(
    State(app_state): State<AppState>,
    Query(query): Query<LibraryQuery>,
) -> Json<ArtistsResponse> {
    Json(ArtistsResponse {
        artists: app_state.catalog.popular_artists(query.limit),
    })
}
