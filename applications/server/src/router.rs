/// HTTP router assembly
use crate::{api, state::AppState};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::path::{Component, Path, PathBuf};
use tower::ServiceExt;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the application router
///
/// API routes live under `/api`. Everything else is served from `web_dir`,
/// falling back to `index.html` so client-side routes resolve.
pub fn create_router(app_state: AppState, web_dir: PathBuf) -> Router {
    let api_routes = Router::new()
        .route("/health", get(api::health::health))
        // Songs
        .route("/songs", get(api::songs::list_songs))
        .route("/songs/:id", get(api::songs::get_song))
        .route("/songs/:id/next", get(api::songs::get_next_song))
        .route(
            "/songs/:id/recommendations",
            get(api::songs::get_recommendations),
        )
        // Library
        .route("/library/trending", get(api::library::trending))
        .route("/library/artists", get(api::library::popular_artists));

    let spa_fallback = move |req: Request<Body>| {
        let web_dir = web_dir.clone();
        async move {
            let path = req.uri().path().trim_start_matches('/');

            if let Some(file_path) = static_file(&web_dir, path) {
                tracing::trace!("Serving static file {:?}", file_path);
                return match ServeDir::new(&web_dir).oneshot(req).await {
                    Ok(res) => res.into_response(),
                    Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
                };
            }

            // SPA fallback: serve index.html
            let index_path = web_dir.join("index.html");
            if !index_path.is_file() {
                return StatusCode::NOT_FOUND.into_response();
            }

            match tokio::fs::read(&index_path).await {
                Ok(contents) => (
                    StatusCode::OK,
                    [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                    contents,
                )
                    .into_response(),
                Err(e) => {
                    tracing::error!("Failed to read {:?}: {}", index_path, e);
                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                }
            }
        }
    };

    Router::new()
        .nest("/api", api_routes)
        .fallback(spa_fallback)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

/// Existing file under `web_dir` for a request path, if any
///
/// Paths that leave the directory are never resolved.
fn static_file(web_dir: &Path, path: &str) -> Option<PathBuf> {
    if path.is_empty() {
        return None;
    }

    let relative = Path::new(path);
    if !relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        return None;
    }

    let file_path = web_dir.join(relative);
    file_path.is_file().then_some(file_path)
}
