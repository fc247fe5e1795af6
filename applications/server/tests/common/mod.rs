/// Shared test utilities
use cascade_catalog::Catalog;
use cascade_core::{Recommendation, Song};
use cascade_server::{create_router, state::AppState};
use axum::Router;
use std::sync::Arc;
use tempfile::TempDir;

fn song(id: &str, title: &str, artists: &[&str]) -> Song {
    let mut song = Song::new(
        id,
        title,
        artists.iter().map(|a| (*a).to_string()).collect(),
    );
    song.audio_url = format!("https://cdn.example/{}.mp3", id);
    song
}

/// Small catalog with two recommendation edges on the first song
pub fn test_catalog() -> Catalog {
    let mut seed = song("flowers", "Flowers", &["Miley Cyrus"]);
    seed.recommendations = vec![
        Recommendation::new("kill-bill", 0.7, "similar mood"),
        Recommendation::new("ghost", 0.2, "not in catalog"),
        Recommendation::new("vampire", 0.9, "same year"),
    ];

    Catalog::new(vec![
        seed,
        song("kill-bill", "Kill Bill", &["SZA"]),
        song("vampire", "vampire", &["Olivia Rodrigo"]),
        song("snooze", "Snooze", &["SZA"]),
        song("cruel-summer", "Cruel Summer", &["Taylor Swift"]),
    ])
}

/// Web directory with an index page and one asset
pub fn create_web_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html>cascade</html>").unwrap();
    std::fs::write(dir.path().join("app.js"), "console.log('cascade');").unwrap();
    dir
}

/// Catalog of `count` generated songs
pub fn large_catalog(count: usize) -> Catalog {
    Catalog::new(
        (0..count)
            .map(|i| song(&format!("song-{}", i), &format!("Song {}", i), &["Various"]))
            .collect(),
    )
}

/// Router over the test catalog, serving from `web_dir`
pub fn create_test_app(web_dir: &TempDir) -> Router {
    create_app_with_catalog(test_catalog(), web_dir)
}

/// Router over `catalog`, serving from `web_dir`
pub fn create_app_with_catalog(catalog: Catalog, web_dir: &TempDir) -> Router {
    let app_state = AppState::new(Arc::new(catalog));
    create_router(app_state, web_dir.path().to_path_buf())
}
