/// Shared application state
use cascade_catalog::Catalog;
use std::sync::Arc;

/// Application state shared across all handlers
///
/// The catalog is loaded once at startup and read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
}

impl AppState {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}
