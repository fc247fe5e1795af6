mod ids;
mod provider;
mod song;

pub use ids::SongId;
pub use provider::Provider;
pub use song::{Recommendation, Song, DEFAULT_DURATION_MS};
