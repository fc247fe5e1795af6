//! Error types for playback

use cascade_core::SongId;
use thiserror::Error;

/// Playback errors
///
/// Queue commands never fail; these come from the edges: the audio backend
/// refusing to start, or callers handing in values that do not parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// The backend rejected a play request
    #[error("Transport error: {0}")]
    Transport(String),

    /// Unrecognised repeat mode string
    #[error("Invalid repeat mode '{0}'. Use 'none', 'all', or 'one'")]
    InvalidRepeatMode(String),

    /// Song id not present in the loaded catalog
    #[error("Unknown song: {0}")]
    UnknownSong(SongId),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
