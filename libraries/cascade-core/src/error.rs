/// Core error types for Cascade
use thiserror::Error;

use crate::types::SongId;

/// Result type alias using `CascadeError`
pub type Result<T> = std::result::Result<T, CascadeError>;

/// Core error type for Cascade
#[derive(Error, Debug)]
pub enum CascadeError {
    /// Song not found in the catalog
    #[error("Song not found: {0}")]
    SongNotFound(SongId),

    /// Catalog could not be read or is structurally unusable
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl CascadeError {
    /// Create a catalog error
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn song_not_found_display_includes_id() {
        let err = CascadeError::SongNotFound(SongId::new("abc-1"));
        assert_eq!(err.to_string(), "Song not found: abc-1");
    }

    #[test]
    fn catalog_error_display() {
        let err = CascadeError::catalog("Cannot infer catalog format for songs.txt");
        assert_eq!(
            err.to_string(),
            "Catalog error: Cannot infer catalog format for songs.txt"
        );
    }
}
