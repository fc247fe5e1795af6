//! Cascade Core
//!
//! Platform-agnostic domain types and error handling for Cascade.
//!
//! This crate provides the building blocks shared by the catalog, the
//! playback state machine (native and browser), and the server.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Song`, `Recommendation`, `Provider`
//! - **Identifiers**: `SongId`
//! - **Error Handling**: Unified `CascadeError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use cascade_core::{Provider, Song, SongId};
//!
//! let song = Song::new("song-1", "Midnight City", vec!["M83".to_string()]);
//!
//! assert_eq!(song.id, SongId::new("song-1"));
//! assert_eq!(song.provider, Provider::Direct);
//! assert!(!song.uses_embed());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{CascadeError, Result};
pub use types::{Provider, Recommendation, Song, SongId};
