//! Cascade - Playback Queue
//!
//! The player state machine for Cascade.
//!
//! This crate provides:
//! - Ordered playback queue with a cursor (one item per song)
//! - Shuffle that keeps the active item first and restores the exact order
//! - Repeat modes (None, One, All)
//! - Recommendation expansion and catalog-order continuation after a
//!   recommended track ends
//! - A controller that emits events and tracks a playback generation
//! - Transport synchronisation with stale play-start detection
//! - Browser bindings behind the `wasm` feature
//!
//! # Architecture
//!
//! `cascade-playback` performs no I/O:
//! - `reduce` is a pure transition `(PlayerState, PlayerCommand) -> PlayerState`
//! - `PlayerController` owns the state and diffs it into `PlayerEvent`s
//! - `TransportSync` turns the controller's view into backend commands
//!
//! The audio backend is provided via the `TransportBackend` trait.
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use cascade_core::Song;
//! use cascade_playback::{PlayerConfig, PlayerController};
//! use std::sync::Arc;
//!
//! let mut player = PlayerController::new(PlayerConfig::default());
//!
//! let a = Arc::new(Song::new("a", "First", vec!["Artist".to_string()]));
//! let b = Arc::new(Song::new("b", "Second", vec!["Artist".to_string()]));
//!
//! player.play_song(a, None);
//! player.play_song(b, None);
//! assert_eq!(player.snapshot().cursor(), Some(1));
//!
//! player.play_next();
//! assert_eq!(player.snapshot().cursor(), Some(0));
//! ```
//!
//! # Example: Transport
//!
//! ```rust
//! use cascade_core::Song;
//! use cascade_playback::{PlayerController, TransportCommand, TransportSync};
//! use std::sync::Arc;
//!
//! let mut song = Song::new("a", "First", vec![]);
//! song.audio_url = "https://cdn.example/a.mp3".to_string();
//!
//! let mut player = PlayerController::default();
//! let mut sync = TransportSync::new();
//!
//! player.play_song(Arc::new(song), None);
//! let commands = sync.reconcile(&player.transport_view());
//!
//! assert!(matches!(commands[0], TransportCommand::Load(_)));
//! assert!(matches!(commands[1], TransportCommand::Play(_)));
//! ```

mod command;
mod controller;
mod error;
mod events;
mod queue;
mod reducer;
mod shuffle;
mod state;
pub mod transport;
pub mod types;

pub mod wasm;

// Public exports
pub use command::PlayerCommand;
pub use controller::{PlayerController, TransportView};
pub use error::{PlaybackError, Result};
pub use events::PlayerEvent;
pub use queue::Queue;
pub use reducer::reduce;
pub use shuffle::shuffle_around_current;
pub use state::PlayerState;
pub use transport::{
    MediaBinding, PlayTicket, StartOutcome, TransportBackend, TransportCommand, TransportSync,
};
pub use types::{ItemSource, PlayerConfig, QueueItem, QueueItemId, RepeatMode};
