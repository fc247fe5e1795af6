//! WASM bindings for cascade-playback
//!
//! This module drives the player from a browser page: the controller owns the
//! state, an `HtmlAudioElement` plays streams, and JavaScript callbacks hear
//! about state, track and queue changes.

#[cfg(feature = "wasm")]
pub mod types;

#[cfg(feature = "wasm")]
pub mod player;

#[cfg(feature = "wasm")]
pub use player::WasmPlayer;
