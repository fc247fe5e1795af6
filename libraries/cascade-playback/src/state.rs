//! Player state
//!
//! `PlayerState` is a plain value. It changes only by running a
//! [`PlayerCommand`](crate::PlayerCommand) through [`reduce`](crate::reduce);
//! readers get the getters below and the derived active song.

use crate::queue::Queue;
use crate::types::{PlayerConfig, QueueItem, RepeatMode};
use cascade_core::{Song, SongId};
use serde::Serialize;
use std::sync::Arc;

/// Snapshot of the whole player
///
/// States:
/// - Empty: no cursor, empty queue
/// - Stopped: cursor on an item, not playing
/// - Playing: cursor on an item, playing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    /// Catalog, seeded once
    pub(crate) songs: Vec<Arc<Song>>,

    pub(crate) queue: Queue,

    /// Pre-shuffle order; only meaningful while `is_shuffled`
    pub(crate) original_queue: Queue,

    /// Index of the active item; `None` exactly when the queue is empty
    pub(crate) cursor: Option<usize>,

    pub(crate) is_playing: bool,

    /// 0.0 - 1.0
    pub(crate) volume: f32,

    pub(crate) is_shuffled: bool,
    pub(crate) repeat: RepeatMode,

    /// Song whose recommendations were last expanded into the queue
    pub(crate) expanded_song_id: Option<SongId>,

    /// Seconds into the active item
    pub(crate) current_time: f64,

    /// Seconds, as reported by the transport
    pub(crate) duration: f64,

    pub(crate) is_full_screen: bool,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new(&PlayerConfig::default())
    }
}

impl PlayerState {
    /// Empty player with the given starting settings
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            songs: Vec::new(),
            queue: Queue::new(),
            original_queue: Queue::new(),
            cursor: None,
            is_playing: false,
            volume: config.volume.clamp(0.0, 1.0),
            is_shuffled: false,
            repeat: config.repeat,
            expanded_song_id: None,
            current_time: 0.0,
            duration: 0.0,
            is_full_screen: false,
        }
    }

    pub fn songs(&self) -> &[Arc<Song>] {
        &self.songs
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn original_queue(&self) -> &Queue {
        &self.original_queue
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Cursor in the browser convention: `-1` when there is no active item
    pub fn cursor_index(&self) -> i64 {
        self.cursor.map_or(-1, |c| c as i64)
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_shuffled(&self) -> bool {
        self.is_shuffled
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    pub fn expanded_song_id(&self) -> Option<&SongId> {
        self.expanded_song_id.as_ref()
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn is_full_screen(&self) -> bool {
        self.is_full_screen
    }

    /// The queue item under the cursor
    pub fn active_item(&self) -> Option<&QueueItem> {
        self.cursor.and_then(|c| self.queue.get(c))
    }

    /// The song under the cursor
    pub fn active_song(&self) -> Option<&Arc<Song>> {
        self.active_item().map(|item| &item.song)
    }

    /// Catalog lookup by id
    pub fn find_song(&self, id: &SongId) -> Option<&Arc<Song>> {
        self.songs.iter().find(|song| &song.id == id)
    }

    /// Whether there is an item after the cursor without wrapping
    pub fn has_next(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.queue.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_empty() {
        let state = PlayerState::default();

        assert!(state.queue().is_empty());
        assert_eq!(state.cursor(), None);
        assert_eq!(state.cursor_index(), -1);
        assert!(!state.is_playing());
        assert!((state.volume() - 0.8).abs() < f32::EPSILON);
        assert_eq!(state.repeat(), RepeatMode::None);
        assert!(state.active_song().is_none());
    }

    #[test]
    fn config_volume_is_clamped() {
        let state = PlayerState::new(&PlayerConfig {
            volume: 3.0,
            repeat: RepeatMode::All,
        });
        assert_eq!(state.volume(), 1.0);
        assert_eq!(state.repeat(), RepeatMode::All);
    }

    #[test]
    fn snapshot_serializes_camel_case() {
        let json = serde_json::to_value(PlayerState::default()).unwrap();
        assert_eq!(json["cursor"], serde_json::Value::Null);
        assert_eq!(json["isShuffled"], false);
        assert_eq!(json["repeat"], "none");
    }
}
