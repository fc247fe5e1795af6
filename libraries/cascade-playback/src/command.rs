//! Player commands

use crate::types::RepeatMode;
use cascade_core::{Song, SongId};
use std::sync::Arc;

/// Everything that can change a [`PlayerState`](crate::PlayerState)
///
/// Every command is total: inputs that make no sense for the current state
/// degrade to no-ops.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCommand {
    /// Seed the catalog. Ignored once songs are loaded. Never touches the queue.
    LoadCatalog(Vec<Arc<Song>>),

    /// Toggle playing; ignored on an empty queue
    PlayPause,

    /// Direct override, used by the transport
    SetPlaying(bool),

    /// Jump to a song, appending it if it is not queued
    ///
    /// A non-empty `origin_track_id` marks the new item as a recommendation.
    PlaySong {
        song: Arc<Song>,
        origin_track_id: Option<SongId>,
    },

    /// Play a song right after the current item and mark it expanded
    ExpandAndPlay(Arc<Song>),

    /// Insert a song's recommendations after the current item and play the first
    ///
    /// Recommendations must already be resolved to catalog songs.
    ExpandRecommendations {
        song: Arc<Song>,
        recommendations: Vec<Arc<Song>>,
    },

    /// Clear the expanded marker
    CollapseExpanded,

    /// Append a song without moving the cursor
    EnqueueSong(Arc<Song>),

    /// Replace the queue with `songs`, starting at `start`
    ReplaceQueue { songs: Vec<Arc<Song>>, start: usize },

    PlayNext,
    PlayPrev,

    /// End-of-track policy (continuation, repeat, advance, stop)
    HandleTrackEnd,

    ToggleShuffle,
    SetRepeat(RepeatMode),

    /// none → all → one → none
    CycleRepeat,

    /// Clamped to 0.0 - 1.0; NaN is ignored
    SetVolume(f32),

    ToggleFullScreen,

    /// Progress report from the transport, in seconds
    UpdateTime { current_time: f64, duration: f64 },
}

impl PlayerCommand {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadCatalog(_) => "load_catalog",
            Self::PlayPause => "play_pause",
            Self::SetPlaying(_) => "set_playing",
            Self::PlaySong { .. } => "play_song",
            Self::ExpandAndPlay(_) => "expand_and_play",
            Self::ExpandRecommendations { .. } => "expand_recommendations",
            Self::CollapseExpanded => "collapse_expanded",
            Self::EnqueueSong(_) => "enqueue_song",
            Self::ReplaceQueue { .. } => "replace_queue",
            Self::PlayNext => "play_next",
            Self::PlayPrev => "play_prev",
            Self::HandleTrackEnd => "handle_track_end",
            Self::ToggleShuffle => "toggle_shuffle",
            Self::SetRepeat(_) => "set_repeat",
            Self::CycleRepeat => "cycle_repeat",
            Self::SetVolume(_) => "set_volume",
            Self::ToggleFullScreen => "toggle_full_screen",
            Self::UpdateTime { .. } => "update_time",
        }
    }
}
