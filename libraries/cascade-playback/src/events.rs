//! Player events
//!
//! Event-based communication for UI and transport synchronization. The
//! controller emits these by diffing the state before and after each command.

use crate::types::{QueueItemId, RepeatMode};
use cascade_core::SongId;
use serde::{Deserialize, Serialize};

/// Events emitted by the player controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlayerEvent {
    /// Playing flag flipped
    PlayingChanged { playing: bool },

    /// The active queue item changed
    ///
    /// `item_id` is `None` when the queue became empty.
    #[serde(rename_all = "camelCase")]
    TrackChanged {
        item_id: Option<QueueItemId>,
        song_id: Option<SongId>,
        previous_item_id: Option<QueueItemId>,
        generation: u64,
    },

    /// The same item starts over (repeat-one, or repeat-all on one item)
    #[serde(rename_all = "camelCase")]
    TrackRestarted { item_id: QueueItemId, generation: u64 },

    /// Items were added, removed or reordered
    QueueChanged { length: usize },

    ShuffleChanged { shuffled: bool },

    RepeatChanged { mode: RepeatMode },

    /// Expanded marker set or cleared
    #[serde(rename_all = "camelCase")]
    ExpandedChanged { song_id: Option<SongId> },

    VolumeChanged { volume: f32 },

    /// Position or duration moved
    #[serde(rename_all = "camelCase")]
    Progress { current_time: f64, duration: f64 },
}

impl PlayerEvent {
    /// Whether the transport has to look at the new state
    pub fn affects_transport(&self) -> bool {
        matches!(
            self,
            Self::PlayingChanged { .. } | Self::TrackChanged { .. } | Self::TrackRestarted { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_for_javascript() {
        let event = PlayerEvent::TrackChanged {
            item_id: Some(QueueItemId::new("queue-a-1")),
            song_id: Some(SongId::new("a")),
            previous_item_id: None,
            generation: 3,
        };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "trackChanged");
        assert_eq!(json["itemId"], "queue-a-1");
        assert_eq!(json["generation"], 3);
    }

    #[test]
    fn progress_does_not_affect_transport() {
        let progress = PlayerEvent::Progress {
            current_time: 1.0,
            duration: 2.0,
        };
        assert!(!progress.affects_transport());
        assert!(PlayerEvent::PlayingChanged { playing: true }.affects_transport());
    }
}
