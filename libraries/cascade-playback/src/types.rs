//! Core types for the playback queue

use crate::error::PlaybackError;
use cascade_core::{Song, SongId};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Queue item identifier
///
/// Distinct from the song id: the same song queued twice over a session
/// (after a `ReplaceQueue`, say) gets two different item ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueueItemId(String);

impl QueueItemId {
    /// Generate an id of the form `queue-{song_id}-{random hex}`
    pub fn generate<R: Rng + ?Sized>(song_id: &SongId, rng: &mut R) -> Self {
        let suffix = uuid::Builder::from_random_bytes(rng.gen()).into_uuid();
        Self(format!("queue-{}-{}", song_id, suffix.simple()))
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueueItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why an item is in the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemSource {
    /// Picked directly by the listener
    User,

    /// Inserted by expanding another song's recommendations
    Recommendation,

    /// Taken from the catalog list (browsing, continuation)
    MainList,
}

/// One slot in the playback queue
///
/// Never mutated after creation. Recommendation items always carry the id of
/// the song they were expanded from; other items never do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    pub id: QueueItemId,
    pub song: Arc<Song>,
    pub source: ItemSource,
    pub added_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_track_id: Option<SongId>,
}

impl QueueItem {
    fn new<R: Rng + ?Sized>(
        song: Arc<Song>,
        source: ItemSource,
        origin_track_id: Option<SongId>,
        rng: &mut R,
    ) -> Self {
        Self {
            id: QueueItemId::generate(&song.id, rng),
            song,
            source,
            added_at: Utc::now(),
            origin_track_id,
        }
    }

    /// Item picked directly by the listener
    pub fn user<R: Rng + ?Sized>(song: Arc<Song>, rng: &mut R) -> Self {
        Self::new(song, ItemSource::User, None, rng)
    }

    /// Item taken from the catalog list
    pub fn main_list<R: Rng + ?Sized>(song: Arc<Song>, rng: &mut R) -> Self {
        Self::new(song, ItemSource::MainList, None, rng)
    }

    /// Item expanded from `origin`'s recommendations
    ///
    /// An empty origin cannot anchor a continuation, so it degrades to a
    /// user item.
    pub fn recommendation<R: Rng + ?Sized>(song: Arc<Song>, origin: SongId, rng: &mut R) -> Self {
        if origin.is_empty() {
            return Self::user(song, rng);
        }
        Self::new(song, ItemSource::Recommendation, Some(origin), rng)
    }

    /// Id of the song this item plays
    pub fn song_id(&self) -> &SongId {
        &self.song.id
    }
}

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop after the last item
    #[default]
    None,

    /// Restart the current item when it ends
    One,

    /// Wrap to the first item after the last
    All,
}

impl RepeatMode {
    /// Next mode in the repeat button cycle: none → all → one → none
    pub fn cycle(self) -> Self {
        match self {
            Self::None => Self::All,
            Self::All => Self::One,
            Self::One => Self::None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::One => "one",
            Self::All => "all",
        }
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepeatMode {
    type Err = PlaybackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(Self::None),
            "one" => Ok(Self::One),
            "all" => Ok(Self::All),
            _ => Err(PlaybackError::InvalidRepeatMode(s.to_string())),
        }
    }
}

/// Initial player settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Starting volume (0.0 - 1.0)
    pub volume: f32,

    /// Starting repeat mode
    pub repeat: RepeatMode,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            volume: 0.8,
            repeat: RepeatMode::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn song(id: &str) -> Arc<Song> {
        Arc::new(Song::new(id, id, vec!["Artist".to_string()]))
    }

    #[test]
    fn item_ids_are_unique_per_insertion() {
        let mut rng = StdRng::seed_from_u64(7);
        let a = QueueItem::user(song("s1"), &mut rng);
        let b = QueueItem::user(song("s1"), &mut rng);

        assert_ne!(a.id, b.id);
        assert!(a.id.as_str().starts_with("queue-s1-"));
    }

    #[test]
    fn empty_origin_degrades_to_user_item() {
        let mut rng = StdRng::seed_from_u64(7);
        let item = QueueItem::recommendation(song("s1"), SongId::new(""), &mut rng);

        assert_eq!(item.source, ItemSource::User);
        assert!(item.origin_track_id.is_none());
    }

    #[test]
    fn repeat_cycle_visits_every_mode() {
        let mut mode = RepeatMode::None;
        mode = mode.cycle();
        assert_eq!(mode, RepeatMode::All);
        mode = mode.cycle();
        assert_eq!(mode, RepeatMode::One);
        assert_eq!(mode.cycle(), RepeatMode::None);
    }

    #[test]
    fn repeat_mode_parses_case_insensitively() {
        assert_eq!("ALL".parse::<RepeatMode>().unwrap(), RepeatMode::All);
        assert_eq!("off".parse::<RepeatMode>().unwrap(), RepeatMode::None);
        assert!(matches!(
            "twice".parse::<RepeatMode>(),
            Err(PlaybackError::InvalidRepeatMode(_))
        ));
    }

    #[test]
    fn item_source_wire_names() {
        let json = serde_json::to_string(&ItemSource::MainList).unwrap();
        assert_eq!(json, "\"mainList\"");
    }
}
