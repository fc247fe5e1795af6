//! Song catalog entities
//!
//! Songs are immutable once loaded. The catalog owns them and every other
//! component holds shared, read-only references.

use super::ids::SongId;
use super::provider::Provider;
use serde::{Deserialize, Serialize};

/// Placeholder length used when a catalog row carries no duration
pub const DEFAULT_DURATION_MS: u64 = 180_000;

const SPOTIFY_EMBED_MARKER: &str = "open.spotify.com/embed";

/// Catalog song
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: SongId,
    pub title: String,
    pub artists: Vec<String>,
    pub album: String,
    pub duration_ms: u64,
    pub cover_url: String,
    pub audio_url: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub explicit: bool,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub provider: Provider,

    /// Outgoing recommendation edges, in catalog order
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

/// Directed "you may also like" edge from one song to another
///
/// Not symmetric: A recommending B says nothing about B recommending A.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub song_id: SongId,
    pub score: f64,
    pub reason_short: String,
}

impl Song {
    /// Create a song with placeholder metadata
    pub fn new(id: impl Into<SongId>, title: impl Into<String>, artists: Vec<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artists,
            album: "Unknown Album".to_string(),
            duration_ms: DEFAULT_DURATION_MS,
            cover_url: String::new(),
            audio_url: String::new(),
            tags: Vec::new(),
            explicit: false,
            release_date: String::new(),
            provider: Provider::default(),
            recommendations: Vec::new(),
        }
    }

    /// Whether the song plays through a third-party embed instead of a stream
    pub fn uses_embed(&self) -> bool {
        self.provider.is_embed() || self.audio_url.contains(SPOTIFY_EMBED_MARKER)
    }

    /// Whether the song has anything the transport could bind to
    pub fn is_playable(&self) -> bool {
        !self.audio_url.trim().is_empty()
    }
}

impl Recommendation {
    pub fn new(song_id: impl Into<SongId>, score: f64, reason: impl Into<String>) -> Self {
        Self {
            song_id: song_id.into(),
            score,
            reason_short: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_song_uses_placeholders() {
        let song = Song::new("s1", "Title", vec!["A".into(), "B".into()]);
        assert_eq!(song.album, "Unknown Album");
        assert_eq!(song.duration_ms, DEFAULT_DURATION_MS);
        assert!(!song.is_playable());
    }

    #[test]
    fn blank_audio_url_is_not_playable() {
        let mut song = Song::new("s1", "Title", vec![]);
        song.audio_url = "   ".to_string();
        assert!(!song.is_playable());
    }

    #[test]
    fn spotify_embed_url_marks_embed() {
        let mut song = Song::new("s1", "Title", vec![]);
        song.audio_url = "https://open.spotify.com/embed/track/123".to_string();
        assert!(song.uses_embed());
    }

    #[test]
    fn wire_format_is_camel_case() {
        let mut song = Song::new("s1", "Title", vec!["A".into()]);
        song.recommendations
            .push(Recommendation::new("s2", 0.9, "same mood"));

        let json = serde_json::to_value(&song).unwrap();
        assert_eq!(json["durationMs"], 180_000);
        assert_eq!(json["recommendations"][0]["songId"], "s2");
        assert_eq!(json["recommendations"][0]["reasonShort"], "same mood");
    }

    #[test]
    fn missing_optional_fields_deserialize_to_defaults() {
        let json = r#"{
            "id": "x",
            "title": "T",
            "artists": ["A"],
            "album": "Al",
            "durationMs": 1000,
            "coverUrl": "",
            "audioUrl": "https://cdn.example/x.mp3"
        }"#;
        let song: Song = serde_json::from_str(json).unwrap();
        assert!(song.recommendations.is_empty());
        assert_eq!(song.provider, Provider::Direct);
        assert!(song.is_playable());
    }
}
