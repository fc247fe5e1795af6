//! Song provider tags
//!
//! The provider names where a song came from and, by extension, which kind of
//! transport can play it: a direct audio stream or a third-party embed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Origin/transport kind of a song
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Provider {
    /// Imported from a CSV catalog
    Csv,

    /// Direct audio stream (plain URL)
    #[default]
    Direct,

    /// Spotify track, played through the Spotify embed player
    Spotify,

    /// Generic third-party embed
    Embed,

    /// Any other tag, kept verbatim
    Other(String),
}

impl Provider {
    /// Whether playback is delegated to an external embed
    ///
    /// Embedded tracks cannot be seeked, played or paused by the host page.
    pub fn is_embed(&self) -> bool {
        matches!(self, Self::Spotify | Self::Embed)
    }

    /// Tag as it appears on the wire
    pub fn as_str(&self) -> &str {
        match self {
            Self::Csv => "CSV",
            Self::Direct => "direct",
            Self::Spotify => "Spotify",
            Self::Embed => "embed",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for Provider {
    fn from(tag: String) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "csv" => Self::Csv,
            "" | "direct" => Self::Direct,
            "spotify" => Self::Spotify,
            "embed" => Self::Embed,
            _ => Self::Other(tag),
        }
    }
}

impl From<&str> for Provider {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_string())
    }
}

impl From<Provider> for String {
    fn from(provider: Provider) -> Self {
        provider.as_str().to_string()
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_tags_case_insensitively() {
        assert_eq!(Provider::from("CSV"), Provider::Csv);
        assert_eq!(Provider::from("spotify"), Provider::Spotify);
        assert_eq!(Provider::from(""), Provider::Direct);
        assert_eq!(
            Provider::from("soundcloud"),
            Provider::Other("soundcloud".to_string())
        );
    }

    #[test]
    fn only_embed_providers_are_embeds() {
        assert!(Provider::Spotify.is_embed());
        assert!(Provider::Embed.is_embed());
        assert!(!Provider::Csv.is_embed());
        assert!(!Provider::Other("x".into()).is_embed());
    }

    #[test]
    fn serde_uses_plain_string() {
        let json = serde_json::to_string(&Provider::Spotify).unwrap();
        assert_eq!(json, "\"Spotify\"");
        let back: Provider = serde_json::from_str("\"CSV\"").unwrap();
        assert_eq!(back, Provider::Csv);
    }
}
