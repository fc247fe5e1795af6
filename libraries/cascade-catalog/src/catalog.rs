//! Ordered song catalog

use crate::csv;
use cascade_core::{CascadeError, Result, Song, SongId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// On-disk catalog formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum CatalogFormat {
    Csv,
    Json,
}

impl CatalogFormat {
    /// Infer the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("csv") => Some(Self::Csv),
            Some("json") => Some(Self::Json),
            _ => None,
        }
    }
}

/// Read-only, ordered list of songs
///
/// Catalog order is meaningful: it is the order the library shows and the
/// order used to continue playback after a recommendation branch.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    songs: Vec<Arc<Song>>,
    index: HashMap<SongId, usize>,
}

impl Catalog {
    /// Build a catalog, keeping the first song for each id
    pub fn new(songs: Vec<Song>) -> Self {
        let mut catalog = Self {
            songs: Vec::with_capacity(songs.len()),
            index: HashMap::with_capacity(songs.len()),
        };

        for song in songs {
            if catalog.index.contains_key(&song.id) {
                tracing::warn!("Duplicate song id '{}' in catalog, keeping first", song.id);
                continue;
            }
            catalog.index.insert(song.id.clone(), catalog.songs.len());
            catalog.songs.push(Arc::new(song));
        }

        catalog
    }

    /// Parse a CSV catalog from memory
    pub fn from_csv_str(data: &str) -> Self {
        Self::new(csv::parse_songs(data).songs)
    }

    /// Parse a JSON catalog (array of songs) from memory
    pub fn from_json_str(data: &str) -> Result<Self> {
        let songs: Vec<Song> = serde_json::from_str(data)?;
        Ok(Self::new(songs))
    }

    /// Load a catalog file, choosing the parser by `format` or by extension
    pub fn load(path: &Path, format: Option<CatalogFormat>) -> Result<Self> {
        let format = format
            .or_else(|| CatalogFormat::from_path(path))
            .ok_or_else(|| {
                CascadeError::catalog(format!(
                    "Cannot infer catalog format for {}",
                    path.display()
                ))
            })?;

        let data = std::fs::read_to_string(path)?;
        let catalog = match format {
            CatalogFormat::Csv => Self::from_csv_str(&data),
            CatalogFormat::Json => Self::from_json_str(&data)?,
        };

        tracing::info!(
            "Loaded {} songs from {} ({:?})",
            catalog.len(),
            path.display(),
            format
        );

        Ok(catalog)
    }

    /// All songs in catalog order
    pub fn songs(&self) -> &[Arc<Song>] {
        &self.songs
    }

    /// Look up a song by id
    pub fn get(&self, id: &SongId) -> Option<&Arc<Song>> {
        self.index.get(id).map(|&i| &self.songs[i])
    }

    /// Look up a song by id, failing with `SongNotFound`
    pub fn require(&self, id: &SongId) -> Result<&Arc<Song>> {
        self.get(id)
            .ok_or_else(|| CascadeError::SongNotFound(id.clone()))
    }

    /// Catalog position of a song
    pub fn position(&self, id: &SongId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// The song right after `id` in catalog order
    pub fn next_after(&self, id: &SongId) -> Option<&Arc<Song>> {
        self.position(id).and_then(|i| self.songs.get(i + 1))
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(id: &str) -> Song {
        Song::new(id, format!("Title {}", id), vec!["Artist".to_string()])
    }

    #[test]
    fn duplicate_ids_keep_first() {
        let mut dup = song("a");
        dup.title = "Other".to_string();
        let catalog = Catalog::new(vec![song("a"), song("b"), dup]);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(&SongId::new("a")).unwrap().title, "Title a");
    }

    #[test]
    fn next_after_follows_catalog_order() {
        let catalog = Catalog::new(vec![song("a"), song("b"), song("c")]);

        assert_eq!(catalog.next_after(&"a".into()).unwrap().id.as_str(), "b");
        assert!(catalog.next_after(&"c".into()).is_none());
        assert!(catalog.next_after(&"zzz".into()).is_none());
    }

    #[test]
    fn require_reports_missing_song() {
        let catalog = Catalog::new(vec![song("a")]);
        let err = catalog.require(&"nope".into()).unwrap_err();
        assert!(matches!(err, CascadeError::SongNotFound(id) if id.as_str() == "nope"));
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(
            CatalogFormat::from_path(Path::new("songs.CSV")),
            Some(CatalogFormat::Csv)
        );
        assert_eq!(
            CatalogFormat::from_path(Path::new("a/b/catalog.json")),
            Some(CatalogFormat::Json)
        );
        assert_eq!(CatalogFormat::from_path(Path::new("songs.txt")), None);
    }

    #[test]
    fn json_catalog_round_trips_recommendations() {
        let json = r#"[
            {"id":"a","title":"A","artists":["X"],"album":"Al","durationMs":1,
             "coverUrl":"","audioUrl":"","recommendations":[{"songId":"b","score":0.5,"reasonShort":"r"}]},
            {"id":"b","title":"B","artists":["Y"],"album":"Al","durationMs":1,
             "coverUrl":"","audioUrl":""}
        ]"#;
        let catalog = Catalog::from_json_str(json).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.songs()[0].recommendations[0].song_id,
            SongId::new("b")
        );
    }
}
