//! Library browsing over the catalog

use crate::catalog::Catalog;
use cascade_core::{Song, SongId};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Artist with the number of catalog songs crediting them
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistCount {
    pub name: String,
    pub song_count: usize,
}

impl Catalog {
    /// The first `limit` songs in catalog order
    pub fn trending(&self, limit: usize) -> &[Arc<Song>] {
        &self.songs()[..limit.min(self.len())]
    }

    /// Artists ranked by song count, ties broken by first appearance
    pub fn popular_artists(&self, limit: usize) -> Vec<ArtistCount> {
        let mut ranked: Vec<ArtistCount> = Vec::new();
        let mut slots: HashMap<&str, usize> = HashMap::new();

        for artist in self.songs().iter().flat_map(|s| s.artists.iter()) {
            match slots.get(artist.as_str()) {
                Some(&slot) => ranked[slot].song_count += 1,
                None => {
                    slots.insert(artist, ranked.len());
                    ranked.push(ArtistCount {
                        name: artist.clone(),
                        song_count: 1,
                    });
                }
            }
        }

        // Stable sort keeps first-appearance order among equal counts
        ranked.sort_by(|a, b| b.song_count.cmp(&a.song_count));
        ranked.truncate(limit);
        ranked
    }

    /// Case-insensitive substring search over title, artists and album
    pub fn search(&self, query: &str) -> Vec<Arc<Song>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.songs().to_vec();
        }

        self.songs()
            .iter()
            .filter(|song| {
                song.title.to_lowercase().contains(&needle)
                    || song.album.to_lowercase().contains(&needle)
                    || song
                        .artists
                        .iter()
                        .any(|a| a.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect()
    }

    /// Resolve a song's recommendation edges to catalog songs
    ///
    /// Unknown ids, self-references and repeats are dropped silently. The
    /// result is ordered by descending score; equal scores keep edge order.
    pub fn resolve_recommendations(&self, song: &Song, top_k: usize) -> Vec<Arc<Song>> {
        let mut seen: HashSet<&SongId> = HashSet::new();
        let mut edges: Vec<(f64, &Arc<Song>)> = song
            .recommendations
            .iter()
            .filter(|rec| rec.song_id != song.id && seen.insert(&rec.song_id))
            .filter_map(|rec| self.get(&rec.song_id).map(|s| (rec.score, s)))
            .collect();

        edges.sort_by(|a, b| b.0.total_cmp(&a.0));

        edges
            .into_iter()
            .take(top_k)
            .map(|(_, s)| Arc::clone(s))
            .collect()
    }
}
