//! Ordered playback queue
//!
//! A thin wrapper over `Vec<QueueItem>` that keeps song-id uniqueness checks
//! and item-id lookups in one place.

use crate::types::{QueueItem, QueueItemId};
use cascade_core::SongId;
use serde::{Deserialize, Serialize};

/// Ordered list of queue items
///
/// A song id appears at most once. The queue does not enforce this on its
/// own; every insertion path in the reducer checks `contains_song` first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Queue {
    items: Vec<QueueItem>,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Position of the item playing `song_id`
    pub fn position_of_song(&self, song_id: &SongId) -> Option<usize> {
        self.items.iter().position(|item| item.song_id() == song_id)
    }

    /// Position of the item with id `item_id`
    pub fn position_of_item(&self, item_id: &QueueItemId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == item_id)
    }

    pub fn contains_song(&self, song_id: &SongId) -> bool {
        self.position_of_song(song_id).is_some()
    }

    pub fn push(&mut self, item: QueueItem) {
        self.items.push(item);
    }

    /// Insert items at `index` (clamped to the end), keeping their order
    pub fn insert(&mut self, index: usize, items: Vec<QueueItem>) {
        let index = index.min(self.items.len());
        self.items.splice(index..index, items);
    }

    pub fn get(&self, index: usize) -> Option<&QueueItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QueueItem> {
        self.items.iter()
    }

    /// Item ids in queue order
    pub fn ids(&self) -> impl Iterator<Item = &QueueItemId> + '_ {
        self.items.iter().map(|item| &item.id)
    }

    /// Whether both queues hold the same items in the same order
    pub fn same_items(&self, other: &Queue) -> bool {
        self.ids().eq(other.ids())
    }

    pub fn as_slice(&self) -> &[QueueItem] {
        &self.items
    }

    pub(crate) fn into_items(self) -> Vec<QueueItem> {
        self.items
    }
}

impl From<Vec<QueueItem>> for Queue {
    fn from(items: Vec<QueueItem>) -> Self {
        Self { items }
    }
}

impl<'a> IntoIterator for &'a Queue {
    type Item = &'a QueueItem;
    type IntoIter = std::slice::Iter<'a, QueueItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
