//! Shuffle for the playback queue

use crate::types::QueueItem;
use rand::seq::SliceRandom;
use rand::Rng;

/// Shuffle a queue, keeping the active item at the front
///
/// Returns `[current] + permutation(rest)` where `current` is the item at
/// `cursor`. With no active item the whole queue is permuted.
pub fn shuffle_around_current<R: Rng + ?Sized>(
    mut items: Vec<QueueItem>,
    cursor: Option<usize>,
    rng: &mut R,
) -> Vec<QueueItem> {
    let current = cursor
        .filter(|&c| c < items.len())
        .map(|c| items.remove(c));

    // Fisher-Yates over the remaining items
    items.shuffle(rng);

    match current {
        Some(item) => {
            items.insert(0, item);
            items
        }
        None => items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_core::Song;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn items(ids: &[&str], rng: &mut StdRng) -> Vec<QueueItem> {
        ids.iter()
            .map(|id| QueueItem::main_list(Arc::new(Song::new(*id, *id, vec![])), rng))
            .collect()
    }

    #[test]
    fn current_item_moves_to_front() {
        let mut rng = StdRng::seed_from_u64(42);
        let queue = items(&["a", "b", "c", "d", "e"], &mut rng);
        let current = queue[3].id.clone();

        let shuffled = shuffle_around_current(queue, Some(3), &mut rng);

        assert_eq!(shuffled[0].id, current);
        assert_eq!(shuffled.len(), 5);
    }

    #[test]
    fn shuffle_preserves_all_items() {
        let mut rng = StdRng::seed_from_u64(3);
        let queue = items(&["a", "b", "c", "d"], &mut rng);
        let before: HashSet<_> = queue.iter().map(|i| i.id.clone()).collect();

        let shuffled = shuffle_around_current(queue, Some(0), &mut rng);
        let after: HashSet<_> = shuffled.iter().map(|i| i.id.clone()).collect();

        assert_eq!(before, after);
    }

    #[test]
    fn out_of_range_cursor_permutes_everything() {
        let mut rng = StdRng::seed_from_u64(3);
        let queue = items(&["a", "b"], &mut rng);

        let shuffled = shuffle_around_current(queue, Some(9), &mut rng);
        assert_eq!(shuffled.len(), 2);
    }

    #[test]
    fn empty_queue_stays_empty() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(shuffle_around_current(Vec::new(), None, &mut rng).is_empty());
    }
}
