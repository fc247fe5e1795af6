//! Queue state machine transitions
//!
//! `reduce` is the only place a `PlayerState` changes. It performs no I/O;
//! randomness (shuffle order, item ids) comes from the caller's `Rng` so runs
//! are reproducible under a seeded generator.

use crate::command::PlayerCommand;
use crate::queue::Queue;
use crate::shuffle::shuffle_around_current;
use crate::state::PlayerState;
use crate::types::{ItemSource, QueueItem, RepeatMode};
use cascade_core::{Song, SongId};
use rand::Rng;
use std::collections::HashSet;
use std::sync::Arc;

/// Apply one command and return the next state
pub fn reduce<R: Rng + ?Sized>(
    mut state: PlayerState,
    command: PlayerCommand,
    rng: &mut R,
) -> PlayerState {
    let previous_item = state.active_item().map(|item| item.id.clone());

    match command {
        PlayerCommand::LoadCatalog(songs) => load_catalog(&mut state, songs),
        PlayerCommand::PlayPause => {
            if !state.queue.is_empty() {
                state.is_playing = !state.is_playing;
            }
        }
        PlayerCommand::SetPlaying(playing) => state.is_playing = playing && !state.queue.is_empty(),
        PlayerCommand::PlaySong {
            song,
            origin_track_id,
        } => play_song(&mut state, song, origin_track_id, rng),
        PlayerCommand::ExpandAndPlay(song) => expand_and_play(&mut state, song, rng),
        PlayerCommand::ExpandRecommendations {
            song,
            recommendations,
        } => expand_recommendations(&mut state, song, recommendations, rng),
        PlayerCommand::CollapseExpanded => state.expanded_song_id = None,
        PlayerCommand::EnqueueSong(song) => enqueue_song(&mut state, song, rng),
        PlayerCommand::ReplaceQueue { songs, start } => {
            replace_queue(&mut state, songs, start, rng);
        }
        PlayerCommand::PlayNext => step(&mut state, Direction::Forward),
        PlayerCommand::PlayPrev => step(&mut state, Direction::Backward),
        PlayerCommand::HandleTrackEnd => handle_track_end(&mut state, rng),
        PlayerCommand::ToggleShuffle => toggle_shuffle(&mut state, rng),
        PlayerCommand::SetRepeat(mode) => state.repeat = mode,
        PlayerCommand::CycleRepeat => state.repeat = state.repeat.cycle(),
        PlayerCommand::SetVolume(volume) => {
            if !volume.is_nan() {
                state.volume = volume.clamp(0.0, 1.0);
            }
        }
        PlayerCommand::ToggleFullScreen => state.is_full_screen = !state.is_full_screen,
        PlayerCommand::UpdateTime {
            current_time,
            duration,
        } => update_time(&mut state, current_time, duration),
    }

    // A different item starts from zero, with the catalog length until the
    // transport reports the real one
    if state.active_item().map(|item| &item.id) != previous_item.as_ref() {
        state.current_time = 0.0;
        state.duration = state
            .active_song()
            .map_or(0.0, |song| song.duration_ms as f64 / 1000.0);
    }

    debug_assert!(
        state
            .cursor
            .map_or(state.queue.is_empty(), |c| c < state.queue.len()),
        "cursor out of bounds"
    );

    state
}

fn load_catalog(state: &mut PlayerState, songs: Vec<Arc<Song>>) {
    if !state.songs.is_empty() {
        tracing::debug!("Catalog already loaded, ignoring {} songs", songs.len());
        return;
    }
    state.songs = songs;
}

fn play_song<R: Rng + ?Sized>(
    state: &mut PlayerState,
    song: Arc<Song>,
    origin_track_id: Option<SongId>,
    rng: &mut R,
) {
    state.is_playing = true;

    if let Some(position) = state.queue.position_of_song(&song.id) {
        state.cursor = Some(position);
        return;
    }

    let item = match origin_track_id {
        Some(origin) => QueueItem::recommendation(song, origin, rng),
        None => QueueItem::user(song, rng),
    };
    append(state, item);
    state.cursor = Some(state.queue.len() - 1);
}

fn expand_and_play<R: Rng + ?Sized>(state: &mut PlayerState, song: Arc<Song>, rng: &mut R) {
    state.is_playing = true;
    state.expanded_song_id = Some(song.id.clone());

    if let Some(position) = state.queue.position_of_song(&song.id) {
        state.cursor = Some(position);
        return;
    }

    let at = insert_after_cursor(state, vec![QueueItem::main_list(song, rng)]);
    state.cursor = Some(at);
}

fn expand_recommendations<R: Rng + ?Sized>(
    state: &mut PlayerState,
    song: Arc<Song>,
    recommendations: Vec<Arc<Song>>,
    rng: &mut R,
) {
    if state.expanded_song_id.as_ref() == Some(&song.id) {
        return;
    }

    let mut seen = HashSet::new();
    let fresh: Vec<Arc<Song>> = recommendations
        .into_iter()
        .filter(|rec| {
            rec.id != song.id && !state.queue.contains_song(&rec.id) && seen.insert(rec.id.clone())
        })
        .collect();

    if fresh.is_empty() {
        state.expanded_song_id = Some(song.id.clone());

        if state.queue.contains_song(&song.id) {
            state.is_playing = !state.queue.is_empty();
        } else {
            let song = state.find_song(&song.id).cloned().unwrap_or(song);
            append(state, QueueItem::main_list(song, rng));
            state.cursor = Some(state.queue.len() - 1);
            state.is_playing = true;
        }
        return;
    }

    tracing::debug!(
        "Expanding {} recommendations after '{}'",
        fresh.len(),
        song.id
    );

    let items = fresh
        .into_iter()
        .map(|rec| QueueItem::recommendation(rec, song.id.clone(), rng))
        .collect();
    let at = insert_after_cursor(state, items);

    state.cursor = Some(at);
    state.is_playing = true;
    state.expanded_song_id = Some(song.id.clone());
}

fn enqueue_song<R: Rng + ?Sized>(state: &mut PlayerState, song: Arc<Song>, rng: &mut R) {
    if state.queue.contains_song(&song.id) {
        return;
    }

    append(state, QueueItem::user(song, rng));
    if state.cursor.is_none() {
        state.cursor = Some(0);
    }
}

fn replace_queue<R: Rng + ?Sized>(
    state: &mut PlayerState,
    songs: Vec<Arc<Song>>,
    start: usize,
    rng: &mut R,
) {
    let mut seen = HashSet::new();
    let items: Vec<QueueItem> = songs
        .into_iter()
        .filter(|song| seen.insert(song.id.clone()))
        .map(|song| QueueItem::main_list(song, rng))
        .collect();

    state.queue = Queue::from(items);
    state.original_queue = Queue::new();
    state.is_shuffled = false;
    state.cursor = state
        .queue
        .len()
        .checked_sub(1)
        .map(|last| start.min(last));
    state.is_playing = state.is_playing && !state.queue.is_empty();
    state.current_time = 0.0;
}

enum Direction {
    Forward,
    Backward,
}

fn step(state: &mut PlayerState, direction: Direction) {
    let len = state.queue.len();
    if len == 0 {
        return;
    }

    let next = match direction {
        Direction::Forward => state.cursor.map_or(0, |c| (c + 1) % len),
        Direction::Backward => state.cursor.map_or(len - 1, |c| (c + len - 1) % len),
    };

    state.cursor = Some(next);
    state.is_playing = true;
}

fn handle_track_end<R: Rng + ?Sized>(state: &mut PlayerState, rng: &mut R) {
    let Some(cursor) = state.cursor else {
        return;
    };

    append_continuation(state, rng);

    if state.repeat == RepeatMode::One {
        state.current_time = 0.0;
        state.is_playing = true;
        return;
    }

    if cursor + 1 < state.queue.len() {
        state.cursor = Some(cursor + 1);
        state.is_playing = true;
    } else if state.repeat == RepeatMode::All {
        state.cursor = Some(0);
        state.is_playing = true;
    } else {
        state.is_playing = false;
    }
}

/// After a recommendation finishes, queue the song that follows its origin in
/// catalog order, unless that song is already anywhere in the queue
fn append_continuation<R: Rng + ?Sized>(state: &mut PlayerState, rng: &mut R) {
    let Some(origin) = state
        .active_item()
        .filter(|item| item.source == ItemSource::Recommendation)
        .and_then(|item| item.origin_track_id.clone())
    else {
        return;
    };

    let Some(successor) = state
        .songs
        .iter()
        .position(|song| song.id == origin)
        .and_then(|position| state.songs.get(position + 1))
        .cloned()
    else {
        return;
    };

    if state.queue.contains_song(&successor.id) {
        return;
    }

    tracing::debug!(
        "Continuing after '{}' with catalog successor '{}'",
        origin,
        successor.id
    );
    append(state, QueueItem::main_list(successor, rng));
}

fn toggle_shuffle<R: Rng + ?Sized>(state: &mut PlayerState, rng: &mut R) {
    if state.is_shuffled {
        let active = state.active_item().map(|item| item.id.clone());

        state.is_shuffled = false;
        state.queue = std::mem::take(&mut state.original_queue);
        state.cursor = if state.queue.is_empty() {
            None
        } else {
            Some(
                active
                    .and_then(|id| state.queue.position_of_item(&id))
                    .unwrap_or(0),
            )
        };
        return;
    }

    state.is_shuffled = true;
    state.original_queue = state.queue.clone();

    if state.queue.is_empty() {
        return;
    }

    let items = std::mem::take(&mut state.queue).into_items();
    state.queue = Queue::from(shuffle_around_current(items, state.cursor, rng));
    state.cursor = Some(0);
}

fn update_time(state: &mut PlayerState, current_time: f64, duration: f64) {
    if duration.is_finite() {
        state.duration = duration.max(0.0);
    }
    if state.is_playing && current_time.is_finite() {
        state.current_time = current_time.max(0.0);
    }
}

/// Append an item, mirroring it into the pre-shuffle snapshot while shuffled
fn append(state: &mut PlayerState, item: QueueItem) {
    if state.is_shuffled {
        state.original_queue.push(item.clone());
    }
    state.queue.push(item);
}

/// Insert items right after the cursor (at 0 when there is none)
///
/// While shuffled the items also go into the snapshot, right after the
/// active item's snapshot position (or at its end). Returns the queue index
/// of the first inserted item.
fn insert_after_cursor(state: &mut PlayerState, items: Vec<QueueItem>) -> usize {
    let at = state.cursor.map_or(0, |c| c + 1);

    if state.is_shuffled {
        let snapshot_at = state
            .active_item()
            .and_then(|item| state.original_queue.position_of_item(&item.id))
            .map_or(state.original_queue.len(), |position| position + 1);
        state.original_queue.insert(snapshot_at, items.clone());
    }

    state.queue.insert(at, items);
    at
}
