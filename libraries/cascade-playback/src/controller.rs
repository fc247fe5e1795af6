//! Player controller
//!
//! Owns the one `PlayerState` of a session. Commands go in through
//! [`PlayerController::dispatch`]; events and the transport view come out.

use crate::command::PlayerCommand;
use crate::events::PlayerEvent;
use crate::reducer::reduce;
use crate::state::PlayerState;
use crate::types::{PlayerConfig, QueueItemId, RepeatMode};
use cascade_core::{Song, SongId};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// What the transport needs to know about the player
#[derive(Debug, Clone, PartialEq)]
pub struct TransportView {
    pub song: Option<Arc<Song>>,
    pub item_id: Option<QueueItemId>,
    pub is_playing: bool,

    /// Bumped every time the active item changes or restarts
    pub generation: u64,
}

/// Single owner of the player state
pub struct PlayerController {
    state: PlayerState,
    rng: StdRng,
    generation: u64,
    pending_events: Vec<PlayerEvent>,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self::new(PlayerConfig::default())
    }
}

impl PlayerController {
    /// Create a controller seeded from OS entropy
    pub fn new(config: PlayerConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a controller with a fixed seed (reproducible shuffles)
    pub fn with_seed(config: PlayerConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: PlayerConfig, rng: StdRng) -> Self {
        Self {
            state: PlayerState::new(&config),
            rng,
            generation: 0,
            pending_events: Vec::new(),
        }
    }

    /// Run a command and queue the events it produced
    pub fn dispatch(&mut self, command: PlayerCommand) {
        let is_track_end = matches!(command, PlayerCommand::HandleTrackEnd);
        tracing::trace!("dispatch {}", command.name());

        let next = reduce(self.state.clone(), command, &mut self.rng);
        self.emit_changes(&next, is_track_end);
        self.state = next;
    }

    fn emit_changes(&mut self, next: &PlayerState, is_track_end: bool) {
        let prev = &self.state;
        let mut events = Vec::new();

        let prev_item = prev.active_item().map(|item| &item.id);
        let next_item = next.active_item().map(|item| &item.id);

        if prev_item != next_item {
            self.generation += 1;
            events.push(PlayerEvent::TrackChanged {
                item_id: next_item.cloned(),
                song_id: next.active_item().map(|item| item.song_id().clone()),
                previous_item_id: prev_item.cloned(),
                generation: self.generation,
            });
        } else if is_track_end && next.is_playing() {
            if let Some(item_id) = next_item {
                self.generation += 1;
                events.push(PlayerEvent::TrackRestarted {
                    item_id: item_id.clone(),
                    generation: self.generation,
                });
            }
        }

        if !prev.queue().same_items(next.queue()) {
            events.push(PlayerEvent::QueueChanged {
                length: next.queue().len(),
            });
        }
        if prev.is_playing() != next.is_playing() {
            events.push(PlayerEvent::PlayingChanged {
                playing: next.is_playing(),
            });
        }
        if prev.is_shuffled() != next.is_shuffled() {
            events.push(PlayerEvent::ShuffleChanged {
                shuffled: next.is_shuffled(),
            });
        }
        if prev.repeat() != next.repeat() {
            events.push(PlayerEvent::RepeatChanged {
                mode: next.repeat(),
            });
        }
        if prev.expanded_song_id() != next.expanded_song_id() {
            events.push(PlayerEvent::ExpandedChanged {
                song_id: next.expanded_song_id().cloned(),
            });
        }
        if prev.volume() != next.volume() {
            events.push(PlayerEvent::VolumeChanged {
                volume: next.volume(),
            });
        }
        if prev.current_time() != next.current_time() || prev.duration() != next.duration() {
            events.push(PlayerEvent::Progress {
                current_time: next.current_time(),
                duration: next.duration(),
            });
        }

        self.pending_events.extend(events);
    }

    /// Read-only snapshot
    pub fn snapshot(&self) -> &PlayerState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Active song, playing flag and generation for the transport
    pub fn transport_view(&self) -> TransportView {
        TransportView {
            song: self.state.active_song().cloned(),
            item_id: self.state.active_item().map(|item| item.id.clone()),
            is_playing: self.state.is_playing(),
            generation: self.generation,
        }
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Convenience =====

    pub fn load_catalog(&mut self, songs: Vec<Arc<Song>>) {
        self.dispatch(PlayerCommand::LoadCatalog(songs));
    }

    pub fn play_pause(&mut self) {
        self.dispatch(PlayerCommand::PlayPause);
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.dispatch(PlayerCommand::SetPlaying(playing));
    }

    pub fn play_song(&mut self, song: Arc<Song>, origin_track_id: Option<SongId>) {
        self.dispatch(PlayerCommand::PlaySong {
            song,
            origin_track_id,
        });
    }

    pub fn expand_and_play(&mut self, song: Arc<Song>) {
        self.dispatch(PlayerCommand::ExpandAndPlay(song));
    }

    pub fn expand_recommendations(&mut self, song: Arc<Song>, recommendations: Vec<Arc<Song>>) {
        self.dispatch(PlayerCommand::ExpandRecommendations {
            song,
            recommendations,
        });
    }

    /// Expand `song` using its own recommendation edges against the loaded catalog
    ///
    /// Edges pointing outside the catalog are dropped.
    pub fn expand_from_catalog(&mut self, song: Arc<Song>) {
        let recommendations = song
            .recommendations
            .iter()
            .filter_map(|rec| self.state.find_song(&rec.song_id).cloned())
            .collect();
        self.expand_recommendations(song, recommendations);
    }

    pub fn collapse_expanded(&mut self) {
        self.dispatch(PlayerCommand::CollapseExpanded);
    }

    pub fn enqueue(&mut self, song: Arc<Song>) {
        self.dispatch(PlayerCommand::EnqueueSong(song));
    }

    pub fn replace_queue(&mut self, songs: Vec<Arc<Song>>, start: usize) {
        self.dispatch(PlayerCommand::ReplaceQueue { songs, start });
    }

    pub fn play_next(&mut self) {
        self.dispatch(PlayerCommand::PlayNext);
    }

    pub fn play_prev(&mut self) {
        self.dispatch(PlayerCommand::PlayPrev);
    }

    pub fn handle_track_end(&mut self) {
        self.dispatch(PlayerCommand::HandleTrackEnd);
    }

    pub fn toggle_shuffle(&mut self) {
        self.dispatch(PlayerCommand::ToggleShuffle);
    }

    pub fn set_repeat(&mut self, mode: RepeatMode) {
        self.dispatch(PlayerCommand::SetRepeat(mode));
    }

    pub fn cycle_repeat(&mut self) {
        self.dispatch(PlayerCommand::CycleRepeat);
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.dispatch(PlayerCommand::SetVolume(volume));
    }

    pub fn toggle_full_screen(&mut self) {
        self.dispatch(PlayerCommand::ToggleFullScreen);
    }

    pub fn update_time(&mut self, current_time: f64, duration: f64) {
        self.dispatch(PlayerCommand::UpdateTime {
            current_time,
            duration,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(id: &str) -> Arc<Song> {
        Arc::new(Song::new(id, id, vec!["Artist".to_string()]))
    }

    fn controller() -> PlayerController {
        PlayerController::with_seed(PlayerConfig::default(), 11)
    }

    #[test]
    fn track_change_bumps_generation() {
        let mut player = controller();
        player.play_song(song("a"), None);
        assert_eq!(player.generation(), 1);

        let events = player.drain_events();
        assert!(matches!(
            events[0],
            PlayerEvent::TrackChanged { generation: 1, previous_item_id: None, .. }
        ));
        assert!(events.contains(&PlayerEvent::QueueChanged { length: 1 }));
        assert!(events.contains(&PlayerEvent::PlayingChanged { playing: true }));
        assert!(!player.has_pending_events());
    }

    #[test]
    fn pause_keeps_generation() {
        let mut player = controller();
        player.play_song(song("a"), None);
        player.play_pause();

        assert_eq!(player.generation(), 1);
        assert!(!player.transport_view().is_playing);
    }

    #[test]
    fn repeat_one_end_restarts_with_new_generation() {
        let mut player = controller();
        player.play_song(song("a"), None);
        player.set_repeat(RepeatMode::One);
        player.drain_events();

        player.handle_track_end();

        assert_eq!(player.generation(), 2);
        let events = player.drain_events();
        assert!(matches!(events[0], PlayerEvent::TrackRestarted { generation: 2, .. }));
    }

    #[test]
    fn repeat_all_single_item_restarts() {
        let mut player = controller();
        player.play_song(song("a"), None);
        player.set_repeat(RepeatMode::All);
        player.handle_track_end();

        assert_eq!(player.snapshot().cursor(), Some(0));
        assert!(player.snapshot().is_playing());
        assert_eq!(player.generation(), 2);
    }

    #[test]
    fn track_end_that_stops_keeps_generation() {
        let mut player = controller();
        player.play_song(song("a"), None);
        player.handle_track_end();

        assert_eq!(player.generation(), 1);
        assert!(!player.snapshot().is_playing());
    }

    #[test]
    fn shuffle_does_not_change_active_track() {
        let mut player = controller();
        player.replace_queue(vec![song("a"), song("b"), song("c")], 1);
        let generation = player.generation();

        player.toggle_shuffle();
        assert_eq!(player.generation(), generation);
        assert_eq!(
            player.transport_view().song.unwrap().id.as_str(),
            "b"
        );
    }

    #[test]
    fn expand_from_catalog_resolves_edges() {
        let mut seed = Song::new("seed", "Seed", vec![]);
        seed.recommendations = vec![
            cascade_core::Recommendation::new("r1", 0.9, "close"),
            cascade_core::Recommendation::new("gone", 0.5, "missing"),
        ];
        let seed = Arc::new(seed);

        let mut player = controller();
        player.load_catalog(vec![Arc::clone(&seed), song("r1")]);
        player.play_song(Arc::clone(&seed), None);
        player.expand_from_catalog(seed);

        let songs: Vec<_> = player
            .snapshot()
            .queue()
            .iter()
            .map(|item| item.song_id().as_str())
            .collect();
        assert_eq!(songs, vec!["seed", "r1"]);
    }

    #[test]
    fn emptying_the_queue_reports_track_gone() {
        let mut player = controller();
        player.play_song(song("a"), None);
        player.replace_queue(Vec::new(), 0);

        let view = player.transport_view();
        assert!(view.song.is_none());
        assert!(!view.is_playing);
        assert_eq!(view.generation, 2);
    }
}
