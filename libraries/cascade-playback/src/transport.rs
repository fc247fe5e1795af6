//! Transport synchronisation
//!
//! Bridges the player state to an audio backend. The backend (an HTML audio
//! element in the browser, a recording fake in tests) only ever sees
//! [`TransportCommand`]s computed by [`TransportSync::reconcile`].
//!
//! Starting playback is asynchronous. Each start carries a [`PlayTicket`];
//! when the backend reports back, [`TransportSync::resolve_start`] drops
//! completions whose ticket is no longer the one in flight.

use crate::controller::TransportView;
use crate::error::PlaybackError;
use crate::types::QueueItemId;
use cascade_core::Song;

/// How the active song reaches the listener
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaBinding {
    /// Directly playable stream; the backend controls play/pause/seek
    Stream { url: String },

    /// Third-party embed; playback is controlled inside the embed
    Embed { url: String },
}

impl MediaBinding {
    /// Binding for a song, or `None` when it has no audio source
    pub fn for_song(song: &Song) -> Option<Self> {
        let url = song.audio_url.trim();
        if url.is_empty() {
            return None;
        }

        let url = url.to_string();
        if song.uses_embed() {
            Some(Self::Embed { url })
        } else {
            Some(Self::Stream { url })
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Stream { url } | Self::Embed { url } => url,
        }
    }

    pub fn is_embed(&self) -> bool {
        matches!(self, Self::Embed { .. })
    }
}

/// Identifies one play request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayTicket {
    pub generation: u64,
    pub serial: u64,
}

/// Instruction for the audio backend
#[derive(Debug, Clone, PartialEq)]
pub enum TransportCommand {
    Load(MediaBinding),
    Unload,
    Play(PlayTicket),
    Pause,
    Seek(f64),
}

impl TransportCommand {
    pub fn apply_to<B: TransportBackend + ?Sized>(&self, backend: &mut B) {
        match self {
            Self::Load(binding) => backend.load(binding),
            Self::Unload => backend.unload(),
            Self::Play(ticket) => backend.start(*ticket),
            Self::Pause => backend.pause(),
            Self::Seek(secs) => backend.seek(*secs),
        }
    }
}

/// Audio backend driven by [`TransportCommand`]s
///
/// `start` begins an asynchronous play attempt; the backend must eventually
/// hand the ticket and the result to [`TransportSync::resolve_start`].
pub trait TransportBackend {
    fn load(&mut self, binding: &MediaBinding);
    fn unload(&mut self);
    fn start(&mut self, ticket: PlayTicket);
    fn pause(&mut self);
    fn seek(&mut self, secs: f64);
}

/// What happened to a play request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Confirmed,
    Failed,

    /// The request was superseded (track changed or paused meanwhile)
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StartState {
    Idle,
    InFlight(PlayTicket),
    Confirmed,
    Failed,
}

/// Reconciles the player's transport view with the backend
#[derive(Debug)]
pub struct TransportSync {
    loaded_generation: Option<u64>,
    loaded_item: Option<QueueItemId>,
    binding: Option<MediaBinding>,
    start: StartState,
    next_serial: u64,
}

impl Default for TransportSync {
    fn default() -> Self {
        Self::new()
    }
}

impl TransportSync {
    pub fn new() -> Self {
        Self {
            loaded_generation: None,
            loaded_item: None,
            binding: None,
            start: StartState::Idle,
            next_serial: 0,
        }
    }

    /// Current binding, if anything is loaded
    pub fn binding(&self) -> Option<&MediaBinding> {
        self.binding.as_ref()
    }

    /// Whether a play request is waiting for the backend
    pub fn start_in_flight(&self) -> bool {
        matches!(self.start, StartState::InFlight(_))
    }

    /// Commands that bring the backend in line with `view`
    pub fn reconcile(&mut self, view: &TransportView) -> Vec<TransportCommand> {
        let mut commands = Vec::new();

        if self.loaded_generation != Some(view.generation) {
            let binding = view.song.as_deref().and_then(MediaBinding::for_song);
            let restart = view.item_id.is_some()
                && view.item_id == self.loaded_item
                && binding == self.binding
                && matches!(binding, Some(MediaBinding::Stream { .. }));

            if restart {
                commands.push(TransportCommand::Seek(0.0));
            } else {
                match &binding {
                    Some(binding) => commands.push(TransportCommand::Load(binding.clone())),
                    None => {
                        if self.binding.is_some() {
                            commands.push(TransportCommand::Unload);
                        }
                        if let Some(song) = &view.song {
                            tracing::warn!("Song '{}' has no audio source", song.id);
                        }
                    }
                }
            }

            self.loaded_generation = Some(view.generation);
            self.loaded_item.clone_from(&view.item_id);
            self.binding = binding;
            self.start = StartState::Idle;
        }

        // Embeds play and pause inside their own frame
        if !matches!(self.binding, Some(MediaBinding::Stream { .. })) {
            return commands;
        }

        if view.is_playing {
            if self.start == StartState::Idle {
                let ticket = PlayTicket {
                    generation: view.generation,
                    serial: self.next_serial,
                };
                self.next_serial += 1;
                self.start = StartState::InFlight(ticket);
                commands.push(TransportCommand::Play(ticket));
            }
        } else {
            if matches!(self.start, StartState::InFlight(_) | StartState::Confirmed) {
                commands.push(TransportCommand::Pause);
            }
            // A failed start is retried on the next play
            self.start = StartState::Idle;
        }

        commands
    }

    /// Seek command for the current binding; `None` for embeds or nothing loaded
    pub fn seek(&self, secs: f64) -> Option<TransportCommand> {
        match self.binding {
            Some(MediaBinding::Stream { .. }) => {
                let secs = if secs.is_finite() { secs.max(0.0) } else { 0.0 };
                Some(TransportCommand::Seek(secs))
            }
            _ => None,
        }
    }

    /// Record the backend's answer to a play request
    ///
    /// Failures are logged and never touch the player state: the player stays
    /// optimistically "playing" and the listener can toggle to retry.
    pub fn resolve_start(
        &mut self,
        ticket: PlayTicket,
        result: Result<(), PlaybackError>,
    ) -> StartOutcome {
        if self.start != StartState::InFlight(ticket) {
            tracing::debug!(
                "Ignoring stale play start (generation {}, serial {})",
                ticket.generation,
                ticket.serial
            );
            return StartOutcome::Stale;
        }

        match result {
            Ok(()) => {
                self.start = StartState::Confirmed;
                StartOutcome::Confirmed
            }
            Err(e) => {
                tracing::warn!("Playback failed to start: {}", e);
                self.start = StartState::Failed;
                StartOutcome::Failed
            }
        }
    }
}
