//! WASM-compatible player wrapper

use super::types::{describe_js_error, song_from_js, songs_from_js, to_js};
use crate::transport::{MediaBinding, PlayTicket, StartOutcome, TransportBackend, TransportSync};
use crate::{PlaybackError, PlayerConfig, PlayerController, PlayerEvent, RepeatMode};
use cascade_core::{Song, SongId};
use js_sys::{Function, Promise};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Arc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Event, HtmlAudioElement};

type Listener = Closure<dyn FnMut(Event)>;

#[derive(Clone, Default)]
struct Callbacks {
    on_state_change: Option<Function>,
    on_track_change: Option<Function>,
    on_queue_change: Option<Function>,
    on_error: Option<Function>,
}

struct Inner {
    controller: PlayerController,
    sync: TransportSync,
    audio: HtmlAudioElement,
    embed_url: Option<String>,
    callbacks: Callbacks,
}

/// `TransportBackend` over an `<audio>` element
///
/// Play requests are collected rather than awaited here; the caller spawns
/// them once the state borrow is released.
struct AudioBackend<'a> {
    audio: &'a HtmlAudioElement,
    embed_url: &'a mut Option<String>,
    starts: Vec<(PlayTicket, Result<Promise, JsValue>)>,
}

impl AudioBackend<'_> {
    fn clear_source(&mut self) {
        self.audio.remove_attribute("src").ok();
        self.audio.load();
    }
}

impl TransportBackend for AudioBackend<'_> {
    fn load(&mut self, binding: &MediaBinding) {
        match binding {
            MediaBinding::Stream { url } => {
                *self.embed_url = None;
                self.audio.set_src(url);
            }
            MediaBinding::Embed { url } => {
                self.clear_source();
                *self.embed_url = Some(url.clone());
            }
        }
    }

    fn unload(&mut self) {
        self.clear_source();
        *self.embed_url = None;
    }

    fn start(&mut self, ticket: PlayTicket) {
        self.starts.push((ticket, self.audio.play()));
    }

    fn pause(&mut self) {
        self.audio.pause().ok();
    }

    fn seek(&mut self, secs: f64) {
        self.audio.set_current_time(secs);
    }
}

impl Inner {
    fn sync_transport(&mut self) -> Vec<(PlayTicket, Result<Promise, JsValue>)> {
        let view = self.controller.transport_view();
        let commands = self.sync.reconcile(&view);

        let mut backend = AudioBackend {
            audio: &self.audio,
            embed_url: &mut self.embed_url,
            starts: Vec::new(),
        };
        for command in &commands {
            command.apply_to(&mut backend);
        }
        backend.starts
    }
}

/// Run `f` against the controller, then sync the audio element and notify JS
///
/// Callbacks run after the borrow is released so they may call back into the
/// player.
fn drive(inner: &Rc<RefCell<Inner>>, f: impl FnOnce(&mut PlayerController)) {
    let (events, starts, callbacks, active_song) = {
        let mut guard = inner.borrow_mut();
        f(&mut guard.controller);

        let events = guard.controller.drain_events();
        for event in &events {
            if let PlayerEvent::VolumeChanged { volume } = event {
                guard.audio.set_volume(f64::from(*volume));
            }
        }

        let starts = guard.sync_transport();
        let active_song = guard.controller.snapshot().active_song().cloned();
        (events, starts, guard.callbacks.clone(), active_song)
    };

    for (ticket, promise) in starts {
        spawn_start(Rc::downgrade(inner), ticket, promise);
    }

    notify(&callbacks, &events, active_song.as_deref());
}

fn notify(callbacks: &Callbacks, events: &[PlayerEvent], active_song: Option<&Song>) {
    for event in events {
        match event {
            PlayerEvent::PlayingChanged { playing } => {
                if let Some(cb) = &callbacks.on_state_change {
                    let state = if *playing { "playing" } else { "paused" };
                    cb.call1(&JsValue::NULL, &JsValue::from_str(state)).ok();
                }
            }
            PlayerEvent::TrackChanged { .. } | PlayerEvent::TrackRestarted { .. } => {
                if let Some(cb) = &callbacks.on_track_change {
                    let song = active_song.map_or(JsValue::NULL, to_js);
                    cb.call1(&JsValue::NULL, &song).ok();
                }
            }
            PlayerEvent::QueueChanged { length } => {
                if let Some(cb) = &callbacks.on_queue_change {
                    cb.call1(&JsValue::NULL, &JsValue::from_f64(*length as f64))
                        .ok();
                }
            }
            _ => {}
        }
    }
}

fn spawn_start(inner: Weak<RefCell<Inner>>, ticket: PlayTicket, promise: Result<Promise, JsValue>) {
    spawn_local(async move {
        let result = match promise {
            Ok(promise) => JsFuture::from(promise).await.map(|_| ()),
            Err(e) => Err(e),
        }
        .map_err(|e| PlaybackError::Transport(describe_js_error(&e)));
        let message = result.as_ref().err().map(ToString::to_string);

        // Player dropped while the promise was pending
        let Some(inner) = inner.upgrade() else {
            return;
        };

        let (outcome, on_error) = {
            let mut guard = inner.borrow_mut();
            (
                guard.sync.resolve_start(ticket, result),
                guard.callbacks.on_error.clone(),
            )
        };

        if outcome == StartOutcome::Failed {
            if let (Some(cb), Some(message)) = (on_error, message) {
                cb.call1(&JsValue::NULL, &JsValue::from_str(&message)).ok();
            }
        }
    });
}

/// Browser player
///
/// Wraps the player controller with a JavaScript-friendly API and keeps an
/// `<audio>` element in step with it.
#[wasm_bindgen]
pub struct WasmPlayer {
    inner: Rc<RefCell<Inner>>,
    listeners: Vec<(&'static str, Listener)>,
}

#[wasm_bindgen]
impl WasmPlayer {
    /// Create a player with its own audio element
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WasmPlayer, JsValue> {
        console_error_panic_hook::set_once();

        let config = PlayerConfig::default();
        let audio = HtmlAudioElement::new()?;
        audio.set_volume(f64::from(config.volume));

        let inner = Rc::new(RefCell::new(Inner {
            controller: PlayerController::new(config),
            sync: TransportSync::new(),
            audio,
            embed_url: None,
            callbacks: Callbacks::default(),
        }));

        let mut player = Self {
            inner,
            listeners: Vec::new(),
        };
        player.listen("timeupdate", Self::report_time)?;
        player.listen("loadedmetadata", Self::report_time)?;
        player.listen("ended", |inner| drive(inner, |c| c.handle_track_end()))?;

        Ok(player)
    }

    // ===== Catalog =====

    /// Seed the catalog (array of songs); ignored once loaded
    #[wasm_bindgen(js_name = loadCatalog)]
    pub fn load_catalog(&self, songs: JsValue) -> Result<(), JsValue> {
        let songs = songs_from_js(songs)?;
        self.run(|c| c.load_catalog(songs));
        Ok(())
    }

    // ===== Playback Control =====

    #[wasm_bindgen(js_name = playPause)]
    pub fn play_pause(&self) {
        self.run(|c| c.play_pause());
    }

    #[wasm_bindgen(js_name = setPlaying)]
    pub fn set_playing(&self, playing: bool) {
        self.run(|c| c.set_playing(playing));
    }

    /// Play a song object, appending it if needed
    #[wasm_bindgen(js_name = playSong)]
    pub fn play_song(&self, song: JsValue, origin_track_id: Option<String>) -> Result<(), JsValue> {
        let song = song_from_js(song)?;
        self.run(|c| c.play_song(song, origin_track_id.map(SongId::from)));
        Ok(())
    }

    /// Play a catalog song by id
    #[wasm_bindgen(js_name = playSongById)]
    pub fn play_song_by_id(&self, id: &str, origin_track_id: Option<String>) -> Result<(), JsValue> {
        let song = self.catalog_song(id)?;
        self.run(|c| c.play_song(song, origin_track_id.map(SongId::from)));
        Ok(())
    }

    #[wasm_bindgen(js_name = expandAndPlay)]
    pub fn expand_and_play(&self, id: &str) -> Result<(), JsValue> {
        let song = self.catalog_song(id)?;
        self.run(|c| c.expand_and_play(song));
        Ok(())
    }

    /// Insert a catalog song's recommendations after the current item
    #[wasm_bindgen(js_name = expandRecommendations)]
    pub fn expand_recommendations(&self, id: &str) -> Result<(), JsValue> {
        let song = self.catalog_song(id)?;
        self.run(|c| c.expand_from_catalog(song));
        Ok(())
    }

    #[wasm_bindgen(js_name = collapseExpanded)]
    pub fn collapse_expanded(&self) {
        self.run(|c| c.collapse_expanded());
    }

    pub fn enqueue(&self, id: &str) -> Result<(), JsValue> {
        let song = self.catalog_song(id)?;
        self.run(|c| c.enqueue(song));
        Ok(())
    }

    /// Replace the queue with an array of songs
    #[wasm_bindgen(js_name = replaceQueue)]
    pub fn replace_queue(&self, songs: JsValue, start: usize) -> Result<(), JsValue> {
        let songs = songs_from_js(songs)?;
        self.run(|c| c.replace_queue(songs, start));
        Ok(())
    }

    #[wasm_bindgen(js_name = playNext)]
    pub fn play_next(&self) {
        self.run(|c| c.play_next());
    }

    #[wasm_bindgen(js_name = playPrev)]
    pub fn play_prev(&self) {
        self.run(|c| c.play_prev());
    }

    /// Seek within the current stream; ignored for embeds
    pub fn seek(&self, secs: f64) {
        let inner = self.inner.borrow();
        if let Some(command) = inner.sync.seek(secs) {
            let mut embed_url = inner.embed_url.clone();
            let mut backend = AudioBackend {
                audio: &inner.audio,
                embed_url: &mut embed_url,
                starts: Vec::new(),
            };
            command.apply_to(&mut backend);
        }
    }

    // ===== Shuffle, Repeat, Volume =====

    #[wasm_bindgen(js_name = toggleShuffle)]
    pub fn toggle_shuffle(&self) {
        self.run(|c| c.toggle_shuffle());
    }

    /// Set repeat mode ("none" | "all" | "one")
    #[wasm_bindgen(js_name = setRepeat)]
    pub fn set_repeat(&self, mode: &str) -> Result<(), JsValue> {
        let mode: RepeatMode = mode.parse().map_err(|e: PlaybackError| self.handle_error(e))?;
        self.run(|c| c.set_repeat(mode));
        Ok(())
    }

    #[wasm_bindgen(js_name = cycleRepeat)]
    pub fn cycle_repeat(&self) {
        self.run(|c| c.cycle_repeat());
    }

    #[wasm_bindgen(js_name = getRepeat)]
    pub fn get_repeat(&self) -> String {
        self.inner.borrow().controller.snapshot().repeat().to_string()
    }

    /// Set volume (0.0 - 1.0)
    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&self, volume: f32) {
        self.run(|c| c.set_volume(volume));
    }

    #[wasm_bindgen(js_name = toggleFullScreen)]
    pub fn toggle_full_screen(&self) {
        self.run(|c| c.toggle_full_screen());
    }

    // ===== State Queries =====

    /// Full state snapshot as a plain object
    pub fn state(&self) -> JsValue {
        to_js(self.inner.borrow().controller.snapshot())
    }

    pub fn queue(&self) -> JsValue {
        to_js(self.inner.borrow().controller.snapshot().queue())
    }

    #[wasm_bindgen(js_name = activeSong)]
    pub fn active_song(&self) -> JsValue {
        let inner = self.inner.borrow();
        inner
            .controller
            .snapshot()
            .active_song()
            .map_or(JsValue::NULL, |song| to_js(&**song))
    }

    /// Active index, or -1 when the queue is empty
    pub fn cursor(&self) -> i32 {
        self.inner.borrow().controller.snapshot().cursor_index() as i32
    }

    #[wasm_bindgen(js_name = isPlaying)]
    pub fn is_playing(&self) -> bool {
        self.inner.borrow().controller.snapshot().is_playing()
    }

    pub fn generation(&self) -> f64 {
        self.inner.borrow().controller.generation() as f64
    }

    /// Embed url when the active song plays through a third-party frame
    #[wasm_bindgen(js_name = embedUrl)]
    pub fn embed_url(&self) -> Option<String> {
        self.inner.borrow().embed_url.clone()
    }

    // ===== Event Listeners =====

    /// Register state change callback ("playing" | "paused")
    #[wasm_bindgen(js_name = onStateChange)]
    pub fn on_state_change(&self, callback: Function) {
        self.inner.borrow_mut().callbacks.on_state_change = Some(callback);
    }

    /// Register track change callback (song object or null)
    #[wasm_bindgen(js_name = onTrackChange)]
    pub fn on_track_change(&self, callback: Function) {
        self.inner.borrow_mut().callbacks.on_track_change = Some(callback);
    }

    /// Register queue change callback (new length)
    #[wasm_bindgen(js_name = onQueueChange)]
    pub fn on_queue_change(&self, callback: Function) {
        self.inner.borrow_mut().callbacks.on_queue_change = Some(callback);
    }

    /// Register error callback (message)
    #[wasm_bindgen(js_name = onError)]
    pub fn on_error(&self, callback: Function) {
        self.inner.borrow_mut().callbacks.on_error = Some(callback);
    }
}

impl WasmPlayer {
    fn run(&self, f: impl FnOnce(&mut PlayerController)) {
        drive(&self.inner, f);
    }

    fn catalog_song(&self, id: &str) -> Result<Arc<Song>, JsValue> {
        let id = SongId::new(id);
        let song = self
            .inner
            .borrow()
            .controller
            .snapshot()
            .find_song(&id)
            .cloned();
        song.ok_or_else(|| self.handle_error(PlaybackError::UnknownSong(id)))
    }

    fn report_time(inner: &Rc<RefCell<Inner>>) {
        let (current_time, duration) = {
            let guard = inner.borrow();
            (guard.audio.current_time(), guard.audio.duration())
        };
        drive(inner, |c| c.update_time(current_time, duration));
    }

    fn listen(
        &mut self,
        event: &'static str,
        handler: fn(&Rc<RefCell<Inner>>),
    ) -> Result<(), JsValue> {
        let inner = Rc::clone(&self.inner);
        let listener = Listener::new(move |_event: Event| handler(&inner));

        self.inner
            .borrow()
            .audio
            .add_event_listener_with_callback(event, listener.as_ref().unchecked_ref())?;
        self.listeners.push((event, listener));
        Ok(())
    }

    fn handle_error(&self, error: PlaybackError) -> JsValue {
        let message = error.to_string();
        let on_error = self.inner.borrow().callbacks.on_error.clone();
        if let Some(cb) = on_error {
            cb.call1(&JsValue::NULL, &JsValue::from_str(&message)).ok();
        }
        JsValue::from_str(&message)
    }
}

impl Drop for WasmPlayer {
    fn drop(&mut self) {
        let inner = self.inner.borrow();
        inner.audio.pause().ok();
        for (event, listener) in &self.listeners {
            inner
                .audio
                .remove_event_listener_with_callback(event, listener.as_ref().unchecked_ref())
                .ok();
        }
    }
}
