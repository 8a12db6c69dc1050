//! WASM-compatible PlaybackSession wrapper

use super::types::{context_state, media_error, JsClock, SnapshotTap};
use crate::{
    GraphError, MediaStatus, PlaybackError, PlaybackSession, PlaybackState, SeekBar, SessionConfig,
    Ticket, VisualizationFeed,
};
use drift_core::Catalog;
use js_sys::Function;
use wasm_bindgen::prelude::*;

/// WASM-compatible shuffle session
///
/// Wraps `PlaybackSession` with a JavaScript-friendly API. After every call
/// queued commands go to `onCommand`, events to `onEvent` and, if it
/// changed, the state snapshot to `onStateChange`.
#[wasm_bindgen]
pub struct WasmShuffleSession {
    inner: PlaybackSession,
    feed: VisualizationFeed,
    last_state: Option<PlaybackState>,

    // Callbacks
    on_command: Option<Function>,
    on_event: Option<Function>,
    on_state_change: Option<Function>,
    on_error: Option<Function>,
}

#[wasm_bindgen]
impl WasmShuffleSession {
    /// Create a session; `config` is an optional partial `SessionConfig`
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmShuffleSession, JsValue> {
        console_error_panic_hook::set_once();

        let config: SessionConfig = if config.is_undefined() || config.is_null() {
            SessionConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };

        Ok(Self {
            feed: VisualizationFeed::new(config.frequency_bin_count()),
            inner: PlaybackSession::new(config, JsClock::new()),
            last_state: None,
            on_command: None,
            on_event: None,
            on_state_change: None,
            on_error: None,
        })
    }

    // ===== Catalog & Activation =====

    /// Install the catalog from the listing's track names
    #[wasm_bindgen(js_name = loadCatalog)]
    pub fn load_catalog(&mut self, names: Vec<String>) -> Result<(), JsValue> {
        let result = self.inner.load_catalog(Catalog::from_names(names));
        self.flush();
        result.map(|_| ()).map_err(|e| self.handle_error(e))
    }

    /// The catalog request failed
    #[wasm_bindgen(js_name = catalogFailed)]
    pub fn catalog_failed(&mut self, message: String) {
        self.inner.catalog_failed(message);
        self.flush();
    }

    /// Start gesture
    pub fn activate(&mut self) -> Result<(), JsValue> {
        let result = self.inner.activate();
        self.flush();
        result.map_err(|e| self.handle_error(e))
    }

    // ===== Playback Control =====

    /// Start or resume playback
    pub fn play(&mut self) -> Result<(), JsValue> {
        let result = self.inner.play();
        self.flush();
        result.map_err(|e| self.handle_error(e))
    }

    /// Pause playback
    pub fn pause(&mut self) {
        self.inner.pause();
        self.flush();
    }

    /// Play/pause toggle
    pub fn toggle(&mut self) -> Result<(), JsValue> {
        let result = self.inner.toggle();
        self.flush();
        result.map_err(|e| self.handle_error(e))
    }

    /// Skip to another random track
    #[wasm_bindgen(js_name = skipNext)]
    pub fn skip_next(&mut self) -> Option<String> {
        let track = self.inner.skip_next();
        self.flush();
        track.map(|t| t.to_string())
    }

    /// Toggle mute; returns the new state
    #[wasm_bindgen(js_name = toggleMute)]
    pub fn toggle_mute(&mut self) -> bool {
        let muted = self.inner.toggle_mute();
        self.flush();
        muted
    }

    /// Retry the current track
    #[wasm_bindgen(js_name = retryCurrentTrack)]
    pub fn retry_current_track(&mut self) -> Result<(), JsValue> {
        let result = self.inner.retry_current_track();
        self.flush();
        result.map_err(|e| self.handle_error(e))
    }

    /// Rebuild the audio system
    #[wasm_bindgen(js_name = resetAudioSystem)]
    pub fn reset_audio_system(&mut self) {
        self.inner.reset_audio_system();
        self.flush();
    }

    // ===== Seeking =====

    /// Seek to a position in seconds
    pub fn seek(&mut self, position_secs: f64) -> bool {
        let applied = self.inner.seek(position_secs);
        self.flush();
        applied
    }

    /// Pointer pressed on the progress bar
    #[wasm_bindgen(js_name = gestureStart)]
    pub fn gesture_start(&mut self, x: f64, bar_left: f64, bar_width: f64) -> bool {
        let handled = self.inner.gesture_start(x, SeekBar::new(bar_left, bar_width));
        self.flush();
        handled
    }

    /// Pointer moved while pressed
    #[wasm_bindgen(js_name = gestureMove)]
    pub fn gesture_move(&mut self, x: f64, bar_left: f64, bar_width: f64) -> bool {
        let handled = self.inner.gesture_move(x, SeekBar::new(bar_left, bar_width));
        self.flush();
        handled
    }

    /// Pointer released
    #[wasm_bindgen(js_name = gestureEnd)]
    pub fn gesture_end(&mut self, x: f64, bar_left: f64, bar_width: f64) -> bool {
        let handled = self.inner.gesture_end(x, SeekBar::new(bar_left, bar_width));
        self.flush();
        handled
    }

    // ===== Platform Reports =====

    /// `ResumeContext` finished; pass an error message on failure
    #[wasm_bindgen(js_name = contextResumed)]
    pub fn context_resumed(&mut self, ticket: f64, error: Option<String>) {
        let Some(ticket) = js_ticket(ticket) else { return };
        let result = error.map_or(Ok(()), |e| Err(GraphError::ContextResume(e)));
        self.inner.on_context_resumed(ticket, result);
        self.flush();
    }

    /// `Play` settled; on rejection pass the `DOMException` name and message
    #[wasm_bindgen(js_name = playSettled)]
    pub fn play_settled(&mut self, ticket: f64, error_name: Option<String>, message: Option<String>) {
        let Some(ticket) = js_ticket(ticket) else { return };
        let result = match error_name {
            None => Ok(()),
            Some(name) => Err(media_error(&name, message.unwrap_or_default())),
        };
        self.inner.on_play_settled(ticket, result);
        self.flush();
    }

    /// `RebuildAudioGraph` finished; pass an error message on failure
    #[wasm_bindgen(js_name = graphRebuilt)]
    pub fn graph_rebuilt(&mut self, ticket: f64, error: Option<String>) {
        let Some(ticket) = js_ticket(ticket) else { return };
        let result = error.map_or(Ok(()), |e| Err(GraphError::ContextCreate(e)));
        self.inner.on_graph_rebuilt(ticket, result);
        self.flush();
    }

    /// The `<audio>` element fired `ended` for the given load
    #[wasm_bindgen(js_name = mediaEnded)]
    pub fn media_ended(&mut self, ticket: f64) -> Result<(), JsValue> {
        let Some(ticket) = js_ticket(ticket) else { return Ok(()) };
        let result = self.inner.on_track_ended(ticket);
        self.flush();
        result.map_err(|e| self.handle_error(e))
    }

    /// Periodic reconciliation; call at least every `nextDeadlineMs`
    pub fn tick(&mut self, position_secs: f64, duration_secs: Option<f64>, paused: bool, context: &str) {
        let status = status(position_secs, duration_secs, paused, context);
        self.inner.tick(status);
        self.flush();
    }

    /// Milliseconds from session start until `tick` has work to do
    #[wasm_bindgen(js_name = nextDeadlineMs)]
    pub fn next_deadline_ms(&self) -> Option<f64> {
        self.inner
            .next_deadline()
            .map(|d| d.as_secs_f64() * 1000.0)
    }

    /// `visibilitychange` to hidden
    #[wasm_bindgen(js_name = pageHidden)]
    pub fn page_hidden(&mut self) {
        self.inner.page_hidden();
        self.flush();
    }

    /// `visibilitychange` to visible
    #[wasm_bindgen(js_name = pageShown)]
    pub fn page_shown(&mut self, position_secs: f64, duration_secs: Option<f64>, paused: bool, context: &str) {
        let status = status(position_secs, duration_secs, paused, context);
        self.inner.page_shown(status);
        self.flush();
    }

    // ===== Visualization =====

    /// Frame for the renderer, from the analyser's latest magnitudes
    ///
    /// Returns `undefined` while not playing.
    pub fn frame(&mut self, magnitudes: &[u8]) -> Option<Vec<u8>> {
        let transport = self.inner.state().transport;
        self.feed
            .frame(transport, Some(&SnapshotTap(magnitudes)))
            .map(<[u8]>::to_vec)
    }

    // ===== State Queries =====

    /// Current state snapshot
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(self.inner.state())?)
    }

    /// Whether a retry is scheduled
    #[wasm_bindgen(js_name = isErroring)]
    pub fn is_erroring(&self) -> bool {
        self.inner.is_erroring()
    }

    // ===== Event Listeners =====

    /// Register media command callback
    #[wasm_bindgen(js_name = onCommand)]
    pub fn on_command(&mut self, callback: Function) {
        self.on_command = Some(callback);
    }

    /// Register session event callback
    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&mut self, callback: Function) {
        self.on_event = Some(callback);
    }

    /// Register state change callback
    #[wasm_bindgen(js_name = onStateChange)]
    pub fn on_state_change(&mut self, callback: Function) {
        self.on_state_change = Some(callback);
    }

    /// Register error callback
    #[wasm_bindgen(js_name = onError)]
    pub fn on_error(&mut self, callback: Function) {
        self.on_error = Some(callback);
    }

    // ===== Internal Emitters =====

    fn flush(&mut self) {
        for command in self.inner.drain_commands() {
            if let Some(ref cb) = self.on_command {
                if let Ok(js) = serde_wasm_bindgen::to_value(&command) {
                    cb.call1(&JsValue::NULL, &js).ok();
                }
            }
        }

        for event in self.inner.drain_events() {
            if let Some(ref cb) = self.on_event {
                if let Ok(js) = serde_wasm_bindgen::to_value(&event) {
                    cb.call1(&JsValue::NULL, &js).ok();
                }
            }
        }

        let state = self.inner.state();
        if self.last_state.as_ref() != Some(state) {
            self.last_state = Some(state.clone());
            if let Some(ref cb) = self.on_state_change {
                if let Ok(js) = serde_wasm_bindgen::to_value(state) {
                    cb.call1(&JsValue::NULL, &js).ok();
                }
            }
        }
    }

    fn handle_error(&self, error: PlaybackError) -> JsValue {
        let err_msg = error.to_string();

        if let Some(ref cb) = self.on_error {
            cb.call1(&JsValue::NULL, &JsValue::from_str(&err_msg)).ok();
        }

        JsValue::from_str(&err_msg)
    }
}

fn js_ticket(value: f64) -> Option<Ticket> {
    let ticket = Ticket::from_f64(value);
    if ticket.is_none() {
        tracing::debug!(value, "Ignoring completion with malformed ticket");
    }
    ticket
}

fn status(position_secs: f64, duration_secs: Option<f64>, paused: bool, context: &str) -> MediaStatus {
    MediaStatus {
        position_secs,
        duration_secs,
        paused,
        context: context_state(context),
    }
}
