//! Playback session - the shuffle player's state machine
//!
//! Owns track selection, transport, bounded retries, visibility handling and
//! the progress/watchdog timers. It performs no I/O: every effect is queued
//! as a `MediaCommand`, every UI-relevant change as a `SessionEvent`, and the
//! host reports asynchronous outcomes back with the request's `Ticket`.

use crate::{
    clock::Clock,
    error::{GraphError, MediaError, PlaybackError, Result},
    events::{MediaCommand, SessionEvent},
    progress::{ProgressController, SeekBar},
    shuffle::{self, RandomPicker, TrackPicker},
    types::{ContextState, ErrorKind, MediaStatus, PlaybackState, SessionConfig, Ticket, Transport},
};
use drift_core::{Catalog, TrackId};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Why a play request was issued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayOrigin {
    /// Start gesture, play/toggle, manual retry, graph reset
    User,
    /// Scheduled retry after a failure
    Retry,
    /// Track change while playing
    AutoContinue,
    /// Page became visible again; failures pause quietly
    Visibility,
}

/// The play request the session is waiting on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Resume { ticket: Ticket, origin: PlayOrigin },
    Play { ticket: Ticket, origin: PlayOrigin },
}

/// A graph rebuild in flight
///
/// Play requests made meanwhile are folded into `resume_after` and issued
/// once the new graph reports back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rebuild {
    ticket: Ticket,
    resume_after: bool,
}

/// Shuffle playback session
pub struct PlaybackSession {
    config: SessionConfig,
    clock: Box<dyn Clock>,
    picker: Box<dyn TrackPicker>,

    catalog: Catalog,
    catalog_loaded: bool,
    // Why the last catalog fetch failed
    catalog_error: Option<String>,

    state: PlaybackState,

    // Start gesture seen; play is refused until then
    activated: bool,
    // Activation arrived before the catalog
    autostart: bool,

    context: ContextState,
    visible: bool,

    progress: ProgressController,
    next_watchdog: Option<Duration>,
    retry_at: Option<Duration>,

    // Tracks abandoned since the last successful start
    failed_tracks: HashSet<TrackId>,

    last_ticket: u64,
    current_load: Option<Ticket>,
    pending: Option<Pending>,
    rebuild: Option<Rebuild>,

    pending_commands: Vec<MediaCommand>,
    pending_events: Vec<SessionEvent>,
}

impl PlaybackSession {
    /// Create a session reading time from `clock`
    ///
    /// Shuffles are seeded from `config.seed` when set, OS entropy otherwise.
    pub fn new<C: Clock + 'static>(config: SessionConfig, clock: C) -> Self {
        let picker: Box<dyn TrackPicker> = match config.seed {
            Some(seed) => Box::new(RandomPicker::seeded(seed)),
            None => Box::new(RandomPicker::from_entropy()),
        };

        Self {
            progress: ProgressController::new(config.poll_interval()),
            config,
            clock: Box::new(clock),
            picker,
            catalog: Catalog::empty(),
            catalog_loaded: false,
            catalog_error: None,
            state: PlaybackState::default(),
            activated: false,
            autostart: false,
            context: ContextState::Uninitialized,
            visible: true,
            next_watchdog: None,
            retry_at: None,
            failed_tracks: HashSet::new(),
            last_ticket: 0,
            current_load: None,
            pending: None,
            rebuild: None,
            pending_commands: Vec::new(),
            pending_events: Vec::new(),
        }
    }

    /// Replace the track picker
    pub fn with_picker<P: TrackPicker + 'static>(mut self, picker: P) -> Self {
        self.set_picker(picker);
        self
    }

    /// Swap the track picker in place
    pub fn set_picker<P: TrackPicker + 'static>(&mut self, picker: P) {
        self.picker = Box::new(picker);
    }

    // ===== Catalog & Activation =====

    /// Install the catalog and pre-select a track
    ///
    /// If the start gesture already happened, playback begins immediately.
    pub fn load_catalog(&mut self, catalog: Catalog) -> Result<TrackId> {
        info!(tracks = catalog.len(), "Catalog loaded");
        self.catalog = catalog;
        self.catalog_loaded = true;
        self.catalog_error = None;
        self.failed_tracks.clear();

        if self.catalog.is_empty() {
            self.autostart = false;
            self.surface_error(ErrorKind::CatalogEmpty, "No tracks available");
            return Err(PlaybackError::CatalogEmpty);
        }

        if matches!(
            self.state.last_error,
            Some(ErrorKind::CatalogEmpty | ErrorKind::CatalogUnavailable)
        ) {
            self.state.last_error = None;
        }

        let track = self.select_track(None).ok_or(PlaybackError::CatalogEmpty)?;

        if std::mem::take(&mut self.autostart) {
            self.play()?;
        }
        Ok(track)
    }

    /// Record that the catalog could not be read
    pub fn catalog_failed(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(error = %message, "Catalog unavailable");
        self.autostart = false;
        self.catalog_error = Some(message.clone());
        self.surface_error(ErrorKind::CatalogUnavailable, message);
    }

    /// One-time start gesture
    ///
    /// Unlocks audio. Starts playback now, or as soon as the catalog
    /// arrives if it is still loading.
    pub fn activate(&mut self) -> Result<()> {
        self.activated = true;

        if self.state.current_track.is_some() {
            return self.play();
        }
        if let Some(message) = &self.catalog_error {
            return Err(PlaybackError::CatalogUnavailable(message.clone()));
        }
        if !self.catalog_loaded {
            debug!("Activated before catalog arrived, deferring start");
            self.autostart = true;
            return Ok(());
        }
        Err(PlaybackError::CatalogEmpty)
    }

    // ===== Track Selection =====

    /// Pick a track uniformly (with replacement) and load it
    ///
    /// `pool` defaults to the full catalog. An empty pool changes nothing.
    /// A session that was playing or loading keeps going on the new track.
    pub fn select_track(&mut self, pool: Option<&[TrackId]>) -> Option<TrackId> {
        let track = {
            let pool = pool.unwrap_or(self.catalog.as_slice());
            shuffle::pick_from(self.picker.as_mut(), pool)?.clone()
        };
        self.switch_to(track.clone());
        Some(track)
    }

    fn switch_to(&mut self, track: TrackId) {
        let resume = matches!(self.state.transport, Transport::Playing | Transport::Loading);

        self.stop_timers();
        self.progress.cancel_gesture();
        self.retry_at = None;
        self.pending = None;

        self.state.retry_count = 0;
        self.state.position_secs = 0.0;
        self.state.duration_secs = None;

        let previous = self.state.current_track.replace(track.clone());
        debug!(track = %track, previous = ?previous, "Track selected");

        self.issue_load(&track);
        self.emit(SessionEvent::TrackChanged { track, previous });
        self.emit_position();

        if resume {
            self.begin_play(PlayOrigin::AutoContinue);
        }
    }

    /// Skip to a new random track
    pub fn skip_next(&mut self) -> Option<TrackId> {
        self.progress.stop_polling();
        self.state.position_secs = 0.0;
        self.select_track(None)
    }

    /// End of the loaded media
    ///
    /// Ignored unless `ticket` identifies the current load.
    pub fn on_track_ended(&mut self, ticket: Ticket) -> Result<()> {
        if self.current_load != Some(ticket) {
            debug!(ticket = %ticket, "Ignoring end of superseded load");
            return Ok(());
        }
        self.skip_next();
        self.play()
    }

    // ===== Playback Control =====

    /// Start or resume playback
    pub fn play(&mut self) -> Result<()> {
        if self.state.current_track.is_none() {
            return Err(PlaybackError::NoTrackSelected);
        }
        if !self.activated {
            return Err(PlaybackError::ActivationRequired);
        }

        match (self.state.transport, self.pending) {
            (Transport::Playing, None) => return Ok(()),
            (Transport::Loading, Some(Pending::Resume { .. } | Pending::Play { .. })) => {
                return Ok(())
            }
            _ => {}
        }

        self.begin_play(PlayOrigin::User);
        Ok(())
    }

    fn begin_play(&mut self, origin: PlayOrigin) {
        self.retry_at = None;
        if let Some(rebuild) = self.rebuild.as_mut() {
            debug!(ticket = %rebuild.ticket, "Audio graph rebuilding, deferring play");
            rebuild.resume_after = true;
            self.set_transport(Transport::Loading);
            return;
        }
        let ticket = self.next_ticket();
        self.set_transport(Transport::Loading);

        if self.context == ContextState::Running {
            self.pending = Some(Pending::Play { ticket, origin });
            self.command(MediaCommand::Play { ticket });
        } else {
            debug!(ticket = %ticket, context = ?self.context, "Audio context not running, resuming first");
            self.pending = Some(Pending::Resume { ticket, origin });
            self.command(MediaCommand::ResumeContext { ticket });
        }
    }

    /// Pause playback
    ///
    /// No-op when already paused or idle.
    pub fn pause(&mut self) {
        if !matches!(self.state.transport, Transport::Playing | Transport::Loading) {
            return;
        }
        self.pending = None;
        if let Some(rebuild) = self.rebuild.as_mut() {
            rebuild.resume_after = false;
        }
        self.retry_at = None;
        self.stop_timers();
        self.command(MediaCommand::Pause);
        self.set_transport(Transport::Paused);
    }

    /// Play/pause toggle
    pub fn toggle(&mut self) -> Result<()> {
        match self.state.transport {
            Transport::Playing | Transport::Loading => {
                self.pause();
                Ok(())
            }
            Transport::Idle | Transport::Paused => self.play(),
        }
    }

    /// Toggle output mute; returns the new mute state
    pub fn toggle_mute(&mut self) -> bool {
        let muted = !self.state.muted;
        self.state.muted = muted;
        self.command(MediaCommand::SetMuted { muted });
        self.emit(SessionEvent::MutedChanged { muted });
        muted
    }

    // ===== Async Completions =====

    /// Outcome of a `ResumeContext` request
    pub fn on_context_resumed(&mut self, ticket: Ticket, result: std::result::Result<(), GraphError>) {
        let origin = match self.pending {
            Some(Pending::Resume { ticket: t, origin }) if t == ticket => origin,
            _ => {
                debug!(ticket = %ticket, "Ignoring stale context resume");
                return;
            }
        };
        self.pending = None;

        match result {
            Ok(()) => {
                self.context = ContextState::Running;
                self.pending = Some(Pending::Play { ticket, origin });
                self.command(MediaCommand::Play { ticket });
            }
            Err(e) if origin == PlayOrigin::Visibility => {
                warn!(error = %e, "Audio context did not resume after page became visible");
                self.stop_timers();
                self.set_transport(Transport::Paused);
            }
            Err(e) => {
                warn!(error = %e, "Audio context initialization failed");
                self.stop_timers();
                self.surface_error(ErrorKind::ContextInitFailed, e.to_string());
                self.set_transport(Transport::Paused);
            }
        }
    }

    /// Outcome of a `Play` request
    pub fn on_play_settled(&mut self, ticket: Ticket, result: std::result::Result<(), MediaError>) {
        let origin = match self.pending {
            Some(Pending::Play { ticket: t, origin }) if t == ticket => origin,
            _ => {
                if result.is_ok() && matches!(self.state.transport, Transport::Paused | Transport::Idle) {
                    debug!(ticket = %ticket, "Stale play succeeded after pause, pausing output");
                    self.command(MediaCommand::Pause);
                } else {
                    debug!(ticket = %ticket, "Ignoring stale play completion");
                }
                return;
            }
        };
        self.pending = None;

        match result {
            Ok(()) => {
                self.state.last_error = None;
                self.state.retry_count = 0;
                self.failed_tracks.clear();
                self.set_transport(Transport::Playing);
                self.start_timers();
            }
            Err(e) if origin == PlayOrigin::Visibility => {
                warn!(error = %e, "Playback did not resume after page became visible");
                self.stop_timers();
                self.set_transport(Transport::Paused);
            }
            Err(e) => self.handle_play_failure(&e),
        }
    }

    fn handle_play_failure(&mut self, error: &MediaError) {
        let Some(track) = self.state.current_track.clone() else {
            self.set_transport(Transport::Paused);
            return;
        };
        self.stop_timers();
        self.state.retry_count = self.state.retry_count.saturating_add(1);
        let attempt = self.state.retry_count;

        if attempt < self.config.max_retries {
            warn!(track = %track, attempt, error = %error, "Playback failed, retrying");
            self.state.position_secs = 0.0;
            self.issue_load(&track);
            self.retry_at = Some(self.clock.now() + self.config.retry_delay());
            self.set_transport(Transport::Loading);
            self.emit(SessionEvent::RetryScheduled {
                track,
                attempt,
                delay_ms: self.config.retry_delay_ms,
            });
            return;
        }

        warn!(track = %track, attempts = attempt, error = %error, "Abandoning track");
        self.failed_tracks.insert(track.clone());
        self.emit(SessionEvent::TrackAbandoned { track });

        let candidates: Vec<TrackId> = self
            .catalog
            .iter()
            .filter(|t| !self.failed_tracks.contains(*t))
            .cloned()
            .collect();

        if candidates.is_empty() {
            self.retry_at = None;
            self.set_transport(Transport::Paused);
            self.surface_error(ErrorKind::PlaybackFailed, error.to_string());
            return;
        }

        // Transport is still Loading, so the replacement starts on its own.
        self.set_transport(Transport::Loading);
        self.select_track(Some(&candidates));
    }

    /// Outcome of a `RebuildAudioGraph` request
    pub fn on_graph_rebuilt(&mut self, ticket: Ticket, result: std::result::Result<(), GraphError>) {
        let resume_after = match self.rebuild {
            Some(Rebuild { ticket: t, resume_after }) if t == ticket => resume_after,
            _ => {
                debug!(ticket = %ticket, "Ignoring stale graph rebuild");
                return;
            }
        };
        self.rebuild = None;

        match result {
            Ok(()) => {
                info!("Audio system rebuilt");
                self.context = ContextState::Running;
                if self.state.last_error == Some(ErrorKind::ContextInitFailed) {
                    self.state.last_error = None;
                }
                if let Some(track) = self.state.current_track.clone() {
                    self.state.position_secs = 0.0;
                    self.issue_load(&track);
                    self.emit_position();
                    if resume_after && self.activated {
                        self.begin_play(PlayOrigin::User);
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Audio system rebuild failed");
                self.context = ContextState::Uninitialized;
                if matches!(self.state.transport, Transport::Playing | Transport::Loading) {
                    self.set_transport(Transport::Paused);
                }
                self.surface_error(ErrorKind::ContextInitFailed, e.to_string());
            }
        }
    }

    // ===== Recovery =====

    /// Retry the current track from scratch
    pub fn retry_current_track(&mut self) -> Result<()> {
        let Some(track) = self.state.current_track.clone() else {
            return Err(PlaybackError::NoTrackSelected);
        };
        if !self.activated {
            return Err(PlaybackError::ActivationRequired);
        }
        info!(track = %track, "Manual retry");

        self.pending = None;
        self.retry_at = None;
        self.stop_timers();
        self.failed_tracks.clear();
        self.state.retry_count = 0;
        self.state.last_error = None;
        self.state.position_secs = 0.0;

        self.issue_load(&track);
        self.emit_position();
        self.begin_play(PlayOrigin::User);
        Ok(())
    }

    /// Tear down and rebuild the audio graph
    pub fn reset_audio_system(&mut self) -> Ticket {
        let resume_after = matches!(self.state.transport, Transport::Playing | Transport::Loading);
        info!(resume_after, "Resetting audio system");

        self.retry_at = None;
        self.pending = None;
        self.stop_timers();
        self.context = ContextState::Uninitialized;

        let ticket = self.next_ticket();
        self.rebuild = Some(Rebuild { ticket, resume_after });
        self.command(MediaCommand::RebuildAudioGraph { ticket });
        if resume_after {
            self.set_transport(Transport::Loading);
        }
        ticket
    }

    // ===== Seeking =====

    /// Seek to an absolute position
    ///
    /// Returns `false` (and does nothing) while the duration is unknown.
    pub fn seek(&mut self, target_secs: f64) -> bool {
        if self.state.known_duration().is_none() {
            return false;
        }
        self.state.set_position(target_secs);
        if !self.progress.is_dragging() {
            self.command(MediaCommand::Seek {
                position_secs: self.state.position_secs,
            });
        }
        self.emit_position();
        true
    }

    /// Pointer pressed on the seek bar
    pub fn gesture_start(&mut self, pointer_x: f64, bar: SeekBar) -> bool {
        let Some(duration) = self.state.known_duration() else {
            return false;
        };
        match self.progress.gesture_start(pointer_x, bar, duration) {
            Some(position) => {
                self.state.set_position(position);
                self.emit_position();
                true
            }
            None => false,
        }
    }

    /// Pointer dragged along the seek bar
    pub fn gesture_move(&mut self, pointer_x: f64, bar: SeekBar) -> bool {
        let Some(duration) = self.state.known_duration() else {
            return false;
        };
        match self.progress.gesture_move(pointer_x, bar, duration) {
            Some(position) => {
                self.state.set_position(position);
                self.emit_position();
                true
            }
            None => false,
        }
    }

    /// Pointer released: commit exactly one seek
    pub fn gesture_end(&mut self, pointer_x: f64, bar: SeekBar) -> bool {
        let Some(duration) = self.state.known_duration() else {
            self.progress.cancel_gesture();
            return false;
        };
        let Some(target) = self.progress.gesture_end(pointer_x, bar, duration) else {
            return false;
        };
        self.seek(target);
        if self.state.transport == Transport::Playing && self.visible {
            self.progress.start_polling(self.clock.now());
        }
        true
    }

    // ===== Reconciliation =====

    /// Periodic reconciliation against the media output
    ///
    /// Runs the position poll, the near-end check, the playing-vs-stopped
    /// watchdog and any scheduled retry that are due.
    pub fn tick(&mut self, status: MediaStatus) {
        let now = self.clock.now();
        if self.rebuild.is_none() {
            self.context = status.context;
        }
        self.state.set_duration(status.duration_secs);

        if self.progress.poll_due(now) {
            self.state.set_position(status.position_secs);
            self.emit_position();
            self.check_near_end();
        }

        if let Some(at) = self.next_watchdog {
            if now >= at {
                self.next_watchdog = Some(now + self.config.watchdog_interval());
                if self.state.transport == Transport::Playing && self.is_settled() && status.paused {
                    info!("Output stopped while playing, syncing transport");
                    self.stop_timers();
                    self.set_transport(Transport::Paused);
                }
            }
        }

        if let Some(at) = self.retry_at {
            if now >= at {
                debug!(attempt = self.state.retry_count, "Retry due");
                self.begin_play(PlayOrigin::Retry);
            }
        }
    }

    fn check_near_end(&mut self) {
        let (Some(threshold), Some(duration)) =
            (self.config.near_end_threshold_secs, self.state.known_duration())
        else {
            return;
        };
        if self.state.transport != Transport::Playing || !self.is_settled() {
            return;
        }
        if duration - self.state.position_secs < threshold {
            if let Some(ticket) = self.current_load {
                debug!(remaining = duration - self.state.position_secs, "Track near end");
                if let Err(e) = self.on_track_ended(ticket) {
                    warn!(error = %e, "Failed to advance at end of track");
                }
            }
        }
    }

    /// Earliest time `tick` has work to do
    pub fn next_deadline(&self) -> Option<Duration> {
        [self.progress.next_poll(), self.next_watchdog, self.retry_at]
            .into_iter()
            .flatten()
            .min()
    }

    /// Page went to the background
    pub fn page_hidden(&mut self) {
        debug!("Page hidden, suspending timers");
        self.visible = false;
        self.stop_timers();
    }

    /// Page came back to the foreground
    ///
    /// Makes exactly one attempt to resume a session that was playing.
    pub fn page_shown(&mut self, status: MediaStatus) {
        self.visible = true;
        if self.rebuild.is_none() {
            self.context = status.context;
        }
        self.state.set_duration(status.duration_secs);

        if self.state.transport != Transport::Playing || !self.is_settled() {
            return;
        }

        if status.context != ContextState::Running || status.paused {
            info!(context = ?status.context, paused = status.paused, "Resuming after page became visible");
            self.begin_play(PlayOrigin::Visibility);
        } else {
            self.start_timers();
        }
    }

    // ===== State Queries =====

    /// Current observable state
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Installed catalog
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Ticket of the current load
    pub fn current_load(&self) -> Option<Ticket> {
        self.current_load
    }

    /// Whether a retry is scheduled
    pub fn is_erroring(&self) -> bool {
        self.retry_at.is_some()
    }

    /// Whether an audio graph rebuild is in flight
    pub fn is_rebuilding(&self) -> bool {
        self.rebuild.is_some()
    }

    /// Whether the start gesture happened
    pub fn is_activated(&self) -> bool {
        self.activated
    }

    /// Whether the page is visible
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether a seek drag is active
    pub fn is_dragging(&self) -> bool {
        self.progress.is_dragging()
    }

    /// Whether position polling is scheduled
    pub fn is_polling(&self) -> bool {
        self.progress.is_polling()
    }

    /// Last known audio context state
    pub fn context_state(&self) -> ContextState {
        self.context
    }

    /// Take all queued media commands
    pub fn drain_commands(&mut self) -> Vec<MediaCommand> {
        std::mem::take(&mut self.pending_commands)
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending commands or events
    pub fn has_pending_output(&self) -> bool {
        !self.pending_commands.is_empty() || !self.pending_events.is_empty()
    }

    // ===== Internals =====

    fn next_ticket(&mut self) -> Ticket {
        self.last_ticket += 1;
        Ticket(self.last_ticket)
    }

    // No play request or rebuild outstanding
    fn is_settled(&self) -> bool {
        self.pending.is_none() && self.rebuild.is_none()
    }

    fn issue_load(&mut self, track: &TrackId) {
        let ticket = self.next_ticket();
        self.current_load = Some(ticket);
        self.command(MediaCommand::Load {
            ticket,
            track: track.clone(),
            url: track.media_url(&self.config.media_prefix),
        });
    }

    fn start_timers(&mut self) {
        if !self.visible {
            return;
        }
        let now = self.clock.now();
        self.progress.start_polling(now);
        self.next_watchdog = Some(now + self.config.watchdog_interval());
    }

    fn stop_timers(&mut self) {
        self.progress.stop_polling();
        self.next_watchdog = None;
    }

    fn set_transport(&mut self, transport: Transport) {
        if self.state.transport != transport {
            self.state.transport = transport;
            self.emit(SessionEvent::StateChanged { transport });
        }
    }

    fn surface_error(&mut self, kind: ErrorKind, message: impl Into<String>) {
        self.state.last_error = Some(kind);
        if kind.is_user_visible() {
            self.emit(SessionEvent::Error {
                kind,
                message: message.into(),
            });
        }
    }

    fn emit_position(&mut self) {
        self.emit(SessionEvent::PositionUpdate {
            position_secs: self.state.position_secs,
            duration_secs: self.state.duration_secs,
        });
    }

    fn command(&mut self, command: MediaCommand) {
        self.pending_commands.push(command);
    }

    fn emit(&mut self, event: SessionEvent) {
        self.pending_events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn session() -> PlaybackSession {
        let config = SessionConfig {
            seed: Some(1),
            ..SessionConfig::default()
        };
        PlaybackSession::new(config, ManualClock::new())
    }

    #[test]
    fn new_session_is_idle() {
        let session = session();
        assert_eq!(session.state().transport, Transport::Idle);
        assert!(session.state().current_track.is_none());
        assert!(session.next_deadline().is_none());
        assert!(!session.has_pending_output());
    }

    #[test]
    fn play_requires_track_and_activation() {
        let mut session = session();
        assert_eq!(session.play(), Err(PlaybackError::NoTrackSelected));

        session
            .load_catalog(Catalog::from_names(["a.mp3"]))
            .unwrap();
        assert_eq!(session.play(), Err(PlaybackError::ActivationRequired));
    }

    #[test]
    fn load_issues_ticketed_url() {
        let mut session = session();
        session
            .load_catalog(Catalog::from_names(["a b.mp3"]))
            .unwrap();

        let commands = session.drain_commands();
        assert_eq!(commands.len(), 1);
        match &commands[0] {
            MediaCommand::Load { ticket, track, url } => {
                assert_eq!(Some(*ticket), session.current_load());
                assert_eq!(track.as_str(), "a b.mp3");
                assert_eq!(url, "/music/a%20b.mp3");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn tickets_increase() {
        let mut session = session();
        let a = session.next_ticket();
        let b = session.next_ticket();
        assert!(b > a);
    }
}
