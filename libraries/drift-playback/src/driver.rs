//! Native session driver
//!
//! A single tokio task owns the `PlaybackSession`, the `AudioGraph` and the
//! `VisualizationFeed`, and performs the session's media commands against a
//! `MediaOutput`. Everything else talks to it through a `DriverHandle`.
//!
//! ```text
//! DriverHandle ──mpsc──▶ SessionDriver ──▶ MediaOutput / AudioGraph
//!                            │  ▲
//!                            │  └── play completions, catalog fetch
//!                            ├──watch──▶ PlaybackState
//!                            ├──mpsc───▶ SessionEvent
//!                            └──watch──▶ frequency frames
//! ```

use crate::{
    clock::TokioClock,
    error::{GraphError, MediaError, PlaybackError, Result},
    events::{MediaCommand, SessionEvent},
    feed::VisualizationFeed,
    graph::{AudioGraph, AudioPlatform, ElementId},
    progress::SeekBar,
    session::PlaybackSession,
    shuffle::TrackPicker,
    types::{ContextState, MediaStatus, PlaybackState, SessionConfig, Ticket, Transport},
};
use async_trait::async_trait;
use drift_core::{Catalog, CatalogSource};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// The media element the session plays through
#[async_trait]
pub trait MediaOutput: Send + Sync + 'static {
    /// Identity used to bind the analysis tap
    fn element_id(&self) -> ElementId;

    /// Point at a new source and reload; end-of-media must report `ticket`
    fn load(&self, ticket: Ticket, url: &str);

    /// Start playback; resolves once the platform accepts or rejects it
    async fn play(&self) -> std::result::Result<(), MediaError>;

    /// Halt output
    fn pause(&self);

    /// Move to an absolute position
    fn seek(&self, position_secs: f64);

    /// Mute or unmute
    fn set_muted(&self, muted: bool);

    /// Current position in seconds
    fn position_secs(&self) -> f64;

    /// Duration of the loaded media, once known
    fn duration_secs(&self) -> Option<f64>;

    /// Whether output is stopped
    fn is_paused(&self) -> bool;
}

/// User and platform inputs to the driver
#[derive(Debug, Clone, PartialEq)]
pub enum DriverCommand {
    /// Start gesture
    Activate,
    /// Play
    Play,
    /// Pause
    Pause,
    /// Play/pause toggle
    Toggle,
    /// Skip to another random track
    SkipNext,
    /// Click-to-seek
    Seek(f64),
    /// Mute toggle
    ToggleMute,
    /// Retry the current track
    Retry,
    /// Rebuild the audio system
    Reset,
    /// Seek bar pressed
    GestureStart {
        /// Pointer X
        x: f64,
        /// Bar geometry
        bar: SeekBar,
    },
    /// Seek bar dragged
    GestureMove {
        /// Pointer X
        x: f64,
        /// Bar geometry
        bar: SeekBar,
    },
    /// Seek bar released
    GestureEnd {
        /// Pointer X
        x: f64,
        /// Bar geometry
        bar: SeekBar,
    },
    /// Page went to the background
    PageHidden,
    /// Page came back
    PageShown,
    /// The media output reached the end of the load identified by the ticket
    MediaEnded(Ticket),
    /// Install a catalog directly
    LoadCatalog(Catalog),
    /// Stop the driver and tear down the audio graph
    Shutdown,
}

/// Cloneable sender for driver commands
#[derive(Debug, Clone)]
pub struct DriverHandle {
    tx: mpsc::UnboundedSender<DriverCommand>,
}

impl DriverHandle {
    /// Send a raw command
    pub fn send(&self, command: DriverCommand) -> Result<()> {
        self.tx
            .send(command)
            .map_err(|_| PlaybackError::DriverStopped)
    }

    /// Start gesture
    pub fn activate(&self) -> Result<()> {
        self.send(DriverCommand::Activate)
    }

    /// Play
    pub fn play(&self) -> Result<()> {
        self.send(DriverCommand::Play)
    }

    /// Pause
    pub fn pause(&self) -> Result<()> {
        self.send(DriverCommand::Pause)
    }

    /// Play/pause toggle
    pub fn toggle(&self) -> Result<()> {
        self.send(DriverCommand::Toggle)
    }

    /// Skip to another random track
    pub fn skip_next(&self) -> Result<()> {
        self.send(DriverCommand::SkipNext)
    }

    /// Seek to an absolute position
    pub fn seek(&self, position_secs: f64) -> Result<()> {
        self.send(DriverCommand::Seek(position_secs))
    }

    /// Mute toggle
    pub fn toggle_mute(&self) -> Result<()> {
        self.send(DriverCommand::ToggleMute)
    }

    /// Retry the current track
    pub fn retry(&self) -> Result<()> {
        self.send(DriverCommand::Retry)
    }

    /// Rebuild the audio system
    pub fn reset(&self) -> Result<()> {
        self.send(DriverCommand::Reset)
    }

    /// Seek bar pressed
    pub fn gesture_start(&self, x: f64, bar: SeekBar) -> Result<()> {
        self.send(DriverCommand::GestureStart { x, bar })
    }

    /// Seek bar dragged
    pub fn gesture_move(&self, x: f64, bar: SeekBar) -> Result<()> {
        self.send(DriverCommand::GestureMove { x, bar })
    }

    /// Seek bar released
    pub fn gesture_end(&self, x: f64, bar: SeekBar) -> Result<()> {
        self.send(DriverCommand::GestureEnd { x, bar })
    }

    /// Page visibility changed
    pub fn set_visible(&self, visible: bool) -> Result<()> {
        self.send(if visible {
            DriverCommand::PageShown
        } else {
            DriverCommand::PageHidden
        })
    }

    /// End of media for the given load
    pub fn media_ended(&self, ticket: Ticket) -> Result<()> {
        self.send(DriverCommand::MediaEnded(ticket))
    }

    /// Stop the driver
    pub fn shutdown(&self) -> Result<()> {
        self.send(DriverCommand::Shutdown)
    }
}

enum Completion {
    Played {
        ticket: Ticket,
        result: std::result::Result<(), MediaError>,
    },
    Catalog(drift_core::Result<Catalog>),
}

/// Tokio task driving a `PlaybackSession`
pub struct SessionDriver<P: AudioPlatform, M: MediaOutput> {
    session: PlaybackSession,
    graph: AudioGraph<P>,
    feed: VisualizationFeed,
    media: Arc<M>,
    clock: TokioClock,
    frame_interval: Duration,
    catalog_source: Option<Arc<dyn CatalogSource>>,

    command_tx: mpsc::UnboundedSender<DriverCommand>,
    command_rx: mpsc::UnboundedReceiver<DriverCommand>,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completion_rx: mpsc::UnboundedReceiver<Completion>,

    state_tx: watch::Sender<PlaybackState>,
    event_tx: mpsc::UnboundedSender<SessionEvent>,
    event_rx: Option<mpsc::UnboundedReceiver<SessionEvent>>,
    frame_tx: watch::Sender<Vec<u8>>,
}

impl<P: AudioPlatform, M: MediaOutput> SessionDriver<P, M> {
    /// Create a driver; nothing runs until `run` is awaited
    pub fn new(config: SessionConfig, platform: P, media: M) -> Self {
        let clock = TokioClock::new();
        let graph = AudioGraph::new(platform, config.fft_size);
        let feed = VisualizationFeed::new(config.frequency_bin_count());
        let frame_interval = config.frame_interval();
        let session = PlaybackSession::new(config, clock);

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let (state_tx, _) = watch::channel(session.state().clone());
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (frame_tx, _) = watch::channel(Vec::new());

        Self {
            session,
            graph,
            feed,
            media: Arc::new(media),
            clock,
            frame_interval,
            catalog_source: None,
            command_tx,
            command_rx,
            completion_tx,
            completion_rx,
            state_tx,
            event_tx,
            event_rx: Some(event_rx),
            frame_tx,
        }
    }

    /// Fetch the catalog from `source` when the driver starts
    pub fn with_catalog_source(mut self, source: Arc<dyn CatalogSource>) -> Self {
        self.catalog_source = Some(source);
        self
    }

    /// Replace the shuffle picker
    pub fn with_picker<T: TrackPicker + 'static>(mut self, picker: T) -> Self {
        self.session.set_picker(picker);
        self
    }

    /// Handle for sending commands
    pub fn handle(&self) -> DriverHandle {
        DriverHandle {
            tx: self.command_tx.clone(),
        }
    }

    /// Watch state snapshots
    pub fn subscribe_state(&self) -> watch::Receiver<PlaybackState> {
        self.state_tx.subscribe()
    }

    /// Watch frequency frames (published while playing)
    pub fn subscribe_frames(&self) -> watch::Receiver<Vec<u8>> {
        self.frame_tx.subscribe()
    }

    /// Take the event stream (only once)
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<SessionEvent>> {
        self.event_rx.take()
    }

    /// Run until `Shutdown`
    pub async fn run(mut self) {
        info!("Session driver started");

        if let Some(source) = self.catalog_source.clone() {
            let tx = self.completion_tx.clone();
            tokio::spawn(async move {
                let result = source.list_tracks().await;
                let _ = tx.send(Completion::Catalog(result));
            });
        }

        let mut frames = tokio::time::interval(self.frame_interval);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            self.flush().await;

            let deadline = self
                .session
                .next_deadline()
                .map(|at| self.clock.instant_at(at));
            let playing = self.session.state().transport == Transport::Playing;

            tokio::select! {
                command = self.command_rx.recv() => match command {
                    Some(DriverCommand::Shutdown) | None => break,
                    Some(command) => self.apply(command),
                },
                Some(completion) = self.completion_rx.recv() => self.complete(completion),
                () = sleep_until(deadline) => {
                    let status = self.status();
                    self.session.tick(status);
                }
                _ = frames.tick(), if playing => self.publish_frame(),
            }
        }

        self.graph.teardown().await;
        self.flush_outputs();
        info!("Session driver stopped");
    }

    fn apply(&mut self, command: DriverCommand) {
        debug!(?command, "Driver command");
        let result = match command {
            DriverCommand::Activate => self.session.activate(),
            DriverCommand::Play => self.session.play(),
            DriverCommand::Pause => {
                self.session.pause();
                Ok(())
            }
            DriverCommand::Toggle => self.session.toggle(),
            DriverCommand::SkipNext => {
                self.session.skip_next();
                Ok(())
            }
            DriverCommand::Seek(position_secs) => {
                self.session.seek(position_secs);
                Ok(())
            }
            DriverCommand::ToggleMute => {
                self.session.toggle_mute();
                Ok(())
            }
            DriverCommand::Retry => self.session.retry_current_track(),
            DriverCommand::Reset => {
                self.session.reset_audio_system();
                Ok(())
            }
            DriverCommand::GestureStart { x, bar } => {
                self.session.gesture_start(x, bar);
                Ok(())
            }
            DriverCommand::GestureMove { x, bar } => {
                self.session.gesture_move(x, bar);
                Ok(())
            }
            DriverCommand::GestureEnd { x, bar } => {
                self.session.gesture_end(x, bar);
                Ok(())
            }
            DriverCommand::PageHidden => {
                self.session.page_hidden();
                Ok(())
            }
            DriverCommand::PageShown => {
                let status = self.status();
                self.session.page_shown(status);
                Ok(())
            }
            DriverCommand::MediaEnded(ticket) => self.session.on_track_ended(ticket),
            DriverCommand::LoadCatalog(catalog) => self.session.load_catalog(catalog).map(|_| ()),
            DriverCommand::Shutdown => Ok(()),
        };

        if let Err(e) = result {
            debug!(error = %e, "Command rejected");
        }
    }

    fn complete(&mut self, completion: Completion) {
        match completion {
            Completion::Played { ticket, result } => self.session.on_play_settled(ticket, result),
            Completion::Catalog(Ok(catalog)) => {
                if let Err(e) = self.session.load_catalog(catalog) {
                    debug!(error = %e, "Catalog did not yield a track");
                }
            }
            Completion::Catalog(Err(e)) => self.session.catalog_failed(e.to_string()),
        }
    }

    /// Perform queued media commands, then publish events and state
    async fn flush(&mut self) {
        loop {
            let commands = self.session.drain_commands();
            if commands.is_empty() {
                break;
            }
            for command in commands {
                self.perform(command).await;
            }
        }
        self.flush_outputs();
    }

    fn flush_outputs(&mut self) {
        for event in self.session.drain_events() {
            let _ = self.event_tx.send(event);
        }

        let current = self.session.state().clone();
        self.state_tx.send_if_modified(|state| {
            if *state == current {
                false
            } else {
                *state = current;
                true
            }
        });
    }

    async fn perform(&mut self, command: MediaCommand) {
        match command {
            MediaCommand::Load { ticket, track, url } => {
                debug!(ticket = %ticket, track = %track, "Loading");
                self.media.load(ticket, &url);
            }
            MediaCommand::ResumeContext { ticket } => {
                let element = self.media.element_id();
                let result = running(self.graph.prepare(&element).await);
                self.session.on_context_resumed(ticket, result);
            }
            MediaCommand::Play { ticket } => {
                let media = Arc::clone(&self.media);
                let tx = self.completion_tx.clone();
                tokio::spawn(async move {
                    let result = media.play().await;
                    let _ = tx.send(Completion::Played { ticket, result });
                });
            }
            MediaCommand::Pause => self.media.pause(),
            MediaCommand::Seek { position_secs } => self.media.seek(position_secs),
            MediaCommand::SetMuted { muted } => self.media.set_muted(muted),
            MediaCommand::RebuildAudioGraph { ticket } => {
                let element = self.media.element_id();
                let result = running(self.graph.rebuild(&element).await);
                if let Err(e) = &result {
                    warn!(error = %e, "Audio graph rebuild failed");
                }
                self.session.on_graph_rebuilt(ticket, result);
            }
        }
    }

    fn status(&self) -> MediaStatus {
        MediaStatus {
            position_secs: self.media.position_secs(),
            duration_secs: self.media.duration_secs(),
            paused: self.media.is_paused(),
            context: self.graph.state(),
        }
    }

    fn publish_frame(&mut self) {
        let transport = self.session.state().transport;
        if let Some(frame) = self.feed.frame(transport, self.graph.tap()) {
            let frame = frame.to_vec();
            self.frame_tx.send_replace(frame);
        }
    }
}

/// A prepared graph counts only if the context actually runs
fn running(result: std::result::Result<ContextState, GraphError>) -> std::result::Result<(), GraphError> {
    match result? {
        ContextState::Running => Ok(()),
        state => Err(GraphError::ContextResume(format!("context is {state:?}"))),
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
