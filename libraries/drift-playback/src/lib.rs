//! Drift - Shuffle Playback
//!
//! Platform-agnostic playback core for the Drift shuffle player.
//!
//! This crate provides:
//! - Playback session state machine (shuffle with replacement, bounded
//!   retries, visibility handling, watchdog)
//! - Audio graph manager (context lifecycle, analysis tap binding)
//! - Progress polling and drag-to-seek
//! - Frequency feed for visualizers
//! - A tokio driver (`driver` feature) and WASM bindings (`wasm` feature)
//!
//! # Architecture
//!
//! The session performs no I/O. It emits `MediaCommand`s for the host to
//! carry out and `SessionEvent`s for the UI; the host reports asynchronous
//! outcomes back tagged with the request's `Ticket`, so late results from
//! superseded requests are ignored.
//!
//! # Example
//!
//! ```rust
//! use drift_core::Catalog;
//! use drift_playback::{
//!     ContextState, ManualClock, MediaCommand, PlaybackSession, SessionConfig, Transport,
//! };
//!
//! let mut session = PlaybackSession::new(SessionConfig::default(), ManualClock::new());
//! session.load_catalog(Catalog::from_names(["a.mp3", "b.mp3"])).unwrap();
//! session.activate().unwrap();
//!
//! // The first play must bring up the audio context.
//! let ticket = match session.drain_commands().last() {
//!     Some(MediaCommand::ResumeContext { ticket }) => *ticket,
//!     other => panic!("unexpected {other:?}"),
//! };
//! session.on_context_resumed(ticket, Ok(()));
//! session.on_play_settled(ticket, Ok(()));
//!
//! assert_eq!(session.state().transport, Transport::Playing);
//! assert_eq!(session.context_state(), ContextState::Running);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod clock;
pub mod error;
pub mod events;
pub mod feed;
pub mod graph;
pub mod progress;
pub mod session;
pub mod shuffle;
pub mod types;

#[cfg(feature = "driver")]
pub mod driver;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use clock::{Clock, ManualClock};
pub use error::{GraphError, MediaError, PlaybackError, Result};
pub use events::{MediaCommand, SessionEvent};
pub use feed::{AnalysisTap, VisualizationFeed};
pub use graph::{AudioContextHandle, AudioGraph, AudioPlatform, ElementId};
pub use progress::{DragSession, ProgressController, SeekBar};
pub use session::PlaybackSession;
pub use shuffle::{RandomPicker, TrackPicker};
pub use types::{
    ContextState, ErrorKind, MediaStatus, PlaybackState, Remedy, SessionConfig, Ticket, Transport,
};

#[cfg(feature = "driver")]
pub use clock::TokioClock;

#[cfg(feature = "driver")]
pub use driver::{DriverCommand, DriverHandle, MediaOutput, SessionDriver};

#[cfg(feature = "wasm")]
pub use wasm::WasmShuffleSession;
