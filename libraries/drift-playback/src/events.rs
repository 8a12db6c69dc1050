//! Session Events and Media Commands
//!
//! The session never touches the platform directly. It queues:
//! - `MediaCommand`s for the host to perform (load, play, pause, ...)
//! - `SessionEvent`s for the UI to render
//!
//! Asynchronous commands carry a `Ticket`; the host reports the outcome
//! back with the same ticket.

use crate::types::{ErrorKind, Ticket, Transport};
use drift_core::TrackId;
use serde::{Deserialize, Serialize};

/// Effects the host must perform on the media output and audio graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MediaCommand {
    /// Point the output at a new source and reload it
    ///
    /// The ticket identifies this load; end-of-media signals must echo it.
    Load {
        /// Load ticket
        ticket: Ticket,
        /// Track being loaded
        track: TrackId,
        /// URL of the media
        url: String,
    },

    /// Create the audio context if needed, resume it, and bind the
    /// analysis tap. Report with `on_context_resumed`.
    ResumeContext {
        /// Request ticket
        ticket: Ticket,
    },

    /// Start playback. Report with `on_play_settled`.
    Play {
        /// Request ticket
        ticket: Ticket,
    },

    /// Halt output immediately
    Pause,

    /// Move the output to an absolute position
    Seek {
        /// Target position in seconds
        position_secs: f64,
    },

    /// Mute or unmute the output
    SetMuted {
        /// New mute state
        muted: bool,
    },

    /// Close the audio context, drop the tap, and build a new graph.
    /// Report with `on_graph_rebuilt`.
    RebuildAudioGraph {
        /// Request ticket
        ticket: Ticket,
    },
}

/// Events emitted by the session for UI synchronization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    /// Transport changed
    StateChanged {
        /// The new transport state
        transport: Transport,
    },

    /// A new track was selected
    TrackChanged {
        /// The new (current) track
        track: TrackId,
        /// The previous track (if any)
        previous: Option<TrackId>,
    },

    /// Position update (polling, seeks, drags)
    PositionUpdate {
        /// Displayed position
        position_secs: f64,
        /// Track duration, if known
        duration_secs: Option<f64>,
    },

    /// Mute toggled
    MutedChanged {
        /// Whether audio is muted
        muted: bool,
    },

    /// A failed track will be retried
    RetryScheduled {
        /// Track being retried
        track: TrackId,
        /// Failure count so far
        attempt: u8,
        /// Delay before the retry
        delay_ms: u64,
    },

    /// A track failed too often and was replaced
    TrackAbandoned {
        /// The abandoned track
        track: TrackId,
    },

    /// A user-visible error
    Error {
        /// Error kind
        kind: ErrorKind,
        /// Error message
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_are_tagged_for_js() {
        let json = serde_json::to_value(MediaCommand::Play { ticket: Ticket(7) }).unwrap();
        assert_eq!(json["type"], "Play");
        assert_eq!(json["ticket"], 7);

        let json = serde_json::to_value(MediaCommand::Pause).unwrap();
        assert_eq!(json["type"], "Pause");
    }

    #[test]
    fn events_round_trip_track_ids() {
        let event = SessionEvent::TrackChanged {
            track: TrackId::new("b.mp3"),
            previous: Some(TrackId::new("a.mp3")),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["track"], "b.mp3");
        assert_eq!(json["previous"], "a.mp3");
    }
}
