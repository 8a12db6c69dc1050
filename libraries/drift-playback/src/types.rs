//! Core types for playback management

use drift_core::TrackId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Transport state of the current track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transport {
    /// Nothing started yet
    Idle,

    /// A play request is in flight (or a retry is pending)
    Loading,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,
}

/// Kinds of failure recorded in `PlaybackState::last_error`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The catalog could not be read
    CatalogUnavailable,

    /// The catalog was read but contains no tracks
    CatalogEmpty,

    /// The audio context could not be created or resumed
    ContextInitFailed,

    /// A track failed to start and no replacement could start either
    PlaybackFailed,

    /// Element already bound to a context (recovered internally)
    AlreadyBound,
}

/// Remedial action offered to the user for a surfaced error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Remedy {
    /// Reload the page
    Reload,

    /// Add audio files to the music directory
    AddTracks,

    /// Retry the current track
    Retry,

    /// Rebuild the audio system
    Reset,
}

impl ErrorKind {
    /// Whether the error is shown to the user at all
    pub fn is_user_visible(self) -> bool {
        !matches!(self, ErrorKind::AlreadyBound)
    }

    /// Suggested remedy for user-visible errors
    pub fn remedy(self) -> Option<Remedy> {
        match self {
            ErrorKind::CatalogUnavailable | ErrorKind::ContextInitFailed => Some(Remedy::Reload),
            ErrorKind::CatalogEmpty => Some(Remedy::AddTracks),
            ErrorKind::PlaybackFailed => Some(Remedy::Retry),
            ErrorKind::AlreadyBound => None,
        }
    }
}

/// State of the shared audio-processing context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContextState {
    /// Not created yet (waiting for a user gesture)
    #[default]
    Uninitialized,

    /// Created but not processing (autoplay policy, tab hidden)
    Suspended,

    /// Processing audio
    Running,

    /// Closed; must be recreated
    Closed,
}

/// Snapshot of the media output, read on each reconciliation tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MediaStatus {
    /// Current position in seconds
    pub position_secs: f64,

    /// Track duration, if the platform knows it yet
    pub duration_secs: Option<f64>,

    /// Whether the output is actually stopped
    pub paused: bool,

    /// Current audio context state
    pub context: ContextState,
}

/// Identifier attached to every load and asynchronous request
///
/// A completion is applied only if its ticket is still the one the session
/// is waiting for; anything older has been superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticket(pub u64);

impl Ticket {
    /// Largest integer a JavaScript number holds exactly (2^53 - 1)
    pub const MAX_JS: u64 = (1 << 53) - 1;

    /// Ticket from a JavaScript number
    ///
    /// `None` unless `value` is a whole number in `0..=MAX_JS`.
    pub fn from_f64(value: f64) -> Option<Self> {
        if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= Self::MAX_JS as f64 {
            Some(Self(value as u64))
        } else {
            None
        }
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Observable state of the playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    /// Selected track
    pub current_track: Option<TrackId>,

    /// Transport state
    pub transport: Transport,

    /// Displayed position in seconds
    pub position_secs: f64,

    /// Track duration in seconds, once known
    pub duration_secs: Option<f64>,

    /// Output muted
    pub muted: bool,

    /// Consecutive failures on the current track
    pub retry_count: u8,

    /// Most recent surfaced error
    pub last_error: Option<ErrorKind>,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_track: None,
            transport: Transport::Idle,
            position_secs: 0.0,
            duration_secs: None,
            muted: false,
            retry_count: 0,
            last_error: None,
        }
    }
}

impl PlaybackState {
    /// Duration if known and positive
    pub fn known_duration(&self) -> Option<f64> {
        self.duration_secs.filter(|d| d.is_finite() && *d > 0.0)
    }

    /// Write the position, clamped into `[0, duration]`
    pub fn set_position(&mut self, seconds: f64) {
        let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        self.position_secs = match self.known_duration() {
            Some(duration) => seconds.min(duration),
            None => seconds,
        };
    }

    /// Record a platform-reported duration (ignores unusable values)
    pub fn set_duration(&mut self, seconds: Option<f64>) {
        if let Some(duration) = seconds.filter(|d| d.is_finite() && *d > 0.0) {
            self.duration_secs = Some(duration);
            self.set_position(self.position_secs);
        }
    }
}

/// Configuration for the playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Consecutive failures before a track is abandoned (default: 3)
    pub max_retries: u8,

    /// Fixed delay before a retry (default: 500ms)
    pub retry_delay_ms: u64,

    /// Position polling cadence while playing (default: 100ms)
    pub poll_interval_ms: u64,

    /// Playing-vs-stopped reconciliation cadence (default: 1000ms)
    pub watchdog_interval_ms: u64,

    /// Treat remaining time below this as end of track (default: 0.1s)
    ///
    /// `None` trusts the platform's end-of-media signal alone.
    pub near_end_threshold_secs: Option<f64>,

    /// Path prefix tracks are served under (default: "/music")
    pub media_prefix: String,

    /// Analyser FFT size (default: 256, i.e. 128 frequency bins)
    pub fft_size: u32,

    /// Visualization frame cadence for the native driver (default: 16ms)
    pub frame_interval_ms: u64,

    /// Seed for reproducible shuffles (default: entropy)
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay_ms: 500,
            poll_interval_ms: 100,
            watchdog_interval_ms: 1000,
            near_end_threshold_secs: Some(0.1),
            media_prefix: "/music".to_string(),
            fft_size: 256,
            frame_interval_ms: 16,
            seed: None,
        }
    }
}

impl SessionConfig {
    /// Retry delay as a `Duration`
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Polling interval as a `Duration`
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Watchdog interval as a `Duration`
    pub fn watchdog_interval(&self) -> Duration {
        Duration::from_millis(self.watchdog_interval_ms)
    }

    /// Frame interval as a `Duration`
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    /// Number of frequency bins the analyser produces
    pub fn frequency_bin_count(&self) -> usize {
        (self.fft_size / 2) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_from_js_number() {
        assert_eq!(Ticket::from_f64(7.0), Some(Ticket(7)));
        assert_eq!(Ticket::from_f64(0.0), Some(Ticket(0)));
        assert_eq!(Ticket::from_f64(4_294_967_296.0), Some(Ticket(1 << 32)));
        assert_eq!(
            Ticket::from_f64(Ticket::MAX_JS as f64),
            Some(Ticket(Ticket::MAX_JS))
        );

        assert_eq!(Ticket::from_f64(1.5), None);
        assert_eq!(Ticket::from_f64(-1.0), None);
        assert_eq!(Ticket::from_f64(f64::NAN), None);
        assert_eq!(Ticket::from_f64(f64::INFINITY), None);
        assert_eq!(Ticket::from_f64(9_007_199_254_740_992.0), None);
    }

    #[test]
    fn default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.poll_interval(), Duration::from_millis(100));
        assert_eq!(config.watchdog_interval(), Duration::from_secs(1));
        assert_eq!(config.near_end_threshold_secs, Some(0.1));
        assert_eq!(config.frequency_bin_count(), 128);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"max_retries": 5, "near_end_threshold_secs": null}"#)
                .unwrap();
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.near_end_threshold_secs, None);
        assert_eq!(config.retry_delay_ms, 500);
    }

    #[test]
    fn position_is_clamped_to_duration() {
        let mut state = PlaybackState::default();
        state.set_duration(Some(120.0));

        state.set_position(500.0);
        assert_eq!(state.position_secs, 120.0);

        state.set_position(-3.0);
        assert_eq!(state.position_secs, 0.0);

        state.set_position(f64::NAN);
        assert_eq!(state.position_secs, 0.0);
    }

    #[test]
    fn unusable_durations_are_ignored() {
        let mut state = PlaybackState::default();
        state.set_duration(Some(f64::INFINITY));
        assert_eq!(state.known_duration(), None);
        state.set_duration(Some(0.0));
        assert_eq!(state.known_duration(), None);
        state.set_duration(None);
        assert_eq!(state.duration_secs, None);
    }

    #[test]
    fn error_remedies() {
        assert_eq!(ErrorKind::CatalogEmpty.remedy(), Some(Remedy::AddTracks));
        assert_eq!(ErrorKind::CatalogUnavailable.remedy(), Some(Remedy::Reload));
        assert_eq!(ErrorKind::PlaybackFailed.remedy(), Some(Remedy::Retry));
        assert!(!ErrorKind::AlreadyBound.is_user_visible());
        assert_eq!(ErrorKind::AlreadyBound.remedy(), None);
    }
}
