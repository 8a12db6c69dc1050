//! Conversions between JS values and session types

use crate::{error::MediaError, feed::AnalysisTap, types::ContextState, Clock};
use std::time::Duration;

/// Map `AudioContext.state` to a `ContextState`
pub fn context_state(state: &str) -> ContextState {
    match state {
        "running" => ContextState::Running,
        "suspended" | "interrupted" => ContextState::Suspended,
        "closed" => ContextState::Closed,
        _ => ContextState::Uninitialized,
    }
}

/// Map a rejected `play()` promise (`DOMException.name`) to a `MediaError`
pub fn media_error(name: &str, message: String) -> MediaError {
    match name {
        "NotAllowedError" => MediaError::NotAllowed(message),
        "AbortError" => MediaError::Aborted(message),
        _ => MediaError::Source(message),
    }
}

/// Wall clock from `Date.now()`, relative to construction
pub struct JsClock {
    origin_ms: f64,
}

impl JsClock {
    /// Clock whose origin is now
    pub fn new() -> Self {
        Self {
            origin_ms: js_sys::Date::now(),
        }
    }
}

impl Default for JsClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for JsClock {
    fn now(&self) -> Duration {
        let elapsed = (js_sys::Date::now() - self.origin_ms).max(0.0);
        Duration::from_secs_f64(elapsed / 1000.0)
    }
}

/// Analyser snapshot copied out of a JS `Uint8Array`
pub struct SnapshotTap<'a>(pub &'a [u8]);

impl AnalysisTap for SnapshotTap<'_> {
    fn frequency_bin_count(&self) -> usize {
        self.0.len()
    }

    fn read_frequency_data(&self, out: &mut [u8]) {
        out.copy_from_slice(self.0);
    }
}
