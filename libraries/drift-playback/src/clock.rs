//! Monotonic time source for the session's timers
//!
//! Timestamps are `Duration`s since an arbitrary origin, so the same session
//! runs against tokio time, `performance.now()` in the browser, or a manual
//! clock in tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Monotonic clock
pub trait Clock: Send {
    /// Time elapsed since the clock's origin
    fn now(&self) -> Duration;
}

/// Manually advanced clock
///
/// Clones share the same time, so a test can keep one handle and give the
/// other to the session.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    micros: Arc<AtomicU64>,
}

impl ManualClock {
    /// Clock starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward
    pub fn advance(&self, by: Duration) {
        self.micros
            .fetch_add(by.as_micros() as u64, Ordering::SeqCst);
    }

    /// Jump to an absolute time
    pub fn set(&self, at: Duration) {
        self.micros.store(at.as_micros() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_micros(self.micros.load(Ordering::SeqCst))
    }
}

/// Clock backed by `tokio::time::Instant` (honours paused test time)
#[cfg(feature = "driver")]
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: tokio::time::Instant,
}

#[cfg(feature = "driver")]
impl TokioClock {
    /// Clock whose origin is now
    pub fn new() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
        }
    }

    /// Convert a session timestamp back into a tokio instant
    pub fn instant_at(&self, at: Duration) -> tokio::time::Instant {
        self.origin + at
    }
}

#[cfg(feature = "driver")]
impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "driver")]
impl Clock for TokioClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}
