//! Progress polling and seek gestures
//!
//! Polls playback position on a fixed cadence while playing and turns
//! pointer/touch drags on the progress bar into absolute seek targets.
//! A drag only moves the displayed position; the seek is committed once, on
//! release.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Geometry of the seek affordance, in the same units as pointer X
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeekBar {
    /// Left edge
    pub left: f64,
    /// Width
    pub width: f64,
}

impl SeekBar {
    /// Create a bar from its left edge and width
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    /// Map a pointer X to a time: `clamp((x - left) / width, 0, 1) * duration`
    ///
    /// Returns `None` for degenerate bars or unknown durations.
    pub fn time_at(&self, pointer_x: f64, duration_secs: f64) -> Option<f64> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return None;
        }
        if !(duration_secs.is_finite() && duration_secs > 0.0) || !pointer_x.is_finite() {
            return None;
        }
        let fraction = ((pointer_x - self.left) / self.width).clamp(0.0, 1.0);
        Some(fraction * duration_secs)
    }
}

/// An active seek gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    /// Last interpolated position in seconds
    pub position_secs: f64,
    /// Whether the pointer moved after the initial press
    pub moved: bool,
}

/// Position polling and drag tracking
#[derive(Debug, Clone)]
pub struct ProgressController {
    interval: Duration,
    next_poll: Option<Duration>,
    drag: Option<DragSession>,
}

impl ProgressController {
    /// Create a controller polling every `interval`
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_poll: None,
            drag: None,
        }
    }

    /// Begin polling; the first poll is due one interval from `now`
    pub fn start_polling(&mut self, now: Duration) {
        self.next_poll = Some(now + self.interval);
    }

    /// Stop polling
    pub fn stop_polling(&mut self) {
        self.next_poll = None;
    }

    /// Whether polling is scheduled
    pub fn is_polling(&self) -> bool {
        self.next_poll.is_some()
    }

    /// Time of the next poll (none while dragging)
    pub fn next_poll(&self) -> Option<Duration> {
        if self.drag.is_some() {
            None
        } else {
            self.next_poll
        }
    }

    /// Whether a poll is due at `now`; reschedules when it is
    pub fn poll_due(&mut self, now: Duration) -> bool {
        if self.drag.is_some() {
            return false;
        }
        match self.next_poll {
            Some(at) if now >= at => {
                // Skip missed intervals instead of bursting.
                let mut next = at + self.interval;
                if next <= now {
                    next = now + self.interval;
                }
                self.next_poll = Some(next);
                true
            }
            _ => false,
        }
    }

    /// Whether a drag is active
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Current drag, if any
    pub fn drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    /// Pointer pressed: start a drag and report the provisional position
    pub fn gesture_start(&mut self, pointer_x: f64, bar: SeekBar, duration_secs: f64) -> Option<f64> {
        let position_secs = bar.time_at(pointer_x, duration_secs)?;
        self.drag = Some(DragSession {
            position_secs,
            moved: false,
        });
        Some(position_secs)
    }

    /// Pointer moved: update the provisional position only
    pub fn gesture_move(&mut self, pointer_x: f64, bar: SeekBar, duration_secs: f64) -> Option<f64> {
        let position_secs = bar.time_at(pointer_x, duration_secs)?;
        let drag = self.drag.as_mut()?;
        drag.position_secs = position_secs;
        drag.moved = true;
        Some(position_secs)
    }

    /// Pointer released: end the drag and return the seek target
    ///
    /// Falls back to the last dragged position when the release point
    /// cannot be mapped (e.g. the bar collapsed mid-gesture).
    pub fn gesture_end(&mut self, pointer_x: f64, bar: SeekBar, duration_secs: f64) -> Option<f64> {
        let drag = self.drag.take()?;
        Some(
            bar.time_at(pointer_x, duration_secs)
                .unwrap_or(drag.position_secs),
        )
    }

    /// Abandon a drag without seeking
    pub fn cancel_gesture(&mut self) {
        self.drag = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BAR: SeekBar = SeekBar {
        left: 100.0,
        width: 200.0,
    };

    #[test]
    fn pointer_maps_linearly_and_clamps() {
        assert_eq!(BAR.time_at(100.0, 60.0), Some(0.0));
        assert_eq!(BAR.time_at(200.0, 60.0), Some(30.0));
        assert_eq!(BAR.time_at(300.0, 60.0), Some(60.0));
        assert_eq!(BAR.time_at(-50.0, 60.0), Some(0.0));
        assert_eq!(BAR.time_at(900.0, 60.0), Some(60.0));
    }

    #[test]
    fn degenerate_inputs_map_to_none() {
        assert_eq!(SeekBar::new(0.0, 0.0).time_at(10.0, 60.0), None);
        assert_eq!(BAR.time_at(150.0, 0.0), None);
        assert_eq!(BAR.time_at(150.0, f64::NAN), None);
        assert_eq!(BAR.time_at(f64::NAN, 60.0), None);
    }

    #[test]
    fn polling_cadence() {
        let mut progress = ProgressController::new(Duration::from_millis(100));
        assert!(!progress.poll_due(Duration::from_millis(500)));

        progress.start_polling(Duration::ZERO);
        assert!(!progress.poll_due(Duration::from_millis(99)));
        assert!(progress.poll_due(Duration::from_millis(100)));
        assert!(!progress.poll_due(Duration::from_millis(150)));
        assert!(progress.poll_due(Duration::from_millis(200)));

        progress.stop_polling();
        assert!(!progress.poll_due(Duration::from_millis(300)));
    }

    #[test]
    fn missed_intervals_do_not_burst() {
        let mut progress = ProgressController::new(Duration::from_millis(100));
        progress.start_polling(Duration::ZERO);
        assert!(progress.poll_due(Duration::from_millis(1_000)));
        assert!(!progress.poll_due(Duration::from_millis(1_050)));
        assert_eq!(progress.next_poll(), Some(Duration::from_millis(1_100)));
    }

    #[test]
    fn no_polling_while_dragging() {
        let mut progress = ProgressController::new(Duration::from_millis(100));
        progress.start_polling(Duration::ZERO);
        progress.gesture_start(150.0, BAR, 60.0);

        assert!(!progress.poll_due(Duration::from_millis(500)));
        assert_eq!(progress.next_poll(), None);

        progress.gesture_end(150.0, BAR, 60.0);
        assert!(progress.poll_due(Duration::from_millis(500)));
    }

    #[test]
    fn drag_reports_provisional_positions() {
        let mut progress = ProgressController::new(Duration::from_millis(100));

        assert_eq!(progress.gesture_start(100.0, BAR, 60.0), Some(0.0));
        assert!(!progress.drag().unwrap().moved);

        assert_eq!(progress.gesture_move(250.0, BAR, 60.0), Some(45.0));
        assert!(progress.drag().unwrap().moved);
        assert_eq!(progress.drag().unwrap().position_secs, 45.0);

        assert_eq!(progress.gesture_end(250.0, BAR, 60.0), Some(45.0));
        assert!(!progress.is_dragging());
    }

    #[test]
    fn move_without_start_is_ignored() {
        let mut progress = ProgressController::new(Duration::from_millis(100));
        assert_eq!(progress.gesture_move(250.0, BAR, 60.0), None);
        assert_eq!(progress.gesture_end(250.0, BAR, 60.0), None);
    }

    #[test]
    fn release_on_collapsed_bar_uses_last_position() {
        let mut progress = ProgressController::new(Duration::from_millis(100));
        progress.gesture_start(100.0, BAR, 60.0);
        progress.gesture_move(160.0, BAR, 60.0);
        assert_eq!(
            progress.gesture_end(160.0, SeekBar::new(0.0, 0.0), 60.0),
            Some(18.0)
        );
    }
}
