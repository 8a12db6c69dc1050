//! Visualization feed
//!
//! Once per animation frame the renderer asks for the latest frequency
//! magnitudes. While nothing is playing the feed yields nothing and the
//! renderer runs its own idle animation.

use crate::types::Transport;

/// Non-destructive monitoring point on the output path
pub trait AnalysisTap: Send {
    /// Number of frequency bins
    fn frequency_bin_count(&self) -> usize;

    /// Copy the current magnitudes (0-255) into `out`
    ///
    /// `out` is exactly `frequency_bin_count()` long.
    fn read_frequency_data(&self, out: &mut [u8]);
}

/// Fixed-length frequency snapshot buffer
#[derive(Debug, Clone)]
pub struct VisualizationFeed {
    bins: Vec<u8>,
}

impl VisualizationFeed {
    /// Feed producing `bin_count` magnitudes per frame
    pub fn new(bin_count: usize) -> Self {
        Self {
            bins: vec![0; bin_count],
        }
    }

    /// Number of magnitudes per frame
    pub fn bin_count(&self) -> usize {
        self.bins.len()
    }

    /// Snapshot for the current frame
    ///
    /// Returns `None` unless playing with a bound tap.
    pub fn frame(&mut self, transport: Transport, tap: Option<&dyn AnalysisTap>) -> Option<&[u8]> {
        if transport != Transport::Playing {
            return None;
        }
        let tap = tap?;
        let count = tap.frequency_bin_count();
        if count != self.bins.len() {
            self.bins.resize(count, 0);
        }
        tap.read_frequency_data(&mut self.bins);
        Some(&self.bins)
    }
}
