//! Shuffle with replacement
//!
//! Every pick is an independent uniform draw: the same track may come up
//! twice in a row. This is not a permutation.

use drift_core::TrackId;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Chooses an index in `0..len`
///
/// Implementors must return a value below `len`; `len` is never zero.
pub trait TrackPicker: Send {
    /// Pick an index in `0..len`
    fn pick(&mut self, len: usize) -> usize;
}

/// Uniform random picker
pub struct RandomPicker<R = StdRng> {
    rng: R,
}

impl RandomPicker<StdRng> {
    /// Picker seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible picker
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng + Send> RandomPicker<R> {
    /// Wrap an arbitrary RNG
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + Send> TrackPicker for RandomPicker<R> {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Picks a track uniformly from `pool`
///
/// Returns `None` for an empty pool.
pub fn pick_from<'a, P>(picker: &mut P, pool: &'a [TrackId]) -> Option<&'a TrackId>
where
    P: TrackPicker + ?Sized,
{
    if pool.is_empty() {
        return None;
    }
    // Guard against pickers that ignore the contract.
    let index = picker.pick(pool.len()).min(pool.len() - 1);
    pool.get(index)
}
