//! Injectable source of uniform random values for destination draws.
//!
//! Production code draws from the thread-local generator; tests substitute a
//! seeded generator or a fixed sequence so draws are reproducible.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

/// Provider of uniform values in `[0, 1)`.
pub trait RandomSource {
    /// Returns the next value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Adapts any [`rand::Rng`] into a [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl RngSource<ThreadRng> {
    /// Thread-local generator. Not `Send`: create it where the draw happens.
    pub fn thread() -> Self {
        Self(rand::rng())
    }
}

impl RngSource<StdRng> {
    /// Deterministic generator for reproducible draws.
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.0.random::<f64>()
    }
}

/// Replays a fixed list of values, cycling when exhausted.
///
/// Values outside `[0, 1)` are passed through untouched, which lets tests
/// exercise the rounding fallback of the draw walk.
#[derive(Debug, Clone)]
pub struct FixedSequence {
    values: Vec<f64>,
    position: usize,
}

impl FixedSequence {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            position: 0,
        }
    }

    /// Number of values handed out so far.
    pub fn consumed(&self) -> usize {
        self.position
    }
}

impl RandomSource for FixedSequence {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            self.position += 1;
            return 0.0;
        }
        let value = self.values[self.position % self.values.len()];
        self.position += 1;
        value
    }
}
