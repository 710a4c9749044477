//! Source of randomness for crop selection and confidence.
//!
//! Everything random in the advisor goes through [`RandomSource`], so callers
//! decide between OS-seeded, fixed-seed, and scripted draws.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

/// Largest `f64` strictly below 1.0.
const BELOW_ONE: f64 = 1.0 - f64::EPSILON / 2.0;

/// Produces uniform samples in `[0, 1)`.
pub trait RandomSource {
    fn next_uniform(&mut self) -> f64;
}

/// Adapter from any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R>(R);

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self(rng)
    }
}

impl RngSource<ThreadRng> {
    /// Thread-local generator seeded from the OS.
    pub fn thread() -> Self {
        Self(rand::rng())
    }
}

impl RngSource<StdRng> {
    /// Deterministic generator; the same seed yields the same draws.
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_uniform(&mut self) -> f64 {
        self.0.random::<f64>()
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
///
/// Values are pulled into `[0, 1)`; an empty list always yields 0.0.
#[derive(Debug, Clone, Default)]
pub struct SequenceSource {
    draws: Vec<f64>,
    next: usize,
}

impl SequenceSource {
    pub fn new(draws: impl Into<Vec<f64>>) -> Self {
        Self {
            draws: draws.into(),
            next: 0,
        }
    }
}

impl RandomSource for SequenceSource {
    fn next_uniform(&mut self) -> f64 {
        if self.draws.is_empty() {
            return 0.0;
        }
        let value = self.draws[self.next % self.draws.len()];
        self.next = self.next.wrapping_add(1);
        if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, BELOW_ONE)
        }
    }
}

impl<S: RandomSource + ?Sized> RandomSource for &mut S {
    fn next_uniform(&mut self) -> f64 {
        (**self).next_uniform()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_source_cycles() {
        let mut source = SequenceSource::new([0.1, 0.5]);
        assert_eq!(source.next_uniform(), 0.1);
        assert_eq!(source.next_uniform(), 0.5);
        assert_eq!(source.next_uniform(), 0.1);
    }

    #[test]
    fn test_sequence_source_clamps_into_unit_interval() {
        let mut source = SequenceSource::new([-0.5, 1.0, 7.0, f64::NAN]);
        assert_eq!(source.next_uniform(), 0.0);
        assert!(source.next_uniform() < 1.0);
        assert!(source.next_uniform() < 1.0);
        assert_eq!(source.next_uniform(), 0.0);
    }

    #[test]
    fn test_sequence_source_empty() {
        let mut source = SequenceSource::default();
        assert_eq!(source.next_uniform(), 0.0);
    }

    #[test]
    fn test_seeded_source_is_deterministic() {
        let mut a = RngSource::seeded(42);
        let mut b = RngSource::seeded(42);
        for _ in 0..100 {
            assert_eq!(a.next_uniform(), b.next_uniform());
        }
    }

    #[test]
    fn test_rng_source_stays_in_unit_interval() {
        let mut source = RngSource::thread();
        for _ in 0..1000 {
            let u = source.next_uniform();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn test_mut_reference_is_a_source() {
        fn draw(mut source: impl RandomSource) -> f64 {
            source.next_uniform()
        }
        let mut source = SequenceSource::new([0.25, 0.75]);
        assert_eq!(draw(&mut source), 0.25);
        assert_eq!(source.next_uniform(), 0.75);
    }
}
