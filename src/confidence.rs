//! Confidence percentages.
//!
//! The percentage is a presentation value: it is drawn from a configured
//! range and carries no statistical meaning.

use serde::Serialize;

use crate::error::ConfigurationError;
use crate::random::RandomSource;

/// Closed range of confidence percentages to draw from. Only
/// [`ConfidenceRange::new`] and the presets construct one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceRange {
    low: f64,
    high: f64,
}

impl ConfidenceRange {
    /// 75-95%, the range used by the standard form.
    pub const STANDARD: ConfidenceRange = ConfidenceRange {
        low: 75.0,
        high: 95.0,
    };

    /// 82-97%, the range used by the enhanced form.
    pub const ENHANCED: ConfidenceRange = ConfidenceRange {
        low: 82.0,
        high: 97.0,
    };

    /// Both bounds must be finite, have at most two decimals, and satisfy
    /// `0 <= low <= high <= 100`.
    pub fn new(low: f64, high: f64) -> Result<Self, ConfigurationError> {
        let valid = is_hundredths(low)
            && is_hundredths(high)
            && 0.0 <= low
            && low <= high
            && high <= 100.0;
        if !valid {
            return Err(ConfigurationError::InvalidConfidenceRange { low, high });
        }
        Ok(Self { low, high })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}

impl Default for ConfidenceRange {
    fn default() -> Self {
        Self::STANDARD
    }
}

fn is_hundredths(value: f64) -> bool {
    value.is_finite() && round_to_hundredths(value) == value
}

/// Draw a confidence percentage from `range`, rounded to two decimals.
///
/// Bounds are themselves two-decimal values, so the clamp after rounding
/// never introduces extra digits.
pub fn synthesize_confidence(range: ConfidenceRange, rng: &mut impl RandomSource) -> f64 {
    let u = rng.next_uniform();
    let raw = range.low + u * (range.high - range.low);
    round_to_hundredths(raw).clamp(range.low, range.high)
}

pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
