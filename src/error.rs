//! Error types for the recommendation core.

use thiserror::Error;

use crate::input::Field;
use crate::justification::format_value;

/// A soil or weather reading fell outside the range its field accepts.
#[derive(Debug, Clone, PartialEq, Error)]
#[error(
    "{} = {} is outside the allowed range [{}, {}]",
    .field.label(),
    reading(.field, .value),
    reading(.field, .min),
    reading(.field, .max)
)]
pub struct ValidationError {
    pub field: Field,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

impl ValidationError {
    pub fn new(field: Field, value: f64) -> Self {
        let (min, max) = field.bounds();
        Self {
            field,
            value,
            min,
            max,
        }
    }
}

/// Counts print as integers, measurements the way reasons print them.
fn reading(field: &Field, value: &f64) -> String {
    if field.is_count() && value.is_finite() && value.fract() == 0.0 {
        format!("{}", *value as i64)
    } else {
        format_value(*value)
    }
}

/// The advisor was provisioned with unusable static data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("crop catalog is empty")]
    EmptyCatalog,

    #[error("crop catalog contains an entry with a blank name")]
    BlankCropName,

    #[error("crop '{0}' appears more than once in the catalog")]
    DuplicateCrop(String),

    #[error(
        "confidence range [{low}, {high}] must satisfy 0 <= low <= high <= 100 with at most two decimals"
    )]
    InvalidConfidenceRange { low: f64, high: f64 },
}

/// Any failure `Advisor` can report to its caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdvisorError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
