//! Soil and weather readings, and the checks that turn raw numbers into a
//! `SoilWeatherInput` the rest of the advisor can trust.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ValidationError;

/// One of the seven readings an analysis takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Nitrogen,
    Phosphorus,
    Potassium,
    Ph,
    Temperature,
    Humidity,
    Rainfall,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Nitrogen,
        Field::Phosphorus,
        Field::Potassium,
        Field::Ph,
        Field::Temperature,
        Field::Humidity,
        Field::Rainfall,
    ];

    /// Human-readable label, as shown next to the input control.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Nitrogen => "Nitrogen (N)",
            Field::Phosphorus => "Phosphorus (P)",
            Field::Potassium => "Potassium (K)",
            Field::Ph => "Soil pH",
            Field::Temperature => "Temperature",
            Field::Humidity => "Humidity",
            Field::Rainfall => "Rainfall",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Field::Nitrogen | Field::Phosphorus | Field::Potassium => "ppm",
            Field::Ph => "",
            Field::Temperature => "°C",
            Field::Humidity => "%",
            Field::Rainfall => "mm",
        }
    }

    /// Closed interval of accepted values.
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            Field::Nitrogen => (0.0, 140.0),
            Field::Phosphorus => (5.0, 145.0),
            Field::Potassium => (5.0, 205.0),
            Field::Ph => (0.0, 14.0),
            Field::Temperature => (-10.0, 50.0),
            Field::Humidity => (0.0, 100.0),
            Field::Rainfall => (0.0, 500.0),
        }
    }

    /// Granularity of the input control for this field.
    pub fn step(&self) -> f64 {
        match self {
            Field::Nitrogen | Field::Phosphorus | Field::Potassium => 1.0,
            Field::Ph | Field::Temperature | Field::Humidity => 0.1,
            Field::Rainfall => 1.0,
        }
    }

    /// True for the whole-number nutrient readings.
    pub fn is_count(&self) -> bool {
        matches!(self, Field::Nitrogen | Field::Phosphorus | Field::Potassium)
    }

    pub fn contains(&self, value: f64) -> bool {
        let (min, max) = self.bounds();
        value >= min && value <= max
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What to do with a reading that falls outside its field's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationPolicy {
    /// Refuse the whole input.
    #[default]
    Reject,
    /// Pull the reading to the nearest bound, like a slider would.
    Clamp,
}

impl ValidationPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationPolicy::Reject => "reject",
            ValidationPolicy::Clamp => "clamp",
        }
    }
}

impl FromStr for ValidationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(ValidationPolicy::Reject),
            "clamp" => Ok(ValidationPolicy::Clamp),
            other => Err(format!(
                "unknown validation policy '{}' (expected 'reject' or 'clamp')",
                other
            )),
        }
    }
}

/// Unchecked readings as they arrive from a form or the command line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawInput {
    pub nitrogen: i64,
    pub phosphorus: i64,
    pub potassium: i64,
    pub ph: f64,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub rainfall_mm: f64,
}

impl RawInput {
    /// The reading for `field`, widened to `f64`.
    pub fn value(&self, field: Field) -> f64 {
        match field {
            Field::Nitrogen => self.nitrogen as f64,
            Field::Phosphorus => self.phosphorus as f64,
            Field::Potassium => self.potassium as f64,
            Field::Ph => self.ph,
            Field::Temperature => self.temperature_c,
            Field::Humidity => self.humidity_pct,
            Field::Rainfall => self.rainfall_mm,
        }
    }
}

impl Default for RawInput {
    fn default() -> Self {
        Self {
            nitrogen: 50,
            phosphorus: 50,
            potassium: 50,
            ph: 6.5,
            temperature_c: 25.0,
            humidity_pct: 60.0,
            rainfall_mm: 200.0,
        }
    }
}

/// Validated soil and weather readings. Every field lies within its
/// `Field::bounds`; the only way to obtain one is through [`validate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SoilWeatherInput {
    nitrogen: u16,
    phosphorus: u16,
    potassium: u16,
    ph: f64,
    temperature_c: f64,
    humidity_pct: f64,
    rainfall_mm: f64,
}

impl SoilWeatherInput {
    pub fn nitrogen(&self) -> u16 {
        self.nitrogen
    }

    pub fn phosphorus(&self) -> u16 {
        self.phosphorus
    }

    pub fn potassium(&self) -> u16 {
        self.potassium
    }

    pub fn ph(&self) -> f64 {
        self.ph
    }

    pub fn temperature_c(&self) -> f64 {
        self.temperature_c
    }

    pub fn humidity_pct(&self) -> f64 {
        self.humidity_pct
    }

    pub fn rainfall_mm(&self) -> f64 {
        self.rainfall_mm
    }
}

impl Default for SoilWeatherInput {
    fn default() -> Self {
        let raw = RawInput::default();
        Self {
            nitrogen: raw.nitrogen as u16,
            phosphorus: raw.phosphorus as u16,
            potassium: raw.potassium as u16,
            ph: raw.ph,
            temperature_c: raw.temperature_c,
            humidity_pct: raw.humidity_pct,
            rainfall_mm: raw.rainfall_mm,
        }
    }
}

impl TryFrom<RawInput> for SoilWeatherInput {
    type Error = ValidationError;

    fn try_from(raw: RawInput) -> Result<Self, Self::Error> {
        validate(raw, ValidationPolicy::Reject)
    }
}

/// Check every reading against its bounds, in field order.
///
/// Under `Reject` the first out-of-range field is reported. Under `Clamp`
/// finite readings are pulled to the nearest bound; NaN and infinities are
/// rejected by both policies.
pub fn validate(raw: RawInput, policy: ValidationPolicy) -> Result<SoilWeatherInput, ValidationError> {
    Ok(SoilWeatherInput {
        nitrogen: check_count(Field::Nitrogen, raw.nitrogen, policy)?,
        phosphorus: check_count(Field::Phosphorus, raw.phosphorus, policy)?,
        potassium: check_count(Field::Potassium, raw.potassium, policy)?,
        ph: check_measure(Field::Ph, raw.ph, policy)?,
        temperature_c: check_measure(Field::Temperature, raw.temperature_c, policy)?,
        humidity_pct: check_measure(Field::Humidity, raw.humidity_pct, policy)?,
        rainfall_mm: check_measure(Field::Rainfall, raw.rainfall_mm, policy)?,
    })
}

fn check_count(field: Field, value: i64, policy: ValidationPolicy) -> Result<u16, ValidationError> {
    let (min, max) = field.bounds();
    let (min, max) = (min as i64, max as i64);

    let accepted = if (min..=max).contains(&value) {
        value
    } else {
        match policy {
            ValidationPolicy::Reject => return Err(ValidationError::new(field, value as f64)),
            ValidationPolicy::Clamp => {
                let clamped = value.clamp(min, max);
                debug!(field = ?field, value, clamped, "input_clamped");
                clamped
            }
        }
    };

    // Bounds top out at 205, so the conversion cannot fail.
    u16::try_from(accepted).map_err(|_| ValidationError::new(field, value as f64))
}

fn check_measure(field: Field, value: f64, policy: ValidationPolicy) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::new(field, value));
    }

    if field.contains(value) {
        return Ok(value);
    }

    match policy {
        ValidationPolicy::Reject => Err(ValidationError::new(field, value)),
        ValidationPolicy::Clamp => {
            let (min, max) = field.bounds();
            let clamped = value.clamp(min, max);
            debug!(field = ?field, value, clamped, "input_clamped");
            Ok(clamped)
        }
    }
}
