//! Human-readable reasons attached to a recommendation.
//!
//! Three independent rules look at pH, temperature, and rainfall. Each rule
//! splits its field's range into bands; every band boundary is inclusive on
//! the "good" side, so pH 6.0 and 7.5 are both optimal.

use serde::{Deserialize, Serialize};

use crate::catalog::CropProfile;
use crate::input::SoilWeatherInput;

const OPTIMAL_PH: (f64, f64) = (6.0, 7.5);
const IDEAL_TEMPERATURE_C: (f64, f64) = (20.0, 30.0);
const SUITABLE_RAINFALL_MM: (f64, f64) = (100.0, 300.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhBand {
    Optimal,
    Acidic,
    Alkaline,
}

impl PhBand {
    pub fn classify(ph: f64) -> Self {
        let (low, high) = OPTIMAL_PH;
        if ph >= low && ph <= high {
            PhBand::Optimal
        } else if ph < low {
            PhBand::Acidic
        } else {
            PhBand::Alkaline
        }
    }
}

/// Temperature has a single ideal band; anything hotter or colder shares
/// one "tolerable" message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureBand {
    Ideal,
    Tolerable,
}

impl TemperatureBand {
    pub fn classify(temperature_c: f64) -> Self {
        let (low, high) = IDEAL_TEMPERATURE_C;
        if temperature_c >= low && temperature_c <= high {
            TemperatureBand::Ideal
        } else {
            TemperatureBand::Tolerable
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RainfallBand {
    Suitable,
    Low,
    High,
}

impl RainfallBand {
    pub fn classify(rainfall_mm: f64) -> Self {
        let (low, high) = SUITABLE_RAINFALL_MM;
        if rainfall_mm >= low && rainfall_mm <= high {
            RainfallBand::Suitable
        } else if rainfall_mm < low {
            RainfallBand::Low
        } else {
            RainfallBand::High
        }
    }
}

/// Band of each explained reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Assessment {
    pub ph: PhBand,
    pub temperature: TemperatureBand,
    pub rainfall: RainfallBand,
}

impl Assessment {
    pub fn of(input: &SoilWeatherInput) -> Self {
        Self {
            ph: PhBand::classify(input.ph()),
            temperature: TemperatureBand::classify(input.temperature_c()),
            rainfall: RainfallBand::classify(input.rainfall_mm()),
        }
    }
}

/// Message templates, one per band. `{value}` is replaced with the reading
/// and `{crop}` with the crop name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasonTemplates {
    pub ph_optimal: String,
    pub ph_acidic: String,
    pub ph_alkaline: String,
    pub temperature_ideal: String,
    pub temperature_tolerable: String,
    pub rainfall_suitable: String,
    pub rainfall_low: String,
    pub rainfall_high: String,
}

impl Default for ReasonTemplates {
    fn default() -> Self {
        Self {
            ph_optimal: "Optimal pH level ({value}) for {crop}".to_string(),
            ph_acidic: "Slightly acidic pH ({value}) is acceptable for {crop}".to_string(),
            ph_alkaline: "Slightly alkaline pH ({value}) is acceptable for {crop}".to_string(),
            temperature_ideal: "Ideal temperature ({value}°C) for {crop} growth".to_string(),
            temperature_tolerable: "Temperature ({value}°C) within tolerable range for {crop}"
                .to_string(),
            rainfall_suitable: "Rainfall ({value}mm) suitable for {crop}".to_string(),
            rainfall_low: "Low rainfall ({value}mm) may require irrigation for {crop}".to_string(),
            rainfall_high: "High rainfall ({value}mm) may require drainage for {crop}".to_string(),
        }
    }
}

impl ReasonTemplates {
    fn ph(&self, band: PhBand) -> &str {
        match band {
            PhBand::Optimal => &self.ph_optimal,
            PhBand::Acidic => &self.ph_acidic,
            PhBand::Alkaline => &self.ph_alkaline,
        }
    }

    fn temperature(&self, band: TemperatureBand) -> &str {
        match band {
            TemperatureBand::Ideal => &self.temperature_ideal,
            TemperatureBand::Tolerable => &self.temperature_tolerable,
        }
    }

    fn rainfall(&self, band: RainfallBand) -> &str {
        match band {
            RainfallBand::Suitable => &self.rainfall_suitable,
            RainfallBand::Low => &self.rainfall_low,
            RainfallBand::High => &self.rainfall_high,
        }
    }
}

/// Reasons for recommending `crop` under `input`, using the default wording.
///
/// Always three entries, ordered pH, temperature, rainfall.
pub fn explain(input: &SoilWeatherInput, crop: &CropProfile) -> Vec<String> {
    explain_with(&ReasonTemplates::default(), input, crop)
}

/// Same as [`explain`] with caller-supplied wording.
pub fn explain_with(
    templates: &ReasonTemplates,
    input: &SoilWeatherInput,
    crop: &CropProfile,
) -> Vec<String> {
    let assessment = Assessment::of(input);
    vec![
        render(templates.ph(assessment.ph), input.ph(), &crop.name),
        render(
            templates.temperature(assessment.temperature),
            input.temperature_c(),
            &crop.name,
        ),
        render(
            templates.rainfall(assessment.rainfall),
            input.rainfall_mm(),
            &crop.name,
        ),
    ]
}

fn render(template: &str, value: f64, crop: &str) -> String {
    template
        .replace("{value}", &format_value(value))
        .replace("{crop}", crop)
}

/// Shortest decimal that round-trips, with a trailing `.0` on whole numbers
/// (`25.0`, `6.5`, `200.0`).
pub fn format_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}
