//! Terminal rendering of recommendations and the crop catalog.

use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::advisor::Recommendation;
use crate::catalog::{Catalog, OptimalConditions};
use crate::input::{Field, RawInput};
use crate::justification::format_value;

/// Number of cells in the confidence bar.
const BAR_CELLS: usize = 20;

/// Recommendation together with the static conditions panel, as emitted in JSON mode.
#[derive(Debug, Serialize)]
pub struct RecommendationReport<'a> {
    #[serde(flatten)]
    pub recommendation: &'a Recommendation,
    pub optimal_conditions: &'a OptimalConditions,
}

/// Pads `s` with spaces to `width` terminal columns.
fn pad_to_width(s: &str, width: usize) -> String {
    let current = UnicodeWidthStr::width(s);
    let mut out = s.to_string();
    out.extend(std::iter::repeat_n(' ', width.saturating_sub(current)));
    out
}

/// Draws a bar with one filled cell per 5% of confidence.
pub fn confidence_bar(confidence_pct: f64) -> String {
    let ratio = (confidence_pct / 100.0).clamp(0.0, 1.0);
    let filled = ((ratio * BAR_CELLS as f64).round() as usize).min(BAR_CELLS);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(BAR_CELLS - filled))
}

pub fn render_text(rec: &Recommendation, panel: &OptimalConditions) -> String {
    let crop = &rec.crop;
    let mut lines = vec![
        format!("{}  Recommended Crop: {}", crop.display_icon(), crop.name),
        String::new(),
        format!("Confidence: {:.2}%", rec.confidence_pct),
        confidence_bar(rec.confidence_pct),
        String::new(),
        "Why this crop is recommended:".to_string(),
    ];
    lines.extend(rec.reasons.iter().map(|r| format!("  ✓ {}", r)));

    lines.push(String::new());
    let details = [
        ("Growing season", crop.growing_season.as_str()),
        ("Water need", crop.water_need.label()),
        ("Expected yield", crop.expected_yield.as_str()),
    ];
    lines.extend(
        details
            .iter()
            .map(|(label, value)| format!("  {} {}", pad_to_width(label, 16), value)),
    );

    lines.push(String::new());
    lines.push(format!("Optimal Conditions for {}", crop.name));
    let conditions = [
        ("Ideal pH Range", panel.ideal_ph_range.as_str()),
        ("Temperature Range", panel.temperature_range.as_str()),
        ("Rainfall Needs", panel.rainfall_needs.as_str()),
        ("Growing Season", panel.growing_season.as_str()),
    ];
    lines.extend(
        conditions
            .iter()
            .map(|(label, value)| format!("  {} {}", pad_to_width(label, 18), value)),
    );

    lines.join("\n")
}

pub fn render_json(rec: &Recommendation, panel: &OptimalConditions) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&RecommendationReport {
        recommendation: rec,
        optimal_conditions: panel,
    })
}

pub fn render_catalog_text(catalog: &Catalog) -> String {
    let name_width = catalog
        .crops()
        .iter()
        .map(|c| UnicodeWidthStr::width(c.name.as_str()))
        .max()
        .unwrap_or(0)
        .max("Crop".len());
    let season_width = catalog
        .crops()
        .iter()
        .map(|c| UnicodeWidthStr::width(c.growing_season.as_str()))
        .max()
        .unwrap_or(0)
        .max("Season".len());

    let mut lines = vec![format!(
        "    {} {} {} Yield",
        pad_to_width("Crop", name_width),
        pad_to_width("Season", season_width),
        pad_to_width("Water", 6),
    )];
    for crop in catalog.crops() {
        lines.push(format!(
            "{} {} {} {} {}",
            pad_to_width(crop.display_icon(), 3),
            pad_to_width(&crop.name, name_width),
            pad_to_width(&crop.growing_season, season_width),
            pad_to_width(crop.water_need.label(), 6),
            crop.expected_yield,
        ));
    }
    lines.join("\n")
}

fn field_number(field: Field, value: f64) -> String {
    if field.is_count() {
        format!("{}", value.round() as i64)
    } else {
        format_value(value)
    }
}

/// Table of every reading: unit, accepted range, step, and default.
pub fn render_fields_text(defaults: &RawInput) -> String {
    let mut lines = vec![format!(
        "{} {} {} {} Default",
        pad_to_width("Field", 16),
        pad_to_width("Unit", 5),
        pad_to_width("Range", 14),
        pad_to_width("Step", 5),
    )];
    for field in Field::ALL {
        let (min, max) = field.bounds();
        let range = format!("{} - {}", field_number(field, min), field_number(field, max));
        let step = if field.is_count() {
            field_number(field, field.step())
        } else {
            format_value(field.step())
        };
        lines.push(format!(
            "{} {} {} {} {}",
            pad_to_width(field.label(), 16),
            pad_to_width(field.unit(), 5),
            pad_to_width(&range, 14),
            pad_to_width(&step, 5),
            field_number(field, defaults.value(field)),
        ));
    }
    lines.join("\n")
}

pub fn render_catalog_json(catalog: &Catalog) -> serde_json::Result<String> {
    serde_json::to_string_pretty(catalog)
}
