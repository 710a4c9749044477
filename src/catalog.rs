//! The fixed set of crops the advisor can recommend.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Icon shown for a crop that has none of its own.
pub const FALLBACK_ICON: &str = "🌱";

/// How much water a crop needs over its season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaterNeed {
    Low,
    Medium,
    High,
}

impl WaterNeed {
    pub fn label(&self) -> &'static str {
        match self {
            WaterNeed::Low => "Low",
            WaterNeed::Medium => "Medium",
            WaterNeed::High => "High",
        }
    }
}

impl fmt::Display for WaterNeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Static agronomic metadata for one crop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropProfile {
    pub name: String,
    #[serde(default)]
    pub icon: String,
    pub growing_season: String,
    pub water_need: WaterNeed,
    pub expected_yield: String,
}

impl CropProfile {
    pub fn new(
        name: &str,
        icon: &str,
        growing_season: &str,
        water_need: WaterNeed,
        expected_yield: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            icon: icon.to_string(),
            growing_season: growing_season.to_string(),
            water_need,
            expected_yield: expected_yield.to_string(),
        }
    }

    /// The crop's icon, or [`FALLBACK_ICON`] when none is configured.
    pub fn display_icon(&self) -> &str {
        let icon = self.icon.trim();
        if icon.is_empty() { FALLBACK_ICON } else { icon }
    }
}

/// A non-empty list of crops with unique names. Every entry carries an icon;
/// blank ones are replaced with [`FALLBACK_ICON`] on construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    crops: Vec<CropProfile>,
}

impl Catalog {
    /// Build a catalog, rejecting empty lists, blank names, and names that
    /// repeat (compared case-insensitively).
    pub fn new(mut crops: Vec<CropProfile>) -> Result<Self, ConfigurationError> {
        if crops.is_empty() {
            return Err(ConfigurationError::EmptyCatalog);
        }

        let mut seen = HashSet::new();
        for crop in &crops {
            let key = crop.name.trim().to_lowercase();
            if key.is_empty() {
                return Err(ConfigurationError::BlankCropName);
            }
            if !seen.insert(key) {
                return Err(ConfigurationError::DuplicateCrop(crop.name.clone()));
            }
        }

        for crop in &mut crops {
            crop.icon = crop.display_icon().to_string();
        }

        Ok(Self { crops })
    }

    /// The ten crops the advisor ships with.
    pub fn builtin() -> Self {
        Self {
            crops: builtin_crops(),
        }
    }

    pub fn crops(&self) -> &[CropProfile] {
        &self.crops
    }

    pub fn len(&self) -> usize {
        self.crops.len()
    }

    /// A catalog holds at least one crop, so this is false for any value
    /// built through [`Catalog::new`] or [`Catalog::builtin`].
    pub fn is_empty(&self) -> bool {
        self.crops.is_empty()
    }

    /// Look a crop up by name, ignoring case.
    pub fn find(&self, name: &str) -> Option<&CropProfile> {
        let name = name.trim();
        self.crops.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_crops() -> Vec<CropProfile> {
    use WaterNeed::*;

    vec![
        CropProfile::new("Rice", "🌾", "Kharif (June-November)", High, "3-6 t/ha"),
        CropProfile::new("Wheat", "🌾", "Rabi (October-April)", Medium, "3-4 t/ha"),
        CropProfile::new("Maize", "🌽", "Kharif (June-September)", Medium, "5-8 t/ha"),
        CropProfile::new("Soybean", "🫘", "Kharif (June-October)", Medium, "2-3 t/ha"),
        CropProfile::new("Orange", "🍊", "Perennial (harvest November-March)", Medium, "15-25 t/ha"),
        CropProfile::new("Papaya", "🍈", "Perennial (harvest year-round)", High, "40-60 t/ha"),
        CropProfile::new("Cotton", "🧵", "Kharif (April-November)", Medium, "1.5-2.5 t/ha lint"),
        CropProfile::new("Coffee", "☕", "Perennial (harvest October-February)", High, "0.8-1.5 t/ha"),
        CropProfile::new("Coconut", "🥥", "Perennial (harvest year-round)", High, "80-100 nuts/palm/year"),
        CropProfile::new("Mango", "🥭", "Perennial (harvest April-July)", Low, "8-12 t/ha"),
    ]
}

/// The "optimal conditions" panel shown beneath a recommendation.
///
/// These are static display values; they do not vary with the input or the
/// selected crop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimalConditions {
    pub ideal_ph_range: String,
    pub temperature_range: String,
    pub rainfall_needs: String,
    pub growing_season: String,
}

impl Default for OptimalConditions {
    fn default() -> Self {
        Self {
            ideal_ph_range: "6.0-7.0".to_string(),
            temperature_range: "20-30°C".to_string(),
            rainfall_needs: "150-250mm".to_string(),
            growing_season: "3-5 months".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_contents() {
        let catalog = Catalog::builtin();
        let names: Vec<&str> = catalog.crops().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Rice", "Wheat", "Maize", "Soybean", "Orange", "Papaya", "Cotton", "Coffee",
                "Coconut", "Mango"
            ]
        );
    }

    #[test]
    fn test_builtin_catalog_passes_validation() {
        let crops = Catalog::builtin().crops().to_vec();
        assert!(Catalog::new(crops).is_ok());
    }

    #[test]
    fn test_builtin_icons() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.find("rice").unwrap().display_icon(), "🌾");
        assert_eq!(catalog.find("Maize").unwrap().display_icon(), "🌽");
        assert_eq!(catalog.find("MANGO").unwrap().display_icon(), "🥭");
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert_eq!(Catalog::new(vec![]), Err(ConfigurationError::EmptyCatalog));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let crops = vec![
            CropProfile::new("Rice", "🌾", "Kharif", WaterNeed::High, "3 t/ha"),
            CropProfile::new("rice ", "🌾", "Rabi", WaterNeed::High, "3 t/ha"),
        ];
        assert_eq!(
            Catalog::new(crops),
            Err(ConfigurationError::DuplicateCrop("rice ".to_string()))
        );
    }

    #[test]
    fn test_blank_name_rejected() {
        let crops = vec![CropProfile::new("  ", "", "Kharif", WaterNeed::Low, "1 t/ha")];
        assert_eq!(Catalog::new(crops), Err(ConfigurationError::BlankCropName));
    }

    #[test]
    fn test_missing_icon_falls_back() {
        let crop = CropProfile::new("Millet", "", "Kharif", WaterNeed::Low, "1-2 t/ha");
        assert_eq!(crop.display_icon(), FALLBACK_ICON);
    }

    #[test]
    fn test_catalog_resolves_missing_icons() {
        let catalog = Catalog::new(vec![
            CropProfile::new("Millet", "", "Kharif", WaterNeed::Low, "1-2 t/ha"),
            CropProfile::new("Barley", "  ", "Rabi", WaterNeed::Medium, "2-3 t/ha"),
            CropProfile::new("Maize", "🌽", "Kharif", WaterNeed::Medium, "5-8 t/ha"),
        ])
        .unwrap();
        assert_eq!(catalog.find("Millet").unwrap().icon, FALLBACK_ICON);
        assert_eq!(catalog.find("Barley").unwrap().icon, FALLBACK_ICON);
        assert_eq!(catalog.find("Maize").unwrap().icon, "🌽");
    }

    #[test]
    fn test_crop_profile_deserialization() {
        let toml_str = r#"
name = "Millet"
growing_season = "Kharif"
water_need = "Low"
expected_yield = "1-2 t/ha"
"#;
        let crop: CropProfile = toml::from_str(toml_str).unwrap();
        assert_eq!(crop.name, "Millet");
        assert_eq!(crop.water_need, WaterNeed::Low);
        assert_eq!(crop.display_icon(), FALLBACK_ICON);
    }

    #[test]
    fn test_optimal_conditions_defaults() {
        let panel = OptimalConditions::default();
        assert_eq!(panel.ideal_ph_range, "6.0-7.0");
        assert_eq!(panel.temperature_range, "20-30°C");
        assert_eq!(panel.rainfall_needs, "150-250mm");
        assert_eq!(panel.growing_season, "3-5 months");
    }
}
