use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::advisor::Advisor;
use crate::catalog::{Catalog, CropProfile, OptimalConditions};
use crate::confidence::ConfidenceRange;
use crate::error::ConfigurationError;
use crate::input::ValidationPolicy;
use crate::justification::ReasonTemplates;

/// Name of the per-directory override file.
pub const PROJECT_CONFIG_FILE: &str = ".crop-advisor";

/// Status of config file loading
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigLoadStatus {
    /// Config loaded successfully from existing file
    Loaded,
    /// Created default config file (first run)
    Created,
    /// Error occurred during loading, using defaults.
    Error(String),
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Range the confidence percentage is drawn from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceConfig {
    pub low: f64,
    pub high: f64,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        let range = ConfidenceRange::default();
        Self {
            low: range.low(),
            high: range.high(),
        }
    }
}

/// How out-of-range readings are handled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ValidationConfig {
    pub policy: ValidationPolicy,
}

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub confidence: ConfidenceConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub messages: ReasonTemplates,
    #[serde(default)]
    pub optimal_conditions: OptimalConditions,
    /// Replacement crop catalog. The built-in catalog is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crops: Option<Vec<CropProfile>>,
}

impl Config {
    /// Turn the static data in this config into a ready advisor.
    pub fn build_advisor(&self) -> Result<Advisor, ConfigurationError> {
        let catalog = match &self.crops {
            Some(crops) => Catalog::new(crops.clone())?,
            None => Catalog::builtin(),
        };
        let confidence = ConfidenceRange::new(self.confidence.low, self.confidence.high)?;

        Ok(Advisor::new(catalog, confidence)
            .with_templates(self.messages.clone())
            .with_optimal_conditions(self.optimal_conditions.clone())
            .with_policy(self.validation.policy))
    }
}

/// Partial logging configuration for project overrides.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PartialLoggingConfig {
    pub level: Option<String>,
}

/// Partial confidence configuration for project overrides.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PartialConfidenceConfig {
    pub low: Option<f64>,
    pub high: Option<f64>,
}

/// Partial validation configuration for project overrides.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PartialValidationConfig {
    pub policy: Option<ValidationPolicy>,
}

/// Partial message templates for project overrides.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PartialMessagesConfig {
    pub ph_optimal: Option<String>,
    pub ph_acidic: Option<String>,
    pub ph_alkaline: Option<String>,
    pub temperature_ideal: Option<String>,
    pub temperature_tolerable: Option<String>,
    pub rainfall_suitable: Option<String>,
    pub rainfall_low: Option<String>,
    pub rainfall_high: Option<String>,
}

/// Partial optimal-conditions panel for project overrides.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PartialOptimalConditions {
    pub ideal_ph_range: Option<String>,
    pub temperature_range: Option<String>,
    pub rainfall_needs: Option<String>,
    pub growing_season: Option<String>,
}

/// Project-specific configuration where every field is optional.
/// Parsed from `.crop-advisor` files. Fields that are `None` inherit from the global config.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PartialConfig {
    pub logging: PartialLoggingConfig,
    pub confidence: PartialConfidenceConfig,
    pub validation: PartialValidationConfig,
    pub messages: PartialMessagesConfig,
    pub optimal_conditions: PartialOptimalConditions,
    pub crops: Option<Vec<CropProfile>>,
}

fn pick(project: &Option<String>, global: &str) -> String {
    project.clone().unwrap_or_else(|| global.to_string())
}

/// Merge a global config with a project-level partial config.
/// Project values override global values where present; a project crop list
/// replaces the global one wholesale.
pub fn merge_config(global: &Config, project: &PartialConfig) -> Config {
    let messages = &project.messages;
    let panel = &project.optimal_conditions;

    Config {
        logging: LoggingConfig {
            level: pick(&project.logging.level, &global.logging.level),
        },
        confidence: ConfidenceConfig {
            low: project.confidence.low.unwrap_or(global.confidence.low),
            high: project.confidence.high.unwrap_or(global.confidence.high),
        },
        validation: ValidationConfig {
            policy: project
                .validation
                .policy
                .unwrap_or(global.validation.policy),
        },
        messages: ReasonTemplates {
            ph_optimal: pick(&messages.ph_optimal, &global.messages.ph_optimal),
            ph_acidic: pick(&messages.ph_acidic, &global.messages.ph_acidic),
            ph_alkaline: pick(&messages.ph_alkaline, &global.messages.ph_alkaline),
            temperature_ideal: pick(
                &messages.temperature_ideal,
                &global.messages.temperature_ideal,
            ),
            temperature_tolerable: pick(
                &messages.temperature_tolerable,
                &global.messages.temperature_tolerable,
            ),
            rainfall_suitable: pick(
                &messages.rainfall_suitable,
                &global.messages.rainfall_suitable,
            ),
            rainfall_low: pick(&messages.rainfall_low, &global.messages.rainfall_low),
            rainfall_high: pick(&messages.rainfall_high, &global.messages.rainfall_high),
        },
        optimal_conditions: OptimalConditions {
            ideal_ph_range: pick(
                &panel.ideal_ph_range,
                &global.optimal_conditions.ideal_ph_range,
            ),
            temperature_range: pick(
                &panel.temperature_range,
                &global.optimal_conditions.temperature_range,
            ),
            rainfall_needs: pick(
                &panel.rainfall_needs,
                &global.optimal_conditions.rainfall_needs,
            ),
            growing_season: pick(
                &panel.growing_season,
                &global.optimal_conditions.growing_season,
            ),
        },
        crops: project.crops.clone().or_else(|| global.crops.clone()),
    }
}

/// Loaded configuration with metadata
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub config_path: PathBuf,
    pub project_config_path: Option<PathBuf>,
    pub status: ConfigLoadStatus,
}

/// Get the platform-appropriate config directory
fn get_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("dev", "crop-advisor", "crop-advisor")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the full path to the config file
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.crop-advisor in current working directory).
pub fn get_project_config_path() -> Option<PathBuf> {
    let path = std::env::current_dir().ok()?.join(PROJECT_CONFIG_FILE);
    if path.exists() { Some(path) } else { None }
}

/// Load a project config (.crop-advisor) from the given path.
fn load_project_config(path: &Path) -> Result<PartialConfig, String> {
    let contents = fs::read_to_string(path).map_err(|e| {
        warn!(path = ?path, error = %e, "project_config_read_failed");
        format!("Failed to read {}: {}", PROJECT_CONFIG_FILE, e)
    })?;

    toml::from_str::<PartialConfig>(&contents).map_err(|e| {
        warn!(path = ?path, error = %e, "project_config_parse_failed");
        format!("Invalid {}: {}", PROJECT_CONFIG_FILE, e)
    })
}

/// Load configuration from file, environment, and defaults.
///
/// With `explicit_path` the given file is read as-is and never created;
/// otherwise the platform config file is used, and written with defaults
/// when missing if `create_missing` is set.
pub fn load_config(explicit_path: Option<&Path>, create_missing: bool) -> LoadedConfig {
    let (config_path, (mut config, status)) = match explicit_path {
        Some(path) => (path.to_path_buf(), load_existing_config(path)),
        None => match get_config_path() {
            Some(path) => {
                let loaded = load_global_config(&path, create_missing);
                (path, loaded)
            }
            None => {
                warn!("Could not determine config directory, using defaults");
                (
                    PathBuf::from("config.toml"),
                    (
                        Config::default(),
                        ConfigLoadStatus::Error(
                            "Could not determine config directory".to_string(),
                        ),
                    ),
                )
            }
        },
    };

    debug!("Config path: {:?}", config_path);

    // Check for project-level override file
    let project_config_path = get_project_config_path();
    if let Some(ref project_path) = project_config_path {
        match load_project_config(project_path) {
            Ok(partial) => {
                config = merge_config(&config, &partial);
                info!(path = ?project_path, "project_config_loaded");
            }
            Err(e) => {
                warn!(path = ?project_path, error = %e, "project_config_error");
                // Keep using global config only
            }
        }
    }

    let config = apply_env_overrides(config);

    LoadedConfig {
        config,
        config_path,
        project_config_path,
        status,
    }
}

/// Save a config to the given file path.
pub fn save_config(config: &Config, config_path: &Path) -> Result<(), String> {
    let toml_content = toml::to_string_pretty(config).map_err(|e| {
        warn!(error = %e, "config_save_serialize_failed");
        format!("Failed to serialize config: {}", e)
    })?;

    if let Some(parent) = config_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| {
            warn!(path = ?parent, error = %e, "config_save_mkdir_failed");
            format!("Failed to create config directory: {}", e)
        })?;
    }

    fs::write(config_path, &toml_content).map_err(|e| {
        warn!(path = ?config_path, error = %e, "config_save_write_failed");
        format!("Failed to write config: {}", e)
    })?;

    info!(path = ?config_path, "config_saved");
    Ok(())
}

/// Parse a config file's contents, falling back to defaults on error.
fn parse_config(contents: &str, config_path: &Path) -> (Config, ConfigLoadStatus) {
    match toml::from_str::<Config>(contents) {
        Ok(config) => {
            info!("Loaded config from {:?}", config_path);
            (config, ConfigLoadStatus::Loaded)
        }
        Err(e) => {
            warn!(
                "Config file malformed at {:?}: {}. Using defaults.",
                config_path, e
            );
            (
                Config::default(),
                ConfigLoadStatus::Error(format!("Malformed TOML: {}", e)),
            )
        }
    }
}

/// Map a read failure to defaults plus an error status.
fn read_failure(config_path: &Path, e: &io::Error) -> (Config, ConfigLoadStatus) {
    let message = match e.kind() {
        io::ErrorKind::NotFound => "Config file not found".to_string(),
        io::ErrorKind::PermissionDenied => "Permission denied reading config".to_string(),
        _ => format!("Read error: {}", e),
    };
    warn!(
        "Error reading config at {:?}: {}. Using defaults.",
        config_path, e
    );
    (Config::default(), ConfigLoadStatus::Error(message))
}

/// Load a config file that must already exist.
fn load_existing_config(config_path: &Path) -> (Config, ConfigLoadStatus) {
    match fs::read_to_string(config_path) {
        Ok(contents) => parse_config(&contents, config_path),
        Err(e) => read_failure(config_path, &e),
    }
}

/// Load the global config file, creating it first only when asked to.
fn load_global_config(config_path: &Path, create_missing: bool) -> (Config, ConfigLoadStatus) {
    if create_missing {
        load_or_create_config(config_path)
    } else {
        load_existing_config(config_path)
    }
}

/// Write a default config to `config_path`, refusing to replace an existing
/// file unless `force` is set.
pub fn init_config(config_path: &Path, force: bool) -> Result<(), String> {
    if config_path.exists() && !force {
        return Err(format!(
            "Config already exists at {} (use --force to overwrite)",
            config_path.display()
        ));
    }
    save_config(&Config::default(), config_path)
}

/// Load config from file, or create default if not exists
fn load_or_create_config(config_path: &Path) -> (Config, ConfigLoadStatus) {
    match fs::read_to_string(config_path) {
        Ok(contents) => parse_config(&contents, config_path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => create_default_config(config_path),
        Err(e) => read_failure(config_path, &e),
    }
}

/// Create the default config file
fn create_default_config(config_path: &Path) -> (Config, ConfigLoadStatus) {
    let config = Config::default();

    match save_config(&config, config_path) {
        Ok(()) => {
            info!("Created default config at {:?}", config_path);
            (config, ConfigLoadStatus::Created)
        }
        Err(e) => {
            warn!(
                "Could not write default config to {:?}: {}. Continuing without file.",
                config_path, e
            );
            (config, ConfigLoadStatus::Error(e))
        }
    }
}

/// Apply environment variable overrides to config
fn apply_env_overrides(config: Config) -> Config {
    apply_overrides_from(config, |key| env::var(key).ok())
}

fn apply_overrides_from(mut config: Config, lookup: impl Fn(&str) -> Option<String>) -> Config {
    if let Some(level) = lookup("CROP_ADVISOR_LOG") {
        debug!("Overriding logging.level from CROP_ADVISOR_LOG");
        config.logging.level = level;
    }

    for (key, slot) in [
        ("CROP_ADVISOR_CONFIDENCE_LOW", &mut config.confidence.low),
        ("CROP_ADVISOR_CONFIDENCE_HIGH", &mut config.confidence.high),
    ] {
        if let Some(raw) = lookup(key) {
            match raw.trim().parse::<f64>() {
                Ok(value) => {
                    debug!("Overriding confidence from {}", key);
                    *slot = value;
                }
                Err(e) => warn!(key, value = %raw, error = %e, "env_override_ignored"),
            }
        }
    }

    if let Some(raw) = lookup("CROP_ADVISOR_VALIDATION") {
        match raw.parse::<ValidationPolicy>() {
            Ok(policy) => {
                debug!("Overriding validation.policy from CROP_ADVISOR_VALIDATION");
                config.validation.policy = policy;
            }
            Err(e) => warn!(value = %raw, error = %e, "env_override_ignored"),
        }
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::WaterNeed;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.confidence.low, 75.0);
        assert_eq!(config.confidence.high, 95.0);
        assert_eq!(config.validation.policy, ValidationPolicy::Reject);
        assert!(config.crops.is_none());
        assert_eq!(config.messages, ReasonTemplates::default());
    }

    #[test]
    fn test_default_config_builds_builtin_advisor() {
        let advisor = Config::default().build_advisor().unwrap();
        assert_eq!(advisor.catalog().len(), 10);
        assert_eq!(advisor.confidence_range(), ConfidenceRange::STANDARD);
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
[logging]
level = "debug"

[confidence]
low = 82.0
high = 97.0

[validation]
policy = "clamp"

[messages]
ph_optimal = "pH {value} suits {crop}"
"#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.confidence.low, 82.0);
        assert_eq!(config.confidence.high, 97.0);
        assert_eq!(config.validation.policy, ValidationPolicy::Clamp);
        assert_eq!(config.messages.ph_optimal, "pH {value} suits {crop}");
        // Unspecified templates keep their defaults
        assert_eq!(
            config.messages.rainfall_low,
            ReasonTemplates::default().rainfall_low
        );
    }

    #[test]
    fn test_config_with_crops() {
        let toml_str = r#"
[[crops]]
name = "Millet"
icon = "🌾"
growing_season = "Kharif"
water_need = "Low"
expected_yield = "1-2 t/ha"

[[crops]]
name = "Barley"
growing_season = "Rabi"
water_need = "Medium"
expected_yield = "2-3 t/ha"
"#;

        let config: Config = toml::from_str(toml_str).unwrap();
        let advisor = config.build_advisor().unwrap();
        assert_eq!(advisor.catalog().len(), 2);
        assert_eq!(
            advisor.catalog().find("barley").unwrap().water_need,
            WaterNeed::Medium
        );
    }

    #[test]
    fn test_empty_crop_list_is_configuration_error() {
        let config: Config = toml::from_str("crops = []\n").unwrap();
        assert_eq!(
            config.build_advisor(),
            Err(ConfigurationError::EmptyCatalog)
        );
    }

    #[test]
    fn test_inverted_confidence_is_configuration_error() {
        let config: Config = toml::from_str("[confidence]\nlow = 96.0\nhigh = 80.0\n").unwrap();
        assert!(matches!(
            config.build_advisor(),
            Err(ConfigurationError::InvalidConfidenceRange { .. })
        ));
    }

    #[test]
    fn test_confidence_bounds_beyond_hundredths_rejected() {
        let config: Config =
            toml::from_str("[confidence]\nlow = 80.004\nhigh = 80.006\n").unwrap();
        assert!(matches!(
            config.build_advisor(),
            Err(ConfigurationError::InvalidConfidenceRange { .. })
        ));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let toml_str = r#"
[logging]
level = "warn"
unknown_key = "should be ignored"

[unknown_section]
foo = "bar"
"#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let mut config = Config::default();
        config.crops = Some(Catalog::builtin().crops().to_vec());
        config.validation.policy = ValidationPolicy::Clamp;

        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_config_empty() {
        let partial: PartialConfig = toml::from_str("").unwrap();
        assert!(partial.logging.level.is_none());
        assert!(partial.confidence.low.is_none());
        assert!(partial.validation.policy.is_none());
        assert!(partial.messages.ph_optimal.is_none());
        assert!(partial.crops.is_none());
    }

    #[test]
    fn test_merge_config_no_overrides() {
        let global = Config::default();
        let merged = merge_config(&global, &PartialConfig::default());
        assert_eq!(merged, global);
    }

    #[test]
    fn test_merge_config_partial_overrides() {
        let mut global = Config::default();
        global.messages.rainfall_high = "Too wet ({value}mm) for {crop}".to_string();

        let partial: PartialConfig = toml::from_str(
            r#"
[confidence]
high = 90.0

[messages]
ph_acidic = "Acidic {value} ok for {crop}"

[optimal_conditions]
rainfall_needs = "120-220mm"
"#,
        )
        .unwrap();
        let merged = merge_config(&global, &partial);

        // Overridden fields
        assert_eq!(merged.confidence.high, 90.0);
        assert_eq!(merged.messages.ph_acidic, "Acidic {value} ok for {crop}");
        assert_eq!(merged.optimal_conditions.rainfall_needs, "120-220mm");

        // Inherited fields
        assert_eq!(merged.confidence.low, 75.0);
        assert_eq!(merged.messages.rainfall_high, "Too wet ({value}mm) for {crop}");
        assert_eq!(merged.optimal_conditions.ideal_ph_range, "6.0-7.0");
        assert_eq!(merged.logging.level, "info");
    }

    #[test]
    fn test_merge_config_project_crops_replace_global() {
        let mut global = Config::default();
        global.crops = Some(Catalog::builtin().crops().to_vec());
        let partial: PartialConfig = toml::from_str(
            r#"
[[crops]]
name = "Millet"
growing_season = "Kharif"
water_need = "Low"
expected_yield = "1-2 t/ha"
"#,
        )
        .unwrap();

        let merged = merge_config(&global, &partial);
        assert_eq!(merged.crops.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("CROP_ADVISOR_LOG", "trace"),
            ("CROP_ADVISOR_CONFIDENCE_LOW", "82"),
            ("CROP_ADVISOR_CONFIDENCE_HIGH", "97.5"),
            ("CROP_ADVISOR_VALIDATION", "clamp"),
        ]);
        let config = apply_overrides_from(Config::default(), |k| {
            vars.get(k).map(|v| v.to_string())
        });

        assert_eq!(config.logging.level, "trace");
        assert_eq!(config.confidence.low, 82.0);
        assert_eq!(config.confidence.high, 97.5);
        assert_eq!(config.validation.policy, ValidationPolicy::Clamp);
    }

    #[test]
    fn test_env_overrides_ignore_garbage() {
        let config = apply_overrides_from(Config::default(), |k| match k {
            "CROP_ADVISOR_CONFIDENCE_LOW" => Some("lots".to_string()),
            "CROP_ADVISOR_VALIDATION" => Some("shrug".to_string()),
            _ => None,
        });
        assert_eq!(config.confidence.low, 75.0);
        assert_eq!(config.validation.policy, ValidationPolicy::Reject);
    }

    #[test]
    fn test_load_or_create_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let (config, status) = load_or_create_config(&path);
        assert_eq!(status, ConfigLoadStatus::Created);
        assert_eq!(config, Config::default());
        assert!(path.exists());

        let (reloaded, status) = load_or_create_config(&path);
        assert_eq!(status, ConfigLoadStatus::Loaded);
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_load_existing_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let (config, status) = load_existing_config(&path);
        assert_eq!(config, Config::default());
        assert!(matches!(status, ConfigLoadStatus::Error(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_load_global_without_create_leaves_dir_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crop-advisor").join("config.toml");

        let (config, status) = load_global_config(&path, false);
        assert_eq!(config, Config::default());
        assert!(matches!(status, ConfigLoadStatus::Error(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_init_config_on_empty_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crop-advisor").join("config.toml");

        // A non-creating load, as done before `config init`, must not block it
        let _ = load_global_config(&path, false);
        init_config(&path, false).unwrap();
        assert!(path.exists());

        let (loaded, status) = load_existing_config(&path);
        assert_eq!(status, ConfigLoadStatus::Loaded);
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_init_config_refuses_existing_file_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();

        let err = init_config(&path, false).unwrap_err();
        assert!(err.starts_with("Config already exists"));
        let (kept, _) = load_existing_config(&path);
        assert_eq!(kept.logging.level, "debug");

        init_config(&path, true).unwrap();
        let (replaced, _) = load_existing_config(&path);
        assert_eq!(replaced, Config::default());
    }

    #[test]
    fn test_malformed_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[confidence\nlow = ").unwrap();

        let (config, status) = load_or_create_config(&path);
        assert_eq!(config, Config::default());
        match status {
            ConfigLoadStatus::Error(msg) => assert!(msg.starts_with("Malformed TOML")),
            other => panic!("expected error status, got {:?}", other),
        }
    }

    #[test]
    fn test_save_config_writes_readable_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.confidence.low = 82.0;
        config.confidence.high = 97.0;

        save_config(&config, &path).unwrap();
        let (loaded, status) = load_existing_config(&path);
        assert_eq!(status, ConfigLoadStatus::Loaded);
        assert_eq!(loaded.confidence.low, 82.0);
        assert_eq!(loaded.confidence.high, 97.0);
    }
}
