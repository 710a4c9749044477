//! Crop recommendations from soil and weather readings.
//!
//! The core takes seven readings (N, P, K, pH, temperature, humidity,
//! rainfall), validates them, picks a crop from a fixed catalog, draws a
//! confidence percentage, and explains the pick with three range-based
//! reasons. Randomness comes from an injected [`random::RandomSource`], so a
//! run is reproducible under a fixed seed or a scripted source.
//!
//! - `input`: field bounds and validation
//! - `catalog`: crop metadata
//! - `selector`, `confidence`, `justification`: the three steps of an analysis
//! - `advisor`: ties the steps together behind `Advisor::recommend`
//! - `config`, `logging`, `report`: the command-line front end's plumbing

pub mod advisor;
pub mod catalog;
pub mod confidence;
pub mod config;
pub mod error;
pub mod input;
pub mod justification;
pub mod logging;
pub mod random;
pub mod report;
pub mod selector;

pub use advisor::{Advisor, Recommendation};
pub use catalog::{Catalog, CropProfile, OptimalConditions, WaterNeed};
pub use confidence::{ConfidenceRange, synthesize_confidence};
pub use error::{AdvisorError, ConfigurationError, ValidationError};
pub use input::{Field, RawInput, SoilWeatherInput, ValidationPolicy, validate};
pub use justification::{ReasonTemplates, explain};
pub use random::{RandomSource, RngSource, SequenceSource};
pub use selector::select_crop;
