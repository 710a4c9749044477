//! The single analysis operation: readings in, recommendation out.

use serde::Serialize;
use tracing::{info, warn};

use crate::catalog::{Catalog, CropProfile, OptimalConditions};
use crate::confidence::{ConfidenceRange, synthesize_confidence};
use crate::error::AdvisorError;
use crate::input::{RawInput, SoilWeatherInput, ValidationPolicy, validate};
use crate::justification::{Assessment, ReasonTemplates, explain_with};
use crate::random::RandomSource;
use crate::selector::select_crop;

/// Result of one analysis. Built fresh per request and owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub crop: CropProfile,
    pub confidence_pct: f64,
    /// pH, temperature, and rainfall reasons, in that order.
    pub reasons: Vec<String>,
    pub input: SoilWeatherInput,
    pub assessment: Assessment,
}

/// Static data plus policy needed to answer analysis requests.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Advisor {
    catalog: Catalog,
    confidence: ConfidenceRange,
    templates: ReasonTemplates,
    optimal_conditions: OptimalConditions,
    policy: ValidationPolicy,
}

impl Advisor {
    pub fn new(catalog: Catalog, confidence: ConfidenceRange) -> Self {
        Self {
            catalog,
            confidence,
            ..Self::default()
        }
    }

    pub fn with_templates(mut self, templates: ReasonTemplates) -> Self {
        self.templates = templates;
        self
    }

    pub fn with_optimal_conditions(mut self, optimal_conditions: OptimalConditions) -> Self {
        self.optimal_conditions = optimal_conditions;
        self
    }

    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn confidence_range(&self) -> ConfidenceRange {
        self.confidence
    }

    pub fn optimal_conditions(&self) -> &OptimalConditions {
        &self.optimal_conditions
    }

    pub fn policy(&self) -> ValidationPolicy {
        self.policy
    }

    /// Recommend a crop for already-validated readings.
    ///
    /// Draws from `rng` exactly twice: first the crop, then the confidence.
    pub fn recommend(&self, input: SoilWeatherInput, rng: &mut impl RandomSource) -> Recommendation {
        let crop = select_crop(&self.catalog, rng).clone();
        let confidence_pct = synthesize_confidence(self.confidence, rng);
        let reasons = explain_with(&self.templates, &input, &crop);
        let assessment = Assessment::of(&input);

        info!(
            crop = %crop.name,
            confidence_pct,
            ph = ?assessment.ph,
            temperature = ?assessment.temperature,
            rainfall = ?assessment.rainfall,
            "recommendation_generated"
        );

        Recommendation {
            crop,
            confidence_pct,
            reasons,
            input,
            assessment,
        }
    }

    /// Validate raw readings under the advisor's policy, then recommend.
    pub fn recommend_raw(
        &self,
        raw: RawInput,
        rng: &mut impl RandomSource,
    ) -> Result<Recommendation, AdvisorError> {
        let input = validate(raw, self.policy).map_err(|e| {
            warn!(field = ?e.field, value = e.value, policy = self.policy.as_str(), "input_rejected");
            e
        })?;
        Ok(self.recommend(input, rng))
    }
}
