//! Validated per-domain inference results.

use shared::{
    domain::{
        ConfidenceScore, Domain, FuzzyRange, Goal, MuscleMassCategory, ReadinessLabel,
    },
    error::DomainError,
    ordered_map::InputMemberships,
    protocol::{BodyCompositionResponse, NutritionResponse, OneRepMaxResponse, ReadinessResponse},
};

use tracing::warn;

use crate::error::InferenceError;

#[derive(Debug, Clone, PartialEq)]
pub struct ReadinessResult {
    pub intensity: f64,
    pub label: ReadinessLabel,
    pub confidence: ConfidenceScore,
    pub input_memberships: InputMemberships,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BodyCompositionResult {
    pub body_fat: FuzzyRange,
    pub muscle_mass_category: MuscleMassCategory,
    pub bmi: f64,
    pub bmi_interpretation: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrengthResult {
    pub one_rm: FuzzyRange,
    pub confidence: ConfidenceScore,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NutritionResult {
    pub calories: FuzzyRange,
    pub protein: FuzzyRange,
    pub carbs: FuzzyRange,
    pub fat: FuzzyRange,
    pub recommendation: String,
}

fn malformed(domain: Domain) -> impl Fn(DomainError) -> InferenceError {
    move |err| InferenceError::Malformed {
        domain,
        reason: err.to_string(),
    }
}

/// Builds a range from a service triple, widening `low`/`high` to enclose `mid` when the service
/// sent them out of order. Non-finite bounds are still rejected.
fn service_range(
    domain: Domain,
    field: &'static str,
    low: f64,
    mid: f64,
    high: f64,
) -> Result<FuzzyRange, InferenceError> {
    if !(low.is_finite() && mid.is_finite() && high.is_finite()) {
        return FuzzyRange::new(low, mid, high).map_err(malformed(domain));
    }
    let (fixed_low, fixed_high) = (low.min(mid), high.max(mid));
    if (fixed_low, fixed_high) != (low, high) {
        warn!(%domain, field, low, mid, high, "service sent an unordered range; clamping around mid");
    }
    FuzzyRange::new(fixed_low, mid, fixed_high).map_err(malformed(domain))
}

impl TryFrom<ReadinessResponse> for ReadinessResult {
    type Error = InferenceError;

    fn try_from(response: ReadinessResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            intensity: response.intensity,
            label: response.label,
            confidence: ConfidenceScore::new(response.confidence)
                .map_err(malformed(Domain::Readiness))?,
            input_memberships: response.input_memberships,
            recommendation: response.recommendation,
        })
    }
}

impl TryFrom<BodyCompositionResponse> for BodyCompositionResult {
    type Error = InferenceError;

    fn try_from(response: BodyCompositionResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            body_fat: service_range(
                Domain::BodyComposition,
                "body_fat",
                response.body_fat_low,
                response.body_fat_mid,
                response.body_fat_high,
            )?,
            muscle_mass_category: response.muscle_mass_category,
            bmi: response.bmi,
            bmi_interpretation: response.bmi_interpretation,
            recommendation: response.recommendation,
        })
    }
}

impl TryFrom<OneRepMaxResponse> for StrengthResult {
    type Error = InferenceError;

    fn try_from(response: OneRepMaxResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            one_rm: service_range(
                Domain::Strength,
                "one_rm",
                response.one_rm_low,
                response.one_rm_mid,
                response.one_rm_high,
            )?,
            confidence: ConfidenceScore::new(response.confidence)
                .map_err(malformed(Domain::Strength))?,
            recommendation: response.recommendation,
        })
    }
}

impl TryFrom<NutritionResponse> for NutritionResult {
    type Error = InferenceError;

    fn try_from(response: NutritionResponse) -> Result<Self, Self::Error> {
        let range = |field, low, mid, high| service_range(Domain::Nutrition, field, low, mid, high);
        Ok(Self {
            calories: range(
                "calories",
                response.calories_low,
                response.calories_mid,
                response.calories_high,
            )?,
            protein: range(
                "protein",
                response.protein_low,
                response.protein_mid,
                response.protein_high,
            )?,
            carbs: range(
                "carbs",
                response.carbs_low,
                response.carbs_mid,
                response.carbs_high,
            )?,
            fat: range("fat", response.fat_low, response.fat_mid, response.fat_high)?,
            recommendation: response.recommendation,
        })
    }
}

/// Borrowed view of one domain's result, for code that handles the four kinds uniformly.
#[derive(Debug, Clone, Copy)]
pub enum DomainResult<'a> {
    Readiness(&'a ReadinessResult),
    BodyComposition(&'a BodyCompositionResult),
    Strength(&'a StrengthResult),
    Nutrition(&'a NutritionResult),
}

impl DomainResult<'_> {
    pub fn domain(&self) -> Domain {
        match self {
            DomainResult::Readiness(_) => Domain::Readiness,
            DomainResult::BodyComposition(_) => Domain::BodyComposition,
            DomainResult::Strength(_) => Domain::Strength,
            DomainResult::Nutrition(_) => Domain::Nutrition,
        }
    }

    pub fn confidence(&self) -> Option<ConfidenceScore> {
        match self {
            DomainResult::Readiness(result) => Some(result.confidence),
            DomainResult::Strength(result) => Some(result.confidence),
            DomainResult::BodyComposition(_) | DomainResult::Nutrition(_) => None,
        }
    }

    pub fn recommendation(&self) -> &str {
        match self {
            DomainResult::Readiness(result) => &result.recommendation,
            DomainResult::BodyComposition(result) => &result.recommendation,
            DomainResult::Strength(result) => &result.recommendation,
            DomainResult::Nutrition(result) => &result.recommendation,
        }
    }
}

/// One complete, successful dashboard batch.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainResults {
    pub readiness: ReadinessResult,
    pub body_composition: BodyCompositionResult,
    pub strength: StrengthResult,
    pub nutrition: NutritionResult,
}

impl DomainResults {
    pub fn get(&self, domain: Domain) -> DomainResult<'_> {
        match domain {
            Domain::Readiness => DomainResult::Readiness(&self.readiness),
            Domain::BodyComposition => DomainResult::BodyComposition(&self.body_composition),
            Domain::Strength => DomainResult::Strength(&self.strength),
            Domain::Nutrition => DomainResult::Nutrition(&self.nutrition),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = DomainResult<'_>> {
        Domain::ALL.into_iter().map(move |domain| self.get(domain))
    }

    pub fn summary(&self, goal: Goal) -> DashboardSummary {
        DashboardSummary {
            readiness_label: self.readiness.label,
            body_fat_mid: self.body_composition.body_fat.mid(),
            one_rm_mid: self.strength.one_rm.mid(),
            calories_mid: self.nutrition.calories.mid(),
            goal,
        }
    }
}

/// Headline numbers shown above the dashboard cards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardSummary {
    pub readiness_label: ReadinessLabel,
    pub body_fat_mid: f64,
    pub one_rm_mid: f64,
    pub calories_mid: f64,
    pub goal: Goal,
}

#[cfg(test)]
#[path = "tests/results_tests.rs"]
mod tests;
