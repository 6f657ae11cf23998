//! JSON payloads returned by the inference service.
//!
//! Request bodies are the input groups from [`crate::domain`] serialized as-is.

use serde::{Deserialize, Serialize};

use crate::{
    domain::{MuscleMassCategory, ReadinessLabel},
    ordered_map::InputMemberships,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub intensity: f64,
    pub label: ReadinessLabel,
    pub confidence: f64,
    #[serde(default)]
    pub input_memberships: InputMemberships,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyCompositionResponse {
    pub body_fat_low: f64,
    pub body_fat_mid: f64,
    pub body_fat_high: f64,
    pub muscle_mass_category: MuscleMassCategory,
    pub bmi: f64,
    pub bmi_interpretation: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneRepMaxResponse {
    pub one_rm_low: f64,
    pub one_rm_mid: f64,
    pub one_rm_high: f64,
    pub confidence: f64,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionResponse {
    pub calories_low: f64,
    pub calories_mid: f64,
    pub calories_high: f64,
    pub protein_low: f64,
    pub protein_mid: f64,
    pub protein_high: f64,
    pub carbs_low: f64,
    pub carbs_mid: f64,
    pub carbs_high: f64,
    pub fat_low: f64,
    pub fat_mid: f64,
    pub fat_high: f64,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}
