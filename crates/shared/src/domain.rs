use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Declares a closed enum whose serde and text spellings match the inference service.
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = DomainError;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                let wanted = raw.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|variant| variant.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| DomainError::UnknownVariant {
                        kind: stringify!($name),
                        value: raw.to_string(),
                    })
            }
        }
    };
}

wire_enum!(ActivityLevel {
    Sedentary => "sedentary",
    Light => "light",
    Moderate => "moderate",
    Active => "active",
    VeryActive => "very_active",
});

wire_enum!(BuildType {
    Ectomorph => "ectomorph",
    Mesomorph => "mesomorph",
    Endomorph => "endomorph",
});

wire_enum!(FormQuality {
    Poor => "poor",
    Fair => "fair",
    Good => "good",
    Excellent => "excellent",
});

wire_enum!(Goal {
    Cut => "cut",
    Maintain => "maintain",
    Bulk => "bulk",
});

wire_enum!(Metabolism {
    Slow => "slow",
    Normal => "normal",
    Fast => "fast",
});

wire_enum!(
    /// Intensity bucket reported by the readiness endpoint.
    ReadinessLabel {
        Rest => "Rest",
        Light => "Light",
        Moderate => "Moderate",
        Hard => "Hard",
        Beast => "Beast",
    }
);

wire_enum!(MuscleMassCategory {
    BelowAverage => "Below Average",
    Average => "Average",
    AboveAverage => "Above Average",
    Athletic => "Athletic",
});

/// The four inference domains, in wizard and dashboard order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Domain {
    Readiness,
    BodyComposition,
    Strength,
    Nutrition,
}

impl Domain {
    pub const ALL: [Domain; 4] = [
        Domain::Readiness,
        Domain::BodyComposition,
        Domain::Strength,
        Domain::Nutrition,
    ];

    /// Path of the POST endpoint, relative to the service base URL.
    pub fn endpoint_path(self) -> &'static str {
        match self {
            Domain::Readiness => "api/readiness",
            Domain::BodyComposition => "api/body-composition",
            Domain::Strength => "api/one-rep-max",
            Domain::Nutrition => "api/nutrition",
        }
    }

    /// Key of the matching input group inside a persisted snapshot.
    pub fn input_key(self) -> &'static str {
        match self {
            Domain::Readiness => "readiness",
            Domain::BodyComposition => "bodyComp",
            Domain::Strength => "strength",
            Domain::Nutrition => "nutrition",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Domain::Readiness => "Readiness",
            Domain::BodyComposition => "Body Comp",
            Domain::Strength => "Strength",
            Domain::Nutrition => "Nutrition",
        }
    }

    pub fn position(self) -> usize {
        match self {
            Domain::Readiness => 0,
            Domain::BodyComposition => 1,
            Domain::Strength => 2,
            Domain::Nutrition => 3,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Domain::Readiness => "readiness",
            Domain::BodyComposition => "body-composition",
            Domain::Strength => "one-rep-max",
            Domain::Nutrition => "nutrition",
        };
        f.write_str(name)
    }
}

/// Uncertain estimate with a most-likely value and plausible bounds.
///
/// The fields are private so that `low <= mid <= high` holds for every value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyRange {
    low: f64,
    mid: f64,
    high: f64,
}

impl FuzzyRange {
    pub fn new(low: f64, mid: f64, high: f64) -> Result<Self, DomainError> {
        if !(low.is_finite() && mid.is_finite() && high.is_finite()) {
            return Err(DomainError::NonFiniteRange { low, mid, high });
        }
        if low > mid || mid > high {
            return Err(DomainError::UnorderedRange { low, mid, high });
        }
        Ok(Self { low, mid, high })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn mid(&self) -> f64 {
        self.mid
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn span(&self) -> f64 {
        self.high - self.low
    }

    pub fn is_degenerate(&self) -> bool {
        self.span() == 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ConfidenceScore(f64);

impl ConfidenceScore {
    pub fn new(value: f64) -> Result<Self, DomainError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(DomainError::ConfidenceOutOfRange(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn percent(self) -> u8 {
        (self.0 * 100.0).round() as u8
    }
}

impl TryFrom<f64> for ConfidenceScore {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ConfidenceScore> for f64 {
    fn from(value: ConfidenceScore) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessInput {
    pub sleep: f64,
    pub energy: f64,
    pub soreness: f64,
    pub stress: f64,
}

impl Default for ReadinessInput {
    fn default() -> Self {
        Self {
            sleep: 7.0,
            energy: 6.0,
            soreness: 4.0,
            stress: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyCompositionInput {
    pub weight: f64,
    pub height: f64,
    pub waist: f64,
    pub activity_level: ActivityLevel,
    pub build_type: BuildType,
}

impl Default for BodyCompositionInput {
    fn default() -> Self {
        Self {
            weight: 75.0,
            height: 175.0,
            waist: 82.0,
            activity_level: ActivityLevel::Moderate,
            build_type: BuildType::Mesomorph,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrengthInput {
    pub weight_lifted: f64,
    /// Free text; the service accepts fuzzy phrasing such as "around 6" or "5-7".
    pub reps: String,
    pub rpe: f64,
    pub form_quality: FormQuality,
}

impl Default for StrengthInput {
    fn default() -> Self {
        Self {
            weight_lifted: 100.0,
            reps: "6".to_string(),
            rpe: 8.0,
            form_quality: FormQuality::Good,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionInput {
    pub weight: f64,
    pub goal: Goal,
    pub activity_level: ActivityLevel,
    pub metabolism: Metabolism,
    pub adherence: f64,
}

impl Default for NutritionInput {
    fn default() -> Self {
        Self {
            weight: 75.0,
            goal: Goal::Maintain,
            activity_level: ActivityLevel::Moderate,
            metabolism: Metabolism::Normal,
            adherence: 0.7,
        }
    }
}

/// All four input groups as submitted together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub readiness: ReadinessInput,
    #[serde(rename = "bodyComp")]
    pub body_composition: BodyCompositionInput,
    pub strength: StrengthInput,
    pub nutrition: NutritionInput,
}
