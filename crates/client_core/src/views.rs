//! Read-only view models built from dashboard state.
//!
//! Every card is built from `Option<DomainResult>`: `None` renders a skeleton placeholder,
//! `Some` renders the encoded visuals. Nothing here mutates the results it reads.

use shared::domain::{Domain, FuzzyRange, Goal, MuscleMassCategory, ReadinessLabel};

use crate::{
    dashboard::DashboardState,
    encoding::{
        bell_curve_samples, default_intensity_stops, range_bar_fill, ArcGauge, ColorStop,
        CurveSample, GaugeFrame, RangeBarFill, DEFAULT_SAMPLE_COUNT,
    },
    labels::{dominant, presets},
    results::{
        BodyCompositionResult, DomainResult, DomainResults, NutritionResult, ReadinessResult,
        StrengthResult,
    },
};

/// Rendering knobs shared by every card.
#[derive(Debug, Clone)]
pub struct ViewOptions {
    pub sample_count: usize,
    pub intensity_stops: Vec<ColorStop>,
    pub lift_name: String,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_SAMPLE_COUNT,
            intensity_stops: default_intensity_stops(),
            lift_name: "Bench Press".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationVariant {
    Default,
    Success,
    Warning,
    Info,
}

impl RecommendationVariant {
    pub fn for_readiness(label: ReadinessLabel) -> Self {
        match label {
            ReadinessLabel::Hard | ReadinessLabel::Beast => RecommendationVariant::Success,
            ReadinessLabel::Rest => RecommendationVariant::Warning,
            ReadinessLabel::Light | ReadinessLabel::Moderate => RecommendationVariant::Default,
        }
    }

    pub fn for_goal(goal: Goal) -> Self {
        match goal {
            Goal::Bulk => RecommendationVariant::Success,
            Goal::Cut => RecommendationVariant::Warning,
            Goal::Maintain => RecommendationVariant::Default,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationPanel {
    pub title: &'static str,
    pub text: String,
    pub variant: RecommendationVariant,
}

/// Bell curve of one fuzzy range.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionView {
    pub label: String,
    pub unit: &'static str,
    pub range: FuzzyRange,
    pub samples: Vec<CurveSample>,
}

impl DistributionView {
    fn new(label: impl Into<String>, unit: &'static str, range: FuzzyRange, samples: usize) -> Self {
        Self {
            label: label.into(),
            unit,
            range,
            samples: bell_curve_samples(&range, samples),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangeBarView {
    pub label: String,
    pub unit: &'static str,
    pub range: FuzzyRange,
    pub fill: RangeBarFill,
}

impl RangeBarView {
    fn new(
        label: impl Into<String>,
        unit: &'static str,
        range: FuzzyRange,
        effective_max: Option<f64>,
    ) -> Self {
        Self {
            label: label.into(),
            unit,
            range,
            fill: range_bar_fill(&range, effective_max),
        }
    }
}

/// Strongest linguistic set of one readiness input.
#[derive(Debug, Clone, PartialEq)]
pub struct MembershipRow {
    pub input: String,
    pub dominant: Option<String>,
    pub degree: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadinessCard {
    pub label: ReadinessLabel,
    pub intensity: f64,
    /// Bucket derived locally from the intensity; may differ from `label` near a boundary.
    pub intensity_category: String,
    pub gauge: ArcGauge,
    pub confidence_pct: u8,
    pub memberships: Vec<MembershipRow>,
    pub recommendation: RecommendationPanel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BodyCompositionCard {
    pub body_fat: DistributionView,
    pub bmi: f64,
    pub bmi_band: String,
    pub bmi_interpretation: String,
    pub muscle_mass_category: MuscleMassCategory,
    pub recommendation: RecommendationPanel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingZone {
    pub name: &'static str,
    pub reps: &'static str,
    pub bar: RangeBarView,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrengthCard {
    pub one_rm: DistributionView,
    pub confidence_pct: u8,
    pub zones: Vec<TrainingZone>,
    pub recommendation: RecommendationPanel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NutritionCard {
    pub goal: Goal,
    pub calories: FuzzyRange,
    /// Calories first, then protein, carbs and fat.
    pub macros: Vec<RangeBarView>,
    pub recommendation: RecommendationPanel,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CardView {
    Skeleton(Domain),
    Readiness(ReadinessCard),
    BodyComposition(BodyCompositionCard),
    Strength(StrengthCard),
    Nutrition(NutritionCard),
}

impl CardView {
    pub fn domain(&self) -> Domain {
        match self {
            CardView::Skeleton(domain) => *domain,
            CardView::Readiness(_) => Domain::Readiness,
            CardView::BodyComposition(_) => Domain::BodyComposition,
            CardView::Strength(_) => Domain::Strength,
            CardView::Nutrition(_) => Domain::Nutrition,
        }
    }

    pub fn is_skeleton(&self) -> bool {
        matches!(self, CardView::Skeleton(_))
    }
}

pub fn card_view(
    domain: Domain,
    result: Option<DomainResult<'_>>,
    goal: Goal,
    options: &ViewOptions,
) -> CardView {
    match result {
        None => CardView::Skeleton(domain),
        Some(DomainResult::Readiness(result)) => {
            CardView::Readiness(readiness_card(result, options))
        }
        Some(DomainResult::BodyComposition(result)) => {
            CardView::BodyComposition(body_composition_card(result, options))
        }
        Some(DomainResult::Strength(result)) => CardView::Strength(strength_card(result, options)),
        Some(DomainResult::Nutrition(result)) => CardView::Nutrition(nutrition_card(result, goal)),
    }
}

fn readiness_card(result: &ReadinessResult, options: &ViewOptions) -> ReadinessCard {
    let memberships = result
        .input_memberships
        .iter()
        .map(|(input, map)| {
            let top = dominant(map);
            MembershipRow {
                input: input.to_string(),
                dominant: top.map(|(name, _)| name.to_string()),
                degree: top.map_or(0.0, |(_, degree)| degree),
            }
        })
        .collect();

    ReadinessCard {
        label: result.label,
        intensity: result.intensity,
        intensity_category: presets::readiness_intensity()
            .label_for(result.intensity)
            .to_string(),
        gauge: GaugeFrame::default().arc(result.intensity, 100.0, &options.intensity_stops),
        confidence_pct: result.confidence.percent(),
        memberships,
        recommendation: RecommendationPanel {
            title: "Today's Recommendation",
            text: result.recommendation.clone(),
            variant: RecommendationVariant::for_readiness(result.label),
        },
    }
}

fn body_composition_card(
    result: &BodyCompositionResult,
    options: &ViewOptions,
) -> BodyCompositionCard {
    BodyCompositionCard {
        body_fat: DistributionView::new(
            "Body Fat Estimate",
            "%",
            result.body_fat,
            options.sample_count,
        ),
        bmi: result.bmi,
        bmi_band: presets::bmi().label_for(result.bmi).to_string(),
        bmi_interpretation: result.bmi_interpretation.clone(),
        muscle_mass_category: result.muscle_mass_category,
        recommendation: RecommendationPanel {
            title: "Body Composition Insights",
            text: result.recommendation.clone(),
            variant: RecommendationVariant::Info,
        },
    }
}

const TRAINING_ZONES: [(&str, f64, f64, &str); 3] = [
    ("Strength", 0.8, 0.9, "3-5"),
    ("Hypertrophy", 0.65, 0.75, "8-12"),
    ("Endurance", 0.5, 0.6, "15-20"),
];

/// Working-weight bands as fractions of the 1RM mid, drawn against the 1RM high.
pub fn training_zones(one_rm: &FuzzyRange) -> Vec<TrainingZone> {
    let mid = one_rm.mid();
    TRAINING_ZONES
        .into_iter()
        .filter_map(|(name, from, to, reps)| {
            let range = FuzzyRange::new(
                (mid * from).round(),
                (mid * (from + to) / 2.0).round(),
                (mid * to).round(),
            )
            .ok()?;
            Some(TrainingZone {
                name,
                reps,
                bar: RangeBarView::new(name, " kg", range, Some(one_rm.high())),
            })
        })
        .collect()
}

fn strength_card(result: &StrengthResult, options: &ViewOptions) -> StrengthCard {
    StrengthCard {
        one_rm: DistributionView::new(
            format!("Estimated 1RM for {}", options.lift_name),
            " kg",
            result.one_rm,
            options.sample_count,
        ),
        confidence_pct: result.confidence.percent(),
        zones: training_zones(&result.one_rm),
        recommendation: RecommendationPanel {
            title: "Strength Training Advice",
            text: result.recommendation.clone(),
            variant: RecommendationVariant::Success,
        },
    }
}

fn nutrition_card(result: &NutritionResult, goal: Goal) -> NutritionCard {
    let macros = [
        ("Calories", " kcal", result.calories),
        ("Protein", "g", result.protein),
        ("Carbs", "g", result.carbs),
        ("Fat", "g", result.fat),
    ]
    .into_iter()
    .map(|(label, unit, range)| RangeBarView::new(label, unit, range, None))
    .collect();

    NutritionCard {
        goal,
        calories: result.calories,
        macros,
        recommendation: RecommendationPanel {
            title: "Nutrition Strategy",
            text: result.recommendation.clone(),
            variant: RecommendationVariant::for_goal(goal),
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuickStat {
    pub label: &'static str,
    pub value: String,
}

pub fn quick_stats(results: Option<&DomainResults>) -> Vec<QuickStat> {
    let value = |render: fn(&DomainResults) -> String| results.map_or("-".to_string(), render);
    vec![
        QuickStat {
            label: "Readiness",
            value: value(|r| r.readiness.label.to_string()),
        },
        QuickStat {
            label: "Body Fat",
            value: value(|r| format!("{}%", r.body_composition.body_fat.mid())),
        },
        QuickStat {
            label: "Est. 1RM",
            value: value(|r| format!("{} kg", r.strength.one_rm.mid())),
        },
        QuickStat {
            label: "Calories",
            value: value(|r| r.nutrition.calories.mid().to_string()),
        },
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorPanel {
    pub title: &'static str,
    pub message: String,
    pub failed: Vec<Domain>,
    pub retry_label: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardView {
    Loading,
    /// Replaces the cards entirely; retained results are not shown.
    Error(ErrorPanel),
    Cards {
        stats: Vec<QuickStat>,
        cards: Vec<CardView>,
    },
}

pub fn dashboard_view(state: &DashboardState, options: &ViewOptions) -> DashboardView {
    match state {
        DashboardState::Loading { .. } => DashboardView::Loading,
        DashboardState::Failed { error, .. } => DashboardView::Error(ErrorPanel {
            title: "Connection Error",
            message: error.user_message().to_string(),
            failed: error.failed_domains(),
            retry_label: "Retry",
        }),
        DashboardState::Idle => cards(None, Goal::Maintain, options),
        DashboardState::Ready {
            results, inputs, ..
        } => cards(Some(results.as_ref()), inputs.nutrition.goal, options),
    }
}

fn cards(results: Option<&DomainResults>, goal: Goal, options: &ViewOptions) -> DashboardView {
    DashboardView::Cards {
        stats: quick_stats(results),
        cards: Domain::ALL
            .into_iter()
            .map(|domain| card_view(domain, results.map(|r| r.get(domain)), goal, options))
            .collect(),
    }
}

#[cfg(test)]
#[path = "tests/views_tests.rs"]
mod tests;
