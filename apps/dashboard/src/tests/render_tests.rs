use std::sync::Arc;

use super::*;
use client_core::{
    encoding::{arc_gauge_geometry, default_intensity_stops, range_bar_fill},
    results::{BodyCompositionResult, NutritionResult, ReadinessResult, StrengthResult},
    views::{dashboard_view, ViewOptions},
    BatchId, DashboardState, DomainResults,
};
use shared::{
    domain::{ConfidenceScore, InputSnapshot, MuscleMassCategory, ReadinessLabel},
    ordered_map::InputMemberships,
};

fn fuzzy(low: f64, mid: f64, high: f64) -> FuzzyRange {
    FuzzyRange::new(low, mid, high).expect("valid range")
}

fn results() -> DomainResults {
    DomainResults {
        readiness: ReadinessResult {
            intensity: 62.0,
            label: ReadinessLabel::Hard,
            confidence: ConfidenceScore::new(0.8).expect("confidence"),
            input_memberships: InputMemberships::new(),
            recommendation: "Train hard.".to_string(),
        },
        body_composition: BodyCompositionResult {
            body_fat: fuzzy(14.0, 17.5, 21.0),
            muscle_mass_category: MuscleMassCategory::Athletic,
            bmi: 24.5,
            bmi_interpretation: "Healthy weight".to_string(),
            recommendation: "Keep it up.".to_string(),
        },
        strength: StrengthResult {
            one_rm: fuzzy(110.0, 120.0, 130.0),
            confidence: ConfidenceScore::new(0.7).expect("confidence"),
            recommendation: "Heavy triples.".to_string(),
        },
        nutrition: NutritionResult {
            calories: fuzzy(2300.0, 2500.0, 2700.0),
            protein: fuzzy(140.0, 150.0, 160.0),
            carbs: fuzzy(250.0, 290.0, 330.0),
            fat: fuzzy(60.0, 70.0, 80.0),
            recommendation: "Protein first.".to_string(),
        },
    }
}

fn ready_view() -> DashboardView {
    let state = DashboardState::Ready {
        batch: BatchId::new(1),
        results: Arc::new(results()),
        inputs: Arc::new(InputSnapshot::default()),
    };
    dashboard_view(&state, &ViewOptions::default())
}

#[test]
fn sparkline_maps_heights_to_blocks() {
    let samples = [
        CurveSample { x: 0.0, y: 0.0 },
        CurveSample { x: 1.0, y: 0.5 },
        CurveSample { x: 2.0, y: 1.0 },
        CurveSample { x: 3.0, y: f64::NAN },
    ];
    assert_eq!(sparkline(&samples), "▁▅█▁");
}

#[test]
fn range_bar_marks_span_and_mid() {
    let fill = range_bar_fill(&fuzzy(50.0, 70.0, 90.0), Some(100.0));
    assert_eq!(range_bar(&fill, 11), "[.....==|==.]");

    let overflowing = range_bar_fill(&fuzzy(50.0, 70.0, 90.0), Some(80.0));
    assert!(range_bar(&overflowing, 11).ends_with(">]"));
}

#[test]
fn gauge_meter_fills_proportionally() {
    let gauge = arc_gauge_geometry(50.0, 100.0, &default_intensity_stops());
    assert_eq!(gauge_meter(&gauge, 10), "[#####-----]");
}

#[test]
fn ready_dashboard_renders_every_section() {
    let text = render_dashboard(&ready_view());

    assert!(text.starts_with("Your Fitness Dashboard\n"));
    assert!(text.contains("Readiness: Hard | Body Fat: 17.5% | Est. 1RM: 120 kg | Calories: 2500"));
    assert!(text.contains("== Workout Readiness == [Hard]"));
    assert!(text.contains("BMI: 24.5 (healthy) Healthy weight"));
    assert!(text.contains("Strength (3-5 reps)"));
    assert!(text.contains("== Nutrition == [maintain]"));
    assert!(text.contains("+ Strength Training Advice: Heavy triples."));
}

#[test]
fn error_view_lists_failed_domains() {
    let panel = ErrorPanel {
        title: "Connection Error",
        message: "Failed to load data.".to_string(),
        failed: vec![Domain::Strength, Domain::Nutrition],
        retry_label: "Retry",
    };
    assert_eq!(
        render_dashboard(&DashboardView::Error(panel)),
        "! Connection Error\nFailed to load data.\nfailed: one-rep-max, nutrition\n[Retry]\n"
    );
}

#[test]
fn skeleton_cards_render_placeholders() {
    let text = render_card(&CardView::Skeleton(Domain::BodyComposition));
    assert!(text.starts_with("== Body Comp =="));
}

#[test]
fn gauge_svg_contains_track_and_colored_arc() {
    let DashboardView::Cards { cards, .. } = ready_view() else {
        panic!("ready view has cards");
    };
    let CardView::Readiness(card) = &cards[0] else {
        panic!("first card is readiness");
    };

    let svg = gauge_svg(card);
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(r#"d="M 20 90 A 80 80 0 1 1 180 90""#));
    assert!(svg.contains(&card.gauge.svg_path()));
    assert!(svg.contains(r##"stroke="#eab308""##));
    assert!(svg.contains("Confidence: 80%"));
}
