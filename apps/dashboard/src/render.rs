//! Plain-text rendering of dashboard view models, plus an SVG export of the readiness gauge.
//!
//! Output is deterministic for a given view so it can be asserted on directly.

use client_core::{
    encoding::{ArcGauge, CurveSample, GaugeFrame, RangeBarFill},
    views::{
        BodyCompositionCard, CardView, DashboardView, DistributionView, ErrorPanel, NutritionCard,
        QuickStat, RangeBarView, ReadinessCard, RecommendationPanel, RecommendationVariant,
        StrengthCard,
    },
};
use shared::domain::{Domain, FuzzyRange};

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const BAR_WIDTH: usize = 40;
const GAUGE_WIDTH: usize = 30;

pub fn render_dashboard(view: &DashboardView) -> String {
    match view {
        DashboardView::Loading => "Loading your fitness data...\n".to_string(),
        DashboardView::Error(panel) => render_error(panel),
        DashboardView::Cards { stats, cards } => {
            let mut out = String::from("Your Fitness Dashboard\n");
            out.push_str(&render_stats(stats));
            for card in cards {
                out.push('\n');
                out.push_str(&render_card(card));
            }
            out
        }
    }
}

fn render_error(panel: &ErrorPanel) -> String {
    let mut out = format!("! {}\n{}\n", panel.title, panel.message);
    if !panel.failed.is_empty() {
        let failed: Vec<String> = panel.failed.iter().map(Domain::to_string).collect();
        out.push_str(&format!("failed: {}\n", failed.join(", ")));
    }
    out.push_str(&format!("[{}]\n", panel.retry_label));
    out
}

fn render_stats(stats: &[QuickStat]) -> String {
    let cells: Vec<String> = stats
        .iter()
        .map(|stat| format!("{}: {}", stat.label, stat.value))
        .collect();
    format!("{}\n", cells.join(" | "))
}

pub fn render_card(card: &CardView) -> String {
    match card {
        CardView::Skeleton(domain) => format!("== {} ==\n  ░░░░░░░░ waiting for data\n", domain.title()),
        CardView::Readiness(card) => render_readiness(card),
        CardView::BodyComposition(card) => render_body_composition(card),
        CardView::Strength(card) => render_strength(card),
        CardView::Nutrition(card) => render_nutrition(card),
    }
}

fn render_readiness(card: &ReadinessCard) -> String {
    let mut out = format!("== Workout Readiness == [{}]\n", card.label);
    out.push_str(&format!(
        "  Intensity {} {} ({})\n",
        gauge_meter(&card.gauge, GAUGE_WIDTH),
        fmt_value(card.intensity),
        card.intensity_category
    ));
    out.push_str(&format!("  Confidence: {}%\n", card.confidence_pct));
    for row in &card.memberships {
        let dominant = row.dominant.as_deref().unwrap_or("-");
        out.push_str(&format!(
            "  {:<10} {:<10} {:>3}%\n",
            row.input,
            dominant,
            (row.degree * 100.0).round()
        ));
    }
    out.push_str(&render_recommendation(&card.recommendation));
    out
}

fn render_body_composition(card: &BodyCompositionCard) -> String {
    let mut out = String::from("== Body Composition ==\n");
    out.push_str(&render_distribution(&card.body_fat));
    out.push_str(&format!(
        "  BMI: {} ({}) {}\n",
        fmt_value(card.bmi),
        card.bmi_band,
        card.bmi_interpretation
    ));
    out.push_str(&format!("  Muscle mass: {}\n", card.muscle_mass_category));
    out.push_str(&render_recommendation(&card.recommendation));
    out
}

fn render_strength(card: &StrengthCard) -> String {
    let mut out = String::from("== Strength ==\n");
    out.push_str(&render_distribution(&card.one_rm));
    out.push_str(&format!("  Confidence: {}%\n", card.confidence_pct));
    for zone in &card.zones {
        out.push_str(&format!("  {} ({} reps)\n", zone.name, zone.reps));
        out.push_str(&render_range_bar(&zone.bar));
    }
    out.push_str(&render_recommendation(&card.recommendation));
    out
}

fn render_nutrition(card: &NutritionCard) -> String {
    let mut out = format!("== Nutrition == [{}]\n", card.goal);
    out.push_str(&format!(
        "  Daily calories: {} kcal (range {} - {})\n",
        fmt_value(card.calories.mid()),
        fmt_value(card.calories.low()),
        fmt_value(card.calories.high())
    ));
    for bar in &card.macros {
        out.push_str(&format!("  {}\n", bar.label));
        out.push_str(&render_range_bar(bar));
    }
    out.push_str(&render_recommendation(&card.recommendation));
    out
}

fn render_distribution(view: &DistributionView) -> String {
    format!(
        "  {}: {}\n  {}\n",
        view.label,
        fmt_range(&view.range, view.unit),
        sparkline(&view.samples)
    )
}

fn render_range_bar(view: &RangeBarView) -> String {
    format!(
        "  {} {}\n",
        range_bar(&view.fill, BAR_WIDTH),
        fmt_range(&view.range, view.unit)
    )
}

fn render_recommendation(panel: &RecommendationPanel) -> String {
    let marker = match panel.variant {
        RecommendationVariant::Default => "*",
        RecommendationVariant::Success => "+",
        RecommendationVariant::Warning => "!",
        RecommendationVariant::Info => "i",
    };
    format!("  {marker} {}: {}\n", panel.title, panel.text)
}

/// One block character per sample, height proportional to `y`.
pub fn sparkline(samples: &[CurveSample]) -> String {
    let top = (SPARK_LEVELS.len() - 1) as f64;
    samples
        .iter()
        .map(|sample| {
            let level = (sample.y.clamp(0.0, 1.0) * top).round() as usize;
            SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
        })
        .collect()
}

/// `=` spans low..high, `|` marks mid, a trailing `>` flags a high marker past the bar.
pub fn range_bar(fill: &RangeBarFill, width: usize) -> String {
    let width = width.max(2);
    let last = (width - 1) as f64;
    let column = |pct: f64| {
        let col = (pct / 100.0 * last).round();
        if col.is_nan() {
            0
        } else {
            col.clamp(0.0, last) as usize
        }
    };

    let mut cells = vec!['.'; width];
    let (low, high) = (column(fill.low_pct), column(fill.high_pct));
    for cell in cells.iter_mut().take(high + 1).skip(low) {
        *cell = '=';
    }
    cells[column(fill.mid_pct)] = '|';

    let mut bar: String = cells.into_iter().collect();
    if fill.overflows() {
        bar.push('>');
    }
    format!("[{bar}]")
}

pub fn gauge_meter(gauge: &ArcGauge, width: usize) -> String {
    let filled = (gauge.sweep_fraction * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Standalone 200x120 SVG of the readiness gauge.
pub fn gauge_svg(card: &ReadinessCard) -> String {
    let track = GaugeFrame::default().background_path();
    let arc = if card.gauge.is_empty() {
        String::new()
    } else {
        format!(
            r#"  <path d="{}" fill="none" stroke="{}" stroke-width="12" stroke-linecap="round"/>
"#,
            card.gauge.svg_path(),
            card.gauge.color.as_deref().unwrap_or("currentColor")
        )
    };
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 200 120" width="200" height="120">
  <path d="{track}" fill="none" stroke="#e5e7eb" stroke-width="12" stroke-linecap="round"/>
{arc}  <text x="100" y="85" text-anchor="middle" font-size="24" font-weight="bold">{value}</text>
  <text x="100" y="112" text-anchor="middle" font-size="11">Confidence: {confidence}%</text>
</svg>
"##,
        value = fmt_value(card.intensity),
        confidence = card.confidence_pct,
    )
}

fn fmt_range(range: &FuzzyRange, unit: &str) -> String {
    format!(
        "{}{unit} ({} - {})",
        fmt_value(range.mid()),
        fmt_value(range.low()),
        fmt_value(range.high())
    )
}

fn fmt_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
