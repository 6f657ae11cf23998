//! Pure geometry for fuzzy-range visuals: bell curves, arc gauges and range bars.
//!
//! Every function here is deterministic and allocation is the only side effect, so the
//! same input always renders the same picture.

use std::f64::consts::PI;

use shared::domain::FuzzyRange;

pub const DEFAULT_SAMPLE_COUNT: usize = 51;
/// Share of the span added on both sides of the curve domain.
const CURVE_PADDING: f64 = 0.2;
/// The span is treated as four standard deviations.
const SIGMA_DIVISOR: f64 = 4.0;
/// Default bar maximum relative to the range high.
const BAR_HEADROOM: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSample {
    pub x: f64,
    pub y: f64,
}

/// Samples an unnormalized Gaussian peaking at `range.mid()`.
///
/// The domain is `[low - 0.2 * span, high + 0.2 * span]` split into `sample_count` evenly
/// spaced points, both ends included. A point range has no width to spread over, so it
/// renders as a spike: `y = 1` at `mid` flanked by two zero samples.
///
/// `sample_count` does not apply to a point range: the spike is always exactly 3 samples,
/// `max(|mid| * 0.2, 1)` apart.
pub fn bell_curve_samples(range: &FuzzyRange, sample_count: usize) -> Vec<CurveSample> {
    if range.is_degenerate() {
        return degenerate_spike(range.mid());
    }
    if sample_count == 0 {
        return Vec::new();
    }
    if sample_count == 1 {
        return vec![CurveSample {
            x: range.mid(),
            y: 1.0,
        }];
    }

    let span = range.span();
    let sigma = span / SIGMA_DIVISOR;
    let start = range.low() - CURVE_PADDING * span;
    let end = range.high() + CURVE_PADDING * span;
    let step = (end - start) / (sample_count - 1) as f64;
    let last = sample_count - 1;

    (0..sample_count)
        .map(|i| {
            let x = if i == last {
                end
            } else {
                start + step * i as f64
            };
            let y = (-(x - range.mid()).powi(2) / (2.0 * sigma * sigma)).exp();
            CurveSample { x, y }
        })
        .collect()
}

fn degenerate_spike(mid: f64) -> Vec<CurveSample> {
    let half_width = (mid.abs() * CURVE_PADDING).max(1.0);
    vec![
        CurveSample {
            x: mid - half_width,
            y: 0.0,
        },
        CurveSample { x: mid, y: 1.0 },
        CurveSample {
            x: mid + half_width,
            y: 0.0,
        },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorStop {
    pub threshold: f64,
    pub color: String,
}

impl ColorStop {
    pub fn new(threshold: f64, color: impl Into<String>) -> Self {
        Self {
            threshold,
            color: color.into(),
        }
    }
}

/// Red through purple, matching the readiness intensity buckets.
pub fn default_intensity_stops() -> Vec<ColorStop> {
    vec![
        ColorStop::new(0.0, "#ef4444"),
        ColorStop::new(0.25, "#f97316"),
        ColorStop::new(0.5, "#eab308"),
        ColorStop::new(0.75, "#22c55e"),
        ColorStop::new(1.0, "#8b5cf6"),
    ]
}

/// Picks the highest stop whose threshold is at or below `fraction`.
///
/// `stops` must be sorted ascending by threshold. Falls back to the lowest stop when
/// `fraction` is below all of them, and returns `None` only for an empty slice.
pub fn select_color(fraction: f64, stops: &[ColorStop]) -> Option<&ColorStop> {
    stops
        .iter()
        .rev()
        .find(|stop| fraction >= stop.threshold)
        .or_else(|| stops.first())
}

/// Placement of the half-circle gauge inside its view box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeFrame {
    pub center: Point,
    pub radius: f64,
}

impl Default for GaugeFrame {
    fn default() -> Self {
        Self {
            center: Point { x: 100.0, y: 90.0 },
            radius: 80.0,
        }
    }
}

impl GaugeFrame {
    fn point_at(&self, angle: f64) -> Point {
        Point {
            x: self.center.x + self.radius * angle.cos(),
            y: self.center.y + self.radius * angle.sin(),
        }
    }

    pub fn arc(&self, value: f64, max: f64, stops: &[ColorStop]) -> ArcGauge {
        let fraction = gauge_fraction(value, max);
        let start_angle = PI;
        let end_angle = PI + fraction * PI;

        ArcGauge {
            start: self.point_at(start_angle),
            end: self.point_at(end_angle),
            large_arc: fraction > 0.5,
            sweep_fraction: fraction,
            radius: self.radius,
            color: select_color(fraction, stops).map(|stop| stop.color.clone()),
        }
    }

    /// Full half-circle track drawn behind the value arc.
    pub fn background_path(&self) -> String {
        let start = self.point_at(PI);
        let end = self.point_at(2.0 * PI);
        format!(
            "M {} {} A {r} {r} 0 1 1 {} {}",
            fmt_coord(start.x),
            fmt_coord(start.y),
            fmt_coord(end.x),
            fmt_coord(end.y),
            r = fmt_coord(self.radius),
        )
    }
}

fn gauge_fraction(value: f64, max: f64) -> f64 {
    if !(max.is_finite() && max > 0.0) || value.is_nan() {
        return 0.0;
    }
    (value / max).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArcGauge {
    pub start: Point,
    pub end: Point,
    /// SVG large-arc flag: required once the arc covers more than half of the track.
    pub large_arc: bool,
    pub sweep_fraction: f64,
    pub radius: f64,
    pub color: Option<String>,
}

impl ArcGauge {
    pub fn svg_path(&self) -> String {
        format!(
            "M {} {} A {r} {r} 0 {} 1 {} {}",
            fmt_coord(self.start.x),
            fmt_coord(self.start.y),
            u8::from(self.large_arc),
            fmt_coord(self.end.x),
            fmt_coord(self.end.y),
            r = fmt_coord(self.radius),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.sweep_fraction <= 0.0
    }
}

/// Arc gauge in the default 200x120 frame.
pub fn arc_gauge_geometry(value: f64, max: f64, stops: &[ColorStop]) -> ArcGauge {
    GaugeFrame::default().arc(value, max, stops)
}

fn fmt_coord(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    // Avoid "-0" from cos/sin noise around the axes.
    if rounded == 0.0 {
        "0".to_string()
    } else {
        rounded.to_string()
    }
}

/// Marker positions of a range bar, as percentages of the bar width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeBarFill {
    pub low_pct: f64,
    pub mid_pct: f64,
    pub high_pct: f64,
}

impl RangeBarFill {
    pub fn width_pct(&self) -> f64 {
        self.high_pct - self.low_pct
    }

    /// The high marker lies beyond the end of the bar.
    pub fn overflows(&self) -> bool {
        self.high_pct > 100.0
    }
}

/// Positions `range` on a bar ending at `effective_max`.
///
/// A missing or zero maximum falls back to `high * 1.2`. Percentages are not clamped;
/// callers passing a maximum below `high` get markers past 100%.
pub fn range_bar_fill(range: &FuzzyRange, effective_max: Option<f64>) -> RangeBarFill {
    let max = effective_max
        .filter(|max| *max != 0.0)
        .unwrap_or(range.high() * BAR_HEADROOM);
    let pct = |value: f64| {
        if max == 0.0 {
            0.0
        } else {
            value / max * 100.0
        }
    };

    RangeBarFill {
        low_pct: pct(range.low()),
        mid_pct: pct(range.mid()),
        high_pct: pct(range.high()),
    }
}

#[cfg(test)]
#[path = "tests/encoding_tests.rs"]
mod tests;
