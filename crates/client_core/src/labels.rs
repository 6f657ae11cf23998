//! Linguistic labels for scalar inputs and membership maps.

use shared::ordered_map::MembershipMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LabelError {
    #[error("label breakpoints must not be empty")]
    Empty,
    #[error("breakpoint threshold {0} is not finite")]
    NonFinite(f64),
    #[error("breakpoint threshold {0} appears more than once")]
    Duplicate(f64),
}

/// Thresholds and labels, sorted strictly ascending by threshold. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelBreakpoints {
    entries: Vec<(f64, String)>,
}

impl LabelBreakpoints {
    /// Builds breakpoints from pairs in any order.
    pub fn new<I, S>(pairs: I) -> Result<Self, LabelError>
    where
        I: IntoIterator<Item = (f64, S)>,
        S: Into<String>,
    {
        let mut entries: Vec<(f64, String)> = pairs
            .into_iter()
            .map(|(threshold, label)| (threshold, label.into()))
            .collect();
        if entries.is_empty() {
            return Err(LabelError::Empty);
        }
        if let Some((threshold, _)) = entries.iter().find(|(t, _)| !t.is_finite()) {
            return Err(LabelError::NonFinite(*threshold));
        }
        entries.sort_by(|a, b| a.0.total_cmp(&b.0));
        if let Some(pair) = entries.windows(2).find(|pair| pair[0].0 == pair[1].0) {
            return Err(LabelError::Duplicate(pair[0].0));
        }
        Ok(Self { entries })
    }

    fn from_table(table: &[(f64, &str)]) -> Self {
        debug_assert!(table.windows(2).all(|pair| pair[0].0 < pair[1].0));
        Self {
            entries: table
                .iter()
                .map(|(threshold, label)| (*threshold, (*label).to_string()))
                .collect(),
        }
    }

    /// Label of the greatest threshold `<= value`, or the lowest label below every threshold.
    pub fn label_for(&self, value: f64) -> &str {
        self.entries
            .iter()
            .rev()
            .find(|(threshold, _)| value >= *threshold)
            .or_else(|| self.entries.first())
            .map_or("", |(_, label)| label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, &str)> {
        self.entries
            .iter()
            .map(|(threshold, label)| (*threshold, label.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn label_for(value: f64, breakpoints: &LabelBreakpoints) -> &str {
    breakpoints.label_for(value)
}

/// Entry with the strictly greatest degree.
///
/// Ties keep the entry seen first in the map's key order. NaN degrees are skipped.
pub fn dominant(map: &MembershipMap) -> Option<(&str, f64)> {
    let mut best: Option<(&str, f64)> = None;
    for (key, degree) in map.iter() {
        let degree = *degree;
        if degree.is_nan() {
            continue;
        }
        match best {
            Some((_, top)) if degree <= top => {}
            _ => best = Some((key, degree)),
        }
    }
    best
}

pub mod presets {
    use super::LabelBreakpoints;

    pub fn slider() -> LabelBreakpoints {
        LabelBreakpoints::from_table(&[
            (0.0, "None"),
            (2.5, "Low"),
            (5.0, "Medium"),
            (7.5, "High"),
            (10.0, "Max"),
        ])
    }

    pub fn sleep() -> LabelBreakpoints {
        LabelBreakpoints::from_table(&[
            (0.0, "Terrible"),
            (2.5, "Poor"),
            (5.0, "Okay"),
            (7.5, "Good"),
            (10.0, "Amazing"),
        ])
    }

    pub fn energy() -> LabelBreakpoints {
        LabelBreakpoints::from_table(&[
            (0.0, "Exhausted"),
            (2.5, "Low"),
            (5.0, "Normal"),
            (7.5, "High"),
            (10.0, "Supercharged"),
        ])
    }

    pub fn soreness() -> LabelBreakpoints {
        LabelBreakpoints::from_table(&[
            (0.0, "None"),
            (2.5, "Slight"),
            (5.0, "Moderate"),
            (7.5, "High"),
            (10.0, "Can't Move"),
        ])
    }

    pub fn stress() -> LabelBreakpoints {
        LabelBreakpoints::from_table(&[
            (0.0, "Zen"),
            (2.5, "Relaxed"),
            (5.0, "Normal"),
            (7.5, "Stressed"),
            (10.0, "Overwhelmed"),
        ])
    }

    /// Intensity (0-100) to the readiness bucket names used by the service.
    pub fn readiness_intensity() -> LabelBreakpoints {
        LabelBreakpoints::from_table(&[
            (0.0, "Rest"),
            (20.0, "Light"),
            (40.0, "Moderate"),
            (60.0, "Hard"),
            (80.0, "Beast"),
        ])
    }

    pub fn bmi() -> LabelBreakpoints {
        LabelBreakpoints::from_table(&[
            (0.0, "underweight"),
            (18.5, "healthy"),
            (25.0, "overweight"),
            (30.0, "obese"),
        ])
    }
}

/// Bounded numeric input with linguistic labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Slider {
    pub label: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub breakpoints: LabelBreakpoints,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SliderMarker {
    pub position_pct: f64,
    pub label: String,
}

impl Slider {
    /// A 0-10 slider in half steps, the shape of every readiness input.
    pub fn zero_to_ten(label: impl Into<String>, breakpoints: LabelBreakpoints) -> Self {
        Self {
            label: label.into(),
            min: 0.0,
            max: 10.0,
            step: 0.5,
            breakpoints,
        }
    }

    fn pct(&self, value: f64) -> f64 {
        let width = self.max - self.min;
        if width <= 0.0 {
            return 0.0;
        }
        (value - self.min) / width * 100.0
    }

    pub fn fill_pct(&self, value: f64) -> f64 {
        self.pct(value)
    }

    pub fn current_label(&self, value: f64) -> &str {
        self.breakpoints.label_for(value)
    }

    /// Clamps into `[min, max]` and rounds to the nearest step.
    pub fn snap(&self, value: f64) -> f64 {
        if self.min.partial_cmp(&self.max) != Some(std::cmp::Ordering::Less) {
            return value;
        }
        let clamped = value.clamp(self.min, self.max);
        if self.step <= 0.0 {
            return clamped;
        }
        let steps = ((clamped - self.min) / self.step).round();
        (self.min + steps * self.step).min(self.max)
    }

    pub fn markers(&self) -> Vec<SliderMarker> {
        self.breakpoints
            .iter()
            .map(|(threshold, label)| SliderMarker {
                position_pct: self.pct(threshold),
                label: label.to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "tests/labels_tests.rs"]
mod tests;
