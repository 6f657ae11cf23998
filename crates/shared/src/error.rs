use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("fuzzy range bounds must be finite (low={low}, mid={mid}, high={high})")]
    NonFiniteRange { low: f64, mid: f64, high: f64 },
    #[error("fuzzy range must satisfy low <= mid <= high (low={low}, mid={mid}, high={high})")]
    UnorderedRange { low: f64, mid: f64, high: f64 },
    #[error("confidence score {0} is outside [0, 1]")]
    ConfidenceOutOfRange(f64),
    #[error("unknown {kind} value '{value}'")]
    UnknownVariant { kind: &'static str, value: String },
}
