// Assessment error taxonomy
use super::history::HistoryKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssessmentError {
    /// A required field was missing, non-numeric, zero or negative.
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("degradation series contains no samples")]
    EmptySeries,

    /// Lookup or removal by id matched nothing. Callers treat this as a no-op.
    #[error("no {kind} record with id {id}")]
    NotFound { id: i64, kind: HistoryKind },

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl AssessmentError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

pub type AssessmentResult<T> = Result<T, AssessmentError>;

/// Reject non-finite, zero and negative values for fields that must be strictly positive.
pub fn require_positive(field: &'static str, value: f64) -> AssessmentResult<f64> {
    if !value.is_finite() {
        return Err(AssessmentError::invalid(field, "must be a finite number"));
    }
    if value <= 0.0 {
        return Err(AssessmentError::invalid(
            field,
            format!("must be greater than zero, got {}", value),
        ));
    }
    Ok(value)
}

/// Parse a text field as a number, trimming surrounding whitespace.
pub fn parse_number(field: &'static str, raw: &str) -> AssessmentResult<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AssessmentError::invalid(field, "is required"));
    }
    trimmed
        .parse::<f64>()
        .map_err(|_| AssessmentError::invalid(field, format!("'{}' is not a number", trimmed)))
}
