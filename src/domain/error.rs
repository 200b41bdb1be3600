// Domain errors
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("invalid input for {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
}

impl DomainError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

/// Reject NaN and infinities
pub fn ensure_finite(field: &'static str, value: f64) -> Result<f64, DomainError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DomainError::invalid(field, format!("{} is not a finite number", value)))
    }
}

/// Reject values outside `[min, max]` (NaN included)
pub fn ensure_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<f64, DomainError> {
    ensure_finite(field, value)?;
    if value < min || value > max {
        return Err(DomainError::invalid(
            field,
            format!("{} is outside [{}, {}]", value, min, max),
        ));
    }
    Ok(value)
}
