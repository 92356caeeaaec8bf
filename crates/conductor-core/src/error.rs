use thiserror::Error;

use crate::MarketState;

/// Field-level constraint violations raised while constructing domain values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be greater than zero, got {value}")]
    NonPositiveValue { field: &'static str, value: f64 },
    #[error("field '{field}' must be within [0, 1], got {value}")]
    OutOfUnitRange { field: &'static str, value: f64 },

    #[error("invalid market state '{value}', expected one of calm_accumulation, panic_selling, bull_breakout, unclassified")]
    InvalidMarketState { value: String },
    #[error("invalid urgency '{value}', expected one of low, medium, high, critical")]
    InvalidUrgency { value: String },
    #[error("invalid message type '{value}', expected one of analyst, mentor, strategist, warning, bullish")]
    InvalidMessageType { value: String },
    #[error("invalid bell '{value}', expected one of clarity, strength, transformation, integrity, intuition, manifestation, sovereignty")]
    InvalidBell { value: String },
}

/// Catalog problems detected while building or querying a composition catalog.
///
/// These are startup failures: a loop is never constructed over a catalog that
/// produces one of these.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("catalog has no composition for state '{state}'")]
    MissingEntry { state: MarketState },

    #[error("catalog entry for state '{state}' is invalid: {reason}")]
    InvalidEntry {
        state: MarketState,
        reason: ValidationError,
    },

    #[error("catalog file is malformed: {0}")]
    Malformed(String),

    #[error("failed to read catalog file '{path}': {message}")]
    Unreadable { path: String, message: String },
}

/// Dispatch inputs rejected before any channel is called.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DispatchError {
    #[error("invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: ValidationError,
    },
}

impl DispatchError {
    pub fn invalid_parameter(parameter: &'static str, reason: ValidationError) -> Self {
        Self::InvalidParameter { parameter, reason }
    }

    pub const fn parameter(&self) -> &'static str {
        match self {
            Self::InvalidParameter { parameter, .. } => parameter,
        }
    }
}

/// Errors that stop a running event loop.
///
/// Invalid dispatch parameters never surface here; the loop turns them into
/// rejected records and moves on.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub(crate) fn require_finite(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NonFiniteValue { field })
    }
}

pub(crate) fn require_positive(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    require_finite(field, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::NonPositiveValue { field, value })
    }
}

pub(crate) fn require_unit_interval(
    field: &'static str,
    value: f64,
) -> Result<f64, ValidationError> {
    require_finite(field, value)?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::OutOfUnitRange { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_check_rejects_zero_and_nan() {
        assert!(matches!(
            require_positive("scale", 0.0),
            Err(ValidationError::NonPositiveValue { field: "scale", .. })
        ));
        assert!(matches!(
            require_positive("scale", f64::NAN),
            Err(ValidationError::NonFiniteValue { field: "scale" })
        ));
        assert_eq!(require_positive("scale", 1.2), Ok(1.2));
    }

    #[test]
    fn unit_interval_is_inclusive() {
        assert_eq!(require_unit_interval("amplitude", 0.0), Ok(0.0));
        assert_eq!(require_unit_interval("amplitude", 1.0), Ok(1.0));
        assert!(require_unit_interval("amplitude", 1.01).is_err());
    }
}
