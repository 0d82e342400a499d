use thiserror::Error;

/// Error type for invalid requests, parameters and degenerate calculations.
#[derive(Error, Debug)]
pub enum CalculatorError {
    #[error("Invalid value for `{field}`: {reason}")]
    Validation { field: &'static str, reason: String },
    #[error("Per-tree oxygen supply is zero at soil_quality={soil_quality}; trees required is undefined")]
    ZeroTreeSupply { soil_quality: f64 },
    #[error("Trees required ({trees:e}) exceeds the representable count; check `{field}`")]
    TreeCountOverflow { field: &'static str, trees: f64 },
    #[error("Invalid parameter `{parameter}`: {reason}")]
    InvalidParameter { parameter: String, reason: String },
    #[error("Could not load parameters: {0}")]
    ParameterFile(String),
}

impl CalculatorError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        CalculatorError::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_parameter(
        parameter: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalculatorError::InvalidParameter {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Name of the request field that failed validation, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            CalculatorError::Validation { field, .. } => Some(field),
            CalculatorError::ZeroTreeSupply { .. } => Some("soil_quality"),
            CalculatorError::TreeCountOverflow { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Convenience type for `Result<T, CalculatorError>`.
pub type CalculatorResult<T> = Result<T, CalculatorError>;
