//! Error taxonomy for the simulation engine

/// Result alias used throughout the engine
pub type EngineResult<T> = Result<T, EngineError>;

/// Failures raised by the pure simulation pipeline.
///
/// All of these are deterministic: the same input always fails the same way,
/// so callers never need to retry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("invalid value for `{field}`: {reason}")]
    Validation { field: String, reason: String },

    #[error("required field `{field}` is missing")]
    MissingField { field: String },

    #[error("`{field}` is zero and would be used as a divisor")]
    DivisionDegeneracy { field: String },

    #[error("extraction failed: {0}")]
    UpstreamExtraction(String),
}

impl EngineError {
    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        EngineError::Validation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn missing(field: &str) -> Self {
        EngineError::MissingField {
            field: field.to_string(),
        }
    }

    /// Name of the offending input field, if the error refers to one
    pub fn field(&self) -> Option<&str> {
        match self {
            EngineError::Validation { field, .. }
            | EngineError::MissingField { field }
            | EngineError::DivisionDegeneracy { field } => Some(field),
            EngineError::UpstreamExtraction(_) => None,
        }
    }
}
