//! Verification errors

use netconv_model::ModelError;

/// Errors raised by verification entry points over untyped input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    /// Input is neither a mapping nor an id collection
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl From<ModelError> for VerifyError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::InvalidInput(msg) => Self::InvalidInput(msg),
            other => Self::InvalidInput(other.to_string()),
        }
    }
}
