//! Band and template errors

use netconv_model::{ModelError, ObjectId};

/// Errors raised by band classification and template resolution
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BandError {
    /// Channel is not an integer or width is absent
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Object lacks the radio attributes needed for its band key
    #[error("object {id} is missing {missing}")]
    MissingSourceAttributes {
        /// Object whose band key could not be computed
        id: ObjectId,
        /// What was missing
        missing: &'static str,
    },

    /// Template cell could not be decoded
    #[error("invalid template: {0}")]
    InvalidTemplate(String),

    /// Two band ranges share a channel
    #[error("band ranges {first} and {second} overlap")]
    OverlappingRanges {
        /// First band label
        first: String,
        /// Second band label
        second: String,
    },

    /// Model value rejected
    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

impl BandError {
    #[inline]
    pub(crate) fn missing(id: &ObjectId, missing: &'static str) -> Self {
        Self::MissingSourceAttributes {
            id: id.clone(),
            missing,
        }
    }

    /// Check if the error only concerns one object
    #[inline]
    #[must_use]
    pub fn is_per_object(&self) -> bool {
        matches!(self, Self::MissingSourceAttributes { .. })
    }
}
