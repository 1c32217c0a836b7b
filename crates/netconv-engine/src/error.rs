//! Reconciliation errors

use netconv_band::BandError;
use netconv_model::{ChangeKind, ModelError, ObjectId};
use serde::Serialize;

/// Errors that abort a reconciliation pass
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError {
    /// Resulting change set violates its invariants
    #[error("invalid change set: {0}")]
    InvalidChangeSet(#[from] ModelError),
}

/// Per-object anomaly that excluded an object (or some of its parameters)
/// from reconciliation without aborting the pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectFailure {
    /// Affected object
    pub id: ObjectId,
    /// Bucket the object was headed for
    pub kind: ChangeKind,
    /// Failure description
    pub reason: String,
    #[serde(skip)]
    error: BandError,
}

impl ObjectFailure {
    pub(crate) fn new(id: &ObjectId, kind: ChangeKind, error: BandError) -> Self {
        Self {
            id: id.clone(),
            kind,
            reason: error.to_string(),
            error,
        }
    }

    /// Underlying band error
    #[inline]
    #[must_use]
    pub fn error(&self) -> &BandError {
        &self.error
    }

    /// Check if caused by missing radio attributes
    #[inline]
    #[must_use]
    pub fn is_missing_source_attributes(&self) -> bool {
        matches!(self.error, BandError::MissingSourceAttributes { .. })
    }
}
