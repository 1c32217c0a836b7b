//! Model errors

use crate::change::ChangeKind;
use crate::id::ObjectId;

/// Errors raised while building model values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Input is neither a mapping nor an enumerable id collection, or holds
    /// values that cannot be parameter values
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Object id is empty
    #[error("object id must not be empty")]
    EmptyObjectId,

    /// Object id appears in two parts of a change set
    #[error("object {id} appears in both {first} and {second}")]
    OverlappingChange {
        /// Offending id
        id: ObjectId,
        /// First part
        first: ChangeKind,
        /// Second part
        second: ChangeKind,
    },

    /// Update entry carries no parameters
    #[error("update for {0} carries no parameters")]
    EmptyUpdate(ObjectId),
}

impl ModelError {
    #[inline]
    pub(crate) fn overlapping(id: &ObjectId, first: ChangeKind, second: ChangeKind) -> Self {
        Self::OverlappingChange {
            id: id.clone(),
            first,
            second,
        }
    }
}
