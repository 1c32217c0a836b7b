//! Per-parameter verification outcomes

use crate::value::ParamValue;
use serde::{Serialize, Serializer};

/// Status text for a parameter that matches the etalon
pub const STATUS_OK: &str = "OK";

/// Status text for a parameter missing on an existing object
pub const STATUS_NOT_AVAILABLE: &str = "N/A";

/// Status text for a parameter whose whole object is missing
pub const STATUS_DOES_NOT_EXIST: &str = "does not exist";

/// Status text for a confirmed deletion
pub const STATUS_DELETED: &str = "delete";

/// Status text for a deletion that did not take effect
pub const STATUS_NOT_DELETED: &str = "not delete";

/// Classification of one `(object, parameter)` pair
///
/// Serializes as the `[expected, actualOrStatus]` pair used in reports.
#[derive(Debug, Clone, PartialEq)]
pub enum ComparisonOutcome {
    /// Observed value equals the etalon
    Matched {
        /// Etalon value
        expected: ParamValue,
    },
    /// Observed value differs from the etalon
    Differing {
        /// Etalon value
        expected: ParamValue,
        /// Value read back
        actual: ParamValue,
    },
    /// Object exists but the parameter was not read back
    MissingParameter {
        /// Etalon value
        expected: ParamValue,
    },
    /// Object was not read back at all
    MissingObject {
        /// Etalon value
        expected: ParamValue,
    },
}

impl ComparisonOutcome {
    /// Etalon value
    #[must_use]
    pub fn expected(&self) -> &ParamValue {
        match self {
            Self::Matched { expected }
            | Self::Differing { expected, .. }
            | Self::MissingParameter { expected }
            | Self::MissingObject { expected } => expected,
        }
    }

    /// Second report column: `OK`, the actual value, `N/A` or `does not exist`
    #[must_use]
    pub fn status(&self) -> String {
        match self {
            Self::Matched { .. } => STATUS_OK.to_string(),
            Self::Differing { actual, .. } => actual.canonical(),
            Self::MissingParameter { .. } => STATUS_NOT_AVAILABLE.to_string(),
            Self::MissingObject { .. } => STATUS_DOES_NOT_EXIST.to_string(),
        }
    }

    /// Check for a match
    #[inline]
    #[must_use]
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }
}

impl Serialize for ComparisonOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.expected(), self.status()).serialize(serializer)
    }
}

/// Result of re-reading one object that was meant to be deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionStatus {
    /// Object is gone
    Deleted,
    /// Object is still present
    NotDeleted,
}

impl DeletionStatus {
    /// Report status text
    #[inline]
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Deleted => STATUS_DELETED,
            Self::NotDeleted => STATUS_NOT_DELETED,
        }
    }
}

impl Serialize for DeletionStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}
