//! Compliance verification of applied changes
//!
//! Provides [`ComplianceVerifier`] with two entry points:
//!
//! - [`ComplianceVerifier::check_create_and_update`]: every etalon
//!   `(object, parameter)` pair lands in exactly one of `matched`,
//!   `differing` or `missing_objects`
//! - [`ComplianceVerifier::check_delete`]: every etalon id is either
//!   `deleted` or `not_deleted`
//!
//! Absence is a classified outcome, never an error.

use crate::error::VerifyError;
use netconv_model::{ComparisonOutcome, DeletionStatus, ObjectId, ParameterSet, StateInput};
use serde::Serialize;
use std::collections::BTreeMap;

/// Parameter name → outcome for one object
pub type ParameterOutcomes = BTreeMap<String, ComparisonOutcome>;

/// Object id → per-parameter outcomes
pub type Classification = BTreeMap<ObjectId, ParameterOutcomes>;

/// Result of a create/update verification pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComplianceResult {
    /// Parameters read back with the etalon value
    pub matched: Classification,
    /// Parameters read back with another value, or not read back
    pub differing: Classification,
    /// Parameters of objects that were not read back at all
    pub missing_objects: Classification,
}

impl ComplianceResult {
    /// Number of classified `(object, parameter)` pairs
    #[must_use]
    pub fn outcome_count(&self) -> usize {
        [&self.matched, &self.differing, &self.missing_objects]
            .into_iter()
            .flat_map(BTreeMap::values)
            .map(BTreeMap::len)
            .sum()
    }

    /// Check if every parameter matched
    #[must_use]
    pub fn is_compliant(&self) -> bool {
        self.differing.is_empty() && self.missing_objects.is_empty()
    }

    /// Outcome of one pair, searching every bucket
    #[must_use]
    pub fn outcome(&self, id: &ObjectId, param: &str) -> Option<&ComparisonOutcome> {
        [&self.matched, &self.differing, &self.missing_objects]
            .into_iter()
            .find_map(|bucket| bucket.get(id).and_then(|params| params.get(param)))
    }
}

/// Result of a delete verification pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeletionResult {
    /// Ids no longer read back
    pub deleted: BTreeMap<ObjectId, DeletionStatus>,
    /// Ids still read back
    pub not_deleted: BTreeMap<ObjectId, DeletionStatus>,
}

impl DeletionResult {
    /// Check if every deletion took effect
    #[inline]
    #[must_use]
    pub fn is_compliant(&self) -> bool {
        self.not_deleted.is_empty()
    }
}

/// Classifies re-read state against the changes that were sent
#[derive(Debug, Clone, Copy, Default)]
pub struct ComplianceVerifier;

impl ComplianceVerifier {
    /// Create verifier
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Verify creates or updates
    ///
    /// `checked` is the state read back; `etalon` is what was sent. An id-only
    /// input carries no parameters: an id-only `checked` marks every etalon
    /// object as missing, an id-only `etalon` yields objects without pairs.
    #[must_use]
    pub fn check_create_and_update(&self, checked: &StateInput, etalon: &StateInput) -> ComplianceResult {
        let mut result = ComplianceResult::default();
        let empty = ParameterSet::new();

        for id in etalon.ids() {
            let expected = etalon.parameters(&id).unwrap_or(&empty);
            let actual = checked.parameters(&id).filter(|params| !params.is_empty());

            let Some(actual) = actual else {
                result.missing_objects.insert(id, missing_object(expected));
                continue;
            };

            let mut matched = ParameterOutcomes::new();
            let mut differing = ParameterOutcomes::new();
            for (name, expected) in expected {
                let expected = expected.clone();
                match actual.get(name) {
                    Some(value) if value.canonical_eq(&expected) => {
                        matched.insert(name.clone(), ComparisonOutcome::Matched { expected });
                    }
                    Some(value) => {
                        differing.insert(
                            name.clone(),
                            ComparisonOutcome::Differing {
                                expected,
                                actual: value.clone(),
                            },
                        );
                    }
                    None => {
                        differing.insert(name.clone(), ComparisonOutcome::MissingParameter { expected });
                    }
                }
            }
            if !matched.is_empty() {
                result.matched.insert(id.clone(), matched);
            }
            if !differing.is_empty() {
                result.differing.insert(id, differing);
            }
        }

        tracing::debug!(
            matched = result.matched.len(),
            differing = result.differing.len(),
            missing_objects = result.missing_objects.len(),
            "create/update verified"
        );
        result
    }

    /// Verify deletes
    #[must_use]
    pub fn check_delete(&self, checked: &StateInput, etalon: &StateInput) -> DeletionResult {
        let present = checked.ids();
        let mut result = DeletionResult::default();
        for id in etalon.ids() {
            if present.contains(&id) {
                result.not_deleted.insert(id, DeletionStatus::NotDeleted);
            } else {
                result.deleted.insert(id, DeletionStatus::Deleted);
            }
        }
        tracing::debug!(
            deleted = result.deleted.len(),
            not_deleted = result.not_deleted.len(),
            "delete verified"
        );
        result
    }

    /// [`Self::check_create_and_update`] over untyped JSON
    ///
    /// # Errors
    /// [`VerifyError::InvalidInput`] if either side is neither a mapping nor
    /// an id collection
    pub fn check_create_and_update_json(
        &self,
        checked: &serde_json::Value,
        etalon: &serde_json::Value,
    ) -> Result<ComplianceResult, VerifyError> {
        let checked = StateInput::from_json(checked)?;
        let etalon = StateInput::from_json(etalon)?;
        Ok(self.check_create_and_update(&checked, &etalon))
    }

    /// [`Self::check_delete`] over untyped JSON
    ///
    /// # Errors
    /// [`VerifyError::InvalidInput`] if either side is neither a mapping nor
    /// an id collection
    pub fn check_delete_json(
        &self,
        checked: &serde_json::Value,
        etalon: &serde_json::Value,
    ) -> Result<DeletionResult, VerifyError> {
        let checked = StateInput::from_json(checked)?;
        let etalon = StateInput::from_json(etalon)?;
        Ok(self.check_delete(&checked, &etalon))
    }
}

fn missing_object(expected: &ParameterSet) -> ParameterOutcomes {
    expected
        .iter()
        .map(|(name, value)| {
            (
                name.clone(),
                ComparisonOutcome::MissingObject {
                    expected: value.clone(),
                },
            )
        })
        .collect()
}
