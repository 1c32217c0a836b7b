//! Change sets produced by reconciliation
//!
//! Provides [`ChangeSet`], the create/update/delete operations needed to
//! converge the observed state onto the desired state.

use crate::error::ModelError;
use crate::id::ObjectId;
use crate::state::StateMap;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};

/// Kind of change applied to one object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChangeKind {
    /// Object is created with a full parameter set
    Create,
    /// Object exists; only differing parameters are set
    Update,
    /// Object is removed
    Delete,
}

impl ChangeKind {
    /// All kinds in report order
    pub const ALL: [Self; 3] = [Self::Create, Self::Update, Self::Delete];

    /// Report category label
    #[inline]
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
        }
    }
}

impl Display for ChangeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Create/update/delete operations of one reconciliation pass
///
/// # Invariants
/// - An object id appears in at most one of `creates`, `updates`, `deletes`
/// - Every entry in `updates` carries at least one parameter
///
/// Both are checked by [`ChangeSet::new`]; there is no way to mutate a
/// change set after construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChangeSet {
    creates: StateMap,
    updates: StateMap,
    deletes: BTreeSet<ObjectId>,
}

impl ChangeSet {
    /// Build a change set, checking the partition invariant
    ///
    /// # Errors
    /// - [`ModelError::OverlappingChange`] if an id is in more than one part
    /// - [`ModelError::EmptyUpdate`] if an update carries no parameters
    pub fn new(
        creates: StateMap,
        updates: StateMap,
        deletes: BTreeSet<ObjectId>,
    ) -> Result<Self, ModelError> {
        for (id, params) in updates.iter() {
            if creates.contains(id) {
                return Err(ModelError::overlapping(id, ChangeKind::Create, ChangeKind::Update));
            }
            if params.is_empty() {
                return Err(ModelError::EmptyUpdate(id.clone()));
            }
        }
        for id in &deletes {
            if creates.contains(id) {
                return Err(ModelError::overlapping(id, ChangeKind::Create, ChangeKind::Delete));
            }
            if updates.contains(id) {
                return Err(ModelError::overlapping(id, ChangeKind::Update, ChangeKind::Delete));
            }
        }
        Ok(Self {
            creates,
            updates,
            deletes,
        })
    }

    /// Empty change set
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Objects to create, with full parameter sets
    #[inline]
    #[must_use]
    pub fn creates(&self) -> &StateMap {
        &self.creates
    }

    /// Objects to update, with differing parameters only
    #[inline]
    #[must_use]
    pub fn updates(&self) -> &StateMap {
        &self.updates
    }

    /// Objects to delete
    #[inline]
    #[must_use]
    pub fn deletes(&self) -> &BTreeSet<ObjectId> {
        &self.deletes
    }

    /// Total number of object-level changes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.creates.len() + self.updates.len() + self.deletes.len()
    }

    /// Check if nothing needs to change
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Which part (if any) an object belongs to
    #[must_use]
    pub fn kind_of(&self, id: &ObjectId) -> Option<ChangeKind> {
        if self.creates.contains(id) {
            Some(ChangeKind::Create)
        } else if self.updates.contains(id) {
            Some(ChangeKind::Update)
        } else if self.deletes.contains(id) {
            Some(ChangeKind::Delete)
        } else {
            None
        }
    }

    /// Decompose into `(creates, updates, deletes)`
    #[must_use]
    pub fn into_parts(self) -> (StateMap, StateMap, BTreeSet<ObjectId>) {
        (self.creates, self.updates, self.deletes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ParameterSet;

    fn dn(s: &str) -> ObjectId {
        s.parse().unwrap()
    }

    fn one(id: &str) -> StateMap {
        [(dn(id), ParameterSet::new().with("p", "1"))]
            .into_iter()
            .collect()
    }

    #[test]
    fn change_set_counts() {
        let cs = ChangeSet::new(one("A"), one("B"), [dn("C"), dn("D")].into()).unwrap();
        assert_eq!(cs.len(), 4);
        assert!(!cs.is_empty());
        assert_eq!(cs.kind_of(&dn("A")), Some(ChangeKind::Create));
        assert_eq!(cs.kind_of(&dn("B")), Some(ChangeKind::Update));
        assert_eq!(cs.kind_of(&dn("C")), Some(ChangeKind::Delete));
        assert_eq!(cs.kind_of(&dn("Z")), None);
    }

    #[test]
    fn change_set_rejects_create_update_overlap() {
        let err = ChangeSet::new(one("A"), one("A"), BTreeSet::new()).unwrap_err();
        assert!(matches!(err, ModelError::OverlappingChange { .. }));
    }

    #[test]
    fn change_set_rejects_delete_overlap() {
        assert!(ChangeSet::new(one("A"), StateMap::new(), [dn("A")].into()).is_err());
        assert!(ChangeSet::new(StateMap::new(), one("A"), [dn("A")].into()).is_err());
    }

    #[test]
    fn change_set_rejects_empty_update() {
        let updates: StateMap = [(dn("A"), ParameterSet::new())].into_iter().collect();
        let err = ChangeSet::new(StateMap::new(), updates, BTreeSet::new()).unwrap_err();
        assert!(matches!(err, ModelError::EmptyUpdate(_)));
    }

    #[test]
    fn change_kind_labels() {
        let labels: Vec<_> = ChangeKind::ALL.iter().map(|k| k.label()).collect();
        assert_eq!(labels, vec!["Create", "Update", "Delete"]);
    }
}
