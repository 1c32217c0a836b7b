//! Parameter sets and object states
//!
//! - [`ParameterSet`]: parameter name → value for one object
//! - [`StateMap`]: object id → parameter set (desired or observed)
//! - [`StateInput`]: a state as handed in by a collaborator, either keyed
//!   by id with parameters or a bare collection of ids

use crate::error::ModelError;
use crate::id::ObjectId;
use crate::value::ParamValue;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Parameters of a single managed object
///
/// Names are unique; iteration order carries no meaning but is stable
/// (sorted by name) so that reports and change sets are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet(BTreeMap<String, ParamValue>);

impl ParameterSet {
    /// Create empty parameter set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a parameter
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    /// Check if a parameter is present
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Insert or replace a parameter, returning the previous value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Option<ParamValue> {
        self.0.insert(name.into(), value.into())
    }

    /// Remove a parameter
    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        self.0.remove(name)
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Copy of `self` overlaid with `overrides` (overrides win)
    #[must_use]
    pub fn merged(&self, overrides: &Self) -> Self {
        let mut out = self.clone();
        for (name, value) in overrides.iter() {
            out.0.insert(name.clone(), value.clone());
        }
        out
    }

    /// Parameter names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterate over `(name, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.0.iter()
    }

    /// Number of parameters
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse from a JSON object of `name → value`
    ///
    /// # Errors
    /// [`ModelError::InvalidInput`] if `value` is not an object or holds a
    /// value that is neither a scalar nor a list of scalars
    pub fn from_json(value: &serde_json::Value) -> Result<Self, ModelError> {
        let object = value.as_object().ok_or_else(|| {
            ModelError::InvalidInput(format!("expected parameter object, got {value}"))
        })?;
        let mut set = Self::new();
        for (name, raw) in object {
            let parsed: ParamValue = serde_json::from_value(raw.clone()).map_err(|e| {
                ModelError::InvalidInput(format!("parameter '{name}': {e}"))
            })?;
            set.0.insert(name.clone(), parsed);
        }
        Ok(set)
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl IntoIterator for ParameterSet {
    type Item = (String, ParamValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ParameterSet {
    type Item = (&'a String, &'a ParamValue);
    type IntoIter = std::collections::btree_map::Iter<'a, String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Object id → parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateMap(BTreeMap<ObjectId, ParameterSet>);

/// Target configuration per object
pub type DesiredState = StateMap;

/// Configuration currently present on the managed system
///
/// An id that is absent does not exist on the system.
pub type ObservedState = StateMap;

impl StateMap {
    /// Create empty state
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters of an object
    #[inline]
    #[must_use]
    pub fn get(&self, id: &ObjectId) -> Option<&ParameterSet> {
        self.0.get(id)
    }

    /// Mutable parameters of an object
    #[inline]
    pub fn get_mut(&mut self, id: &ObjectId) -> Option<&mut ParameterSet> {
        self.0.get_mut(id)
    }

    /// Check if an object is present
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.0.contains_key(id)
    }

    /// Insert or replace an object
    pub fn insert(&mut self, id: ObjectId, params: ParameterSet) -> Option<ParameterSet> {
        self.0.insert(id, params)
    }

    /// Remove an object
    pub fn remove(&mut self, id: &ObjectId) -> Option<ParameterSet> {
        self.0.remove(id)
    }

    /// Set of object ids
    #[must_use]
    pub fn ids(&self) -> BTreeSet<ObjectId> {
        self.0.keys().cloned().collect()
    }

    /// Iterate over `(id, parameters)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&ObjectId, &ParameterSet)> {
        self.0.iter()
    }

    /// Number of objects
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merge another state into this one (incoming objects replace existing)
    pub fn extend(&mut self, other: Self) {
        self.0.extend(other.0);
    }
}

impl FromIterator<(ObjectId, ParameterSet)> for StateMap {
    fn from_iter<I: IntoIterator<Item = (ObjectId, ParameterSet)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for StateMap {
    type Item = (ObjectId, ParameterSet);
    type IntoIter = std::collections::btree_map::IntoIter<ObjectId, ParameterSet>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a StateMap {
    type Item = (&'a ObjectId, &'a ParameterSet);
    type IntoIter = std::collections::btree_map::Iter<'a, ObjectId, ParameterSet>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A state as supplied at the verification boundary
///
/// The etalon of a delete pass is a plain id collection while create and
/// update passes carry parameters; both shapes are accepted everywhere.
#[derive(Debug, Clone, PartialEq)]
pub enum StateInput {
    /// Ids with parameters
    Keyed(StateMap),
    /// Ids only, no parameters
    Ids(BTreeSet<ObjectId>),
}

impl StateInput {
    /// Set of object ids
    #[must_use]
    pub fn ids(&self) -> BTreeSet<ObjectId> {
        match self {
            Self::Keyed(state) => state.ids(),
            Self::Ids(ids) => ids.clone(),
        }
    }

    /// Parameters of an object; `None` for id-only input or absent ids
    #[must_use]
    pub fn parameters(&self, id: &ObjectId) -> Option<&ParameterSet> {
        match self {
            Self::Keyed(state) => state.get(id),
            Self::Ids(_) => None,
        }
    }

    /// Check if no ids are present
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Keyed(state) => state.is_empty(),
            Self::Ids(ids) => ids.is_empty(),
        }
    }

    /// Parse from untyped JSON
    ///
    /// - object → [`StateInput::Keyed`]; each entry must be a parameter
    ///   object, or `null` for an object read back without parameters
    /// - array of strings → [`StateInput::Ids`]
    ///
    /// # Errors
    /// [`ModelError::InvalidInput`] for any other shape
    pub fn from_json(value: &serde_json::Value) -> Result<Self, ModelError> {
        match value {
            serde_json::Value::Object(entries) => {
                let mut state = StateMap::new();
                for (raw_id, raw_params) in entries {
                    let id = ObjectId::new(raw_id.clone())?;
                    let params = if raw_params.is_null() {
                        ParameterSet::new()
                    } else {
                        ParameterSet::from_json(raw_params)?
                    };
                    state.insert(id, params);
                }
                Ok(Self::Keyed(state))
            }
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .ok_or_else(|| {
                            ModelError::InvalidInput(format!("expected object id string, got {item}"))
                        })
                        .and_then(ObjectId::new)
                })
                .collect::<Result<BTreeSet<_>, _>>()
                .map(Self::Ids),
            other => Err(ModelError::InvalidInput(format!(
                "expected mapping or id collection, got {other}"
            ))),
        }
    }
}

impl From<StateMap> for StateInput {
    fn from(state: StateMap) -> Self {
        Self::Keyed(state)
    }
}

impl From<BTreeSet<ObjectId>> for StateInput {
    fn from(ids: BTreeSet<ObjectId>) -> Self {
        Self::Ids(ids)
    }
}

impl From<Vec<ObjectId>> for StateInput {
    fn from(ids: Vec<ObjectId>) -> Self {
        Self::Ids(ids.into_iter().collect())
    }
}
