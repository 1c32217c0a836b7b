//! In-memory managed system
//!
//! [`SimulatedNetwork`] answers reads from a snapshot and applies pushed
//! change sets to it, so a whole run can be exercised without a live system.

use crate::collaborators::{ChangePusher, ChildQuery, ObservedStateReader, PushOutcome, ReadRequest, MO_CLASS_ID};
use crate::error::CollaboratorError;
use crate::planner::CellTarget;
use async_trait::async_trait;
use netconv_model::{ChangeSet, ObjectId, ParamValue, ParameterSet, StateMap};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Target cells plus every object present on the system
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    /// Target cells
    #[serde(default)]
    pub cells: Vec<CellTarget>,
    /// Objects by DN
    #[serde(default)]
    pub objects: StateMap,
}

impl NetworkSnapshot {
    /// Parse from JSON
    ///
    /// # Errors
    /// Returns the `serde_json` error for malformed input
    pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

/// Snapshot-backed reader and pusher
#[derive(Debug, Clone, Default)]
pub struct SimulatedNetwork {
    objects: Arc<RwLock<StateMap>>,
    pushes: Arc<AtomicUsize>,
    reject_pushes: Arc<AtomicBool>,
}

impl SimulatedNetwork {
    /// Create network holding `objects`
    #[must_use]
    pub fn new(objects: StateMap) -> Self {
        Self {
            objects: Arc::new(RwLock::new(objects)),
            ..Self::default()
        }
    }

    /// Copy of the current objects
    #[must_use]
    pub fn snapshot(&self) -> StateMap {
        self.objects.read().clone()
    }

    /// Insert or replace one object
    pub fn insert(&self, id: ObjectId, params: ParameterSet) {
        self.objects.write().insert(id, params);
    }

    /// Number of pushes applied
    #[must_use]
    pub fn push_count(&self) -> usize {
        self.pushes.load(Ordering::SeqCst)
    }

    /// Make subsequent pushes fail with a transport error
    pub fn reject_pushes(&self, reject: bool) {
        self.reject_pushes.store(reject, Ordering::SeqCst);
    }
}

fn select(id: &ObjectId, params: &ParameterSet, attributes: &[String]) -> ParameterSet {
    if attributes.is_empty() {
        return params.clone();
    }
    attributes
        .iter()
        .filter_map(|name| {
            if name == MO_CLASS_ID {
                Some((name.clone(), ParamValue::from(id.class_name())))
            } else {
                params.get(name).map(|value| (name.clone(), value.clone()))
            }
        })
        .collect()
}

#[async_trait]
impl ObservedStateReader for SimulatedNetwork {
    async fn read(&self, request: &ReadRequest) -> Result<StateMap, CollaboratorError> {
        let objects = self.objects.read();
        Ok(request
            .iter()
            .filter_map(|(id, attributes)| {
                objects
                    .get(id)
                    .map(|params| (id.clone(), select(id, params, attributes)))
            })
            .collect())
    }

    async fn read_children(&self, query: &ChildQuery) -> Result<StateMap, CollaboratorError> {
        let objects = self.objects.read();
        Ok(objects
            .iter()
            .filter(|(id, _)| {
                id.class_name() == query.class
                    && id.parent().is_some_and(|parent| query.parents.contains(&parent))
            })
            .map(|(id, params)| (id.clone(), select(id, params, &query.attributes)))
            .collect())
    }
}

#[async_trait]
impl ChangePusher for SimulatedNetwork {
    async fn push(&self, region: &str, changes: &ChangeSet) -> Result<PushOutcome, CollaboratorError> {
        if self.reject_pushes.load(Ordering::SeqCst) {
            return Err(CollaboratorError::Rejected(format!("region {region} refused the change set")));
        }
        let mut objects = self.objects.write();
        for (id, params) in changes.creates() {
            objects.insert(id.clone(), params.clone());
        }
        for (id, params) in changes.updates() {
            let merged = objects
                .get(id)
                .map_or_else(|| params.clone(), |current| current.merged(params));
            objects.insert(id.clone(), merged);
        }
        for id in changes.deletes() {
            objects.remove(id);
        }
        self.pushes.fetch_add(1, Ordering::SeqCst);
        tracing::info!(region, changes = changes.len(), "simulated push applied");
        Ok(PushOutcome {
            accepted: changes.len(),
            message: format!("applied in {region}"),
        })
    }
}
