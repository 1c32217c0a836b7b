//! Three-way reconciliation of desired and observed state
//!
//! Provides [`ReconciliationEngine`], which turns desired targets, the
//! observed parameters of existing managed children and the set of existing
//! children into a [`ChangeSet`].
//!
//! # Algorithm
//!
//! 1. **Creates**: desired ids without an existing child get their full
//!    effective desired parameter set.
//! 2. **Updates**: desired ids with an existing child get only the observed
//!    parameters that differ under their [`ComparisonPolicy`].
//! 3. **Deletes**: existing children that are not the primary instance and
//!    not desired.
//!
//! The engine holds no state between calls; the same inputs always produce
//! the same change set.

use crate::error::{ObjectFailure, ReconcileError};
use crate::policy::{ComparisonPolicy, PolicyTable};
use crate::retention::{PrimaryInstancePolicy, RetentionPolicy};
use netconv_band::{BandError, DefaultTemplateResolver};
use netconv_model::{ChangeKind, ChangeSet, ObjectId, ObservedState, ParamValue, ParameterSet, StateMap};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Desired managed objects with their dynamic parameters
///
/// Every key is a desired id; its parameter set holds the object-specific
/// values (e.g. the neighbour frequency list) that override the template.
pub type DesiredTargets = StateMap;

/// Result of one reconciliation pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reconciliation {
    /// Operations needed to converge
    pub change_set: ChangeSet,
    /// Objects (partially) excluded because of per-object anomalies
    pub failures: Vec<ObjectFailure>,
}

impl Reconciliation {
    /// Check if every desired object was reconciled fully
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Computes change sets from desired and observed state
pub struct ReconciliationEngine {
    resolver: DefaultTemplateResolver,
    policies: PolicyTable,
    retention: Box<dyn RetentionPolicy>,
}

impl ReconciliationEngine {
    /// Create engine with the template's policy table and primary index `0`
    #[must_use]
    pub fn new(resolver: DefaultTemplateResolver) -> Self {
        let policies = PolicyTable::for_template(resolver.template());
        Self {
            resolver,
            policies,
            retention: Box::new(PrimaryInstancePolicy::default()),
        }
    }

    /// Replace the retention policy
    #[must_use]
    pub fn with_retention(mut self, retention: impl RetentionPolicy + 'static) -> Self {
        self.retention = Box::new(retention);
        self
    }

    /// Resolver in use
    #[inline]
    #[must_use]
    pub fn resolver(&self) -> &DefaultTemplateResolver {
        &self.resolver
    }

    /// Policy table in use
    #[inline]
    #[must_use]
    pub fn policies(&self) -> &PolicyTable {
        &self.policies
    }

    /// Compute the change set
    ///
    /// `observed` holds the parameters of existing children; an id in
    /// `existing` without an observed entry is compared as having no
    /// parameters and never yields an update.
    ///
    /// # Errors
    /// [`ReconcileError::InvalidChangeSet`] if the buckets overlap, which
    /// the construction rules exclude
    pub fn reconcile(
        &self,
        desired: &DesiredTargets,
        observed: &ObservedState,
        existing: &BTreeSet<ObjectId>,
    ) -> Result<Reconciliation, ReconcileError> {
        let mut failures = Vec::new();
        let mut creates = StateMap::new();
        let mut updates = StateMap::new();

        for (id, dynamic) in desired {
            if existing.contains(id) {
                let empty = ParameterSet::new();
                let current = observed.get(id).unwrap_or(&empty);
                let diff = self.diff_object(id, dynamic, current, &mut failures);
                if !diff.is_empty() {
                    tracing::debug!(id = %id, parameters = diff.len(), "update");
                    updates.insert(id.clone(), diff);
                }
            } else {
                match self.resolver.resolve_effective_desired(id, dynamic) {
                    Ok(params) => {
                        tracing::debug!(id = %id, parameters = params.len(), "create");
                        creates.insert(id.clone(), params);
                    }
                    Err(error) => {
                        tracing::warn!(id = %id, %error, "create skipped");
                        failures.push(ObjectFailure::new(id, ChangeKind::Create, error));
                    }
                }
            }
        }

        let deletes: BTreeSet<ObjectId> = existing
            .iter()
            .filter(|id| !desired.contains(id) && !self.retention.is_primary(id))
            .cloned()
            .collect();

        tracing::info!(
            creates = creates.len(),
            updates = updates.len(),
            deletes = deletes.len(),
            failures = failures.len(),
            retention = self.retention.name(),
            "reconciled"
        );

        let change_set = ChangeSet::new(creates, updates, deletes)?;
        Ok(Reconciliation {
            change_set,
            failures,
        })
    }

    /// Differing observed parameters of one existing object
    ///
    /// Observed parameters with no desired counterpart are ignored. When
    /// the band key cannot be computed, band-resolved parameters are
    /// skipped and one failure is recorded for the object.
    fn diff_object(
        &self,
        id: &ObjectId,
        dynamic: &ParameterSet,
        current: &ParameterSet,
        failures: &mut Vec<ObjectFailure>,
    ) -> ParameterSet {
        let mut diff = ParameterSet::new();
        let mut band_failed = false;

        for (name, actual) in current {
            let policy = self.policies.policy_for(name);
            let expected = match self.expected_value(id, name, policy, dynamic) {
                Ok(Some(value)) => value,
                Ok(None) => continue,
                Err(error) => {
                    if !band_failed {
                        tracing::warn!(id = %id, %error, "band-resolved parameters skipped");
                        failures.push(ObjectFailure::new(id, ChangeKind::Update, error));
                        band_failed = true;
                    }
                    continue;
                }
            };
            if policy.differs(&expected, actual) {
                tracing::trace!(
                    id = %id,
                    parameter = %name,
                    policy = policy.name(),
                    expected = %expected,
                    actual = %actual,
                    "parameter differs"
                );
                diff.insert(name.clone(), expected);
            }
        }
        diff
    }

    fn expected_value(
        &self,
        id: &ObjectId,
        name: &str,
        policy: ComparisonPolicy,
        dynamic: &ParameterSet,
    ) -> Result<Option<ParamValue>, BandError> {
        if let Some(value) = dynamic.get(name) {
            return Ok(Some(value.clone()));
        }
        match policy {
            ComparisonPolicy::BandResolved => self.resolver.band_value(id, name),
            ComparisonPolicy::Default | ComparisonPolicy::Multiset => {
                Ok(self.resolver.default_value(name).cloned())
            }
        }
    }
}

impl fmt::Debug for ReconciliationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReconciliationEngine")
            .field("resolver", &self.resolver)
            .field("policies", &self.policies)
            .field("retention", &self.retention.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::GERAN_FREQUENCY_LIST;
    use netconv_band::{
        BandTable, SourceAttributes, Template, B2_THRESHOLD_GERAN, B2_THRESHOLD_GERAN_QCI1,
        FDD_CHANNEL, FDD_WIDTH,
    };
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    const CELL_A: &str = "PLMN-PLMN/MRBTS-1/LNBTS-1/LNCEL-1/LNHOG-0";
    const CELL_B: &str = "PLMN-PLMN/MRBTS-1/LNBTS-1/LNCEL-2/LNHOG-0";

    fn id(s: &str) -> ObjectId {
        s.parse().unwrap()
    }

    fn engine() -> ReconciliationEngine {
        let mut tables = BTreeMap::new();
        tables.insert(
            B2_THRESHOLD_GERAN.to_string(),
            BandTable::from_json_str(B2_THRESHOLD_GERAN, r#"{"LTE_1800_20": -110}"#).unwrap(),
        );
        tables.insert(
            B2_THRESHOLD_GERAN_QCI1.to_string(),
            BandTable::from_json_str(B2_THRESHOLD_GERAN_QCI1, r#"{"LTE_1800_20": -108}"#).unwrap(),
        );
        let template = Template::new(ParameterSet::new().with("nccperm", 255_i64), tables);
        let sources: SourceAttributes = [CELL_A]
            .into_iter()
            .map(|dn| {
                (
                    id(dn),
                    ParameterSet::new()
                        .with(FDD_CHANNEL, 1500_i64)
                        .with(FDD_WIDTH, "20 MHz"),
                )
            })
            .collect();
        ReconciliationEngine::new(DefaultTemplateResolver::new(template, sources))
    }

    fn desired(dn: &str, freqs: &[&str]) -> DesiredTargets {
        [(
            id(dn),
            ParameterSet::new().with(GERAN_FREQUENCY_LIST, ParamValue::list(freqs.iter().copied())),
        )]
        .into_iter()
        .collect()
    }

    #[test]
    fn create_uses_resolved_template() {
        let result = engine()
            .reconcile(&desired(CELL_A, &["640", "641"]), &StateMap::new(), &BTreeSet::new())
            .unwrap();
        let created = result.change_set.creates().get(&id(CELL_A)).unwrap();
        assert_eq!(created.get("nccperm").unwrap().canonical(), "255");
        assert_eq!(created.get(B2_THRESHOLD_GERAN).unwrap().canonical(), "-110");
        assert_eq!(created.get(B2_THRESHOLD_GERAN_QCI1).unwrap().canonical(), "-108");
        assert_eq!(
            created.get(GERAN_FREQUENCY_LIST).unwrap().canonical(),
            "[640, 641]"
        );
        assert!(result.is_clean());
    }

    #[test]
    fn update_multiset_ignores_order() {
        let observed: StateMap = [(
            id(CELL_A),
            ParameterSet::new()
                .with(GERAN_FREQUENCY_LIST, ParamValue::list(["641", "640"]))
                .with("nccperm", "255")
                .with(B2_THRESHOLD_GERAN, "-110"),
        )]
        .into_iter()
        .collect();
        let result = engine()
            .reconcile(&desired(CELL_A, &["640", "641"]), &observed, &observed.ids())
            .unwrap();
        assert!(result.change_set.is_empty());
    }

    #[test]
    fn update_only_differing_parameters() {
        let observed: StateMap = [(
            id(CELL_A),
            ParameterSet::new()
                .with(GERAN_FREQUENCY_LIST, ParamValue::list(["640"]))
                .with("nccperm", 10_i64)
                .with(B2_THRESHOLD_GERAN, -110_i64)
                .with(B2_THRESHOLD_GERAN_QCI1, -120_i64)
                .with("unmanagedParameter", "x"),
        )]
        .into_iter()
        .collect();
        let result = engine()
            .reconcile(&desired(CELL_A, &["640", "641"]), &observed, &observed.ids())
            .unwrap();

        let update = result.change_set.updates().get(&id(CELL_A)).unwrap();
        let names: Vec<&str> = update.names().collect();
        assert_eq!(names, vec![GERAN_FREQUENCY_LIST, B2_THRESHOLD_GERAN_QCI1, "nccperm"]);
        assert_eq!(update.get("nccperm").unwrap().canonical(), "255");
        assert_eq!(update.get(B2_THRESHOLD_GERAN_QCI1).unwrap().canonical(), "-108");
    }

    #[test]
    fn band_fallback_on_unknown_key() {
        let mut sources = SourceAttributes::new();
        sources.insert(
            id(CELL_B),
            ParameterSet::new().with(FDD_CHANNEL, 6300_i64).with(FDD_WIDTH, "10 MHz"),
        );
        let base = engine();
        let resolver = DefaultTemplateResolver::new(base.resolver().template().clone(), sources);
        let engine = ReconciliationEngine::new(resolver);

        let observed: StateMap = [(id(CELL_B), ParameterSet::new().with(B2_THRESHOLD_GERAN, "-110"))]
            .into_iter()
            .collect();
        let result = engine
            .reconcile(&desired(CELL_B, &[]), &observed, &observed.ids())
            .unwrap();
        let update = result.change_set.updates().get(&id(CELL_B)).unwrap();
        assert_eq!(update.get(B2_THRESHOLD_GERAN).unwrap().canonical(), "-120");
    }

    #[test]
    fn missing_source_attributes_surface_as_failures() {
        let result = engine()
            .reconcile(&desired(CELL_B, &["1"]), &StateMap::new(), &BTreeSet::new())
            .unwrap();
        assert!(result.change_set.creates().is_empty());
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].kind, ChangeKind::Create);
        assert!(result.failures[0].is_missing_source_attributes());

        let observed: StateMap = [(
            id(CELL_B),
            ParameterSet::new()
                .with(B2_THRESHOLD_GERAN, "-1")
                .with(B2_THRESHOLD_GERAN_QCI1, "-1")
                .with("nccperm", "1"),
        )]
        .into_iter()
        .collect();
        let result = engine()
            .reconcile(&desired(CELL_B, &["1"]), &observed, &observed.ids())
            .unwrap();
        let update = result.change_set.updates().get(&id(CELL_B)).unwrap();
        assert_eq!(update.names().collect::<Vec<_>>(), vec!["nccperm"]);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].kind, ChangeKind::Update);
    }

    #[test]
    fn deletes_non_primary_siblings() {
        let extra = id("PLMN-PLMN/MRBTS-1/LNBTS-1/LNCEL-1/LNHOG-1");
        let orphan = id("PLMN-PLMN/MRBTS-1/LNBTS-1/LNCEL-9/LNHOG-0");
        let existing: BTreeSet<ObjectId> = [id(CELL_A), extra.clone(), orphan.clone()]
            .into_iter()
            .collect();
        let result = engine()
            .reconcile(&desired(CELL_A, &[]), &StateMap::new(), &existing)
            .unwrap();
        assert_eq!(result.change_set.deletes(), &BTreeSet::from([extra]));
        assert!(!result.change_set.deletes().contains(&orphan));
    }

    #[test]
    fn custom_retention_predicate() {
        let existing: BTreeSet<ObjectId> = [id("A/LNHOG-0"), id("A/LNHOG-1")].into_iter().collect();
        let engine = engine().with_retention(|id: &ObjectId| id.instance_index() == Some("1"));
        let result = engine
            .reconcile(&StateMap::new(), &StateMap::new(), &existing)
            .unwrap();
        assert_eq!(result.change_set.deletes(), &BTreeSet::from([id("A/LNHOG-0")]));
    }

    #[test]
    fn engine_debug_names_retention() {
        let rendered = format!("{:?}", engine());
        assert!(rendered.contains("primary_instance"));
    }
}
