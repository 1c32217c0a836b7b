//! Per-parameter comparison policies
//!
//! Provides [`ComparisonPolicy`] and the declarative [`PolicyTable`] that
//! maps parameter names to policies. Parameters not in the table use
//! [`ComparisonPolicy::Default`].

use netconv_band::Template;
use netconv_model::ParamValue;
use serde::Serialize;
use std::collections::BTreeMap;

/// Dynamic GSM neighbour frequency list of an `LNHOG` object
pub const GERAN_FREQUENCY_LIST: &str = "arfcnValueListGERAN";

/// How an observed parameter is compared during reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ComparisonPolicy {
    /// Canonical string equality against the global default (or a dynamic
    /// value when the caller supplied one)
    #[default]
    Default,

    /// Canonical string equality against the value looked up by the
    /// object's band key
    BandResolved,

    /// Order-free, duplicate-aware comparison of list items
    Multiset,
}

impl ComparisonPolicy {
    /// Check whether `observed` differs from `expected` under this policy
    #[must_use]
    pub fn differs(self, expected: &ParamValue, observed: &ParamValue) -> bool {
        match self {
            Self::Default | Self::BandResolved => !expected.canonical_eq(observed),
            Self::Multiset => !expected.multiset_eq(observed),
        }
    }

    /// Policy name (for logging)
    #[inline]
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::BandResolved => "band_resolved",
            Self::Multiset => "multiset",
        }
    }
}

/// Parameter name → [`ComparisonPolicy`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyTable {
    policies: BTreeMap<String, ComparisonPolicy>,
}

impl PolicyTable {
    /// Create empty table (every parameter uses the default policy)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Table for a template: its band-keyed parameters are band resolved
    /// and the GERAN frequency list is a multiset
    #[must_use]
    pub fn for_template(template: &Template) -> Self {
        let mut table = Self::new();
        for param in template.band_parameters() {
            table.register(param, ComparisonPolicy::BandResolved);
        }
        table.register(GERAN_FREQUENCY_LIST, ComparisonPolicy::Multiset);
        table
    }

    /// Register a policy, replacing any previous one
    pub fn register(&mut self, param: impl Into<String>, policy: ComparisonPolicy) {
        self.policies.insert(param.into(), policy);
    }

    /// Builder-style register
    #[inline]
    #[must_use]
    pub fn with(mut self, param: impl Into<String>, policy: ComparisonPolicy) -> Self {
        self.register(param, policy);
        self
    }

    /// Policy of a parameter
    #[must_use]
    pub fn policy_for(&self, param: &str) -> ComparisonPolicy {
        self.policies.get(param).copied().unwrap_or_default()
    }

    /// Parameters with a non-default policy
    pub fn iter(&self) -> impl Iterator<Item = (&str, ComparisonPolicy)> {
        self.policies.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of registered parameters
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netconv_band::{BandTable, B2_THRESHOLD_GERAN, B2_THRESHOLD_GERAN_QCI1};

    #[test]
    fn unknown_parameter_uses_default() {
        let table = PolicyTable::new();
        assert_eq!(table.policy_for("nccperm"), ComparisonPolicy::Default);
        assert!(table.is_empty());
    }

    #[test]
    fn template_table() {
        let mut tables = BTreeMap::new();
        tables.insert(B2_THRESHOLD_GERAN.to_string(), BandTable::new(BTreeMap::new()));
        tables.insert(B2_THRESHOLD_GERAN_QCI1.to_string(), BandTable::new(BTreeMap::new()));
        let template = Template::new(Default::default(), tables);

        let table = PolicyTable::for_template(&template);
        assert_eq!(table.len(), 3);
        assert_eq!(table.policy_for(B2_THRESHOLD_GERAN), ComparisonPolicy::BandResolved);
        assert_eq!(table.policy_for(GERAN_FREQUENCY_LIST), ComparisonPolicy::Multiset);
        assert_eq!(table.policy_for("nccperm"), ComparisonPolicy::Default);
    }

    #[test]
    fn multiset_ignores_order() {
        let desired = ParamValue::list(["640", "641"]);
        assert!(!ComparisonPolicy::Multiset.differs(&desired, &ParamValue::list(["641", "640"])));
        assert!(ComparisonPolicy::Multiset.differs(&desired, &ParamValue::list(["640"])));
        assert!(ComparisonPolicy::Multiset.differs(
            &desired,
            &ParamValue::list(["640", "641", "641"])
        ));
        assert!(ComparisonPolicy::Default.differs(&desired, &ParamValue::list(["641", "640"])));
    }

    #[test]
    fn default_compares_canonical_strings() {
        assert!(!ComparisonPolicy::Default.differs(&ParamValue::from(10_i64), &ParamValue::from("10")));
        assert!(ComparisonPolicy::BandResolved.differs(
            &ParamValue::from(-120_i64),
            &ParamValue::from("-110")
        ));
    }

    #[test]
    fn builder_overrides() {
        let table = PolicyTable::new()
            .with("x", ComparisonPolicy::Multiset)
            .with("x", ComparisonPolicy::Default);
        assert_eq!(table.iter().count(), 1);
        assert_eq!(table.policy_for("x"), ComparisonPolicy::Default);
    }
}
