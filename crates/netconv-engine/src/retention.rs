//! Which existing managed children survive a reconciliation pass

use netconv_model::ObjectId;

/// Default primary instance index
pub const DEFAULT_PRIMARY_INDEX: &str = "0";

/// Decides whether an existing managed child is the primary instance
///
/// Non-primary instances are extraneous and scheduled for deletion.
pub trait RetentionPolicy: Send + Sync {
    /// Check if `id` is the primary instance
    fn is_primary(&self, id: &ObjectId) -> bool;

    /// Policy name (for logging)
    fn name(&self) -> &'static str {
        "custom"
    }
}

/// Keeps instances whose index equals the configured primary index
///
/// `.../LNHOG-0` is primary under the default index; `.../LNHOG-1` is not.
/// An id without an instance index is never primary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryInstancePolicy {
    primary_index: String,
}

impl PrimaryInstancePolicy {
    /// Create policy for an index
    #[inline]
    #[must_use]
    pub fn new(primary_index: impl Into<String>) -> Self {
        Self {
            primary_index: primary_index.into(),
        }
    }

    /// Primary index
    #[inline]
    #[must_use]
    pub fn primary_index(&self) -> &str {
        &self.primary_index
    }
}

impl Default for PrimaryInstancePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_PRIMARY_INDEX)
    }
}

impl RetentionPolicy for PrimaryInstancePolicy {
    fn is_primary(&self, id: &ObjectId) -> bool {
        id.instance_index() == Some(self.primary_index.as_str())
    }

    fn name(&self) -> &'static str {
        "primary_instance"
    }
}

impl<F> RetentionPolicy for F
where
    F: Fn(&ObjectId) -> bool + Send + Sync,
{
    fn is_primary(&self, id: &ObjectId) -> bool {
        self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ObjectId {
        s.parse().unwrap()
    }

    #[test]
    fn primary_index_zero() {
        let policy = PrimaryInstancePolicy::default();
        assert!(policy.is_primary(&id("A/LNCEL-1/LNHOG-0")));
        assert!(!policy.is_primary(&id("A/LNCEL-1/LNHOG-1")));
        assert!(!policy.is_primary(&id("A/LNCEL-1/LNHOG-10")));
        assert!(!policy.is_primary(&id("A/LNCEL-1/LNHOG")));
    }

    #[test]
    fn custom_index() {
        let policy = PrimaryInstancePolicy::new("1");
        assert!(policy.is_primary(&id("A/LNHOG-1")));
        assert!(!policy.is_primary(&id("A/LNHOG-0")));
        assert_eq!(policy.primary_index(), "1");
    }

    #[test]
    fn closure_policy() {
        let keep_all = |_: &ObjectId| true;
        assert!(keep_all.is_primary(&id("A/LNHOG-7")));
        assert_eq!(RetentionPolicy::name(&keep_all), "custom");
    }
}
