//! Hierarchical object identifiers
//!
//! Provides [`ObjectId`], the distinguished name (DN) of a managed object
//! instance, e.g. `PLMN-PLMN/MRBTS-1/LNBTS-1/LNCEL-11/LNHOG-0`.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Separator between DN segments
pub const SEGMENT_SEPARATOR: &str = "/";

/// Separator between class name and instance index inside a segment
pub const INSTANCE_SEPARATOR: &str = "-";

/// Distinguished name of a managed object
///
/// Equality is exact string equality: two ids that differ only in case or
/// in redundant separators are different objects.
///
/// # Examples
/// - `PLMN-PLMN/MRBTS-1/LNBTS-1/LNCEL-11` → a cell
/// - `PLMN-PLMN/MRBTS-1/LNBTS-1/LNCEL-11/LNHOG-0` → its primary handover object
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId(String);

impl ObjectId {
    /// Create id from a raw DN string
    ///
    /// # Errors
    /// Returns [`ModelError::EmptyObjectId`] for an empty string
    pub fn new(dn: impl Into<String>) -> Result<Self, ModelError> {
        let dn = dn.into();
        if dn.is_empty() {
            return Err(ModelError::EmptyObjectId);
        }
        Ok(Self(dn))
    }

    /// Raw DN string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// DN segments from root to leaf
    #[inline]
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEGMENT_SEPARATOR)
    }

    /// Number of segments
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// Last segment (`LNHOG-0` for `.../LNCEL-11/LNHOG-0`)
    #[inline]
    #[must_use]
    pub fn leaf(&self) -> &str {
        self.0
            .rsplit_once(SEGMENT_SEPARATOR)
            .map_or(self.0.as_str(), |(_, leaf)| leaf)
    }

    /// Parent id (if not a root)
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.0
            .rsplit_once(SEGMENT_SEPARATOR)
            .map(|(parent, _)| Self(parent.to_string()))
    }

    /// Class name of the leaf segment (`LNHOG` for `LNHOG-0`)
    #[must_use]
    pub fn class_name(&self) -> &str {
        let leaf = self.leaf();
        leaf.rsplit_once(INSTANCE_SEPARATOR)
            .map_or(leaf, |(class, _)| class)
    }

    /// Instance index of the leaf segment (`0` for `LNHOG-0`)
    #[must_use]
    pub fn instance_index(&self) -> Option<&str> {
        self.leaf()
            .rsplit_once(INSTANCE_SEPARATOR)
            .map(|(_, index)| index)
    }

    /// Append a `<class>-<index>` child segment
    #[must_use]
    pub fn child(&self, class: &str, index: &str) -> Self {
        Self(format!(
            "{}{SEGMENT_SEPARATOR}{class}{INSTANCE_SEPARATOR}{index}",
            self.0
        ))
    }

    /// Keep only the first `depth` segments
    ///
    /// Returns `None` if the id is shallower than `depth`.
    #[must_use]
    pub fn truncated(&self, depth: usize) -> Option<Self> {
        if depth == 0 || self.depth() < depth {
            return None;
        }
        let kept: Vec<&str> = self.segments().take(depth).collect();
        Some(Self(kept.join(SEGMENT_SEPARATOR)))
    }

    /// Check if `self` is a strict ancestor of `other`
    #[must_use]
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        other
            .0
            .strip_prefix(self.0.as_str())
            .is_some_and(|rest| rest.starts_with(SEGMENT_SEPARATOR))
    }
}

impl Display for ObjectId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ObjectId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ObjectId {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

impl Borrow<str> for ObjectId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
