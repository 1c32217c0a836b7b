//! Parameter values and their canonical string form
//!
//! The managed system returns heterogeneous types for the same parameter
//! (numbers, enums rendered as strings, lists of either). Every equality
//! check in reconciliation and verification therefore goes through the
//! canonical string form: `10` and `"10"` are the same value.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

/// A single scalar parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Boolean flag
    Flag(bool),
    /// Integral number
    Integer(i64),
    /// Non-integral number
    Real(f64),
    /// Text (including enums rendered as strings)
    Text(String),
}

impl Scalar {
    /// Canonical string form used for every comparison
    ///
    /// Reals use Rust's shortest round-trip formatting, so `-120.0`
    /// renders as `-120` and compares equal to the integer `-120`.
    #[must_use]
    pub fn canonical(&self) -> String {
        match self {
            Self::Flag(b) => b.to_string(),
            Self::Integer(n) => n.to_string(),
            Self::Real(x) => x.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Parameter value: a scalar or an ordered sequence of scalars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Single value
    Scalar(Scalar),
    /// Sequence of values (e.g. a frequency list)
    List(Vec<Scalar>),
}

impl ParamValue {
    /// Build a list value
    #[must_use]
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Scalar>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Canonical string form
    ///
    /// Lists render as `[a, b, c]` in their stored order, so two lists
    /// with the same items in a different order are not canonically equal.
    /// Use [`ParamValue::multiset_eq`] where order must not matter.
    #[must_use]
    pub fn canonical(&self) -> String {
        match self {
            Self::Scalar(s) => s.canonical(),
            Self::List(items) => {
                let rendered: Vec<String> = items.iter().map(Scalar::canonical).collect();
                format!("[{}]", rendered.join(", "))
            }
        }
    }

    /// Equality through canonical string form
    #[inline]
    #[must_use]
    pub fn canonical_eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }

    /// Items of the value; a scalar is a one-item sequence
    #[must_use]
    pub fn items(&self) -> &[Scalar] {
        match self {
            Self::Scalar(s) => std::slice::from_ref(s),
            Self::List(items) => items,
        }
    }

    /// Canonical item counts (order-free, duplicate-aware)
    #[must_use]
    pub fn multiset(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for item in self.items() {
            *counts.entry(item.canonical()).or_insert(0) += 1;
        }
        counts
    }

    /// Multiset equality: order is irrelevant, duplicate counts are not
    #[must_use]
    pub fn multiset_eq(&self, other: &Self) -> bool {
        self.multiset() == other.multiset()
    }

    /// Check for the list variant
    #[inline]
    #[must_use]
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }
}

impl Display for ParamValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl From<Scalar> for ParamValue {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

macro_rules! scalar_param_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    Self::Scalar(Scalar::from(value))
                }
            }
        )*
    };
}

scalar_param_from!(bool, i64, f64, &str, String);

impl From<Vec<Scalar>> for ParamValue {
    fn from(items: Vec<Scalar>) -> Self {
        Self::List(items)
    }
}
