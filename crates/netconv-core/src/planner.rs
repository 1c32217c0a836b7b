//! Desired-state planning from cell neighbour relations
//!
//! Every audited cell with at least one GSM inter-RAT neighbour wants one
//! managed child `<cell>/<class>-<primary index>` whose frequency list holds
//! the distinct BCCH frequencies of those neighbours.

use netconv_engine::{DesiredTargets, DEFAULT_PRIMARY_INDEX, GERAN_FREQUENCY_LIST};
use netconv_model::{ObjectId, ParamValue, ParameterSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Default managed child class
pub const DEFAULT_MANAGED_CLASS: &str = "LNHOG";

/// Radio technology of a neighbour cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Technology {
    /// GSM
    Gsm,
    /// WCDMA
    Wcdma,
    /// LTE
    Lte,
}

/// Inter-RAT neighbour of a target cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighbour {
    /// Neighbour technology
    pub technology: Technology,
    /// BCCH frequency (GSM neighbours)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bcch_frequency: Option<i64>,
}

impl Neighbour {
    /// GSM neighbour on a BCCH frequency
    #[inline]
    #[must_use]
    pub fn gsm(bcch_frequency: i64) -> Self {
        Self {
            technology: Technology::Gsm,
            bcch_frequency: Some(bcch_frequency),
        }
    }
}

/// Cell targeted by a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellTarget {
    /// Cell DN
    pub dn: ObjectId,
    /// Administrative lock
    #[serde(default)]
    pub locked: bool,
    /// Inter-RAT neighbours
    #[serde(default)]
    pub neighbours: Vec<Neighbour>,
}

impl CellTarget {
    /// Unlocked cell without neighbours
    #[must_use]
    pub fn new(dn: ObjectId) -> Self {
        Self {
            dn,
            locked: false,
            neighbours: Vec::new(),
        }
    }

    /// Builder-style neighbour
    #[must_use]
    pub fn with_neighbour(mut self, neighbour: Neighbour) -> Self {
        self.neighbours.push(neighbour);
        self
    }

    /// Builder-style lock
    #[must_use]
    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    /// Distinct BCCH frequencies of GSM neighbours, as strings
    #[must_use]
    pub fn gsm_frequencies(&self) -> BTreeSet<String> {
        self.neighbours
            .iter()
            .filter(|n| n.technology == Technology::Gsm)
            .filter_map(|n| n.bcch_frequency)
            .map(|f| f.to_string())
            .collect()
    }
}

/// Which target cells are audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AuditType {
    /// Every target cell
    AllCells,
    /// Skip locked cells
    #[default]
    UnlockedOnly,
}

impl AuditType {
    /// Check if a cell is audited
    #[inline]
    #[must_use]
    pub fn includes(self, cell: &CellTarget) -> bool {
        match self {
            Self::AllCells => true,
            Self::UnlockedOnly => !cell.locked,
        }
    }
}

impl Display for AuditType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AllCells => "All cells",
            Self::UnlockedOnly => "Unlocked cell only",
        })
    }
}

impl FromStr for AuditType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "allcells" | "all" => Ok(Self::AllCells),
            "unlockedcellonly" | "unlockedonly" | "unlocked" => Ok(Self::UnlockedOnly),
            _ => Err(format!("unknown audit type '{s}'")),
        }
    }
}

/// Plans desired managed children from cell neighbours
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighbourPlanner {
    managed_class: String,
    primary_index: String,
}

impl NeighbourPlanner {
    /// Create planner
    #[must_use]
    pub fn new(managed_class: impl Into<String>, primary_index: impl Into<String>) -> Self {
        Self {
            managed_class: managed_class.into(),
            primary_index: primary_index.into(),
        }
    }

    /// Managed child id of a cell
    #[inline]
    #[must_use]
    pub fn child_of(&self, cell: &ObjectId) -> ObjectId {
        cell.child(&self.managed_class, &self.primary_index)
    }

    /// Cells audited under `audit`
    #[must_use]
    pub fn audited<'a>(&self, targets: &'a [CellTarget], audit: AuditType) -> Vec<&'a CellTarget> {
        let audited: Vec<_> = targets.iter().filter(|cell| audit.includes(cell)).collect();
        tracing::info!(
            targets = targets.len(),
            audited = audited.len(),
            audit = %audit,
            "target cells filtered"
        );
        audited
    }

    /// Desired children with their frequency lists
    ///
    /// Cells without GSM neighbours produce no desired child.
    #[must_use]
    pub fn plan<'a>(&self, cells: impl IntoIterator<Item = &'a CellTarget>) -> DesiredTargets {
        cells
            .into_iter()
            .filter_map(|cell| {
                let frequencies = cell.gsm_frequencies();
                if frequencies.is_empty() {
                    return None;
                }
                let dynamic = ParameterSet::new()
                    .with(GERAN_FREQUENCY_LIST, ParamValue::list(frequencies));
                Some((self.child_of(&cell.dn), dynamic))
            })
            .collect()
    }
}

impl Default for NeighbourPlanner {
    fn default() -> Self {
        Self::new(DEFAULT_MANAGED_CLASS, DEFAULT_PRIMARY_INDEX)
    }
}
