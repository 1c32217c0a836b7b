//! Raw radio attributes per managed object
//!
//! Band keys are computed from the parent cell's channel number and channel
//! width. FDD cells expose them as `earfcnDL`/`dlChBw`, TDD cells as
//! `earfcn`/`chBw`; FDD names take precedence when both are present.

use crate::band::{BandClassifier, BandKey};
use crate::error::BandError;
use netconv_model::{ObjectId, ParamValue, ParameterSet, StateMap};
use std::collections::BTreeMap;

/// FDD channel number attribute
pub const FDD_CHANNEL: &str = "earfcnDL";
/// FDD channel width attribute
pub const FDD_WIDTH: &str = "dlChBw";
/// TDD channel number attribute
pub const TDD_CHANNEL: &str = "earfcn";
/// TDD channel width attribute
pub const TDD_WIDTH: &str = "chBw";

/// Depth of a cell DN (`PLMN/MRBTS/LNBTS/LNCEL`)
pub const CELL_DEPTH: usize = 4;

/// Channel number and width of one object
#[derive(Debug, Clone, PartialEq)]
pub struct RadioAttributes<'a> {
    /// Channel number as read
    pub channel: Option<&'a ParamValue>,
    /// Channel width descriptor as read
    pub width: Option<&'a ParamValue>,
}

impl<'a> RadioAttributes<'a> {
    /// Pick FDD or TDD attributes out of a parameter set
    #[must_use]
    pub fn from_parameters(params: &'a ParameterSet) -> Self {
        Self {
            channel: params.get(FDD_CHANNEL).or_else(|| params.get(TDD_CHANNEL)),
            width: params.get(FDD_WIDTH).or_else(|| params.get(TDD_WIDTH)),
        }
    }
}

/// Raw radio attributes keyed by managed object id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceAttributes {
    by_object: BTreeMap<ObjectId, ParameterSet>,
}

impl SourceAttributes {
    /// Create empty index
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register attributes for a managed object
    pub fn insert(&mut self, id: ObjectId, params: ParameterSet) {
        self.by_object.insert(id, params);
    }

    /// Re-key cell-level attributes onto managed child ids
    ///
    /// Each attribute DN (e.g. `.../LNCEL-11/LNCEL_FDD-0`) is cut back to its
    /// cell (`.../LNCEL-11`) and extended with `<class>-<index>`. DNs shorter
    /// than a cell are skipped. Entries of one cell are merged into a single
    /// set, so a cell with both FDD and TDD entries keeps both pairs and the
    /// FDD pair wins at lookup. A name repeated across entries keeps its
    /// first value.
    #[must_use]
    pub fn from_cell_attributes(cells: &StateMap, class: &str, index: &str) -> Self {
        let mut out = Self::new();
        for (dn, params) in cells {
            let Some(cell) = dn.truncated(CELL_DEPTH) else {
                tracing::warn!(dn = %dn, "source attribute DN is shallower than a cell, skipped");
                continue;
            };
            let merged = out.by_object.entry(cell.child(class, index)).or_default();
            for (name, value) in params.iter() {
                if !merged.contains(name) {
                    merged.insert(name.clone(), value.clone());
                }
            }
        }
        out
    }

    /// Raw attributes of an object
    #[inline]
    #[must_use]
    pub fn get(&self, id: &ObjectId) -> Option<&ParameterSet> {
        self.by_object.get(id)
    }

    /// Number of objects with attributes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_object.len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_object.is_empty()
    }

    /// Band key of an object
    ///
    /// # Errors
    /// - [`BandError::MissingSourceAttributes`] if the object has no entry,
    ///   no channel number or no channel width
    /// - [`BandError::InvalidInput`] if the channel number is not an integer
    pub fn band_key(&self, id: &ObjectId, classifier: &BandClassifier) -> Result<BandKey, BandError> {
        let params = self
            .get(id)
            .ok_or_else(|| BandError::missing(id, "radio attributes"))?;
        let radio = RadioAttributes::from_parameters(params);
        let channel = radio
            .channel
            .ok_or_else(|| BandError::missing(id, "channel number"))?;
        let width = radio
            .width
            .ok_or_else(|| BandError::missing(id, "channel width"))?;
        classifier.band_key_from_values(channel, Some(width))
    }
}

impl FromIterator<(ObjectId, ParameterSet)> for SourceAttributes {
    fn from_iter<I: IntoIterator<Item = (ObjectId, ParameterSet)>>(iter: I) -> Self {
        Self {
            by_object: iter.into_iter().collect(),
        }
    }
}
