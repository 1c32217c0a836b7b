//! Channel number → frequency band classification
//!
//! Provides [`BandClassifier`] and the composite [`BandKey`] used to look up
//! band-specific defaults.

use crate::error::BandError;
use netconv_model::{ParamValue, Scalar};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt::{self, Display, Formatter};

/// Label for channels outside every known range
pub const UNKNOWN_BAND: &str = "Unknown";

/// Composite lookup key: band label and bandwidth, e.g. `LTE_1800_20`
///
/// Only meaningful as a key into a band-override table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BandKey(String);

impl BandKey {
    /// Combine a band label and a bandwidth token
    #[inline]
    #[must_use]
    pub fn new(label: &str, bandwidth: &str) -> Self {
        Self(format!("{label}_{bandwidth}"))
    }

    /// Key as string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for BandKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for BandKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BandKey {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

/// Inclusive channel range mapped to one band label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandRange {
    /// Lowest channel (inclusive)
    pub low: i64,
    /// Highest channel (inclusive)
    pub high: i64,
    /// Band label
    pub label: String,
}

impl BandRange {
    /// Create new range
    #[inline]
    #[must_use]
    pub fn new(low: i64, high: i64, label: impl Into<String>) -> Self {
        Self {
            low,
            high,
            label: label.into(),
        }
    }

    /// Check if a channel falls in this range
    #[inline]
    #[must_use]
    pub fn contains(&self, channel: i64) -> bool {
        (self.low..=self.high).contains(&channel)
    }

    fn overlaps(&self, other: &Self) -> bool {
        self.low <= other.high && other.low <= self.high
    }
}

/// Maps raw radio parameters to a [`BandKey`]
///
/// # Invariants
/// Ranges never overlap, so every channel maps to at most one label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandClassifier {
    ranges: Vec<BandRange>,
}

impl BandClassifier {
    /// Build a classifier from custom ranges
    ///
    /// # Errors
    /// [`BandError::OverlappingRanges`] if two ranges share a channel, or
    /// [`BandError::InvalidInput`] if a range is empty
    pub fn new(ranges: Vec<BandRange>) -> Result<Self, BandError> {
        for (i, range) in ranges.iter().enumerate() {
            if range.low > range.high {
                return Err(BandError::InvalidInput(format!(
                    "band {} has empty range {}..={}",
                    range.label, range.low, range.high
                )));
            }
            if let Some(other) = ranges[i + 1..].iter().find(|r| r.overlaps(range)) {
                return Err(BandError::OverlappingRanges {
                    first: range.label.clone(),
                    second: other.label.clone(),
                });
            }
        }
        Ok(Self { ranges })
    }

    /// LTE EARFCN table
    #[must_use]
    pub fn lte() -> Self {
        Self {
            ranges: vec![
                BandRange::new(9870, 9919, "LTE_450"),
                BandRange::new(6150, 6449, "LTE_800"),
                BandRange::new(1200, 1949, "LTE_1800"),
                BandRange::new(2750, 3449, "LTE_2600"),
                BandRange::new(0, 599, "LTE_2100"),
                BandRange::new(38650, 39649, "LTE_2300"),
                BandRange::new(38250, 38649, "LTE_1900"),
                BandRange::new(46709, 54539, "LTE_Unlicensed"),
            ],
        }
    }

    /// Ranges in lookup order
    #[inline]
    #[must_use]
    pub fn ranges(&self) -> &[BandRange] {
        &self.ranges
    }

    /// Band label of a channel, [`UNKNOWN_BAND`] if uncovered
    #[must_use]
    pub fn band_label(&self, channel: i64) -> &str {
        self.ranges
            .iter()
            .find(|r| r.contains(channel))
            .map_or(UNKNOWN_BAND, |r| r.label.as_str())
    }

    /// Band key from a parsed channel and a width descriptor
    ///
    /// The bandwidth is the first whitespace-delimited token of `width`
    /// (`"20 MHz"` → `20`). A blank width gives an empty token, so the key
    /// (`LTE_1800_`) matches no table entry and resolves to the fallback.
    ///
    /// # Errors
    /// [`BandError::InvalidInput`] if `width` is absent
    pub fn band_key(&self, channel: i64, width: Option<&str>) -> Result<BandKey, BandError> {
        let width = width.ok_or_else(|| BandError::InvalidInput("channel width is absent".to_string()))?;
        let bandwidth = width.split_whitespace().next().unwrap_or_default();
        Ok(BandKey::new(self.band_label(channel), bandwidth))
    }

    /// Band key from raw parameter values as read from the managed system
    ///
    /// # Errors
    /// [`BandError::InvalidInput`] if the channel is not an integer or the
    /// width is absent
    pub fn band_key_from_values(
        &self,
        channel: &ParamValue,
        width: Option<&ParamValue>,
    ) -> Result<BandKey, BandError> {
        let channel = parse_channel(channel)?;
        let width = width.map(ParamValue::canonical);
        self.band_key(channel, width.as_deref())
    }
}

impl Default for BandClassifier {
    fn default() -> Self {
        Self::lte()
    }
}

/// Parse a channel number from a raw value
///
/// # Errors
/// [`BandError::InvalidInput`] for lists, flags, non-integral reals and
/// text that is not an integer
pub fn parse_channel(value: &ParamValue) -> Result<i64, BandError> {
    let invalid = || BandError::InvalidInput(format!("channel '{value}' is not an integer"));
    match value {
        ParamValue::Scalar(Scalar::Integer(n)) => Ok(*n),
        #[allow(clippy::cast_possible_truncation)]
        ParamValue::Scalar(Scalar::Real(x)) if x.fract() == 0.0 && x.is_finite() => Ok(*x as i64),
        ParamValue::Scalar(Scalar::Text(s)) => s.trim().parse().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}
