//! Desired-state template: global defaults plus band override tables

use crate::band::BandKey;
use crate::error::BandError;
use netconv_model::{ParamValue, ParameterSet};
use serde::Serialize;
use std::collections::BTreeMap;

/// Band-keyed threshold for regular bearers
pub const B2_THRESHOLD_GERAN: &str = "b2Threshold1GERAN";

/// Band-keyed threshold for QCI1 bearers
pub const B2_THRESHOLD_GERAN_QCI1: &str = "b2Threshold1GERANQci1";

/// Parameters whose template cell holds a band override table
pub const BAND_KEYED_PARAMETERS: [&str; 2] = [B2_THRESHOLD_GERAN, B2_THRESHOLD_GERAN_QCI1];

/// Value used when a band key has no entry
pub const BAND_FALLBACK: i64 = -120;

/// Name of the template header row
pub const HEADER_ROW: &str = "Parametr";

/// Band key → value table for one parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandTable {
    entries: BTreeMap<BandKey, ParamValue>,
    fallback: ParamValue,
}

impl BandTable {
    /// Create table with the standard fallback
    #[must_use]
    pub fn new(entries: BTreeMap<BandKey, ParamValue>) -> Self {
        Self {
            entries,
            fallback: ParamValue::from(BAND_FALLBACK),
        }
    }

    /// Decode a JSON-encoded `{"LTE_1800_20": -110, ...}` cell
    ///
    /// # Errors
    /// [`BandError::InvalidTemplate`] if the text is not a JSON object of
    /// scalar values
    pub fn from_json_str(param: &str, raw: &str) -> Result<Self, BandError> {
        let value: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| BandError::InvalidTemplate(format!("{param}: {e}")))?;
        Self::from_json(param, &value)
    }

    /// Decode an already parsed table
    ///
    /// # Errors
    /// [`BandError::InvalidTemplate`] if `value` is not an object of scalars
    pub fn from_json(param: &str, value: &serde_json::Value) -> Result<Self, BandError> {
        let serde_json::Value::Object(map) = value else {
            return Err(BandError::InvalidTemplate(format!(
                "{param}: band table must be an object, got {value}"
            )));
        };
        let entries = map
            .iter()
            .map(|(key, raw)| {
                let value = serde_json::from_value::<ParamValue>(raw.clone())
                    .ok()
                    .filter(|v| !v.is_list())
                    .ok_or_else(|| {
                        BandError::InvalidTemplate(format!("{param}: entry {key} is not a scalar"))
                    })?;
                Ok((BandKey::from(key.as_str()), value))
            })
            .collect::<Result<_, BandError>>()?;
        Ok(Self::new(entries))
    }

    /// Value for a band key, fallback if absent
    #[must_use]
    pub fn lookup(&self, key: &BandKey) -> &ParamValue {
        self.entries.get(key).unwrap_or(&self.fallback)
    }

    /// Fallback value
    #[inline]
    #[must_use]
    pub fn fallback(&self) -> &ParamValue {
        &self.fallback
    }

    /// Number of explicit entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table has no explicit entries
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Global defaults plus per-band override tables
///
/// The band-keyed parameters never appear in `defaults`; their value is
/// always resolved through the matching [`BandTable`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Template {
    defaults: ParameterSet,
    band_tables: BTreeMap<String, BandTable>,
}

impl Template {
    /// Build a template from parts
    #[must_use]
    pub fn new(defaults: ParameterSet, band_tables: BTreeMap<String, BandTable>) -> Self {
        let defaults = defaults
            .into_iter()
            .filter(|(name, _)| !band_tables.contains_key(name))
            .collect();
        Self {
            defaults,
            band_tables,
        }
    }

    /// Build from `(parameter, cell)` rows as read from a template sheet
    ///
    /// The `Parametr` header row is dropped and later rows win. Cells of the
    /// band-keyed parameters must hold JSON-encoded tables.
    ///
    /// # Errors
    /// [`BandError::InvalidTemplate`] if a cell cannot be decoded or a
    /// band-keyed parameter is absent
    pub fn from_rows<I, K>(rows: I) -> Result<Self, BandError>
    where
        I: IntoIterator<Item = (K, serde_json::Value)>,
        K: Into<String>,
    {
        let mut cells: BTreeMap<String, serde_json::Value> = rows
            .into_iter()
            .map(|(name, cell)| (name.into(), cell))
            .collect();
        cells.remove(HEADER_ROW);
        Self::from_cells(cells)
    }

    /// Build from a JSON object `{parameter: value}`
    ///
    /// Band-keyed parameters may be given as objects or JSON-encoded strings.
    ///
    /// # Errors
    /// [`BandError::InvalidTemplate`] if `value` is not an object or a cell
    /// cannot be decoded
    pub fn from_json(value: &serde_json::Value) -> Result<Self, BandError> {
        let serde_json::Value::Object(map) = value else {
            return Err(BandError::InvalidTemplate(
                "template must be a JSON object".to_string(),
            ));
        };
        Self::from_cells(map.clone().into_iter().collect())
    }

    fn from_cells(mut cells: BTreeMap<String, serde_json::Value>) -> Result<Self, BandError> {
        let mut band_tables = BTreeMap::new();
        for param in BAND_KEYED_PARAMETERS {
            let cell = cells
                .remove(param)
                .ok_or_else(|| BandError::InvalidTemplate(format!("{param} is missing")))?;
            let table = match &cell {
                serde_json::Value::String(raw) => BandTable::from_json_str(param, raw)?,
                other => BandTable::from_json(param, other)?,
            };
            band_tables.insert(param.to_string(), table);
        }

        let defaults = cells
            .into_iter()
            .filter(|(_, cell)| !cell.is_null())
            .map(|(name, cell)| {
                serde_json::from_value::<ParamValue>(cell)
                    .map(|value| (name.clone(), value))
                    .map_err(|e| BandError::InvalidTemplate(format!("{name}: {e}")))
            })
            .collect::<Result<ParameterSet, BandError>>()?;

        tracing::debug!(
            defaults = defaults.len(),
            band_tables = band_tables.len(),
            "template decoded"
        );
        Ok(Self::new(defaults, band_tables))
    }

    /// Global defaults, without band-keyed parameters
    #[inline]
    #[must_use]
    pub fn defaults(&self) -> &ParameterSet {
        &self.defaults
    }

    /// Band table of a parameter
    #[inline]
    #[must_use]
    pub fn band_table(&self, param: &str) -> Option<&BandTable> {
        self.band_tables.get(param)
    }

    /// Names of band-keyed parameters
    pub fn band_parameters(&self) -> impl Iterator<Item = &str> {
        self.band_tables.keys().map(String::as_str)
    }

    /// Check if a parameter is band-keyed
    #[inline]
    #[must_use]
    pub fn is_band_keyed(&self, param: &str) -> bool {
        self.band_tables.contains_key(param)
    }
}

impl FromIterator<(String, ParamValue)> for Template {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect(), BTreeMap::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn rows() -> Vec<(&'static str, serde_json::Value)> {
        vec![
            ("Parametr", json!("Value")),
            ("nccperm", json!(255)),
            ("reportIntervalGERAN", json!("4s")),
            (B2_THRESHOLD_GERAN, json!(r#"{"LTE_1800_20": -110, "LTE_800_10": -112}"#)),
            (B2_THRESHOLD_GERAN_QCI1, json!(r#"{"LTE_1800_20": -108}"#)),
        ]
    }

    #[test]
    fn template_rows_drop_header() {
        let template = Template::from_rows(rows()).unwrap();
        assert!(!template.defaults().contains(HEADER_ROW));
        assert_eq!(template.defaults().len(), 2);
        assert_eq!(
            template.defaults().get("nccperm"),
            Some(&ParamValue::from(255_i64))
        );
    }

    #[test]
    fn template_decodes_band_tables() {
        let template = Template::from_rows(rows()).unwrap();
        let table = template.band_table(B2_THRESHOLD_GERAN).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.lookup(&BandKey::from("LTE_800_10")).canonical(),
            "-112"
        );
        assert!(!template.defaults().contains(B2_THRESHOLD_GERAN));
        assert!(template.is_band_keyed(B2_THRESHOLD_GERAN_QCI1));
    }

    #[test]
    fn band_table_fallback() {
        let table = BandTable::from_json_str("p", r#"{"LTE_1800_20": -110}"#).unwrap();
        assert_eq!(table.lookup(&BandKey::from("Unknown_5")).canonical(), "-120");
        assert_eq!(table.fallback(), &ParamValue::from(-120_i64));
    }

    #[test]
    fn template_rejects_bad_band_cell() {
        let mut bad = rows();
        bad[3] = (B2_THRESHOLD_GERAN, json!("not json"));
        assert!(matches!(
            Template::from_rows(bad),
            Err(BandError::InvalidTemplate(_))
        ));

        let mut list = rows();
        list[4] = (B2_THRESHOLD_GERAN_QCI1, json!("[1, 2]"));
        assert!(Template::from_rows(list).is_err());
    }

    #[test]
    fn template_requires_band_parameters() {
        let partial = vec![("nccperm", json!(255))];
        assert!(Template::from_rows(partial).is_err());
    }

    #[test]
    fn template_from_json_accepts_objects() {
        let template = Template::from_json(&json!({
            "nccperm": 255,
            "arfcnValueListGERAN": [],
            B2_THRESHOLD_GERAN: {"LTE_1800_20": -110},
            B2_THRESHOLD_GERAN_QCI1: "{}",
        }))
        .unwrap();
        assert_eq!(template.band_parameters().count(), 2);
        assert!(template.band_table(B2_THRESHOLD_GERAN_QCI1).unwrap().is_empty());
        assert!(template.defaults().get("arfcnValueListGERAN").unwrap().is_list());
    }

    #[test]
    fn later_rows_win() {
        let mut r = rows();
        r.push(("nccperm", json!(10)));
        let template = Template::from_rows(r).unwrap();
        assert_eq!(template.defaults().get("nccperm").unwrap().canonical(), "10");
    }
}
