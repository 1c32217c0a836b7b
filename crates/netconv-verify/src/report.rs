//! Flattening of verification results into report rows
//!
//! Each row is `[Object, Parameter, Value, Result]`. Rows of one category
//! are emitted in the order matched, differing, missing objects (creates and
//! updates) or deleted, not deleted (deletes).

use crate::verifier::{Classification, ComplianceResult, DeletionResult};
use netconv_model::{ChangeKind, DeletionStatus, ObjectId};
use serde::Serialize;
use std::collections::BTreeMap;

/// Report column headers
pub const REPORT_HEADER: [&str; 4] = ["Object", "Parameter", "Value", "Result"];

/// One report row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    /// Object id
    pub object: String,
    /// Parameter name (empty for delete rows)
    pub parameter: String,
    /// Expected value (empty for delete rows)
    pub expected: String,
    /// `OK`, actual value or status text
    pub result: String,
}

impl ReportRow {
    /// Row as four cells in header order
    #[must_use]
    pub fn cells(&self) -> [&str; 4] {
        [
            self.object.as_str(),
            self.parameter.as_str(),
            self.expected.as_str(),
            self.result.as_str(),
        ]
    }
}

/// Rows of one report category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSheet {
    /// Category (`Create`, `Update` or `Delete`)
    pub category: ChangeKind,
    /// Rows in emission order
    pub rows: Vec<ReportRow>,
}

impl ReportSheet {
    /// Empty sheet
    #[inline]
    #[must_use]
    pub fn new(category: ChangeKind) -> Self {
        Self {
            category,
            rows: Vec::new(),
        }
    }

    /// Sheet name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.category.label()
    }

    /// Sheet of a create or update verification
    #[must_use]
    pub fn from_compliance(category: ChangeKind, result: &ComplianceResult) -> Self {
        let rows = [&result.matched, &result.differing, &result.missing_objects]
            .into_iter()
            .flat_map(classification_rows)
            .collect();
        Self { category, rows }
    }

    /// Sheet of a delete verification
    #[must_use]
    pub fn from_deletion(result: &DeletionResult) -> Self {
        let rows = [&result.deleted, &result.not_deleted]
            .into_iter()
            .flat_map(deletion_rows)
            .collect();
        Self {
            category: ChangeKind::Delete,
            rows,
        }
    }
}

fn classification_rows(classification: &Classification) -> impl Iterator<Item = ReportRow> + '_ {
    classification.iter().flat_map(|(id, outcomes)| {
        outcomes.iter().map(move |(param, outcome)| ReportRow {
            object: id.to_string(),
            parameter: param.clone(),
            expected: outcome.expected().canonical(),
            result: outcome.status(),
        })
    })
}

fn deletion_rows(
    statuses: &BTreeMap<ObjectId, DeletionStatus>,
) -> impl Iterator<Item = ReportRow> + '_ {
    statuses.iter().map(|(id, status)| ReportRow {
        object: id.to_string(),
        parameter: String::new(),
        expected: String::new(),
        result: status.label().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verifier::ComplianceVerifier;
    use netconv_model::StateInput;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn input(value: serde_json::Value) -> StateInput {
        StateInput::from_json(&value).unwrap()
    }

    #[test]
    fn compliance_rows_in_bucket_order() {
        let result = ComplianceVerifier::new().check_create_and_update(
            &input(json!({"A/LNHOG-0": {"nccperm": "10", "x": "2"}})),
            &input(json!({
                "A/LNHOG-0": {"nccperm": "10", "x": "1"},
                "B/LNHOG-0": {"nccperm": "10"}
            })),
        );
        let sheet = ReportSheet::from_compliance(ChangeKind::Update, &result);
        let cells: Vec<[&str; 4]> = sheet.rows.iter().map(ReportRow::cells).collect();
        assert_eq!(
            cells,
            vec![
                ["A/LNHOG-0", "nccperm", "10", "OK"],
                ["A/LNHOG-0", "x", "1", "2"],
                ["B/LNHOG-0", "nccperm", "10", "does not exist"],
            ]
        );
        assert_eq!(sheet.name(), "Update");
    }

    #[test]
    fn deletion_rows_have_empty_parameter_cells() {
        let result = ComplianceVerifier::new().check_delete(&input(json!(["A"])), &input(json!(["A", "B"])));
        let sheet = ReportSheet::from_deletion(&result);
        let cells: Vec<[&str; 4]> = sheet.rows.iter().map(ReportRow::cells).collect();
        assert_eq!(cells, vec![["B", "", "", "delete"], ["A", "", "", "not delete"]]);
    }

    #[test]
    fn header_shape() {
        assert_eq!(REPORT_HEADER, ["Object", "Parameter", "Value", "Result"]);
        assert!(ReportSheet::new(ChangeKind::Create).rows.is_empty());
    }
}
