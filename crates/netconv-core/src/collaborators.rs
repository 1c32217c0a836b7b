//! External collaborators of a convergence run
//!
//! The core only sees these traits; the managed system, report storage and
//! mail delivery live behind them.

use crate::error::CollaboratorError;
use async_trait::async_trait;
use netconv_model::{ChangeSet, ObjectId, StateMap};
use netconv_verify::{ReportSheet, REPORT_HEADER};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Attribute requested for ids read without an attribute list
///
/// Lets the managed system tell object existence apart from attribute
/// existence.
pub const MO_CLASS_ID: &str = "moClassId";

/// Ids and the attributes requested for each
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReadRequest {
    entries: BTreeMap<ObjectId, Vec<String>>,
}

impl ReadRequest {
    /// Request existence of each id (`moClassId` only)
    #[must_use]
    pub fn for_ids<'a>(ids: impl IntoIterator<Item = &'a ObjectId>) -> Self {
        Self {
            entries: ids
                .into_iter()
                .map(|id| (id.clone(), vec![MO_CLASS_ID.to_string()]))
                .collect(),
        }
    }

    /// Request every parameter named in a keyed state
    ///
    /// An id with no parameters falls back to `moClassId`.
    #[must_use]
    pub fn for_state(state: &StateMap) -> Self {
        Self {
            entries: state
                .iter()
                .map(|(id, params)| {
                    let mut names: Vec<String> = params.names().map(str::to_string).collect();
                    if names.is_empty() {
                        names.push(MO_CLASS_ID.to_string());
                    }
                    (id.clone(), names)
                })
                .collect(),
        }
    }

    /// Requested ids
    pub fn ids(&self) -> impl Iterator<Item = &ObjectId> {
        self.entries.keys()
    }

    /// Requested attributes of an id
    #[must_use]
    pub fn attributes(&self, id: &ObjectId) -> Option<&[String]> {
        self.entries.get(id).map(Vec::as_slice)
    }

    /// Iterate over `(id, attributes)`
    pub fn iter(&self) -> impl Iterator<Item = (&ObjectId, &[String])> {
        self.entries.iter().map(|(id, attrs)| (id, attrs.as_slice()))
    }

    /// Number of requested ids
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Split into requests of at most `size` ids, in id order
    #[must_use]
    pub fn batches(&self, size: usize) -> Vec<Self> {
        let size = size.max(1);
        let items: Vec<_> = self.entries.iter().collect();
        items
            .chunks(size)
            .map(|chunk| Self {
                entries: chunk
                    .iter()
                    .map(|(id, attrs)| ((*id).clone(), (*attrs).clone()))
                    .collect(),
            })
            .collect()
    }
}

/// Children of a class under a set of parents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChildQuery {
    /// Parent DNs
    pub parents: BTreeSet<ObjectId>,
    /// Child class name
    pub class: String,
    /// Attributes to return; empty means all
    pub attributes: Vec<String>,
}

impl ChildQuery {
    /// Create query
    #[must_use]
    pub fn new(
        parents: impl IntoIterator<Item = ObjectId>,
        class: impl Into<String>,
        attributes: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            parents: parents.into_iter().collect(),
            class: class.into(),
            attributes: attributes.into_iter().map(Into::into).collect(),
        }
    }
}

/// Reads observed state from the managed system
#[async_trait]
pub trait ObservedStateReader: Send + Sync {
    /// Read the requested attributes; absent ids are omitted from the result
    async fn read(&self, request: &ReadRequest) -> Result<StateMap, CollaboratorError>;

    /// Read all children of a class under the given parents
    async fn read_children(&self, query: &ChildQuery) -> Result<StateMap, CollaboratorError>;
}

/// Opaque acknowledgement of a push
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushOutcome {
    /// Number of operations accepted
    pub accepted: usize,
    /// Collaborator message
    pub message: String,
}

/// Applies a change set to the managed system
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChangePusher: Send + Sync {
    /// Push creates, updates and deletes for a region
    async fn push(&self, region: &str, changes: &ChangeSet) -> Result<PushOutcome, CollaboratorError>;
}

/// Verification report of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Report name (`<module>_<region>_<prefix>_<timestamp>`)
    pub name: String,
    /// Column headers shared by every sheet
    pub header: [&'static str; 4],
    /// Sheets in `Create`, `Update`, `Delete` order
    pub sheets: Vec<ReportSheet>,
    /// Addresses the report is delivered to
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recipients: Vec<String>,
}

impl Report {
    /// Create report with the standard header
    #[must_use]
    pub fn new(name: impl Into<String>, sheets: Vec<ReportSheet>) -> Self {
        Self {
            name: name.into(),
            header: REPORT_HEADER,
            sheets,
            recipients: Vec::new(),
        }
    }

    /// With delivery recipients
    #[must_use]
    pub fn with_recipients(mut self, recipients: Vec<String>) -> Self {
        self.recipients = recipients;
        self
    }

    /// Total number of rows
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.sheets.iter().map(|s| s.rows.len()).sum()
    }
}

/// Stores verification reports
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Persist a report
    async fn write(&self, report: &Report) -> Result<(), CollaboratorError>;
}

/// Alarm raised when apply is withheld
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alarm {
    /// Recipients
    pub recipients: Vec<String>,
    /// Subject line
    pub subject: String,
    /// Body text
    pub body: String,
    /// Report attached to the alarm
    pub attachment: Option<String>,
}

/// Delivers alarms
#[async_trait]
pub trait AlarmNotifier: Send + Sync {
    /// Send an alarm
    async fn notify(&self, alarm: &Alarm) -> Result<(), CollaboratorError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use netconv_model::ParameterSet;
    use pretty_assertions::assert_eq;

    fn id(s: &str) -> ObjectId {
        s.parse().unwrap()
    }

    #[test]
    fn id_request_uses_mo_class_id() {
        let ids = [id("A/LNHOG-1"), id("B/LNHOG-2")];
        let request = ReadRequest::for_ids(&ids);
        assert_eq!(request.len(), 2);
        assert_eq!(
            request.attributes(&ids[0]),
            Some([MO_CLASS_ID.to_string()].as_slice())
        );
    }

    #[test]
    fn state_request_uses_parameter_names() {
        let state: StateMap = [
            (id("A/LNHOG-0"), ParameterSet::new().with("nccperm", 1_i64).with("x", 2_i64)),
            (id("B/LNHOG-0"), ParameterSet::new()),
        ]
        .into_iter()
        .collect();
        let request = ReadRequest::for_state(&state);
        assert_eq!(
            request.attributes(&id("A/LNHOG-0")).unwrap(),
            ["nccperm".to_string(), "x".to_string()].as_slice()
        );
        assert_eq!(
            request.attributes(&id("B/LNHOG-0")).unwrap(),
            [MO_CLASS_ID.to_string()].as_slice()
        );
    }

    #[test]
    fn batches_respect_size() {
        let ids: Vec<ObjectId> = (0..7).map(|i| id(&format!("A/LNHOG-{i}"))).collect();
        let request = ReadRequest::for_ids(&ids);
        let batches = request.batches(3);
        assert_eq!(batches.iter().map(ReadRequest::len).collect::<Vec<_>>(), vec![3, 3, 1]);
        assert!(ReadRequest::default().batches(3).is_empty());
        assert_eq!(request.batches(0).len(), 7);
    }

    #[test]
    fn report_row_count() {
        let report = Report::new("r", vec![ReportSheet::new(netconv_model::ChangeKind::Create)]);
        assert_eq!(report.row_count(), 0);
        assert_eq!(report.header, REPORT_HEADER);
    }
}
