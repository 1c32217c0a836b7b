//! Report sinks and alarm notifiers

use crate::collaborators::{Alarm, AlarmNotifier, Report, ReportSink};
use crate::error::CollaboratorError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Keeps written reports in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryReportSink {
    reports: Arc<Mutex<Vec<Report>>>,
}

impl MemoryReportSink {
    /// Create empty sink
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports written so far
    #[must_use]
    pub fn reports(&self) -> Vec<Report> {
        self.reports.lock().clone()
    }
}

#[async_trait]
impl ReportSink for MemoryReportSink {
    async fn write(&self, report: &Report) -> Result<(), CollaboratorError> {
        self.reports.lock().push(report.clone());
        Ok(())
    }
}

/// Writes each report to `<dir>/<name>.json`
#[derive(Debug, Clone)]
pub struct JsonReportSink {
    dir: PathBuf,
}

impl JsonReportSink {
    /// Create sink writing into `dir`
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path a report is written to
    #[must_use]
    pub fn path_for(&self, report: &Report) -> PathBuf {
        self.dir.join(format!("{}.json", report.name))
    }

    /// Target directory
    #[inline]
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl ReportSink for JsonReportSink {
    async fn write(&self, report: &Report) -> Result<(), CollaboratorError> {
        let body = serde_json::to_vec_pretty(report).map_err(|e| CollaboratorError::Report(e.to_string()))?;
        let path = self.path_for(report);
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| CollaboratorError::Report(format!("{}: {e}", self.dir.display())))?;
        tokio::fs::write(&path, body)
            .await
            .map_err(|e| CollaboratorError::Report(format!("{}: {e}", path.display())))?;
        tracing::info!(
            path = %path.display(),
            rows = report.row_count(),
            recipients = ?report.recipients,
            "report written"
        );
        Ok(())
    }
}

/// Logs alarms instead of mailing them
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAlarmNotifier;

#[async_trait]
impl AlarmNotifier for LogAlarmNotifier {
    async fn notify(&self, alarm: &Alarm) -> Result<(), CollaboratorError> {
        tracing::warn!(
            recipients = ?alarm.recipients,
            subject = %alarm.subject,
            attachment = ?alarm.attachment,
            "alarm raised"
        );
        Ok(())
    }
}

/// Records alarms in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryAlarmNotifier {
    alarms: Arc<Mutex<Vec<Alarm>>>,
}

impl MemoryAlarmNotifier {
    /// Create empty notifier
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Alarms sent so far
    #[must_use]
    pub fn alarms(&self) -> Vec<Alarm> {
        self.alarms.lock().clone()
    }
}

#[async_trait]
impl AlarmNotifier for MemoryAlarmNotifier {
    async fn notify(&self, alarm: &Alarm) -> Result<(), CollaboratorError> {
        self.alarms.lock().push(alarm.clone());
        Ok(())
    }
}
