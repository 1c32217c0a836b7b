//! Run configuration
//!
//! Loaded from TOML, then overridden from `NETCONV_*` environment variables.

use crate::error::RunError;
use crate::planner::{AuditType, DEFAULT_MANAGED_CLASS};
use netconv_engine::{OperationMode, DEFAULT_MAX_CHANGES, DEFAULT_PRIMARY_INDEX};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default number of ids per observed-state read request
pub const DEFAULT_READ_BATCH_SIZE: usize = 300;

/// Environment variable overriding `max_changes`
pub const ENV_MAX_CHANGES: &str = "NETCONV_MAX_CHANGES";
/// Environment variable overriding `read_batch_size`
pub const ENV_READ_BATCH_SIZE: &str = "NETCONV_READ_BATCH_SIZE";
/// Environment variable overriding `alarm_recipients`
pub const ENV_ALARM_RECIPIENTS: &str = "NETCONV_ALARM_RECIPIENTS";
/// Environment variable overriding `operation_mode`
pub const ENV_OPERATION_MODE: &str = "NETCONV_OPERATION_MODE";

/// Configuration of one convergence run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Change count above which apply is withheld
    pub max_changes: usize,
    /// Alarm recipients, `;` or `,` separated
    pub alarm_recipients: String,
    /// Whether observed state is read from the OSS
    pub read_from_oss: bool,
    /// Ids per read request
    pub read_batch_size: usize,
    /// Open or closed loop
    pub operation_mode: OperationMode,
    /// Which target cells are audited
    pub audit_type: AuditType,
    /// Report name prefix
    pub report_prefix: String,
    /// Region the run applies to
    pub region: String,
    /// Module name used in report names and alarms
    pub module_name: String,
    /// Instance index of the primary managed child
    pub primary_index: String,
    /// Managed child class
    pub managed_class: String,
    /// Report recipients, `;` or `,` separated
    pub report_recipients: Option<String>,
}

impl RunConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With maximum change count
    #[inline]
    #[must_use]
    pub fn with_max_changes(mut self, max: usize) -> Self {
        self.max_changes = max;
        self
    }

    /// With operation mode
    #[inline]
    #[must_use]
    pub fn with_operation_mode(mut self, mode: OperationMode) -> Self {
        self.operation_mode = mode;
        self
    }

    /// With audit type
    #[inline]
    #[must_use]
    pub fn with_audit_type(mut self, audit: AuditType) -> Self {
        self.audit_type = audit;
        self
    }

    /// With alarm recipients
    #[inline]
    #[must_use]
    pub fn with_alarm_recipients(mut self, recipients: impl Into<String>) -> Self {
        self.alarm_recipients = recipients.into();
        self
    }

    /// With read batch size
    #[inline]
    #[must_use]
    pub fn with_read_batch_size(mut self, size: usize) -> Self {
        self.read_batch_size = size;
        self
    }

    /// With report recipients
    #[inline]
    #[must_use]
    pub fn with_report_recipients(mut self, recipients: impl Into<String>) -> Self {
        self.report_recipients = Some(recipients.into());
        self
    }

    /// With region
    #[inline]
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// With report prefix
    #[inline]
    #[must_use]
    pub fn with_report_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.report_prefix = prefix.into();
        self
    }

    /// Parse TOML
    ///
    /// # Errors
    /// [`RunError::Config`] on malformed TOML or invalid values
    pub fn from_toml_str(raw: &str) -> Result<Self, RunError> {
        let config: Self = toml::from_str(raw).map_err(|e| RunError::Config(e.to_string()))?;
        config.validate()
    }

    /// Load TOML from a file
    ///
    /// # Errors
    /// [`RunError::Io`] if the file cannot be read, [`RunError::Config`] if
    /// it cannot be parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RunError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Apply `NETCONV_*` overrides from the process environment
    ///
    /// # Errors
    /// [`RunError::Config`] if a variable holds an invalid value
    pub fn apply_env(self) -> Result<Self, RunError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply `NETCONV_*` overrides from a lookup function
    ///
    /// # Errors
    /// [`RunError::Config`] if a variable holds an invalid value
    pub fn apply_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RunError> {
        if let Some(raw) = lookup(ENV_MAX_CHANGES) {
            self.max_changes = parse_env(ENV_MAX_CHANGES, &raw)?;
        }
        if let Some(raw) = lookup(ENV_READ_BATCH_SIZE) {
            self.read_batch_size = parse_env(ENV_READ_BATCH_SIZE, &raw)?;
        }
        if let Some(raw) = lookup(ENV_ALARM_RECIPIENTS) {
            self.alarm_recipients = raw;
        }
        if let Some(raw) = lookup(ENV_OPERATION_MODE) {
            self.operation_mode = raw
                .parse()
                .map_err(|e| RunError::Config(format!("{ENV_OPERATION_MODE}: {e}")))?;
        }
        self.validate()
    }

    /// Alarm recipients as a list
    #[must_use]
    pub fn alarm_recipient_list(&self) -> Vec<String> {
        split_recipients(&self.alarm_recipients)
    }

    /// Report recipients as a list
    #[must_use]
    pub fn report_recipient_list(&self) -> Vec<String> {
        self.report_recipients
            .as_deref()
            .map(split_recipients)
            .unwrap_or_default()
    }

    fn validate(self) -> Result<Self, RunError> {
        if self.read_batch_size == 0 {
            return Err(RunError::Config("read_batch_size must be positive".to_string()));
        }
        if self.managed_class.is_empty() {
            return Err(RunError::Config("managed_class must not be empty".to_string()));
        }
        Ok(self)
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_changes: DEFAULT_MAX_CHANGES,
            alarm_recipients: String::new(),
            read_from_oss: true,
            read_batch_size: DEFAULT_READ_BATCH_SIZE,
            operation_mode: OperationMode::OpenLoop,
            audit_type: AuditType::UnlockedOnly,
            report_prefix: String::new(),
            region: String::new(),
            module_name: "netconv".to_string(),
            primary_index: DEFAULT_PRIMARY_INDEX.to_string(),
            managed_class: DEFAULT_MANAGED_CLASS.to_string(),
            report_recipients: None,
        }
    }
}

fn parse_env(key: &str, raw: &str) -> Result<usize, RunError> {
    raw.trim()
        .parse()
        .map_err(|e| RunError::Config(format!("{key}='{raw}': {e}")))
}

fn split_recipients(raw: &str) -> Vec<String> {
    raw.split([';', ','])
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = RunConfig::default();
        assert_eq!(config.max_changes, 1000);
        assert_eq!(config.read_batch_size, 300);
        assert_eq!(config.operation_mode, OperationMode::OpenLoop);
        assert_eq!(config.audit_type, AuditType::UnlockedOnly);
        assert_eq!(config.primary_index, "0");
        assert_eq!(config.managed_class, "LNHOG");
        assert!(config.read_from_oss);
    }

    #[test]
    fn toml_partial_uses_defaults() {
        let config = RunConfig::from_toml_str(
            r#"
            max_changes = 50
            region = "North"
            operation_mode = "ClosedLoop"
            audit_type = "AllCells"
            "#,
        )
        .unwrap();
        assert_eq!(config.max_changes, 50);
        assert_eq!(config.region, "North");
        assert_eq!(config.operation_mode, OperationMode::ClosedLoop);
        assert_eq!(config.audit_type, AuditType::AllCells);
        assert_eq!(config.read_batch_size, 300);
    }

    #[test]
    fn toml_rejects_bad_values() {
        assert!(matches!(
            RunConfig::from_toml_str("max_changes = \"many\""),
            Err(RunError::Config(_))
        ));
        assert!(RunConfig::from_toml_str("read_batch_size = 0").is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "report_prefix = \"weekly\"\nmodule_name = \"lnhog\"").unwrap();
        let config = RunConfig::load(file.path()).unwrap();
        assert_eq!(config.report_prefix, "weekly");
        assert_eq!(config.module_name, "lnhog");
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            RunConfig::load(dir.path().join("absent.toml")),
            Err(RunError::Io(_))
        ));
    }

    #[test]
    fn env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_MAX_CHANGES, " 7 "),
            (ENV_READ_BATCH_SIZE, "25"),
            (ENV_ALARM_RECIPIENTS, "a@x; b@x"),
            (ENV_OPERATION_MODE, "Closed Loop"),
        ]
        .into_iter()
        .collect();
        let config = RunConfig::default()
            .apply_env_from(|key| env.get(key).map(ToString::to_string))
            .unwrap();
        assert_eq!(config.max_changes, 7);
        assert_eq!(config.read_batch_size, 25);
        assert_eq!(config.operation_mode, OperationMode::ClosedLoop);
        assert_eq!(config.alarm_recipient_list(), vec!["a@x", "b@x"]);
    }

    #[test]
    fn env_rejects_garbage() {
        let result = RunConfig::default().apply_env_from(|key| {
            (key == ENV_MAX_CHANGES).then(|| "lots".to_string())
        });
        assert!(matches!(result, Err(RunError::Config(_))));
    }

    #[test]
    fn recipients_split_on_both_separators() {
        let config = RunConfig::default()
            .with_alarm_recipients("a@x;b@x , c@x;;");
        assert_eq!(config.alarm_recipient_list(), vec!["a@x", "b@x", "c@x"]);
        assert!(config.report_recipient_list().is_empty());
        let config = config.with_report_recipients("r1@x, r2@x");
        assert_eq!(config.report_recipient_list(), vec!["r1@x", "r2@x"]);
    }
}
