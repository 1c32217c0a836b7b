//! Convergence runner
//!
//! One run plans the desired managed children of the audited cells, reads
//! what exists, reconciles, applies the change set behind the guard, then
//! re-reads the system to verify and report what was achieved.

use crate::collaborators::{
    Alarm, AlarmNotifier, ChangePusher, ChildQuery, ObservedStateReader, PushOutcome, ReadRequest, Report,
    ReportSink,
};
use crate::config::RunConfig;
use crate::error::RunError;
use crate::paging::PagedReader;
use crate::planner::{CellTarget, NeighbourPlanner};
use crate::sinks::{LogAlarmNotifier, MemoryReportSink};
use netconv_band::{DefaultTemplateResolver, SourceAttributes, Template, FDD_CHANNEL, FDD_WIDTH, TDD_CHANNEL, TDD_WIDTH};
use netconv_engine::{
    ChangeGuard, GuardDecision, ObjectFailure, PrimaryInstancePolicy, Reconciliation, ReconciliationEngine,
    GERAN_FREQUENCY_LIST,
};
use netconv_model::{ChangeKind, ChangeSet, ObjectId, StateInput, StateMap};
use netconv_verify::{ComplianceResult, ComplianceVerifier, DeletionResult, ReportSheet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use ulid::Ulid;

/// FDD cell class holding `earfcnDL` and `dlChBw`
pub const FDD_CELL_CLASS: &str = "LNCEL_FDD";

/// TDD cell class holding `earfcn` and `chBw`
pub const TDD_CELL_CLASS: &str = "LNCEL_TDD";

/// Body of every alarm mail
pub const ALARM_BODY: &str = "*******THIS IS AN AUTO GENERATED EMAIL - PLEASE DO NOT REPLY********";

/// Unique run identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RunId(pub Ulid);

impl RunId {
    /// Generate new run ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What happened at the apply step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum PushStatus {
    /// Pusher was not invoked
    Skipped,
    /// Pusher accepted the change set
    Applied(PushOutcome),
    /// Pusher failed; verification still ran
    Failed(String),
}

/// Post-apply verification per category
///
/// A category without changes is not verified.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Verification {
    /// Creates re-read keyed
    pub create: Option<ComplianceResult>,
    /// Updates re-read keyed
    pub update: Option<ComplianceResult>,
    /// Deletes re-read by id
    pub delete: Option<DeletionResult>,
}

impl Verification {
    /// Report sheets in `Create`, `Update`, `Delete` order
    #[must_use]
    pub fn sheets(&self) -> Vec<ReportSheet> {
        vec![
            self.create.as_ref().map_or_else(
                || ReportSheet::new(ChangeKind::Create),
                |r| ReportSheet::from_compliance(ChangeKind::Create, r),
            ),
            self.update.as_ref().map_or_else(
                || ReportSheet::new(ChangeKind::Update),
                |r| ReportSheet::from_compliance(ChangeKind::Update, r),
            ),
            self.delete
                .as_ref()
                .map_or_else(|| ReportSheet::new(ChangeKind::Delete), ReportSheet::from_deletion),
        ]
    }

    /// Check if every verified category is compliant
    #[must_use]
    pub fn is_compliant(&self) -> bool {
        self.create.as_ref().map_or(true, ComplianceResult::is_compliant)
            && self.update.as_ref().map_or(true, ComplianceResult::is_compliant)
            && self.delete.as_ref().map_or(true, DeletionResult::is_compliant)
    }
}

/// Result of one convergence run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Run identifier
    pub run_id: RunId,
    /// Name of the written report
    pub report_name: String,
    /// Computed change set
    pub change_set: ChangeSet,
    /// Objects skipped during reconciliation
    pub failures: Vec<ObjectFailure>,
    /// Guard decision
    pub decision: GuardDecision,
    /// Apply step outcome
    pub push: PushStatus,
    /// Verification results
    pub verification: Verification,
    /// Whether the alarm path was raised
    pub alarm_raised: bool,
    /// Whether an alarm was delivered
    pub alarm_sent: bool,
}

impl RunSummary {
    /// Treat a withheld apply as an error
    ///
    /// # Errors
    /// [`RunError::ThresholdExceeded`] if the guard withheld the change set
    pub fn ensure_within_threshold(&self) -> Result<(), RunError> {
        match self.decision {
            GuardDecision::Withheld { changes, max_changes } => {
                Err(RunError::ThresholdExceeded { changes, max_changes })
            }
            _ => Ok(()),
        }
    }
}

/// Drives one region through plan, reconcile, apply, verify and report
pub struct ConvergenceRunner {
    config: RunConfig,
    template: Template,
    reader: PagedReader,
    pusher: Arc<dyn ChangePusher>,
    reports: Arc<dyn ReportSink>,
    notifier: Arc<dyn AlarmNotifier>,
    verifier: ComplianceVerifier,
}

impl ConvergenceRunner {
    /// Create runner
    ///
    /// Reports are kept in memory and alarms are logged until other
    /// collaborators are set.
    #[must_use]
    pub fn new(
        config: RunConfig,
        template: Template,
        reader: Arc<dyn ObservedStateReader>,
        pusher: Arc<dyn ChangePusher>,
    ) -> Self {
        let reader = PagedReader::new(reader, config.read_batch_size);
        Self {
            config,
            template,
            reader,
            pusher,
            reports: Arc::new(MemoryReportSink::new()),
            notifier: Arc::new(LogAlarmNotifier),
            verifier: ComplianceVerifier::new(),
        }
    }

    /// With report sink
    #[must_use]
    pub fn with_report_sink(mut self, reports: Arc<dyn ReportSink>) -> Self {
        self.reports = reports;
        self
    }

    /// With alarm notifier
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn AlarmNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Run configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Execute one run over `targets`
    ///
    /// # Errors
    /// [`RunError::Read`] if the system cannot be read and
    /// [`RunError::Reconcile`] if reconciliation breaks its own invariants.
    /// Push, report and alarm failures are logged and never abort the run.
    pub async fn run(&self, targets: &[CellTarget]) -> Result<RunSummary, RunError> {
        let run_id = RunId::new();
        let config = &self.config;
        tracing::info!(
            %run_id,
            region = %config.region,
            max_changes = config.max_changes,
            mode = %config.operation_mode,
            audit = %config.audit_type,
            read_from_oss = config.read_from_oss,
            read_batch_size = config.read_batch_size,
            "convergence run started"
        );

        let planner = NeighbourPlanner::new(config.managed_class.clone(), config.primary_index.clone());
        let audited = planner.audited(targets, config.audit_type);
        let desired = planner.plan(audited.iter().copied());
        let cells: BTreeSet<ObjectId> = audited.iter().map(|cell| cell.dn.clone()).collect();

        let query = ChildQuery::new(cells.iter().cloned(), config.managed_class.clone(), self.managed_attributes());
        let observed = self.reader.read_children(&query).await.map_err(RunError::Read)?;
        let existing = observed.ids();
        let sources = self.read_sources(&cells).await?;
        tracing::info!(
            desired = desired.len(),
            existing = existing.len(),
            sources = sources.len(),
            "state collected"
        );

        let engine = ReconciliationEngine::new(DefaultTemplateResolver::new(self.template.clone(), sources))
            .with_retention(PrimaryInstancePolicy::new(config.primary_index.clone()));
        let Reconciliation { change_set, failures } = engine.reconcile(&desired, &observed, &existing)?;
        for failure in &failures {
            tracing::warn!(id = %failure.id, kind = %failure.kind, reason = %failure.reason, "object skipped");
        }
        tracing::info!(
            creates = change_set.creates().len(),
            updates = change_set.updates().len(),
            deletes = change_set.deletes().len(),
            failures = failures.len(),
            "reconciled"
        );

        let decision = ChangeGuard::new(config.max_changes, config.operation_mode).evaluate(&change_set);
        let push = self.push(decision, &change_set).await;

        let verification = self.verify(&change_set).await?;
        let report = Report::new(self.report_name(), verification.sheets())
            .with_recipients(config.report_recipient_list());
        if let Err(error) = self.reports.write(&report).await {
            tracing::error!(report = %report.name, %error, "report not written");
        }

        let alarm_raised = decision.raises_alarm();
        let alarm_sent = alarm_raised && self.alarm(change_set.len(), &report.name).await;

        tracing::info!(
            %run_id,
            report = %report.name,
            compliant = verification.is_compliant(),
            "convergence run finished"
        );
        Ok(RunSummary {
            run_id,
            report_name: report.name,
            change_set,
            failures,
            decision,
            push,
            verification,
            alarm_raised,
            alarm_sent,
        })
    }

    fn managed_attributes(&self) -> Vec<String> {
        let mut names: BTreeSet<String> = self.template.defaults().names().map(str::to_string).collect();
        names.extend(self.template.band_parameters().map(str::to_string));
        names.insert(GERAN_FREQUENCY_LIST.to_string());
        names.into_iter().collect()
    }

    /// Read FDD and TDD radio attributes and key them by managed child
    async fn read_sources(&self, cells: &BTreeSet<ObjectId>) -> Result<SourceAttributes, RunError> {
        let fdd = self
            .reader
            .read_children(&ChildQuery::new(cells.iter().cloned(), FDD_CELL_CLASS, [FDD_CHANNEL, FDD_WIDTH]))
            .await
            .map_err(RunError::Read)?;
        let tdd = self
            .reader
            .read_children(&ChildQuery::new(cells.iter().cloned(), TDD_CELL_CLASS, [TDD_CHANNEL, TDD_WIDTH]))
            .await
            .map_err(RunError::Read)?;

        let mut attributes = fdd;
        attributes.extend(tdd);
        Ok(SourceAttributes::from_cell_attributes(
            &attributes,
            &self.config.managed_class,
            &self.config.primary_index,
        ))
    }

    async fn push(&self, decision: GuardDecision, changes: &ChangeSet) -> PushStatus {
        if !decision.should_push() {
            return PushStatus::Skipped;
        }
        match self.pusher.push(&self.config.region, changes).await {
            Ok(outcome) => {
                tracing::info!(accepted = outcome.accepted, message = %outcome.message, "changes pushed");
                PushStatus::Applied(outcome)
            }
            Err(error) => {
                tracing::error!(region = %self.config.region, %error, "push failed");
                PushStatus::Failed(error.to_string())
            }
        }
    }

    async fn verify(&self, changes: &ChangeSet) -> Result<Verification, RunError> {
        let mut verification = Verification::default();

        if !changes.deletes().is_empty() {
            let checked = self.read(&ReadRequest::for_ids(changes.deletes())).await?;
            let etalon = StateInput::from(changes.deletes().clone());
            verification.delete = Some(self.verifier.check_delete(&checked.into(), &etalon));
        }
        if !changes.creates().is_empty() {
            verification.create = Some(self.verify_keyed(changes.creates()).await?);
        }
        if !changes.updates().is_empty() {
            verification.update = Some(self.verify_keyed(changes.updates()).await?);
        }
        Ok(verification)
    }

    async fn verify_keyed(&self, etalon: &StateMap) -> Result<ComplianceResult, RunError> {
        let checked = self.read(&ReadRequest::for_state(etalon)).await?;
        Ok(self
            .verifier
            .check_create_and_update(&checked.into(), &etalon.clone().into()))
    }

    async fn read(&self, request: &ReadRequest) -> Result<StateMap, RunError> {
        self.reader.read(request).await.map_err(RunError::Read)
    }

    fn report_name(&self) -> String {
        let stamp = chrono::Local::now().format("%d_%m_%Y_%H-%M-%S");
        format!(
            "{}_{}_{}_{stamp}",
            self.config.module_name, self.config.region, self.config.report_prefix
        )
    }

    async fn alarm(&self, changes: usize, report_name: &str) -> bool {
        let recipients = self.config.alarm_recipient_list();
        if recipients.is_empty() {
            tracing::warn!(changes, "apply withheld but no alarm recipients configured");
            return false;
        }
        let alarm = Alarm {
            recipients,
            subject: alarm_subject(&self.config, changes),
            body: ALARM_BODY.to_string(),
            attachment: Some(report_name.to_string()),
        };
        match self.notifier.notify(&alarm).await {
            Ok(()) => true,
            Err(error) => {
                tracing::error!(%error, "alarm not delivered");
                false
            }
        }
    }
}

impl std::fmt::Debug for ConvergenceRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConvergenceRunner")
            .field("config", &self.config)
            .field("reader", &self.reader)
            .finish_non_exhaustive()
    }
}

/// Subject line of the threshold alarm
#[must_use]
pub fn alarm_subject(config: &RunConfig, changes: usize) -> String {
    format!(
        "Alarm_changes {} all of changes: {changes} module:{} {}",
        config.region, config.module_name, config.report_prefix
    )
}
