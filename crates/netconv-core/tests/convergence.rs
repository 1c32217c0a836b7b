//! End-to-end runs over the simulated region

use netconv_core::{
    AuditType, ConvergenceRunner, JsonReportSink, MemoryAlarmNotifier, PushStatus, RunConfig, SimulatedNetwork,
};
use netconv_engine::GuardDecision;
use netconv_model::ChangeKind;
use netconv_test_utils::{closed_loop_config, managed_child, sample_network, sample_targets, sample_template};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;
use std::sync::Arc;

fn runner(config: RunConfig, network: &Arc<SimulatedNetwork>) -> ConvergenceRunner {
    ConvergenceRunner::new(config, sample_template(), network.clone(), network.clone())
}

#[tokio::test]
async fn closed_loop_run_converges_region() {
    let network = Arc::new(sample_network());
    let runner = runner(closed_loop_config(), &network);
    let summary = runner.run(&sample_targets()).await.unwrap();

    let changes = &summary.change_set;
    assert_eq!(changes.creates().ids(), BTreeSet::from([managed_child(2, 0), managed_child(3, 0)]));
    assert_eq!(changes.updates().ids(), BTreeSet::from([managed_child(1, 0)]));
    assert_eq!(changes.deletes(), &BTreeSet::from([managed_child(1, 1)]));

    let lte_800 = changes.creates().get(&managed_child(2, 0)).unwrap();
    assert_eq!(lte_800.get("b2Threshold1GERAN").unwrap().canonical(), "-108");
    assert_eq!(lte_800.get("b2Threshold1GERANQci1").unwrap().canonical(), "-106");
    assert_eq!(lte_800.get("hoPrio").unwrap().canonical(), "high");
    assert!(!lte_800.contains("unsetParameter"));

    let unlisted_band = changes.creates().get(&managed_child(3, 0)).unwrap();
    assert_eq!(unlisted_band.get("b2Threshold1GERAN").unwrap().canonical(), "-120");
    assert_eq!(unlisted_band.get("arfcnValueListGERAN").unwrap().canonical(), "[512]");

    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].id, managed_child(5, 0));
    assert_eq!(summary.failures[0].kind, ChangeKind::Create);

    assert!(matches!(summary.push, PushStatus::Applied(_)));
    assert!(summary.verification.is_compliant());
    assert!(network.snapshot().contains(&managed_child(2, 0)));
    assert!(!network.snapshot().contains(&managed_child(1, 1)));
}

#[tokio::test]
async fn second_run_is_a_no_op() {
    let network = Arc::new(sample_network());
    let runner = runner(closed_loop_config(), &network);
    runner.run(&sample_targets()).await.unwrap();

    let again = runner.run(&sample_targets()).await.unwrap();
    assert!(again.change_set.is_empty());
    assert_eq!(again.decision, GuardDecision::NothingToPush);
    assert_eq!(again.failures.len(), 1);
    assert_eq!(network.push_count(), 1);
}

#[tokio::test]
async fn all_cells_audit_includes_locked_cell() {
    let network = Arc::new(sample_network());
    let config = closed_loop_config().with_audit_type(AuditType::AllCells);
    let summary = runner(config, &network).run(&sample_targets()).await.unwrap();

    let locked = summary.change_set.updates().get(&managed_child(4, 0)).unwrap();
    assert_eq!(locked.names().collect::<Vec<_>>(), vec!["nccperm"]);
    assert_eq!(locked.get("nccperm").unwrap().canonical(), "255");
}

#[tokio::test]
async fn threshold_leaves_network_untouched() {
    let network = Arc::new(sample_network());
    let notifier = Arc::new(MemoryAlarmNotifier::new());
    let config = closed_loop_config()
        .with_max_changes(3)
        .with_alarm_recipients("noc@example.com;ops@example.com");
    let summary = runner(config, &network)
        .with_notifier(notifier.clone())
        .run(&sample_targets())
        .await
        .unwrap();

    assert_eq!(summary.decision, GuardDecision::Withheld { changes: 4, max_changes: 3 });
    assert_eq!(network.push_count(), 0);
    assert!(!summary.verification.is_compliant());
    assert!(summary.ensure_within_threshold().is_err());

    let alarms = notifier.alarms();
    assert_eq!(alarms.len(), 1);
    assert_eq!(alarms[0].recipients, vec!["noc@example.com", "ops@example.com"]);
    assert_eq!(alarms[0].subject, "Alarm_changes North all of changes: 4 module:netconv weekly");
}

#[tokio::test]
async fn report_is_written_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let network = Arc::new(sample_network());
    let sink = Arc::new(JsonReportSink::new(dir.path()));
    let summary = runner(closed_loop_config(), &network)
        .with_report_sink(sink)
        .run(&sample_targets())
        .await
        .unwrap();

    let path = dir.path().join(format!("{}.json", summary.report_name));
    let report: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    let sheets = report["sheets"].as_array().unwrap();
    assert_eq!(sheets.len(), 3);
    assert_eq!(sheets[0]["category"], "Create");
    assert_eq!(sheets[2]["rows"][0]["result"], "delete");
}

#[tokio::test]
async fn small_read_batches_give_same_result() {
    let network = Arc::new(sample_network());
    let config = closed_loop_config().with_read_batch_size(1);
    let summary = runner(config, &network).run(&sample_targets()).await.unwrap();
    assert_eq!(summary.change_set.len(), 4);
    assert!(summary.verification.is_compliant());
}

#[tokio::test]
async fn rejected_push_is_reported_and_verified() {
    let network = Arc::new(sample_network());
    network.reject_pushes(true);
    let summary = runner(closed_loop_config(), &network).run(&sample_targets()).await.unwrap();

    assert_eq!(
        summary.push,
        PushStatus::Failed("request rejected: region North refused the change set".to_string())
    );
    assert!(!summary.verification.is_compliant());
    assert!(!network.snapshot().contains(&managed_child(2, 0)));
}
