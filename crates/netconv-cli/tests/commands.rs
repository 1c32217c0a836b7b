//! Subcommands driven through the library entry points

use netconv_cli::{band_command, load_config, read_json, run_command, verify_command, RunArgs};
use netconv_core::PushStatus;
use netconv_engine::{GuardDecision, OperationMode};
use netconv_test_utils::{sample_snapshot, template_json};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn inputs(dir: &Path) -> RunArgs {
    let mut template = template_json();
    template.as_object_mut().unwrap().remove("Parametr");
    RunArgs {
        template: write(dir, "template.json", &template.to_string()),
        network: write(dir, "network.json", &serde_json::to_string(&sample_snapshot()).unwrap()),
        ..RunArgs::default()
    }
}

#[tokio::test]
async fn run_defaults_to_open_loop() {
    let dir = tempfile::tempdir().unwrap();
    let summary = run_command(&inputs(dir.path())).await.unwrap();
    assert_eq!(summary.decision, GuardDecision::OpenLoop { changes: 4 });
    assert_eq!(summary.push, PushStatus::Skipped);
    assert_eq!(summary.failures.len(), 1);
}

#[tokio::test]
async fn run_with_config_and_closed_loop_withholds() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(dir.path(), "run.toml", "max_changes = 3\nregion = \"North\"\n");
    let args = RunArgs {
        config: Some(config),
        closed_loop: true,
        ..inputs(dir.path())
    };
    let summary = run_command(&args).await.unwrap();
    assert_eq!(summary.decision, GuardDecision::Withheld { changes: 4, max_changes: 3 });
    assert!(summary.ensure_within_threshold().is_err());
    assert!(summary.report_name.starts_with("netconv_North__"));
}

#[tokio::test]
async fn run_writes_report_directory() {
    let dir = tempfile::tempdir().unwrap();
    let reports = dir.path().join("reports");
    let args = RunArgs {
        closed_loop: true,
        report_dir: Some(reports.clone()),
        ..inputs(dir.path())
    };
    let summary = run_command(&args).await.unwrap();
    assert!(matches!(summary.push, PushStatus::Applied(_)));
    assert!(reports.join(format!("{}.json", summary.report_name)).exists());
}

#[tokio::test]
async fn run_rejects_bad_template() {
    let dir = tempfile::tempdir().unwrap();
    let args = RunArgs {
        template: write(dir.path(), "template.json", r#"{"b2Threshold1GERAN": "not json"}"#),
        ..inputs(dir.path())
    };
    assert!(run_command(&args).await.is_err());
}

#[test]
fn config_flag_forces_closed_loop() {
    assert_eq!(load_config(None, true).unwrap().operation_mode, OperationMode::ClosedLoop);
    assert_eq!(load_config(None, false).unwrap().operation_mode, OperationMode::OpenLoop);
}

#[test]
fn band_lookup() {
    assert_eq!(band_command(1500, "20 MHz").unwrap().as_str(), "LTE_1800_20");
    assert_eq!(band_command(6300, "10 MHz").unwrap().as_str(), "LTE_800_10");
    assert_eq!(band_command(1500, " ").unwrap().as_str(), "LTE_1800_");
}

#[test]
fn verify_create_and_update() {
    let dir = tempfile::tempdir().unwrap();
    let etalon = write(
        dir.path(),
        "etalon.json",
        r#"{"A/LNHOG-0": {"nccperm": 255, "hoPrio": "high"}, "B/LNHOG-0": {"nccperm": 1}}"#,
    );
    let checked = write(dir.path(), "checked.json", r#"{"A/LNHOG-0": {"nccperm": "255", "hoPrio": "low"}}"#);
    let result = verify_command(&etalon, &checked, false).unwrap();

    assert!(result["matched"]["A/LNHOG-0"].get("nccperm").is_some());
    assert!(result["differing"]["A/LNHOG-0"].get("hoPrio").is_some());
    assert!(result["missing_objects"].get("B/LNHOG-0").is_some());
}

#[test]
fn verify_delete() {
    let dir = tempfile::tempdir().unwrap();
    let etalon = write(dir.path(), "etalon.json", r#"["A/LNHOG-1", "A/LNHOG-2"]"#);
    let checked = write(dir.path(), "checked.json", r#"{"A/LNHOG-2": {"moClassId": "LNHOG"}}"#);
    let result = verify_command(&etalon, &checked, true).unwrap();

    assert_eq!(result["deleted"]["A/LNHOG-1"], "delete");
    assert_eq!(result["not_deleted"]["A/LNHOG-2"], "not delete");
}

#[test]
fn verify_rejects_scalar_input() {
    let dir = tempfile::tempdir().unwrap();
    let etalon = write(dir.path(), "etalon.json", "42");
    let checked = write(dir.path(), "checked.json", "{}");
    assert!(verify_command(&etalon, &checked, false).is_err());
}

#[test]
fn read_json_errors() {
    let dir = tempfile::tempdir().unwrap();
    assert!(read_json(&dir.path().join("absent.json")).is_err());
    assert!(read_json(&write(dir.path(), "empty.json", "  ")).is_err());
    assert!(read_json(&write(dir.path(), "bad.json", "{")).is_err());
}
