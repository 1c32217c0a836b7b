//! netconv command implementations
//!
//! The binary only parses arguments; every subcommand lives here so it can
//! be driven from tests.

#![warn(unreachable_pub)]

use anyhow::{bail, Context, Result};
use netconv_band::{BandClassifier, BandKey, Template};
use netconv_core::{ConvergenceRunner, JsonReportSink, NetworkSnapshot, RunConfig, RunSummary, SimulatedNetwork};
use netconv_engine::OperationMode;
use netconv_verify::ComplianceVerifier;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber; `RUST_LOG` wins over the `info` default
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(error) = installed {
        eprintln!("tracing already initialised: {error}");
    }
}

/// Arguments of `netconv run`
#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    /// TOML configuration; defaults apply when absent
    pub config: Option<PathBuf>,
    /// Template JSON object
    pub template: PathBuf,
    /// Network snapshot JSON
    pub network: PathBuf,
    /// Force closed loop
    pub closed_loop: bool,
    /// Directory for JSON reports
    pub report_dir: Option<PathBuf>,
}

/// Load configuration and apply `--closed-loop`
///
/// # Errors
/// Fails if the file cannot be read or holds invalid values
pub fn load_config(path: Option<&Path>, closed_loop: bool) -> Result<RunConfig> {
    let config = match path {
        Some(path) => RunConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => RunConfig::default(),
    };
    let config = config.apply_env().context("applying environment overrides")?;
    Ok(if closed_loop {
        config.with_operation_mode(OperationMode::ClosedLoop)
    } else {
        config
    })
}

/// Execute one convergence run against a snapshot
///
/// # Errors
/// Fails on unreadable inputs or a run error
pub async fn run_command(args: &RunArgs) -> Result<RunSummary> {
    let config = load_config(args.config.as_deref(), args.closed_loop)?;
    let template = Template::from_json(&read_json(&args.template)?)
        .with_context(|| format!("decoding template {}", args.template.display()))?;
    let snapshot: NetworkSnapshot = serde_json::from_value(read_json(&args.network)?)
        .with_context(|| format!("decoding network {}", args.network.display()))?;

    let network = Arc::new(SimulatedNetwork::new(snapshot.objects));
    let mut runner = ConvergenceRunner::new(config, template, network.clone(), network);
    if let Some(dir) = &args.report_dir {
        runner = runner.with_report_sink(Arc::new(JsonReportSink::new(dir.clone())));
    }
    Ok(runner.run(&snapshot.cells).await?)
}

/// Band key of a channel and width
///
/// A blank width yields a key with an empty bandwidth.
///
/// # Errors
/// Propagates classifier input errors
pub fn band_command(channel: i64, width: &str) -> Result<BandKey> {
    Ok(BandClassifier::lte().band_key(channel, Some(width))?)
}

/// Compare `checked` against `etalon`
///
/// # Errors
/// Fails on unreadable files or inputs that are neither objects nor arrays
pub fn verify_command(etalon: &Path, checked: &Path, delete: bool) -> Result<serde_json::Value> {
    let etalon = read_json(etalon)?;
    let checked = read_json(checked)?;
    let verifier = ComplianceVerifier::new();
    let result = if delete {
        serde_json::to_value(verifier.check_delete_json(&checked, &etalon)?)?
    } else {
        serde_json::to_value(verifier.check_create_and_update_json(&checked, &etalon)?)?
    };
    Ok(result)
}

/// Read and parse a JSON file
///
/// # Errors
/// Fails if the file is missing or is not JSON
pub fn read_json(path: &Path) -> Result<serde_json::Value> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    if raw.trim().is_empty() {
        bail!("{} is empty", path.display());
    }
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}
