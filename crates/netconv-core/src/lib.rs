//! netconv Core - convergence runner
//!
//! Drives one region from target cells to a verified, reported change set:
//! - Plans desired managed children from GSM neighbour relations
//! - Reads managed children and radio attributes in bounded batches
//! - Reconciles, guards and applies the change set
//! - Re-reads the system to verify creates, updates and deletes
//! - Writes the report and raises the threshold alarm
//!
//! # Core Concepts
//!
//! - [`ConvergenceRunner`]: the run pipeline over async collaborators
//! - [`ObservedStateReader`], [`ChangePusher`], [`ReportSink`],
//!   [`AlarmNotifier`]: the seams to the managed system and the outside world
//! - [`RunConfig`]: TOML configuration with environment overrides
//! - [`SimulatedNetwork`]: in-memory system for offline runs and tests
//!
//! # Example
//!
//! ```rust
//! use netconv_band::Template;
//! use netconv_core::{CellTarget, ConvergenceRunner, Neighbour, RunConfig, SimulatedNetwork};
//! use netconv_model::StateMap;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let network = Arc::new(SimulatedNetwork::new(StateMap::new()));
//! let runner = ConvergenceRunner::new(RunConfig::new(), Template::default(), network.clone(), network);
//!
//! let cell = CellTarget::new("PLMN-PLMN/MRBTS-1/LNBTS-1/LNCEL-1".parse()?)
//!     .with_neighbour(Neighbour::gsm(640));
//! let summary = runner.run(&[cell]).await?;
//!
//! assert_eq!(summary.change_set.creates().len(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod collaborators;
pub mod config;
pub mod error;
pub mod paging;
pub mod planner;
pub mod runner;
pub mod simulator;
pub mod sinks;

pub use collaborators::{
    Alarm, AlarmNotifier, ChangePusher, ChildQuery, ObservedStateReader, PushOutcome, ReadRequest, Report,
    ReportSink, MO_CLASS_ID,
};
pub use config::{
    RunConfig, DEFAULT_READ_BATCH_SIZE, ENV_ALARM_RECIPIENTS, ENV_MAX_CHANGES, ENV_OPERATION_MODE,
    ENV_READ_BATCH_SIZE,
};
pub use error::{CollaboratorError, RunError};
pub use paging::PagedReader;
pub use planner::{AuditType, CellTarget, Neighbour, NeighbourPlanner, Technology, DEFAULT_MANAGED_CLASS};
pub use runner::{
    alarm_subject, ConvergenceRunner, PushStatus, RunId, RunSummary, Verification, ALARM_BODY, FDD_CELL_CLASS,
    TDD_CELL_CLASS,
};
pub use simulator::{NetworkSnapshot, SimulatedNetwork};
pub use sinks::{JsonReportSink, LogAlarmNotifier, MemoryAlarmNotifier, MemoryReportSink};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running a convergence
    pub use crate::{
        AuditType, CellTarget, ChangePusher, ConvergenceRunner, Neighbour, ObservedStateReader, RunConfig,
        RunError, RunSummary, SimulatedNetwork,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
