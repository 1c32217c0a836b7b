//! Change-count guard in front of the apply step

use netconv_model::ChangeSet;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Default maximum number of changes pushed in one run
pub const DEFAULT_MAX_CHANGES: usize = 1000;

/// Whether computed changes are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OperationMode {
    /// Compute and report only
    #[default]
    OpenLoop,
    /// Compute, apply and verify
    ClosedLoop,
}

impl OperationMode {
    /// Human-readable name
    #[inline]
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::OpenLoop => "Open Loop",
            Self::ClosedLoop => "Closed Loop",
        }
    }
}

impl Display for OperationMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OperationMode {
    type Err = String;

    /// Accepts `Open Loop`, `open_loop`, `OpenLoop` and the closed-loop
    /// equivalents, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "openloop" | "open" => Ok(Self::OpenLoop),
            "closedloop" | "closed" => Ok(Self::ClosedLoop),
            _ => Err(format!("unknown operation mode '{s}'")),
        }
    }
}

/// Outcome of the guard for one change set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GuardDecision {
    /// Change set is empty
    NothingToPush,
    /// Running in open loop; changes are reported only
    OpenLoop {
        /// Number of changes
        changes: usize,
    },
    /// Too many changes; apply withheld and alarm raised
    Withheld {
        /// Number of changes
        changes: usize,
        /// Configured maximum
        max_changes: usize,
    },
    /// Changes go to the pusher
    Push {
        /// Number of changes
        changes: usize,
    },
}

impl GuardDecision {
    /// Check if the pusher should be invoked
    #[inline]
    #[must_use]
    pub fn should_push(self) -> bool {
        matches!(self, Self::Push { .. })
    }

    /// Check if the alarm path is raised
    #[inline]
    #[must_use]
    pub fn raises_alarm(self) -> bool {
        matches!(self, Self::Withheld { .. })
    }
}

/// Decides whether a change set may be applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeGuard {
    max_changes: usize,
    mode: OperationMode,
}

impl ChangeGuard {
    /// Create guard
    #[inline]
    #[must_use]
    pub fn new(max_changes: usize, mode: OperationMode) -> Self {
        Self { max_changes, mode }
    }

    /// Evaluate a change set
    ///
    /// Withholds only when the count exceeds the maximum; a count equal to
    /// the maximum is pushed.
    #[must_use]
    pub fn evaluate(&self, changes: &ChangeSet) -> GuardDecision {
        let count = changes.len();
        let decision = if count == 0 {
            GuardDecision::NothingToPush
        } else if self.mode == OperationMode::OpenLoop {
            GuardDecision::OpenLoop { changes: count }
        } else if count > self.max_changes {
            GuardDecision::Withheld {
                changes: count,
                max_changes: self.max_changes,
            }
        } else {
            GuardDecision::Push { changes: count }
        };
        tracing::info!(changes = count, mode = %self.mode, ?decision, "guard evaluated");
        decision
    }
}

impl Default for ChangeGuard {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHANGES, OperationMode::default())
    }
}
