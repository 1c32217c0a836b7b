//! Error types for the convergence runner
//!
//! - [`CollaboratorError`]: failures reported by external I/O collaborators
//! - [`RunError`]: failures that abort a convergence run

use netconv_engine::ReconcileError;

/// Failure of an external collaborator
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollaboratorError {
    /// Managed system could not be reached
    #[error("transport error: {0}")]
    Transport(String),

    /// Managed system refused the request
    #[error("request rejected: {0}")]
    Rejected(String),

    /// Report could not be written
    #[error("report error: {0}")]
    Report(String),
}

/// Main runner error type
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(String),

    /// Reconciliation failed
    #[error("reconciliation failed: {0}")]
    Reconcile(#[from] ReconcileError),

    /// Observed state could not be read
    #[error("read failed: {0}")]
    Read(#[source] CollaboratorError),

    /// Change count exceeds the configured maximum
    #[error("{changes} changes exceed the threshold of {max_changes}")]
    ThresholdExceeded {
        /// Number of changes
        changes: usize,
        /// Configured maximum
        max_changes: usize,
    },

    /// Local I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
