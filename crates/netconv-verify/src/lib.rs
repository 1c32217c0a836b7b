//! netconv Verify
//!
//! Post-apply compliance verification: classifies every `(object, parameter)`
//! pair read back from the managed system against what was sent.
//!
//! # Core Concepts
//!
//! - [`ComplianceVerifier`]: `check_create_and_update` and `check_delete`,
//!   pure functions over [`StateInput`](netconv_model::StateInput)
//! - [`ComplianceResult`] / [`DeletionResult`]: nested classification maps
//! - [`ReportSheet`]: `[Object, Parameter, Value, Result]` rows per category
//!
//! # Example
//!
//! ```rust
//! use netconv_verify::ComplianceVerifier;
//! use serde_json::json;
//!
//! let result = ComplianceVerifier::new()
//!     .check_delete_json(&json!({"A": {}}), &json!(["A", "B"]))
//!     .unwrap();
//! assert_eq!(result.deleted.len(), 1);
//! assert_eq!(result.not_deleted.len(), 1);
//! ```

#![warn(unreachable_pub)]

mod error;
mod report;
mod verifier;

pub use error::VerifyError;
pub use report::{ReportRow, ReportSheet, REPORT_HEADER};
pub use verifier::{
    Classification, ComplianceResult, ComplianceVerifier, DeletionResult, ParameterOutcomes,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
