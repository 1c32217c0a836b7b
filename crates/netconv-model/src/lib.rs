//! netconv Model
//!
//! Shared vocabulary for reconciliation and verification.
//!
//! # Core Concepts
//!
//! - [`ObjectId`]: hierarchical distinguished name of a managed object
//! - [`ParamValue`]: scalar or list value, compared through its canonical
//!   string form
//! - [`ParameterSet`] / [`StateMap`]: parameters per object, per state
//! - [`StateInput`]: keyed state or bare id collection, as handed in by
//!   collaborators
//! - [`ChangeSet`]: partitioned create/update/delete operations
//! - [`ComparisonOutcome`]: per-parameter verification classification
//!
//! # Example
//!
//! ```rust
//! use netconv_model::{ParamValue, ParameterSet};
//!
//! let params = ParameterSet::new().with("nccperm", 10_i64);
//! let etalon = ParamValue::from("10");
//! assert!(params.get("nccperm").unwrap().canonical_eq(&etalon));
//! ```

#![warn(unreachable_pub)]

// Core modules
mod change;
mod error;
mod id;
mod outcome;
mod state;
mod value;

// Re-exports
pub use change::{ChangeKind, ChangeSet};
pub use error::ModelError;
pub use id::{ObjectId, INSTANCE_SEPARATOR, SEGMENT_SEPARATOR};
pub use outcome::{
    ComparisonOutcome, DeletionStatus, STATUS_DELETED, STATUS_DOES_NOT_EXIST, STATUS_NOT_AVAILABLE,
    STATUS_NOT_DELETED, STATUS_OK,
};
pub use state::{DesiredState, ObservedState, ParameterSet, StateInput, StateMap};
pub use value::{ParamValue, Scalar};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
