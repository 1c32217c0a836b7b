//! netconv Engine
//!
//! Reconciliation of desired managed-object state against the state observed
//! on the live system.
//!
//! # Core Concepts
//!
//! - [`ReconciliationEngine`]: pure `(desired, observed, existing)` →
//!   [`ChangeSet`](netconv_model::ChangeSet) computation
//! - [`PolicyTable`]: declarative parameter → [`ComparisonPolicy`] mapping
//!   (`Default`, `BandResolved`, `Multiset`)
//! - [`RetentionPolicy`]: which existing children are primary instances;
//!   everything else not desired is deleted
//! - [`ChangeGuard`]: maximum-change threshold and operation mode in front
//!   of the apply step
//!
//! # Example
//!
//! ```rust
//! use netconv_band::{DefaultTemplateResolver, SourceAttributes, Template};
//! use netconv_engine::ReconciliationEngine;
//! use netconv_model::{ObjectId, StateMap};
//! use std::collections::BTreeSet;
//!
//! let resolver = DefaultTemplateResolver::new(Template::default(), SourceAttributes::new());
//! let engine = ReconciliationEngine::new(resolver);
//!
//! let existing: BTreeSet<ObjectId> = ["A/LNHOG-0", "A/LNHOG-1"]
//!     .into_iter()
//!     .map(|s| s.parse().unwrap())
//!     .collect();
//! let result = engine.reconcile(&StateMap::new(), &StateMap::new(), &existing).unwrap();
//! assert_eq!(result.change_set.deletes().len(), 1);
//! ```

#![warn(unreachable_pub)]

mod error;
mod guard;
mod policy;
mod reconcile;
mod retention;

pub use error::{ObjectFailure, ReconcileError};
pub use guard::{ChangeGuard, GuardDecision, OperationMode, DEFAULT_MAX_CHANGES};
pub use policy::{ComparisonPolicy, PolicyTable, GERAN_FREQUENCY_LIST};
pub use reconcile::{DesiredTargets, Reconciliation, ReconciliationEngine};
pub use retention::{PrimaryInstancePolicy, RetentionPolicy, DEFAULT_PRIMARY_INDEX};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
