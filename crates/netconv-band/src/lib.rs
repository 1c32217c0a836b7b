//! netconv Band
//!
//! Frequency band classification and band-dependent template defaults.
//!
//! # Core Concepts
//!
//! - [`BandClassifier`]: channel number → band label, combined with the
//!   channel width into a [`BandKey`]
//! - [`SourceAttributes`]: FDD/TDD radio attributes per managed object
//! - [`Template`]: global defaults plus [`BandTable`]s for the band-keyed
//!   thresholds, each with a `-120` fallback
//! - [`DefaultTemplateResolver`]: effective desired parameters per object
//!
//! # Example
//!
//! ```rust
//! use netconv_band::BandClassifier;
//!
//! let classifier = BandClassifier::lte();
//! let key = classifier.band_key(1500, Some("20 MHz")).unwrap();
//! assert_eq!(key.as_str(), "LTE_1800_20");
//! ```

#![warn(unreachable_pub)]

mod band;
mod error;
mod resolver;
mod source;
mod template;

pub use band::{parse_channel, BandClassifier, BandKey, BandRange, UNKNOWN_BAND};
pub use error::BandError;
pub use resolver::DefaultTemplateResolver;
pub use source::{
    RadioAttributes, SourceAttributes, CELL_DEPTH, FDD_CHANNEL, FDD_WIDTH, TDD_CHANNEL, TDD_WIDTH,
};
pub use template::{
    BandTable, Template, B2_THRESHOLD_GERAN, B2_THRESHOLD_GERAN_QCI1, BAND_FALLBACK,
    BAND_KEYED_PARAMETERS, HEADER_ROW,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
