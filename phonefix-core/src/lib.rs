//! Embeddable core library for phonefix.
//!
//! Provides an I/O-abstracted entry point for checking and fixing the phone
//! tags of many features at once, suitable for linking into an editor or a
//! batch job.
//!
//! # Port traits
//!
//! All I/O is abstracted behind port traits in [`ports`]:
//! - [`FeatureSource`](ports::FeatureSource) - load features to check
//! - [`ChangeSink`](ports::ChangeSink) - hand tag replacements to the host
//!
//! The [`adapters`] module provides default implementations, and [`geocode`]
//! a caching [`RegionLookup`](phonefix_types::geo::RegionLookup).
//!
//! # Entry points
//!
//! - [`run_check`](pipeline::run_check) - classify features and build a report
//! - [`run_fix`](pipeline::run_fix) - check, then send every offered fix to the sink
//! - [`run_scheme_switch`](pipeline::run_scheme_switch) - move contact keys to the `contact:` scheme

pub mod adapters;
pub mod config;
pub mod geocode;
pub mod load;
pub mod pipeline;
pub mod ports;
pub mod settings;

// Re-export so embedders don't need phonefix-domain directly.
pub use phonefix_domain::{AnalysisError, PhoneTags};
