//! Shared DTOs and capability contracts for the phonefix workspace.
//!
//! # Design constraints
//! - Report types are intended to be serialized and handed to a host.
//! - Tag order is significant everywhere; nothing here sorts keys.
//! - The telephone-number and territory primitives are *supplied* by the host
//!   through the traits in [`number`] and [`geo`]; phonefix never reimplements them.

pub mod diagnostics;
pub mod geo;
pub mod issue;
pub mod number;
pub mod outcome;
pub mod report;
pub mod tags;

/// Schema identifiers.
pub mod schema {
    pub const PHONEFIX_REPORT_V1: &str = "phonefix.report.v1";
}
