//! Domain logic: turn a feature's phone tags into diagnostics, issues and a canonical tag set.
//!
//! This crate owns *what* is wrong with a feature's numbers and what they should look like.
//! It does not parse numbers itself; that is the host-supplied
//! [`NumberParser`](phonefix_types::number::NumberParser). It also never writes tags back;
//! callers hand the resulting [`TagChange`](phonefix_types::tags::TagChange) to whatever
//! applies edits.

mod aggregate;
mod classify;
mod emit;
mod error;
mod keys;
mod policy;
mod scheme;
mod split;

pub use aggregate::{Bucket, PhoneTags};
pub use classify::Classifier;
pub use emit::{fingerprint, fix, issues};
pub use error::{AnalysisError, AnalysisResult};
pub use keys::{UsableKey, class_root, is_usable_key};
pub use scheme::{SCHEME_KEYS, switch_to_contact_scheme};
pub use split::{SplitValue, split_value};
