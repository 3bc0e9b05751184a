//! Error types for phonefix-domain.
//!
//! Rejected numbers are outcomes, not errors. Only a parser failure that says
//! nothing about the input surfaces here.

use phonefix_types::number::ParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The parser failed unexpectedly while classifying one candidate.
    /// The feature must be treated as skipped for this pass.
    #[error("parser fault on {candidate:?} ({key}) of feature {feature_id}: {source}")]
    ParserFault {
        feature_id: String,
        key: String,
        candidate: String,
        #[source]
        source: ParseError,
    },
}

impl AnalysisError {
    pub fn feature_id(&self) -> &str {
        match self {
            AnalysisError::ParserFault { feature_id, .. } => feature_id,
        }
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
