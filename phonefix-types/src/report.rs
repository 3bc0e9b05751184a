use crate::diagnostics::Diagnostics;
use crate::issue::{Issue, Severity};
use crate::tags::Tag;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhonefixReport {
    pub schema: String,
    pub tool: ReportToolInfo,
    pub run: ReportRunInfo,
    pub verdict: ReportVerdict,

    #[serde(default)]
    pub features: Vec<FeatureReport>,

    /// Features that could not be fully classified this pass.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedFeature>,

    /// Input files that could not be read or parsed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs_failed: Vec<InputFailure>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportToolInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRunInfo {
    pub started_at: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportVerdict {
    pub status: ReportStatus,
    pub counts: ReportCounts,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pass,
    Warn,
    Fail,
    Skip,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportCounts {
    pub info: u64,
    pub warn: u64,
    pub error: u64,
}

impl ReportCounts {
    pub fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Info => self.info += 1,
            Severity::Warn => self.warn += 1,
            Severity::Error => self.error += 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureReport {
    pub feature_id: String,

    /// Region the feature was checked against.
    pub region: String,

    #[serde(default)]
    pub issues: Vec<Issue>,

    pub diagnostics: Diagnostics,

    /// Tag edits the fix would make; empty when nothing is offered.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub proposed_changes: Vec<Tag>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedFeature {
    pub feature_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputFailure {
    pub path: String,
    pub reason: String,
}
