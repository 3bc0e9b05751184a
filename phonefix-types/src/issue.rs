use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warn,
    Error,
}

/// Fixed issue taxonomy. Numeric codes are stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    ParseError,
    UnusualChars,
    WrongRegion,
    BadSeparator,
    TooShort,
    TooFewGrouping,
    Fixable,
    PremiumRate,
}

impl IssueCode {
    pub fn number(self) -> u32 {
        match self {
            IssueCode::ParseError => 10600,
            IssueCode::UnusualChars => 10601,
            IssueCode::WrongRegion => 10602,
            IssueCode::BadSeparator => 10604,
            IssueCode::TooShort => 10605,
            IssueCode::TooFewGrouping => 10606,
            IssueCode::Fixable => 10607,
            IssueCode::PremiumRate => 10608,
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            IssueCode::ParseError => "phone.parse_error",
            IssueCode::UnusualChars => "phone.unusual_chars",
            IssueCode::WrongRegion => "phone.wrong_region",
            IssueCode::BadSeparator => "phone.bad_separator",
            IssueCode::TooShort => "phone.too_short",
            IssueCode::TooFewGrouping => "phone.too_few_grouping",
            IssueCode::Fixable => "phone.fixable",
            IssueCode::PremiumRate => "phone.premium_rate",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            IssueCode::ParseError
            | IssueCode::UnusualChars
            | IssueCode::BadSeparator
            | IssueCode::TooShort => Severity::Error,
            IssueCode::WrongRegion
            | IssueCode::TooFewGrouping
            | IssueCode::Fixable
            | IssueCode::PremiumRate => Severity::Warn,
        }
    }

    /// Whether the canonical-tag fix is offered for issues of this code.
    pub fn offers_fix(self) -> bool {
        matches!(self, IssueCode::BadSeparator | IssueCode::Fixable)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub code: IssueCode,
    pub severity: Severity,

    /// Short group title, e.g. "Phone number invalid".
    pub title: String,

    pub message: String,

    /// Offending value, or key for separator issues. Absent for the aggregate issue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    #[serde(default)]
    pub fixable: bool,

    /// Stable key for deduplication across runs.
    pub fingerprint: String,
}
