use serde::{Deserialize, Serialize};
use std::fmt;

/// Which tag family an accepted number belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberClass {
    Phone,
    Mobile,
    Fax,
}

impl NumberClass {
    pub const ALL: [NumberClass; 3] = [NumberClass::Phone, NumberClass::Mobile, NumberClass::Fax];

    /// Tag key root for this class, without any scheme prefix.
    pub fn key_root(self) -> &'static str {
        match self {
            NumberClass::Phone => "phone",
            NumberClass::Mobile => "mobile",
            NumberClass::Fax => "fax",
        }
    }

    pub fn from_key_root(root: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key_root() == root)
    }
}

impl fmt::Display for NumberClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key_root())
    }
}

/// Why a candidate was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    UnusualChars,
    ParseInvalid,
    TooShort,
    PremiumRate,
    PoorGrouping,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptedNumber {
    pub canonical: String,
    pub class: NumberClass,

    /// Region the number itself belongs to, which may differ from the feature's.
    pub number_region: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Accepted(AcceptedNumber),
    Rejected { reason: RejectReason },
}

impl Outcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted(_))
    }

    pub fn reason(&self) -> Option<RejectReason> {
        match self {
            Outcome::Accepted(_) => None,
            Outcome::Rejected { reason } => Some(*reason),
        }
    }
}

/// Full result of classifying one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub outcome: Outcome,

    /// Region resolved by the parser; `None` when parsing failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed_region: Option<String>,
}

impl Classification {
    pub fn rejected(reason: RejectReason, parsed_region: Option<String>) -> Self {
        Self {
            outcome: Outcome::Rejected { reason },
            parsed_region,
        }
    }

    pub fn accepted(number: AcceptedNumber) -> Self {
        let parsed_region = Some(number.number_region.clone());
        Self {
            outcome: Outcome::Accepted(number),
            parsed_region,
        }
    }

    /// True when the parser placed the number outside `feature_region`.
    /// An empty feature region matches no parsed region.
    pub fn is_wrong_region(&self, feature_region: &str) -> bool {
        self.parsed_region
            .as_deref()
            .is_some_and(|r| r != feature_region)
    }
}

/// One raw number string extracted from a tag value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub key: String,
    pub raw: String,
}

impl Candidate {
    pub fn new(key: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            raw: raw.into(),
        }
    }
}
