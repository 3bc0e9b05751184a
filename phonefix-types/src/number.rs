//! Telephone-number capability supplied by the host.
//!
//! phonefix only orchestrates these primitives. Numbering-plan metadata, parsing,
//! validity and formatting live behind [`NumberParser`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A parsed number as produced by [`NumberParser::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumber {
    pub country_code: u16,

    /// Significant national number, digits only.
    pub national_number: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,

    /// The exact input the number was parsed from.
    pub raw_input: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberType {
    FixedLine,
    Mobile,
    FixedLineOrMobile,
    TollFree,
    PremiumRate,
    SharedCost,
    Voip,
    PersonalNumber,
    Pager,
    Uan,
    Voicemail,
    Unknown,
}

/// Outcome of the cheap length-based plausibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PossibleNumber {
    IsPossible,
    IsPossibleLocalOnly,
    InvalidCountryCode,
    TooShort,
    InvalidLength,
    TooLong,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid country code")]
    InvalidCountryCode,

    #[error("not a number")]
    NotANumber,

    #[error("too short after international dialling prefix")]
    TooShortAfterIdd,

    #[error("national number too short")]
    TooShortNsn,

    #[error("too long")]
    TooLong,

    /// The parser failed for a reason it does not classify.
    #[error("parser fault: {message}")]
    Fault { message: String },
}

impl ParseError {
    /// True when the failure says nothing about the input itself.
    pub fn is_fault(&self) -> bool {
        matches!(self, ParseError::Fault { .. })
    }
}

/// Region-aware telephone-number primitives.
pub trait NumberParser: Send + Sync {
    /// Parses `raw` with `region` as the default region, keeping the raw input.
    fn parse(&self, raw: &str, region: &str) -> Result<PhoneNumber, ParseError>;

    fn possible_number_reason(&self, number: &PhoneNumber) -> PossibleNumber;

    fn is_valid_number(&self, number: &PhoneNumber) -> bool;

    fn number_type(&self, number: &PhoneNumber) -> NumberType;

    fn is_valid_short_number(&self, number: &PhoneNumber) -> bool;

    fn is_emergency_number(&self, raw: &str, region: &str) -> bool;

    /// E.123 international layout, including any extension as ` ext. <n>`.
    fn format_international(&self, number: &PhoneNumber) -> String;

    fn format_in_original_format(&self, number: &PhoneNumber) -> String;

    /// Alpha-2 region the number belongs to, or an empty string.
    fn region_for_number(&self, number: &PhoneNumber) -> String;
}
