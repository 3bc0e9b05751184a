//! Candidate classification.
//!
//! One candidate string plus a region yields exactly one [`Outcome`]. The checks run
//! in a fixed order and the first one that decides wins:
//!
//! 1. parser rejects the string
//! 2. characters outside the dialling alphabet
//! 3. valid short or emergency number (kept verbatim)
//! 4. too short
//! 5. premium rate
//! 6. trailing direct-dial-in extension
//! 7. full validity
//! 8. grouping sanity of the international rendering

use phonefix_types::number::{NumberParser, NumberType, ParseError, PhoneNumber, PossibleNumber};
use phonefix_types::outcome::{AcceptedNumber, Candidate, Classification, NumberClass, RejectReason};
use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

/// Long digit run, one of `-/#`, then a short trailing digit group.
static DDI_TAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\+?([0-9- ]){6,}[-/#][0-9 ]+$").expect("DDI pattern compiles")
});

const EXTENSION_MARKER: &str = "ext.";

pub struct Classifier<'a> {
    parser: &'a dyn NumberParser,
}

impl<'a> Classifier<'a> {
    pub fn new(parser: &'a dyn NumberParser) -> Self {
        Self { parser }
    }

    /// Classifies one candidate against `region`.
    ///
    /// Ordinary parse failures become [`RejectReason::ParseInvalid`]. Only
    /// [`ParseError::Fault`] is returned as an error.
    pub fn classify(&self, candidate: &Candidate, region: &str) -> Result<Classification, ParseError> {
        let raw = candidate.raw.as_str();

        let number = match self.parser.parse(raw, region) {
            Ok(number) => number,
            Err(err) if err.is_fault() => return Err(err),
            Err(err) => {
                trace!(raw, region, error = %err, "candidate did not parse");
                return Ok(Classification::rejected(RejectReason::ParseInvalid, None));
            }
        };
        let number_region = self.parser.region_for_number(&number);
        let rejected = |reason| Ok(Classification::rejected(reason, Some(number_region.clone())));

        if contains_unusual_chars(raw) {
            return rejected(RejectReason::UnusualChars);
        }

        if self.parser.is_valid_short_number(&number)
            || self.parser.is_emergency_number(raw, &number_region)
        {
            let canonical = self.parser.format_in_original_format(&number);
            return Ok(self.accept(&candidate.key, &number, canonical));
        }

        if self.parser.possible_number_reason(&number) == PossibleNumber::TooShort {
            return rejected(RejectReason::TooShort);
        }

        if self.parser.number_type(&number) == NumberType::PremiumRate {
            return rejected(RejectReason::PremiumRate);
        }

        if contains_ddi(raw)
            && possibly_valid_extension_separator(raw)
            && let Some((main, extension, _)) = split_by_last_separator(raw)
            && !extension.is_empty()
        {
            let main_region = if number_region.is_empty() {
                region
            } else {
                number_region.as_str()
            };
            match self.parser.parse(main, main_region) {
                Ok(mut main_number) => {
                    main_number.extension = Some(extension.to_string());
                    if self.parser.is_valid_number(&main_number) {
                        let canonical = self.parser.format_international(&main_number);
                        trace!(raw, canonical = %canonical, "split direct-dial-in extension");
                        return Ok(self.accept(&candidate.key, &main_number, canonical));
                    }
                }
                Err(err) if err.is_fault() => return Err(err),
                Err(_) => return rejected(RejectReason::ParseInvalid),
            }
        }

        if !self.parser.is_valid_number(&number) {
            return rejected(RejectReason::ParseInvalid);
        }

        let formatted = self.parser.format_international(&number);
        if is_poorly_grouped(raw, &formatted) {
            return rejected(RejectReason::PoorGrouping);
        }

        Ok(self.accept(&candidate.key, &number, formatted))
    }

    fn accept(&self, key: &str, number: &PhoneNumber, canonical: String) -> Classification {
        Classification::accepted(AcceptedNumber {
            canonical,
            class: number_class(key, self.parser.number_type(number)),
            number_region: self.parser.region_for_number(number),
        })
    }
}

/// Fax keys win over the parser's opinion; otherwise mobile numbers go to `mobile`.
fn number_class(key: &str, number_type: NumberType) -> NumberClass {
    if key.to_lowercase().contains("fax") {
        NumberClass::Fax
    } else if number_type == NumberType::Mobile {
        NumberClass::Mobile
    } else {
        NumberClass::Phone
    }
}

fn is_dialling_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '+' | '-' | '/' | '(' | ')' | ' ' | '#' | ';')
}

/// Letters and other symbols, unless an explicit `ext.` marker is present.
pub(crate) fn contains_unusual_chars(raw: &str) -> bool {
    raw.chars().any(|c| !is_dialling_char(c)) && !raw.contains(EXTENSION_MARKER)
}

pub(crate) fn contains_ddi(raw: &str) -> bool {
    DDI_TAIL.is_match(raw)
}

fn is_grouping_char(c: char) -> bool {
    matches!(c, ' ' | '#' | '-' | '/')
}

pub(crate) fn grouping_count(s: &str) -> usize {
    s.chars().filter(|&c| is_grouping_char(c)).count()
}

/// Splits at the last `-`, `/` or `#`, falling back to the last space.
///
/// Returns the trimmed main part, the trimmed extension and the separator.
pub(crate) fn split_by_last_separator(raw: &str) -> Option<(&str, &str, char)> {
    let idx = raw
        .rfind(['-', '/', '#'])
        .or_else(|| raw.rfind(' '))?;
    let sep = raw[idx..].chars().next()?;
    let main = &raw[..idx];
    let extension = &raw[idx + sep.len_utf8()..];
    Some((main.trim(), extension.trim(), sep))
}

/// The last separator appears once or twice and the string is grouped more than once.
pub(crate) fn possibly_valid_extension_separator(raw: &str) -> bool {
    let Some((_, _, sep)) = split_by_last_separator(raw) else {
        return false;
    };
    let sep_count = raw.chars().filter(|&c| c == sep).count();
    (sep_count == 1 || sep_count == 2) && grouping_count(raw) > 1
}

/// The rendering lost grouping characters and its groups average under three characters.
pub(crate) fn is_poorly_grouped(raw: &str, formatted: &str) -> bool {
    let formatted_groups = grouping_count(formatted);
    formatted_groups > 0
        && formatted_groups < grouping_count(raw)
        && formatted.chars().count() / formatted_groups < 3
}
