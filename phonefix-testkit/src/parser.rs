use phonefix_types::number::{NumberParser, NumberType, ParseError, PhoneNumber, PossibleNumber};
use std::ops::RangeInclusive;

struct NumberRange {
    prefixes: &'static [&'static str],
    number_type: NumberType,
    lengths: RangeInclusive<usize>,
    /// Digit group sizes after the country code. Leftover digits form one more group.
    groups: &'static [usize],
}

struct Plan {
    region: &'static str,
    country_code: u16,
    national_prefix: &'static str,
    lengths: RangeInclusive<usize>,
    ranges: &'static [NumberRange],
    short_numbers: &'static [&'static str],
    emergency_numbers: &'static [&'static str],
}

const HU_GEOGRAPHIC: &[&str] = &[
    "22", "23", "24", "25", "26", "27", "28", "29", "32", "33", "34", "35", "36", "37", "42",
    "44", "45", "46", "47", "48", "49", "52", "53", "54", "56", "57", "59", "62", "63", "66",
    "68", "69", "72", "73", "74", "75", "76", "77", "78", "79", "82", "83", "84", "85", "87",
    "88", "89", "92", "93", "94", "95", "96", "99",
];

const HU: Plan = Plan {
    region: "HU",
    country_code: 36,
    national_prefix: "06",
    lengths: 8..=9,
    ranges: &[
        NumberRange {
            prefixes: &["1"],
            number_type: NumberType::FixedLine,
            lengths: 8..=8,
            groups: &[1, 3, 4],
        },
        NumberRange {
            prefixes: &["20", "30", "31", "50", "70"],
            number_type: NumberType::Mobile,
            lengths: 9..=9,
            groups: &[2, 3, 4],
        },
        NumberRange {
            prefixes: &["90", "91"],
            number_type: NumberType::PremiumRate,
            lengths: 8..=8,
            groups: &[2, 3, 3],
        },
        NumberRange {
            prefixes: &["80"],
            number_type: NumberType::TollFree,
            lengths: 8..=8,
            groups: &[2, 3, 3],
        },
        NumberRange {
            prefixes: HU_GEOGRAPHIC,
            number_type: NumberType::FixedLine,
            lengths: 8..=8,
            groups: &[2, 3, 3],
        },
    ],
    short_numbers: &["104", "105", "107", "112", "1272"],
    emergency_numbers: &["104", "105", "107", "112"],
};

const DE: Plan = Plan {
    region: "DE",
    country_code: 49,
    national_prefix: "0",
    lengths: 9..=11,
    ranges: &[
        NumberRange {
            prefixes: &["30"],
            number_type: NumberType::FixedLine,
            lengths: 9..=11,
            groups: &[2],
        },
        // Renders one digit per group.
        NumberRange {
            prefixes: &["89"],
            number_type: NumberType::FixedLine,
            lengths: 9..=9,
            groups: &[1, 1, 1, 1, 1, 1, 1, 1, 1],
        },
        NumberRange {
            prefixes: &["771"],
            number_type: NumberType::FixedLine,
            lengths: 9..=10,
            groups: &[3],
        },
        NumberRange {
            prefixes: &["151", "160", "170", "171", "172", "176"],
            number_type: NumberType::Mobile,
            lengths: 11..=11,
            groups: &[3],
        },
    ],
    short_numbers: &["110", "112", "115"],
    emergency_numbers: &["110", "112"],
};

const PLANS: &[&Plan] = &[&HU, &DE];

impl Plan {
    fn range_for(&self, nsn: &str) -> Option<&NumberRange> {
        self.ranges.iter().find(|r| {
            r.lengths.contains(&nsn.len()) && r.prefixes.iter().any(|p| nsn.starts_with(p))
        })
    }
}

fn plan_for_region(region: &str) -> Option<&'static Plan> {
    PLANS.iter().copied().find(|p| p.region == region)
}

fn plan_for_code(country_code: u16) -> Option<&'static Plan> {
    PLANS.iter().copied().find(|p| p.country_code == country_code)
}

fn digits_of(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

fn group(nsn: &str, sizes: &[usize]) -> String {
    let mut parts = Vec::new();
    let mut pos = 0;
    for &size in sizes {
        if pos >= nsn.len() {
            break;
        }
        let end = (pos + size).min(nsn.len());
        parts.push(&nsn[pos..end]);
        pos = end;
    }
    if pos < nsn.len() {
        parts.push(&nsn[pos..]);
    }
    parts.join(" ")
}

/// Deterministic [`NumberParser`] over a hand-written HU/DE numbering table.
#[derive(Debug, Clone, Default)]
pub struct FixtureParser {
    faults: Vec<String>,
}

impl FixtureParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `parse` fail with [`ParseError::Fault`] for exactly this raw input.
    pub fn failing_on(mut self, raw: impl Into<String>) -> Self {
        self.faults.push(raw.into());
        self
    }
}

impl NumberParser for FixtureParser {
    fn parse(&self, raw: &str, region: &str) -> Result<PhoneNumber, ParseError> {
        if self.faults.iter().any(|f| f == raw) {
            return Err(ParseError::Fault {
                message: format!("injected fault for {raw:?}"),
            });
        }

        let (body, extension) = match raw.find("ext.") {
            Some(idx) => {
                let ext = raw[idx + "ext.".len()..].trim();
                (&raw[..idx], (!ext.is_empty()).then(|| ext.to_string()))
            }
            None => (raw, None),
        };

        let start = body
            .find(|c: char| c == '+' || c.is_ascii_digit())
            .ok_or(ParseError::NotANumber)?;
        let body = &body[start..];
        let digits = digits_of(body);

        let international = if body.starts_with('+') {
            Some(digits.as_str())
        } else {
            digits.strip_prefix("00")
        };

        let (plan, nsn) = match international {
            Some(rest) => {
                if rest.is_empty() {
                    return Err(ParseError::TooShortAfterIdd);
                }
                let plan = PLANS
                    .iter()
                    .copied()
                    .find(|p| rest.starts_with(&p.country_code.to_string()))
                    .ok_or(ParseError::InvalidCountryCode)?;
                let cc_len = plan.country_code.to_string().len();
                (plan, rest[cc_len..].to_string())
            }
            None => {
                let plan = plan_for_region(region).ok_or(ParseError::InvalidCountryCode)?;
                let nsn = digits
                    .strip_prefix(plan.national_prefix)
                    .unwrap_or(&digits)
                    .to_string();
                (plan, nsn)
            }
        };

        if nsn.len() < 2 {
            return Err(ParseError::TooShortNsn);
        }
        if nsn.len() > 17 {
            return Err(ParseError::TooLong);
        }

        Ok(PhoneNumber {
            country_code: plan.country_code,
            national_number: nsn,
            extension,
            raw_input: raw.to_string(),
        })
    }

    fn possible_number_reason(&self, number: &PhoneNumber) -> PossibleNumber {
        let Some(plan) = plan_for_code(number.country_code) else {
            return PossibleNumber::InvalidCountryCode;
        };
        let len = number.national_number.len();
        if len < *plan.lengths.start() {
            PossibleNumber::TooShort
        } else if len > *plan.lengths.end() {
            PossibleNumber::TooLong
        } else {
            PossibleNumber::IsPossible
        }
    }

    fn is_valid_number(&self, number: &PhoneNumber) -> bool {
        plan_for_code(number.country_code)
            .and_then(|p| p.range_for(&number.national_number))
            .is_some()
    }

    fn number_type(&self, number: &PhoneNumber) -> NumberType {
        plan_for_code(number.country_code)
            .and_then(|p| p.range_for(&number.national_number))
            .map(|r| r.number_type)
            .unwrap_or(NumberType::Unknown)
    }

    fn is_valid_short_number(&self, number: &PhoneNumber) -> bool {
        number.extension.is_none()
            && plan_for_code(number.country_code)
                .is_some_and(|p| p.short_numbers.contains(&number.national_number.as_str()))
    }

    fn is_emergency_number(&self, raw: &str, region: &str) -> bool {
        let digits = digits_of(raw);
        plan_for_region(region).is_some_and(|p| p.emergency_numbers.contains(&digits.as_str()))
    }

    fn format_international(&self, number: &PhoneNumber) -> String {
        let nsn = &number.national_number;
        let grouped = plan_for_code(number.country_code)
            .and_then(|p| p.range_for(nsn))
            .map(|r| group(nsn, r.groups))
            .unwrap_or_else(|| nsn.clone());

        let mut out = format!("+{} {}", number.country_code, grouped);
        if let Some(ext) = &number.extension {
            out.push_str(" ext. ");
            out.push_str(ext);
        }
        out
    }

    fn format_in_original_format(&self, number: &PhoneNumber) -> String {
        number.raw_input.trim().to_string()
    }

    fn region_for_number(&self, number: &PhoneNumber) -> String {
        plan_for_code(number.country_code)
            .map(|p| p.region.to_string())
            .unwrap_or_default()
    }
}
