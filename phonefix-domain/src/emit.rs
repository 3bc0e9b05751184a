//! Map diagnostics onto the fixed issue taxonomy, and compute fixes.

use crate::aggregate::PhoneTags;
use crate::error::AnalysisResult;
use phonefix_types::diagnostics::ValueSet;
use phonefix_types::issue::{Issue, IssueCode};
use phonefix_types::number::NumberParser;
use phonefix_types::tags::{Feature, TagChange};
use sha2::{Digest, Sha256};

const INVALID_TITLE: &str = "Phone number invalid";
const ISSUES_TITLE: &str = "Phone number issues";
const WRONG_REGION_TITLE: &str = "Phone number possibly in wrong region";

/// Stable hex SHA-256 of `feature_id|slug|subject`.
pub fn fingerprint(feature_id: &str, code: IssueCode, subject: Option<&str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(feature_id.as_bytes());
    hasher.update(b"|");
    hasher.update(code.slug().as_bytes());
    hasher.update(b"|");
    hasher.update(subject.unwrap_or_default().as_bytes());
    hex::encode(hasher.finalize())
}

struct IssueSink<'a> {
    feature_id: &'a str,
    autofix: bool,
    issues: Vec<Issue>,
}

impl IssueSink<'_> {
    fn push(&mut self, code: IssueCode, title: &str, message: String, subject: Option<&str>) {
        self.issues.push(Issue {
            code,
            severity: code.severity(),
            title: title.to_string(),
            message,
            subject: subject.map(str::to_string),
            fixable: self.autofix && code.offers_fix(),
            fingerprint: fingerprint(self.feature_id, code, subject),
        });
    }

    fn each(&mut self, code: IssueCode, title: &str, set: &ValueSet, message: impl Fn(&str) -> String) {
        for value in set.iter() {
            self.push(code, title, message(value), Some(value));
        }
    }
}

/// One issue per entry of each diagnostic set, plus one aggregate issue when the
/// feature is fixable.
///
/// `autofix` marks separator and aggregate issues as fixable without review.
pub fn issues(tags: &PhoneTags, autofix: bool) -> Vec<Issue> {
    let d = tags.diagnostics();
    let mut sink = IssueSink {
        feature_id: tags.feature_id(),
        autofix,
        issues: Vec::new(),
    };

    sink.each(IssueCode::BadSeparator, INVALID_TITLE, &d.bad_separator_keys, |k| {
        format!("wrong separator used in {k} key")
    });
    sink.each(IssueCode::ParseError, INVALID_TITLE, &d.invalid_values, |v| {
        format!("couldn't parse {v}")
    });
    sink.each(IssueCode::TooShort, INVALID_TITLE, &d.too_short_values, |v| {
        format!("too short {v}")
    });
    sink.each(IssueCode::UnusualChars, INVALID_TITLE, &d.unusual_char_values, |v| {
        format!("unusual chars {v}")
    });
    sink.each(IssueCode::TooFewGrouping, INVALID_TITLE, &d.poorly_grouped_values, |v| {
        format!("not enough grouping characters in {v}, it may contain an extension")
    });
    sink.each(IssueCode::PremiumRate, ISSUES_TITLE, &d.premium_values, |v| {
        format!("premium rate number {v}")
    });

    if tags.is_fixable() {
        sink.push(IssueCode::Fixable, ISSUES_TITLE, tags.describe().join(", "), None);
    }

    sink.each(IssueCode::WrongRegion, WRONG_REGION_TITLE, &d.wrong_region_values, |v| {
        if v.is_empty() {
            "<empty>".to_string()
        } else {
            v.to_string()
        }
    });

    sink.issues
}

/// Recomputes the feature and returns the edits that canonicalise it.
///
/// Applying the result and calling `fix` again yields an empty change.
pub fn fix(feature: &Feature, parser: &dyn NumberParser) -> AnalysisResult<TagChange> {
    let tags = PhoneTags::analyze(feature, parser)?;
    Ok(tags.tag_change(&feature.tags))
}
