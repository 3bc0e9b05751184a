use crate::classify::Classifier;
use crate::error::{AnalysisError, AnalysisResult};
use crate::keys::UsableKey;
use crate::split::split_value;
use phonefix_types::diagnostics::{Diagnostics, FormattingChange, ValueSet};
use phonefix_types::number::NumberParser;
use phonefix_types::outcome::{AcceptedNumber, Candidate, Classification, Outcome, RejectReason};
use phonefix_types::tags::{CONTACT_PREFIX, CanonicalTagSet, Feature, TagChange, TagMap, VALUE_SEPARATOR};
use tracing::{debug, warn};

/// Accepted canonical values destined for one output key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub key: String,
    pub values: ValueSet,
}

/// All phone tags of one feature, classified and bucketed.
///
/// Built fresh for every analysis; nothing is shared between features.
#[derive(Debug, Clone)]
pub struct PhoneTags {
    feature_id: String,
    region: String,
    prefix: &'static str,
    usable_keys: Vec<String>,
    candidate_count: usize,
    accepted_count: usize,
    buckets: Vec<Bucket>,
    diagnostics: Diagnostics,
}

impl PhoneTags {
    /// Classifies every candidate of every usable tag of `feature`.
    ///
    /// On a parser fault the candidate is still recorded as invalid and the
    /// remaining tags are processed, then the first fault is returned.
    pub fn analyze(feature: &Feature, parser: &dyn NumberParser) -> AnalysisResult<Self> {
        let usable: Vec<UsableKey<'_>> = feature.tags.keys().filter_map(UsableKey::parse).collect();

        let prefix = if feature.contact_scheme || usable.iter().any(|k| k.prefixed) {
            CONTACT_PREFIX
        } else {
            ""
        };

        let mut tags = Self {
            feature_id: feature.id.clone(),
            region: feature.region.clone(),
            prefix,
            usable_keys: usable.iter().map(|k| k.key.to_string()).collect(),
            candidate_count: 0,
            accepted_count: 0,
            buckets: Vec::new(),
            diagnostics: Diagnostics::default(),
        };

        let classifier = Classifier::new(parser);
        let mut first_fault = None;

        for key in &usable {
            let raw = feature.tags.get(key.key).unwrap_or_default();
            let split = split_value(raw);

            if split.bad_separator {
                tags.diagnostics.bad_separator_keys.insert(key.key);
            }
            if split.beautified {
                tags.diagnostics.note_formatting(FormattingChange::Beautified);
            }
            tags.candidate_count += split.candidates.len();

            for value in split.candidates {
                let candidate = Candidate::new(key.key, value);
                let classification = match classifier.classify(&candidate, &feature.region) {
                    Ok(c) => c,
                    Err(source) => {
                        warn!(
                            feature = %feature.id,
                            key = key.key,
                            candidate = %candidate.raw,
                            error = %source,
                            "parser fault, recording candidate as invalid"
                        );
                        if first_fault.is_none() {
                            first_fault = Some(AnalysisError::ParserFault {
                                feature_id: feature.id.clone(),
                                key: key.key.to_string(),
                                candidate: candidate.raw.clone(),
                                source,
                            });
                        }
                        Classification::rejected(RejectReason::ParseInvalid, None)
                    }
                };
                tags.record(key, candidate, classification);
            }
        }

        debug!(
            feature = %tags.feature_id,
            region = %tags.region,
            candidates = tags.candidate_count,
            accepted = tags.accepted_count,
            rejected = tags.diagnostics.rejected_count(),
            buckets = tags.buckets.len(),
            "analysed phone tags"
        );

        match first_fault {
            Some(err) => Err(err),
            None => Ok(tags),
        }
    }

    fn record(&mut self, key: &UsableKey<'_>, candidate: Candidate, classification: Classification) {
        if classification.is_wrong_region(&self.region) {
            let value = match &classification.outcome {
                Outcome::Accepted(number) => number.canonical.clone(),
                Outcome::Rejected { .. } => candidate.raw.clone(),
            };
            self.diagnostics.wrong_region_values.insert(value);
        }

        match classification.outcome {
            Outcome::Accepted(number) => self.insert(key, &candidate.raw, number),
            Outcome::Rejected { reason } => {
                let set = match reason {
                    RejectReason::UnusualChars => &mut self.diagnostics.unusual_char_values,
                    RejectReason::ParseInvalid => &mut self.diagnostics.invalid_values,
                    RejectReason::TooShort => &mut self.diagnostics.too_short_values,
                    RejectReason::PremiumRate => &mut self.diagnostics.premium_values,
                    RejectReason::PoorGrouping => &mut self.diagnostics.poorly_grouped_values,
                };
                set.insert(candidate.raw);
            }
        }
    }

    fn insert(&mut self, key: &UsableKey<'_>, raw: &str, number: AcceptedNumber) {
        if number.canonical != raw {
            self.diagnostics.note_formatting(FormattingChange::Reformatted);
        }
        if key.class_root() != number.class.key_root() {
            self.diagnostics.switched_class = true;
        }
        if !key.prefixed && !self.prefix.is_empty() {
            self.diagnostics.switched_scheme = true;
        }

        let bucket_key = format!("{}{}", self.prefix, number.class.key_root());
        match self.buckets.iter_mut().find(|b| b.key == bucket_key) {
            Some(bucket) => {
                bucket.values.insert(number.canonical);
            }
            None => {
                let mut values = ValueSet::new();
                values.insert(number.canonical);
                self.buckets.push(Bucket {
                    key: bucket_key,
                    values,
                });
            }
        }
        self.accepted_count += 1;
    }

    pub fn feature_id(&self) -> &str {
        &self.feature_id
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// `contact:` or empty.
    pub fn prefix(&self) -> &str {
        self.prefix
    }

    /// Usable keys in tag order.
    pub fn usable_keys(&self) -> &[String] {
        &self.usable_keys
    }

    /// Candidates extracted across all usable tags, duplicates included.
    pub fn candidate_count(&self) -> usize {
        self.candidate_count
    }

    /// Candidates that were accepted into some bucket, duplicates included.
    pub fn accepted_count(&self) -> usize {
        self.accepted_count
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Bucket contents joined with `;`, then a tombstone for every usable key
    /// that is not itself a bucket key.
    pub fn canonical_tags(&self) -> CanonicalTagSet {
        let sep = VALUE_SEPARATOR.to_string();
        let mut set = CanonicalTagSet::new();
        for bucket in &self.buckets {
            set.push(bucket.key.clone(), bucket.values.join(&sep));
        }
        for key in &self.usable_keys {
            if !self.buckets.iter().any(|b| &b.key == key) {
                set.push(key.clone(), "");
            }
        }
        set
    }

    /// Edits that turn `current` into the canonical tag set.
    ///
    /// When nothing was accepted every usable key is tombstoned; callers that
    /// must not empty a feature check [`PhoneTags::offers_fix`] first.
    pub fn tag_change(&self, current: &TagMap) -> TagChange {
        TagChange::between(self.feature_id.clone(), current, &self.canonical_tags())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phonefix_testkit::{FixtureParser, feature};
    use phonefix_types::tags::Tag;
    use pretty_assertions::assert_eq;

    fn analyze(f: &Feature) -> PhoneTags {
        PhoneTags::analyze(f, &FixtureParser::new()).expect("analysis")
    }

    fn pairs(set: &CanonicalTagSet) -> Vec<(&str, &str)> {
        set.iter().map(|t| (t.key.as_str(), t.value.as_str())).collect()
    }

    #[test]
    fn duplicates_collapse_in_first_seen_order() {
        let f = feature(
            "n1",
            "HU",
            &[("contact:mobile", "+36 30 000 0000;+36 30 000 0000")],
        );
        let tags = analyze(&f);
        assert_eq!(tags.candidate_count(), 2);
        assert_eq!(
            pairs(&tags.canonical_tags()),
            vec![("contact:mobile", "+36 30 000 0000")]
        );
    }

    #[test]
    fn ignores_unusable_keys() {
        let f = feature(
            "n2",
            "HU",
            &[("name", "06 1 234 5678"), ("phone:mobile", "x"), ("phone", "+36 1 234 5678")],
        );
        let tags = analyze(&f);
        assert_eq!(tags.usable_keys(), &["phone".to_string()]);
        assert_eq!(pairs(&tags.canonical_tags()), vec![("phone", "+36 1 234 5678")]);
    }

    #[test]
    fn mobile_in_phone_key_moves_and_tombstones() {
        let f = feature(
            "n3",
            "HU",
            &[("phone", "+36 1 234 5678;+36 20 920 9000"), ("phone_2", "+36 62 800 800")],
        );
        let tags = analyze(&f);
        assert_eq!(
            pairs(&tags.canonical_tags()),
            vec![
                ("phone", "+36 1 234 5678;+36 62 800 800"),
                ("mobile", "+36 20 920 9000"),
                ("phone_2", ""),
            ]
        );
        assert!(tags.diagnostics().switched_class);
        assert!(!tags.diagnostics().switched_scheme);
    }

    #[test]
    fn any_prefixed_key_pulls_others_into_scheme() {
        let f = feature(
            "n4",
            "HU",
            &[("phone", "+36 1 234 5678"), ("contact:phone", "+36 62 800 800")],
        );
        let tags = analyze(&f);
        assert_eq!(tags.prefix(), "contact:");
        assert_eq!(
            pairs(&tags.canonical_tags()),
            vec![
                ("contact:phone", "+36 1 234 5678;+36 62 800 800"),
                ("phone", ""),
            ]
        );
        assert!(tags.diagnostics().switched_scheme);
        assert!(!tags.diagnostics().switched_class);
    }

    #[test]
    fn each_candidate_gets_one_disposition() {
        let f = feature(
            "n5",
            "HU",
            &[(
                "phone",
                "+36 62 800800;+36 90 317 282;+36 30 DUGULAS;2019- );Polgármester",
            )],
        );
        let tags = analyze(&f);
        let d = tags.diagnostics();
        assert_eq!(d.premium_values.iter().collect::<Vec<_>>(), vec!["+36 90 317 282"]);
        assert_eq!(d.unusual_char_values.iter().collect::<Vec<_>>(), vec!["+36 30 DUGULAS"]);
        assert_eq!(d.too_short_values.iter().collect::<Vec<_>>(), vec!["2019- )"]);
        assert_eq!(d.invalid_values.iter().collect::<Vec<_>>(), vec!["Polgármester"]);
        assert_eq!(tags.accepted_count(), 1);
        assert_eq!(d.formatting, FormattingChange::Reformatted);
        assert_eq!(
            tags.accepted_count() + d.rejected_count(),
            tags.candidate_count()
        );
    }

    #[test]
    fn wrong_region_is_an_overlay() {
        let f = feature("n6", "HU", &[("phone", "+49 30 1234567;+36 62 800 800")]);
        let tags = analyze(&f);
        let d = tags.diagnostics();
        assert_eq!(d.wrong_region_values.iter().collect::<Vec<_>>(), vec!["+49 30 1234567"]);
        assert_eq!(tags.buckets()[0].values.len(), 2);
    }

    #[test]
    fn parser_fault_finishes_feature_then_fails() {
        let parser = FixtureParser::new().failing_on("+36 1 234 5678");
        let f = feature(
            "n7",
            "HU",
            &[("phone", "+36 1 234 5678"), ("fax", "+36 62 800 800")],
        );
        let err = PhoneTags::analyze(&f, &parser).unwrap_err();
        match err {
            AnalysisError::ParserFault {
                feature_id,
                key,
                candidate,
                ..
            } => {
                assert_eq!(feature_id, "n7");
                assert_eq!(key, "phone");
                assert_eq!(candidate, "+36 1 234 5678");
            }
        }
    }

    #[test]
    fn nothing_accepted_tombstones_every_key() {
        let f = feature("n8", "HU", &[("phone", "+36 90 317 282")]);
        let tags = analyze(&f);
        assert_eq!(pairs(&tags.canonical_tags()), vec![("phone", "")]);
        assert_eq!(tags.tag_change(&f.tags).changes, vec![Tag::new("phone", "")]);
        assert!(tags.is_fixable());
        assert!(!tags.offers_fix());
    }

    #[test]
    fn unknown_feature_region_flags_parsed_numbers() {
        let f = feature("n9", "", &[("phone", "+36 62 800 800")]);
        let tags = analyze(&f);
        assert_eq!(
            tags.diagnostics().wrong_region_values.iter().collect::<Vec<_>>(),
            vec!["+36 62 800 800"]
        );
    }
}
