use crate::split::split_value;
use phonefix_types::diagnostics::ValueSet;
use phonefix_types::tags::{CONTACT_PREFIX, CanonicalTagSet, TagMap, VALUE_SEPARATOR};

/// Contact keys that have a `contact:` counterpart.
pub const SCHEME_KEYS: [&str; 6] = ["email", "phone", "mobile", "website", "facebook", "fax"];

/// Moves every unprefixed contact key to its `contact:` form.
///
/// Values of the old and the prefixed key are merged, first occurrence wins, and
/// the old key is tombstoned. Only exact keys from [`SCHEME_KEYS`] move; numbered
/// variants such as `phone_2` stay where they are.
pub fn switch_to_contact_scheme(tags: &TagMap) -> CanonicalTagSet {
    let sep = VALUE_SEPARATOR.to_string();
    let mut out = CanonicalTagSet::new();

    for key in SCHEME_KEYS {
        let Some(old) = tags.get(key) else {
            continue;
        };
        let prefixed = format!("{CONTACT_PREFIX}{key}");
        let existing = tags.get(&prefixed).unwrap_or_default();

        let merged: ValueSet = split_value(old)
            .candidates
            .into_iter()
            .chain(split_value(existing).candidates)
            .collect();

        out.push(key, "");
        out.push(prefixed, merged.join(&sep));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use phonefix_types::tags::TagChange;
    use pretty_assertions::assert_eq;

    fn pairs(set: &CanonicalTagSet) -> Vec<(&str, &str)> {
        set.iter().map(|t| (t.key.as_str(), t.value.as_str())).collect()
    }

    #[test]
    fn moves_unprefixed_keys() {
        let tags = TagMap::from_pairs([
            ("name", "Posta"),
            ("website", "https://posta.hu"),
            ("phone", "+36 1 234 5678"),
        ]);
        assert_eq!(
            pairs(&switch_to_contact_scheme(&tags)),
            vec![
                ("phone", ""),
                ("contact:phone", "+36 1 234 5678"),
                ("website", ""),
                ("contact:website", "https://posta.hu"),
            ]
        );
    }

    #[test]
    fn merges_with_existing_prefixed_value() {
        let tags = TagMap::from_pairs([
            ("email", "a@example.org; b@example.org"),
            ("contact:email", "b@example.org;c@example.org"),
        ]);
        let set = switch_to_contact_scheme(&tags);
        assert_eq!(
            set.get("contact:email"),
            Some("a@example.org;b@example.org;c@example.org")
        );
        assert_eq!(set.get("email"), Some(""));
    }

    #[test]
    fn prefixed_only_tags_are_untouched() {
        let tags = TagMap::from_pairs([("contact:phone", "+36 1 234 5678"), ("phone_2", "x")]);
        assert!(switch_to_contact_scheme(&tags).is_empty());
    }

    #[test]
    fn applying_twice_is_stable() {
        let mut tags = TagMap::from_pairs([("fax", "+36 1 234 5679"), ("mobile", "+36 20 920 9000")]);
        let change = TagChange::between("n1", &tags, &switch_to_contact_scheme(&tags));
        tags.apply(&change);
        assert_eq!(tags.keys().collect::<Vec<_>>(), vec!["contact:mobile", "contact:fax"]);
        assert!(switch_to_contact_scheme(&tags).is_empty());
    }
}
