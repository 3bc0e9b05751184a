use phonefix_types::outcome::NumberClass;
use phonefix_types::tags::CONTACT_PREFIX;

/// A tag key the analyser reads: `[contact:]{phone|fax|mobile}[_<digits>]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsableKey<'a> {
    pub key: &'a str,
    pub prefixed: bool,
    pub class: NumberClass,
}

impl<'a> UsableKey<'a> {
    pub fn parse(key: &'a str) -> Option<Self> {
        let (prefixed, rest) = match key.strip_prefix(CONTACT_PREFIX) {
            Some(rest) => (true, rest),
            None => (false, key),
        };

        let (root, suffix) = match rest.split_once('_') {
            Some((root, suffix)) => (root, Some(suffix)),
            None => (rest, None),
        };

        if let Some(suffix) = suffix
            && (suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()))
        {
            return None;
        }

        let class = NumberClass::from_key_root(root)?;
        Some(Self {
            key,
            prefixed,
            class,
        })
    }

    /// Key without the `contact:` prefix, suffix included.
    pub fn class_root(&self) -> &'a str {
        class_root(self.key)
    }
}

pub fn is_usable_key(key: &str) -> bool {
    UsableKey::parse(key).is_some()
}

/// Strips a leading `contact:` prefix.
pub fn class_root(key: &str) -> &str {
    key.strip_prefix(CONTACT_PREFIX).unwrap_or(key)
}
