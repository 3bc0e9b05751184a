use serde::{Deserialize, Serialize};

/// Insertion-ordered set of strings. First occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueSet {
    values: Vec<String>,
}

impl ValueSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the value was already present.
    pub fn insert(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        if self.values.contains(&value) {
            return false;
        }
        self.values.push(value);
        true
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    pub fn join(&self, sep: &str) -> String {
        self.values.join(sep)
    }
}

impl<S: Into<String>> FromIterator<S> for ValueSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = ValueSet::new();
        for v in iter {
            set.insert(v);
        }
        set
    }
}

/// How far the canonical output departs from the raw values, formatting-wise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormattingChange {
    #[default]
    None,
    /// Only separators or surrounding whitespace change.
    Beautified,
    /// At least one accepted number is rendered differently (E.123 layout).
    Reformatted,
}

/// Per-feature findings produced by the aggregator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Keys whose value used `,` as a separator.
    #[serde(default, skip_serializing_if = "ValueSet::is_empty")]
    pub bad_separator_keys: ValueSet,

    #[serde(default, skip_serializing_if = "ValueSet::is_empty")]
    pub wrong_region_values: ValueSet,

    #[serde(default, skip_serializing_if = "ValueSet::is_empty")]
    pub premium_values: ValueSet,

    #[serde(default, skip_serializing_if = "ValueSet::is_empty")]
    pub invalid_values: ValueSet,

    #[serde(default, skip_serializing_if = "ValueSet::is_empty")]
    pub too_short_values: ValueSet,

    #[serde(default, skip_serializing_if = "ValueSet::is_empty")]
    pub unusual_char_values: ValueSet,

    #[serde(default, skip_serializing_if = "ValueSet::is_empty")]
    pub poorly_grouped_values: ValueSet,

    #[serde(default)]
    pub formatting: FormattingChange,

    #[serde(default)]
    pub switched_class: bool,

    #[serde(default)]
    pub switched_scheme: bool,
}

impl Diagnostics {
    /// Set when applying the canonical tags would change any separator,
    /// whitespace or number layout.
    pub fn is_beautifyable(&self) -> bool {
        self.formatting != FormattingChange::None
    }

    /// Records a formatting change, keeping the strongest one seen.
    pub fn note_formatting(&mut self, change: FormattingChange) {
        self.formatting = self.formatting.max(change);
    }

    /// Number of candidates that ended in a rejection set.
    pub fn rejected_count(&self) -> usize {
        self.premium_values.len()
            + self.unusual_char_values.len()
            + self.too_short_values.len()
            + self.invalid_values.len()
            + self.poorly_grouped_values.len()
    }
}
