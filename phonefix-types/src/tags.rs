use crate::geo::LatLon;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Key prefix of the `contact:*` tagging scheme.
pub const CONTACT_PREFIX: &str = "contact:";

/// Separator between multiple values of one tag.
pub const VALUE_SEPARATOR: char = ';';

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// A tag mapped to the empty string requests removal of its key.
    pub fn is_tombstone(&self) -> bool {
        self.value.is_empty()
    }
}

/// Insertion-ordered tag mapping with unique keys.
///
/// Serializes as a JSON object whose member order is the insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMap {
    tags: Vec<Tag>,
}

impl TagMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = Self::new();
        for (k, v) in pairs {
            map.insert(k, v);
        }
        map
    }

    /// Sets `key` to `value`. An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.tags.iter_mut().find(|t| t.key == key) {
            Some(tag) => tag.value = value,
            None => self.tags.push(Tag { key, value }),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let idx = self.tags.iter().position(|t| t.key == key)?;
        Some(self.tags.remove(idx).value)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.key == key)
            .map(|t| t.value.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.tags.iter().any(|t| t.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|t| t.key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Applies a change payload: non-empty values are set, tombstones remove the key.
    pub fn apply(&mut self, change: &TagChange) {
        for tag in &change.changes {
            if tag.is_tombstone() {
                self.remove(&tag.key);
            } else {
                self.insert(tag.key.clone(), tag.value.clone());
            }
        }
    }
}

impl Serialize for TagMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.tags.len()))?;
        for tag in &self.tags {
            map.serialize_entry(&tag.key, &tag.value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TagMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TagMapVisitor;

        impl<'de> Visitor<'de> for TagMapVisitor {
            type Value = TagMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of tag keys to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<TagMap, A::Error> {
                let mut map = TagMap::new();
                while let Some((key, value)) = access.next_entry::<String, String>()? {
                    map.insert(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(TagMapVisitor)
    }
}

/// A map feature carrying phone-like tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: String,

    pub tags: TagMap,

    /// ISO 3166-1 alpha-2 code, or empty when unknown.
    #[serde(default)]
    pub region: String,

    /// Prefer the `contact:` scheme even when no key uses it yet.
    #[serde(default)]
    pub contact_scheme: bool,

    /// Representative point, used to resolve `region` when it is empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<LatLon>,
}

impl Feature {
    pub fn new(id: impl Into<String>, tags: TagMap) -> Self {
        Self {
            id: id.into(),
            tags,
            region: String::new(),
            contact_scheme: false,
            center: None,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_contact_scheme(mut self, contact_scheme: bool) -> Self {
        self.contact_scheme = contact_scheme;
        self
    }

    pub fn with_center(mut self, center: LatLon) -> Self {
        self.center = Some(center);
        self
    }
}

/// Proposed replacement tags for one feature.
///
/// Every key that was analysed appears exactly once; keys that should disappear
/// map to the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalTagSet {
    tags: Vec<Tag>,
}

impl CanonicalTagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry unless the key is already present.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        if self.tags.iter().any(|t| t.key == key) {
            return false;
        }
        self.tags.push(Tag {
            key,
            value: value.into(),
        });
        true
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.key == key)
            .map(|t| t.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Entries that would modify `current`. A tombstone for a missing key is not a change.
    pub fn changes_against(&self, current: &TagMap) -> Vec<Tag> {
        self.tags
            .iter()
            .filter(|t| match current.get(&t.key) {
                Some(existing) => existing != t.value,
                None => !t.is_tombstone(),
            })
            .cloned()
            .collect()
    }
}

/// Property-change payload for the host's "replace tags" command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagChange {
    pub feature_id: String,

    #[serde(default)]
    pub changes: Vec<Tag>,
}

impl TagChange {
    pub fn between(feature_id: impl Into<String>, current: &TagMap, target: &CanonicalTagSet) -> Self {
        Self {
            feature_id: feature_id.into(),
            changes: target.changes_against(current),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_position_of_existing_key() {
        let mut map = TagMap::from_pairs([("name", "Posta"), ("phone", "1"), ("fax", "2")]);
        map.insert("phone", "3");
        let keys: Vec<_> = map.keys().collect();
        assert_eq!(keys, vec!["name", "phone", "fax"]);
        assert_eq!(map.get("phone"), Some("3"));
    }

    #[test]
    fn tag_map_serializes_in_insertion_order() {
        let map = TagMap::from_pairs([("phone", "a"), ("amenity", "cafe"), ("contact:fax", "b")]);
        let json = serde_json::to_string(&map).expect("serialize");
        assert_eq!(json, r#"{"phone":"a","amenity":"cafe","contact:fax":"b"}"#);

        let back: TagMap = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, map);
    }

    #[test]
    fn changes_ignore_tombstones_for_absent_keys() {
        let current = TagMap::from_pairs([("contact:phone", "+36 1 340 8132")]);
        let mut target = CanonicalTagSet::new();
        target.push("contact:phone", "+36 1 340 8132");
        target.push("phone", "");

        assert!(target.changes_against(&current).is_empty());
    }

    #[test]
    fn apply_sets_and_removes() {
        let mut tags = TagMap::from_pairs([("phone", "+3612345678"), ("name", "x")]);
        let change = TagChange {
            feature_id: "n1".to_string(),
            changes: vec![Tag::new("contact:phone", "+36 1 234 5678"), Tag::new("phone", "")],
        };
        tags.apply(&change);

        assert_eq!(tags.get("phone"), None);
        assert_eq!(tags.get("contact:phone"), Some("+36 1 234 5678"));
        assert_eq!(tags.get("name"), Some("x"));
    }

    #[test]
    fn canonical_push_rejects_duplicate_keys() {
        let mut set = CanonicalTagSet::new();
        assert!(set.push("phone", "a"));
        assert!(!set.push("phone", "b"));
        assert_eq!(set.get("phone"), Some("a"));
    }
}
