use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::enums::PatternCategory;

/// One regex match. Patterns without capture groups (or with exactly one)
/// yield a string; patterns with several groups yield the groups in order,
/// with non-participating groups as empty strings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(untagged)]
pub enum MatchPayload {
    Text(String),
    Groups(Vec<String>),
}

impl MatchPayload {
    /// First meaningful string in the payload.
    #[must_use]
    pub fn primary(&self) -> &str {
        match self {
            Self::Text(s) => s,
            Self::Groups(groups) => groups
                .iter()
                .find(|g| !g.is_empty())
                .map_or("", String::as_str),
        }
    }

    /// Group at `index`, treating a text payload as group 0.
    #[must_use]
    pub fn group(&self, index: usize) -> Option<&str> {
        match self {
            Self::Text(s) if index == 0 => Some(s),
            Self::Text(_) => None,
            Self::Groups(groups) => groups.get(index).map(String::as_str),
        }
    }
}

/// Per-message map of pattern name to matches, kept in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternMatchSet {
    entries: Vec<(String, Vec<MatchPayload>)>,
}

impl PatternMatchSet {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert or replace the matches for `name`, keeping first-insertion order.
    pub fn insert(&mut self, name: impl Into<String>, matches: Vec<MatchPayload>) {
        let name = name.into();
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = matches;
        } else {
            self.entries.push((name, matches));
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[MatchPayload]> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, m)| m.as_slice())
    }

    /// Number of matches for `name` (zero when absent).
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.get(name).map_or(0, <[MatchPayload]>::len)
    }

    /// Whether `name` has at least one match.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.count(name) > 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[MatchPayload])> {
        self.entries.iter().map(|(n, m)| (n.as_str(), m.as_slice()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of matches across all patterns.
    #[must_use]
    pub fn total_matches(&self) -> usize {
        self.entries.iter().map(|(_, m)| m.len()).sum()
    }
}

impl Serialize for PatternMatchSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, matches) in &self.entries {
            map.serialize_entry(name, matches)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PatternMatchSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SetVisitor;

        impl<'de> Visitor<'de> for SetVisitor {
            type Value = PatternMatchSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of pattern name to matches")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut set = PatternMatchSet::new();
                while let Some((name, matches)) =
                    access.next_entry::<String, Vec<MatchPayload>>()?
                {
                    set.insert(name, matches);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_map(SetVisitor)
    }
}

impl JsonSchema for PatternMatchSet {
    fn schema_name() -> Cow<'static, str> {
        Cow::Borrowed("PatternMatchSet")
    }

    fn json_schema(generator: &mut schemars::SchemaGenerator) -> schemars::Schema {
        <BTreeMap<String, Vec<MatchPayload>>>::json_schema(generator)
    }
}

/// Pattern matches for one message, the record type of the patterns artifact.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MessageEnrichment {
    pub message_id: i64,
    pub sender_id: i64,
    pub timestamp: DateTime<Utc>,
    pub matches: PatternMatchSet,
}

/// Aggregated matches of one pattern with example context windows.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PatternContext {
    pub total_count: usize,
    /// Occurrences keyed by the exact matched text.
    pub occurrences: BTreeMap<String, usize>,
    pub example_contexts: Vec<String>,
    pub category: PatternCategory,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn serializes_in_insertion_order() {
        let mut set = PatternMatchSet::new();
        set.insert("url", vec![MatchPayload::Text("a".into())]);
        set.insert(
            "price_range",
            vec![MatchPayload::Groups(vec!["10".into(), "20".into()])],
        );
        set.insert("email", vec![]);

        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"{"url":["a"],"price_range":[["10","20"]],"email":[]}"#);

        let back: PatternMatchSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
        assert_eq!(back.names().collect::<Vec<_>>(), ["url", "price_range", "email"]);
    }

    #[test]
    fn insert_replaces_without_reordering() {
        let mut set = PatternMatchSet::new();
        set.insert("a", vec![]);
        set.insert("b", vec![]);
        set.insert("a", vec![MatchPayload::Text("x".into())]);
        assert_eq!(set.names().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(set.count("a"), 1);
        assert_eq!(set.count("missing"), 0);
        assert_eq!(set.total_matches(), 1);
    }

    #[test]
    fn payload_accessors() {
        let groups = MatchPayload::Groups(vec![String::new(), "15".into(), "usd".into()]);
        assert_eq!(groups.primary(), "15");
        assert_eq!(groups.group(2), Some("usd"));
        let text = MatchPayload::Text("#tag".into());
        assert_eq!(text.group(0), Some("#tag"));
        assert_eq!(text.group(1), None);
    }
}
