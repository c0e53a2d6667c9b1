//! Point-in-time snapshot of recorded step values.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::core::value::Value;

/// Insertion-ordered mapping of step id to recorded value.
///
/// Iteration order is the order in which keys were first inserted (or appeared
/// in the source JSON object). Status ordering falls back to this order for
/// steps the registry does not rank.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "serde_json::Map<String, serde_json::Value>")]
pub struct Snapshot {
    entries: Vec<(String, Value)>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Snapshot::insert`].
    pub fn with(mut self, step: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(step, value);
        self
    }

    /// Record a value for `step`. An existing key keeps its position.
    pub fn insert(&mut self, step: impl Into<String>, value: impl Into<Value>) {
        let step = step.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == step) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((step, value)),
        }
    }

    pub fn get(&self, step: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == step)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .map(|(step, value)| (step.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(step, _)| step.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut snapshot = Snapshot::new();
        for (step, value) in iter {
            snapshot.insert(step, value);
        }
        snapshot
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Snapshot {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter().collect()
    }
}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (step, value) in &self.entries {
            map.serialize_entry(step, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keys_keep_insertion_order() {
        let snapshot = Snapshot::new()
            .with("zeta", Value::Null)
            .with("alpha", "x")
            .with("zeta", "y");
        let keys: Vec<&str> = snapshot.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
        assert_eq!(snapshot.get("zeta").and_then(Value::as_text), Some("y"));
    }

    #[test]
    fn deserializes_from_json_object_in_document_order() {
        let snapshot: Snapshot =
            serde_json::from_value(json!({"plan": null, "issue": {"what_happened": "x"}}))
                .expect("parse");
        let keys: Vec<&str> = snapshot.keys().collect();
        assert_eq!(keys, vec!["plan", "issue"]);
        assert!(snapshot.get("issue").and_then(Value::as_record).is_some());
    }

    #[test]
    fn serializes_as_json_object() {
        let snapshot = Snapshot::new().with("plan", "p").with("team", Value::Null);
        let json = serde_json::to_value(&snapshot).expect("serialize");
        assert_eq!(json, json!({"plan": "p", "team": null}));
    }
}
