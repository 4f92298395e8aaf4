//! Introspection metadata accumulated alongside the rule chain.
//!
//! A [`Descriptor`] is never consulted during validation. Modifiers record
//! the fact equivalent to each rule they push, so documentation generators
//! can read the constraints back out.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

/// Flat metadata map that always carries `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Descriptor(Map<String, Json>);

impl Descriptor {
    /// Create a descriptor for the given base type.
    pub fn new(type_name: &str) -> Self {
        let mut map = Map::new();
        map.insert("type".to_string(), Json::from(type_name));
        Self(map)
    }

    /// Shallow merge: fragment keys overwrite existing keys.
    pub fn merge(&mut self, fragment: impl IntoIterator<Item = (String, Json)>) {
        self.0.extend(fragment);
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Json>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Json> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// The recorded `type`.
    pub fn type_name(&self) -> Option<&str> {
        self.0.get("type").and_then(Json::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Json> {
        &self.0
    }

    pub fn into_json(self) -> Json {
        Json::Object(self.0)
    }
}

impl IntoIterator for Descriptor {
    type Item = (String, Json);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl From<Descriptor> for Json {
    fn from(descriptor: Descriptor) -> Self {
        descriptor.into_json()
    }
}

/// Build a descriptor fragment from `(key, value)` pairs.
pub(crate) fn fragment<const N: usize>(entries: [(&str, Json); N]) -> Vec<(String, Json)> {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}
