use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

/// Deterministic identity of a [`FilterSet`], used as the cache and
/// in-flight-request key.
///
/// Two filter sets with the same non-empty entries produce the same
/// fingerprint regardless of insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn new(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A set of named scalar filters applied to a record collection.
///
/// Empty values (JSON `null` and the empty string) are excluded on insert so
/// that "no value" and "absent" fingerprint identically. Keys are held sorted,
/// making the canonical form independent of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet {
    entries: BTreeMap<String, Value>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a filter value. Null and empty-string values remove the entry
    /// instead, so a cleared input field behaves like an absent filter.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        if is_empty_value(&value) {
            self.entries.remove(&name);
        } else {
            self.entries.insert(name, value);
        }
    }

    /// Builder-style variant of [`set`](Self::set)
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn remove(&mut self, name: &str) {
        self.entries.remove(name);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// Canonical `name=value` form with JSON-serialized values, sorted by
    /// name. This is the exact byte sequence that gets fingerprinted.
    pub fn canonical_form(&self) -> String {
        self.entries
            .iter()
            .filter(|(_, value)| !is_empty_value(value))
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// SHA-256 hex digest of the canonical form
    pub fn fingerprint(&self) -> Fingerprint {
        let mut hasher = Sha256::new();
        hasher.update(self.canonical_form().as_bytes());
        Fingerprint::new(format!("{:x}", hasher.finalize()))
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
