//! Ordered fact tree.

use indexmap::IndexMap;
use serde::Serialize;

use crate::template::Record;

/// A fact value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FactValue {
    Text(String),
    List(Vec<String>),
    Records(Vec<Record>),
    Tree(FactTree),
}

impl FactValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FactValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FactValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_records(&self) -> Option<&[Record]> {
        match self {
            FactValue::Records(records) => Some(records),
            _ => None,
        }
    }
}

impl From<String> for FactValue {
    fn from(value: String) -> Self {
        FactValue::Text(value)
    }
}

impl From<&str> for FactValue {
    fn from(value: &str) -> Self {
        FactValue::Text(value.to_string())
    }
}

impl From<Vec<String>> for FactValue {
    fn from(value: Vec<String>) -> Self {
        FactValue::List(value)
    }
}

impl From<Vec<Record>> for FactValue {
    fn from(value: Vec<Record>) -> Self {
        FactValue::Records(value)
    }
}

impl From<FactTree> for FactValue {
    fn from(value: FactTree) -> Self {
        FactValue::Tree(value)
    }
}

/// Ordered map of fact name to value.
///
/// Keys keep insertion order, and the first value inserted under a key
/// is never replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FactTree(IndexMap<String, FactValue>);

impl FactTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless the key is taken. Returns whether the value was stored.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FactValue>) -> bool {
        match self.0.entry(key.into()) {
            indexmap::map::Entry::Occupied(_) => false,
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(value.into());
                true
            }
        }
    }

    /// Move every entry of `other` in, skipping taken keys.
    ///
    /// Returns the skipped keys.
    pub fn merge(&mut self, other: FactTree) -> Vec<String> {
        let mut skipped = Vec::new();
        for (key, value) in other.0 {
            if self.0.contains_key(&key) {
                skipped.push(key);
            } else {
                self.0.insert(key, value);
            }
        }
        skipped
    }

    pub fn get(&self, key: &str) -> Option<&FactValue> {
        self.0.get(key)
    }

    /// Shortcut for a text fact.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FactValue::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FactValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
