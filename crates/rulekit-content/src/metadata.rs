//! Ordered metadata header

use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;

pub use serde_yaml::Value;

use crate::error::{Error, ParseErrorKind, Result};

/// Metadata header of a rule document.
///
/// An ordered key/value mapping. Keys keep insertion order, so marshaling the
/// same in-memory value twice yields the same bytes. Comments and original
/// formatting of a parsed header are not retained: re-encoding normalizes
/// them. Equality compares key/value pairs and ignores order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata {
    entries: Mapping,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build metadata from a decoded YAML value.
    ///
    /// `null` (an empty header) yields empty metadata; anything other than a
    /// mapping is rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Mapping(entries) => Ok(Self { entries }),
            Value::Tagged(tagged) => Self::from_value(tagged.value),
            other => Err(Error::parse(
                ParseErrorKind::InvalidMetadata,
                format!("header must be a key/value mapping, found {}", kind_name(&other)),
            )),
        }
    }

    /// Decode a YAML header text.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(text)
            .map_err(|e| Error::parse(ParseErrorKind::InvalidMetadata, e.to_string()))?;
        Self::from_value(value)
    }

    /// Encode as YAML text (trailing newline included).
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.entries).map_err(Error::Encode)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// The value at `key` if it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or replace a value; a new key goes to the end.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(Value::String(key.into()), value.into())
    }

    /// Remove a key, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// String keys in order. Non-string keys are skipped.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().filter_map(Value::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter()
    }

    pub fn description(&self) -> Option<&str> {
        self.get_str("description")
    }

    pub fn into_value(self) -> Value {
        Value::Mapping(self.entries)
    }
}

impl PartialEq for Metadata {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .all(|(key, value)| other.entries.get(key) == Some(value))
    }
}

impl From<Mapping> for Metadata {
    fn from(entries: Mapping) -> Self {
        Self { entries }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut metadata = Self::new();
        for (key, value) in iter {
            metadata.insert(key, value);
        }
        metadata
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
