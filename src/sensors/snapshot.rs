//! Raw sensor values and per-tick snapshots.

#![allow(missing_docs)]

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::sensors::registry::FieldId;

/// Text shown (and exported) for values that do not apply in the current mode.
pub const NOT_APPLICABLE: &str = "N/A";

/// A single sensor reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Integer(i64),
    Text(String),
    /// Sentinel substituted by normalization.
    NotApplicable,
}

impl Value {
    /// Interpret sysfs file contents: surrounding whitespace is dropped and
    /// integer-looking text becomes [`Value::Integer`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        trimmed
            .parse::<i64>()
            .map_or_else(|_| Self::Text(trimmed.to_string()), Self::Integer)
    }

    /// Integer view, accepting integer-looking text.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            Self::NotApplicable => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_not_applicable(&self) -> bool {
        matches!(self, Self::NotApplicable)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::NotApplicable => f.write_str(NOT_APPLICABLE),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Integer(n) => serializer.serialize_i64(*n),
            Self::Text(s) => serializer.serialize_str(s),
            Self::NotApplicable => serializer.serialize_str(NOT_APPLICABLE),
        }
    }
}

/// Field values captured in one poll, ordered by [`FieldId`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    values: BTreeMap<FieldId, Value>,
}

impl Snapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: FieldId, value: impl Into<Value>) {
        self.values.insert(id, value.into());
    }

    #[must_use]
    pub fn with(mut self, id: FieldId, value: impl Into<Value>) -> Self {
        self.insert(id, value);
        self
    }

    #[must_use]
    pub fn get(&self, id: FieldId) -> Option<&Value> {
        self.values.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &Value)> {
        self.values.iter().map(|(id, value)| (*id, value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(FieldId, Value)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (FieldId, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (id, value) in &self.values {
            map.serialize_entry(id.key(), value)?;
        }
        map.end()
    }
}
