//! Slot values as declared by the test author.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};

use crate::error::{ConverseError, Result};

/// A single slot value.
///
/// `Scalar` covers the common `{name, value}` slot. `Structured` lets a
/// test pass a fully custom slot shape (resolutions, confirmation status,
/// typed values); its `name` key is always replaced by the slot name.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotValue {
    Scalar(String),
    Structured(Map<String, Value>),
}

impl SlotValue {
    /// Render the slot as it appears under `request.intent.slots`.
    #[must_use]
    pub fn materialize(&self, name: &str) -> Value {
        match self {
            Self::Scalar(value) => {
                let mut slot = Map::new();
                slot.insert("name".to_string(), Value::String(name.to_string()));
                slot.insert("value".to_string(), Value::String(value.clone()));
                Value::Object(slot)
            }
            Self::Structured(fields) => {
                let mut slot = fields.clone();
                slot.insert("name".to_string(), Value::String(name.to_string()));
                Value::Object(slot)
            }
        }
    }
}

impl fmt::Display for SlotValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(value) => f.write_str(value),
            Self::Structured(fields) => write!(f, "{}", Value::Object(fields.clone())),
        }
    }
}

impl From<&str> for SlotValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for SlotValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<Map<String, Value>> for SlotValue {
    fn from(fields: Map<String, Value>) -> Self {
        Self::Structured(fields)
    }
}

impl TryFrom<Value> for SlotValue {
    type Error = ConverseError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(Self::Scalar(s)),
            Value::Object(fields) => Ok(Self::Structured(fields)),
            other => Err(ConverseError::Config(format!(
                "slot value must be a string or an object, got {other}"
            ))),
        }
    }
}

/// Slot values for one turn, keyed by slot name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slots(BTreeMap<String, SlotValue>);

impl Slots {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<SlotValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<SlotValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Build slots from a JSON object of strings or objects.
    pub fn from_json(value: Value) -> Result<Self> {
        let Value::Object(entries) = value else {
            return Err(ConverseError::Config(
                "slots must be a JSON object".to_string(),
            ));
        };
        let mut slots = Self::new();
        for (name, value) in entries {
            slots.insert(name, SlotValue::try_from(value)?);
        }
        Ok(slots)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SlotValue> {
        self.0.get(name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SlotValue)> {
        self.0.iter()
    }

    /// Materialize every slot for the intent payload.
    #[must_use]
    pub fn materialize(&self) -> BTreeMap<String, Value> {
        self.0
            .iter()
            .map(|(name, value)| (name.clone(), value.materialize(name)))
            .collect()
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Slots
where
    K: Into<String>,
    V: Into<SlotValue>,
{
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Slots
where
    K: Into<String>,
    V: Into<SlotValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut slots = Self::new();
        for (name, value) in iter {
            slots.insert(name, value);
        }
        slots
    }
}
