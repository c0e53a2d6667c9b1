//! Recorded step values.
//!
//! A step's recorded value is one of three shapes: nothing recorded yet, a
//! scalar answer, or a compound record of named sub-fields (the customer issue).
//! Keeping the shapes as an explicit union lets completeness rules match on
//! them exhaustively.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Number;

static NULL: Value = Value::Null;

/// A value recorded for one workflow step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum Value {
    Null,
    Scalar(Scalar),
    Record(Record),
}

/// Non-null, non-compound answers.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Number(Number),
    Bool(bool),
    List(Vec<Value>),
}

/// Named sub-fields in insertion order.
///
/// Lookups of absent fields yield [`Value::Null`] rather than failing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Record::insert`].
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a field, replacing an existing value in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> &Value {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
            .unwrap_or(&NULL)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Value {
    pub fn text(text: impl Into<String>) -> Self {
        Value::Scalar(Scalar::Text(text.into()))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Scalar(Scalar::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::Scalar(Scalar::List(items)) => Some(items),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(flag) => Value::Scalar(Scalar::Bool(flag)),
            serde_json::Value::Number(number) => Value::Scalar(Scalar::Number(number)),
            serde_json::Value::String(text) => Value::Scalar(Scalar::Text(text)),
            serde_json::Value::Array(items) => {
                Value::Scalar(Scalar::List(items.into_iter().map(Value::from).collect()))
            }
            serde_json::Value::Object(map) => Value::Record(Record {
                fields: map
                    .into_iter()
                    .map(|(name, value)| (name, Value::from(value)))
                    .collect(),
            }),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Scalar(Scalar::Bool(flag)) => serde_json::Value::Bool(flag),
            Value::Scalar(Scalar::Number(number)) => serde_json::Value::Number(number),
            Value::Scalar(Scalar::Text(text)) => serde_json::Value::String(text),
            Value::Scalar(Scalar::List(items)) => {
                serde_json::Value::Array(items.into_iter().map(serde_json::Value::from).collect())
            }
            Value::Record(record) => serde_json::Value::Object(
                record
                    .fields
                    .into_iter()
                    .map(|(name, value)| (name, serde_json::Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::text(text)
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::text(text)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Scalar(Scalar::List(items.into_iter().map(Into::into).collect()))
    }
}

/// Human-oriented rendering used by text reports.
///
/// Lists are joined with `", "`; records fall back to compact JSON.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Scalar(Scalar::Text(text)) => f.write_str(text),
            Value::Scalar(Scalar::Number(number)) => write!(f, "{number}"),
            Value::Scalar(Scalar::Bool(flag)) => write!(f, "{flag}"),
            Value::Scalar(Scalar::List(items)) => {
                let rendered: Vec<String> = items.iter().map(ToString::to_string).collect();
                f.write_str(&rendered.join(", "))
            }
            Value::Record(_) => {
                let json = serde_json::Value::from(self.clone());
                write!(f, "{json}")
            }
        }
    }
}
