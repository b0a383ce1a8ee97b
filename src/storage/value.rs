//! Value and Record types for MiniDB
//!
//! This module defines how data values are represented in memory.

use crate::catalog::DataType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A value in the database
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
    /// Integer value (64-bit)
    Integer(i64),
    /// Text value
    Text(String),
}

impl Value {
    /// Get the data type tag of this value
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Integer(_) => DataType::Integer,
            Value::Text(_) => DataType::Text,
        }
    }

    /// Textual key used for equality in predicates, indexes and joins
    ///
    /// `Integer(1)` and `Text("1")` share the key `"1"`.
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// Loose equality: compares the textual renderings of both values
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => self.key() == other.key(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n as i64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// A row: ordered mapping of column name to value
///
/// A column missing from the record is null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, Value>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    /// Set a field, returning the previous value if any
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(column.into(), value.into())
    }

    /// Get a field by column name
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }

    /// Iterate over `(column, value)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Column names in order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (col, val)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match val {
                Value::Integer(n) => write!(f, "{}: {}", col, n)?,
                Value::Text(s) => write!(f, "{}: '{}'", col, s)?,
            }
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loose_equality() {
        assert!(Value::Integer(1).loose_eq(&Value::Text("1".into())));
        assert!(Value::Text("abc".into()).loose_eq(&Value::Text("abc".into())));
        assert!(!Value::Integer(1).loose_eq(&Value::Text("01".into())));
        assert!(!Value::Integer(1).loose_eq(&Value::Integer(2)));
        assert_eq!(Value::Integer(-3).key(), "-3");
    }

    #[test]
    fn test_record_builder() {
        let record = Record::new().with("id", 1).with("name", "Alice");

        assert_eq!(record.len(), 2);
        assert_eq!(record.get("id"), Some(&Value::Integer(1)));
        assert_eq!(record.get("name").and_then(Value::as_str), Some("Alice"));
        assert!(record.get("email").is_none());
        assert_eq!(record.columns().collect::<Vec<_>>(), vec!["id", "name"]);
        assert_eq!(record.to_string(), "{id: 1, name: 'Alice'}");
    }

    #[test]
    fn test_record_overwrite_keeps_position() {
        let mut record = Record::new().with("a", 1).with("b", 2);
        let old = record.insert("a", 10);

        assert_eq!(old, Some(Value::Integer(1)));
        assert_eq!(record.columns().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
