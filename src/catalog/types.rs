//! Data types for MiniDB
//!
//! This module defines the column types supported by the engine and the
//! coercion rules applied when a literal is stored into a typed column.

use crate::error::{Error, Result};
use crate::storage::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column data types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// 64-bit signed integer (`INT`)
    Integer,
    /// Unbounded text (`STR`)
    Text,
}

impl DataType {
    /// Coerce a value to this type
    ///
    /// Integers render to text in decimal; text parses to an integer or
    /// fails with a conversion error.
    pub fn coerce(&self, value: Value) -> Result<Value> {
        match (self, value) {
            (DataType::Integer, Value::Integer(n)) => Ok(Value::Integer(n)),
            (DataType::Integer, Value::Text(s)) => {
                s.parse::<i64>()
                    .map(Value::Integer)
                    .map_err(|_| Error::Conversion {
                        value: s,
                        target: DataType::Integer,
                    })
            }
            (DataType::Text, Value::Text(s)) => Ok(Value::Text(s)),
            (DataType::Text, Value::Integer(n)) => Ok(Value::Text(n.to_string())),
        }
    }

    /// SQL keyword spelling of this type
    pub fn sql_name(&self) -> &'static str {
        match self {
            DataType::Integer => "INT",
            DataType::Text => "STR",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Integer => write!(f, "INTEGER"),
            DataType::Text => write!(f, "TEXT"),
        }
    }
}
