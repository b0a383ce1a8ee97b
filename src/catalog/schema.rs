//! Schema definitions for MiniDB
//!
//! A schema is the ordered column declaration of a table. It is fixed once
//! the table exists.

use super::types::DataType;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Column definition in a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Data type
    pub data_type: DataType,
    /// Column position (0-indexed)
    pub position: usize,
}

impl Column {
    /// Create a new column
    pub fn new(name: impl Into<String>, data_type: DataType, position: usize) -> Self {
        Self {
            name: name.into(),
            data_type,
            position,
        }
    }
}

/// Table schema - defines the structure of a table
///
/// Serialized as the bare column list; the name lookup is rebuilt on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Column>", into = "Vec<Column>")]
pub struct Schema {
    /// Ordered list of columns
    columns: Vec<Column>,
    /// Column name to index mapping
    name_to_index: HashMap<String, usize>,
}

impl Schema {
    /// Create a new empty schema
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            name_to_index: HashMap::new(),
        }
    }

    /// Create a schema from `(name, type)` pairs, rejecting duplicate names
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, DataType)>,
        S: Into<String>,
    {
        let mut schema = Self::new();
        for (name, data_type) in pairs {
            let name = name.into();
            if schema.has_column(&name) {
                return Err(Error::Schema(format!("duplicate column '{}'", name)));
            }
            schema.add_column(Column::new(name, data_type, 0));
        }
        Ok(schema)
    }

    fn add_column(&mut self, mut column: Column) {
        column.position = self.columns.len();
        self.name_to_index
            .insert(column.name.clone(), column.position);
        self.columns.push(column);
    }

    /// Get column by name
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.name_to_index.get(name).map(|&idx| &self.columns[idx])
    }

    /// Get all columns
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Get number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Check if column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.name_to_index.contains_key(name)
    }

    /// Get column names in declaration order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

impl TryFrom<Vec<Column>> for Schema {
    type Error = Error;

    fn try_from(columns: Vec<Column>) -> Result<Self> {
        Self::from_pairs(columns.into_iter().map(|c| (c.name, c.data_type)))
    }
}

impl From<Schema> for Vec<Column> {
    fn from(schema: Schema) -> Self {
        schema.columns
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_creation() {
        let schema = Schema::from_pairs([
            ("id", DataType::Integer),
            ("name", DataType::Text),
            ("email", DataType::Text),
        ])
        .unwrap();

        assert_eq!(schema.column_count(), 3);
        assert!(schema.has_column("id"));
        assert!(!schema.has_column("unknown"));
        assert_eq!(schema.column_names(), vec!["id", "name", "email"]);

        let email = schema.get_column("email").unwrap();
        assert_eq!(email.position, 2);
        assert_eq!(email.data_type, DataType::Text);
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let result = Schema::from_pairs([("id", DataType::Integer), ("id", DataType::Text)]);
        assert!(matches!(result, Err(Error::Schema(_))));
    }

    #[test]
    fn test_lookup_survives_serde() {
        let schema = Schema::from_pairs([("a", DataType::Integer), ("b", DataType::Text)]).unwrap();
        let json = serde_json::to_string(&schema).unwrap();
        let restored: Schema = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, schema);
        assert_eq!(restored.get_column("b").unwrap().position, 1);
    }
}
