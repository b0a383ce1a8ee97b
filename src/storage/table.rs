//! Table storage for MiniDB
//!
//! A table owns its schema, the records in insertion order and any hash
//! indexes. Every mutating call leaves every index complete: each index
//! partitions exactly the current non-null values of its column.

use super::index::HashIndex;
use super::value::{Record, Value};
use crate::catalog::Schema;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Stable identifier of a record within its table
pub type RowId = u64;

/// Single-column equality filter
///
/// Comparison is textual: `id = '1'` matches an integer `1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub column: String,
    pub value: Value,
}

impl Predicate {
    /// Create a `column = value` predicate
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Check whether a record satisfies this predicate
    pub fn matches(&self, record: &Record) -> bool {
        record
            .get(&self.column)
            .map(|v| v.loose_eq(&self.value))
            .unwrap_or(false)
    }
}

/// A table combining schema, records and indexes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Table name
    name: String,
    /// Table schema
    schema: Schema,
    /// Primary key column, always indexed
    primary_key: Option<String>,
    /// Unique columns, always indexed
    unique_keys: Vec<String>,
    /// Records in insertion order
    rows: IndexMap<RowId, Record>,
    /// Next row id to hand out
    next_row_id: RowId,
    /// Indexes by column name
    indexes: BTreeMap<String, HashIndex>,
}

impl Table {
    /// Create a new empty table
    ///
    /// The primary key and unique keys must be schema columns; each gets an
    /// index immediately.
    pub fn new(
        name: impl Into<String>,
        schema: Schema,
        primary_key: Option<&str>,
        unique_keys: &[&str],
    ) -> Result<Self> {
        let name = name.into();

        if schema.is_empty() {
            return Err(Error::Schema(format!(
                "table '{}' must declare at least one column",
                name
            )));
        }

        let mut table = Self {
            name,
            schema,
            primary_key: None,
            unique_keys: Vec::new(),
            rows: IndexMap::new(),
            next_row_id: 1,
            indexes: BTreeMap::new(),
        };

        if let Some(pk) = primary_key {
            table.check_column(pk)?;
            table.primary_key = Some(pk.to_string());
            table.create_index(pk)?;
        }

        for &col in unique_keys {
            table.check_column(col)?;
            if !table.unique_keys.iter().any(|c| c == col) {
                table.unique_keys.push(col.to_string());
            }
            table.create_index(col)?;
        }

        Ok(table)
    }

    /// Get table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get table schema
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Get the primary key column, if declared
    pub fn primary_key(&self) -> Option<&str> {
        self.primary_key.as_deref()
    }

    /// Get the unique key columns
    pub fn unique_keys(&self) -> &[String] {
        &self.unique_keys
    }

    /// Columns that currently have an index
    pub fn indexed_columns(&self) -> Vec<&str> {
        self.indexes.keys().map(String::as_str).collect()
    }

    /// Get the index on a column
    pub fn index(&self, column: &str) -> Option<&HashIndex> {
        self.indexes.get(column)
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get a record by row id
    pub fn get(&self, id: RowId) -> Option<&Record> {
        self.rows.get(&id)
    }

    /// Iterate over `(row id, record)` in insertion order
    pub fn rows(&self) -> impl Iterator<Item = (RowId, &Record)> {
        self.rows.iter().map(|(id, r)| (*id, r))
    }

    fn check_column(&self, column: &str) -> Result<()> {
        if self.schema.has_column(column) {
            Ok(())
        } else {
            Err(Error::ColumnNotFound(column.to_string(), self.name.clone()))
        }
    }

    fn check_predicate(&self, predicate: Option<&Predicate>) -> Result<()> {
        match predicate {
            Some(p) => self.check_column(&p.column),
            None => Ok(()),
        }
    }

    /// Columns whose values must be unique (primary key first)
    fn key_columns(&self) -> impl Iterator<Item = &str> {
        self.primary_key
            .iter()
            .chain(self.unique_keys.iter())
            .map(String::as_str)
    }

    /// Every field must be a schema column with the declared type, and the
    /// primary key (if any) must be present
    fn check_fields(&self, fields: &Record) -> Result<()> {
        for (column, value) in fields.iter() {
            let col = self
                .schema
                .get_column(column)
                .ok_or_else(|| Error::ColumnNotFound(column.clone(), self.name.clone()))?;
            if value.data_type() != col.data_type {
                return Err(Error::TypeMismatch {
                    column: column.clone(),
                    expected: col.data_type,
                    found: value.data_type(),
                });
            }
        }

        if let Some(pk) = self.primary_key.as_deref() {
            if !fields.contains(pk) {
                return Err(Error::NullPrimaryKey(pk.to_string()));
            }
        }
        Ok(())
    }

    fn duplicate_key(&self, column: &str, value: &Value) -> Error {
        Error::DuplicateKey {
            table: self.name.clone(),
            column: column.to_string(),
            value: value.to_string(),
        }
    }

    /// Insert a record
    ///
    /// Every field must be a schema column holding a value of the declared
    /// type. The stored record is laid out in schema order.
    pub fn create_record(&mut self, fields: Record) -> Result<RowId> {
        self.check_fields(&fields)?;

        for column in self.key_columns() {
            if let (Some(value), Some(index)) = (fields.get(column), self.indexes.get(column)) {
                if index.contains(value) {
                    return Err(self.duplicate_key(column, value));
                }
            }
        }

        let record: Record = self
            .schema
            .columns()
            .iter()
            .filter_map(|c| fields.get(&c.name).map(|v| (c.name.clone(), v.clone())))
            .collect();

        let id = self.next_row_id;
        self.next_row_id += 1;

        for (column, index) in self.indexes.iter_mut() {
            if let Some(value) = record.get(column) {
                index.insert(value, id);
            }
        }
        self.rows.insert(id, record);

        debug!(table = %self.name, row_id = id, "record inserted");
        Ok(id)
    }

    /// Create (or rebuild) a hash index on a column
    pub fn create_index(&mut self, column: &str) -> Result<()> {
        self.check_column(column)?;

        let index = HashIndex::build(column, self.rows());
        debug!(
            table = %self.name,
            column,
            keys = index.key_count(),
            "index built"
        );
        self.indexes.insert(column.to_string(), index);
        Ok(())
    }

    /// Read records in insertion order, optionally filtered
    pub fn read_records(&self, predicate: Option<&Predicate>) -> Result<Vec<&Record>> {
        self.check_predicate(predicate)?;

        Ok(self
            .rows
            .values()
            .filter(|r| predicate.map_or(true, |p| p.matches(r)))
            .collect())
    }

    /// Look up records where `column` equals `value`
    ///
    /// Uses the column's index when one exists, otherwise falls back to a
    /// linear scan with the same equality semantics.
    pub fn read_by_index(&self, column: &str, value: &Value) -> Result<Vec<&Record>> {
        self.check_column(column)?;

        match self.indexes.get(column) {
            Some(index) => Ok(index
                .get(value)
                .iter()
                .filter_map(|id| self.rows.get(id))
                .collect()),
            None => {
                warn!(
                    table = %self.name,
                    column,
                    rows = self.rows.len(),
                    "no index on column, falling back to full scan"
                );
                let predicate = Predicate::eq(column, value.clone());
                self.read_records(Some(&predicate))
            }
        }
    }

    /// Update matching records (all records when `predicate` is `None`)
    ///
    /// Assigned values are coerced to the column type. Each touched record
    /// is replaced as a whole and re-bucketed in every index whose key
    /// changed. Validation happens before any record is modified, so a
    /// failed update leaves the table untouched. Returns the number of
    /// records touched.
    pub fn update_records(
        &mut self,
        assignments: &[(String, Value)],
        predicate: Option<&Predicate>,
    ) -> Result<usize> {
        self.check_predicate(predicate)?;

        let mut coerced = Vec::with_capacity(assignments.len());
        for (column, value) in assignments {
            let col = self
                .schema
                .get_column(column)
                .ok_or_else(|| Error::ColumnNotFound(column.clone(), self.name.clone()))?;
            coerced.push((column.clone(), col.data_type.coerce(value.clone())?));
        }

        let targets: Vec<RowId> = self
            .rows
            .iter()
            .filter(|(_, r)| predicate.map_or(true, |p| p.matches(r)))
            .map(|(id, _)| *id)
            .collect();

        for key in self.key_columns() {
            // Last assignment to a column wins
            let Some((_, value)) = coerced.iter().rev().find(|(c, _)| c == key) else {
                continue;
            };
            if targets.len() > 1 {
                return Err(self.duplicate_key(key, value));
            }
            if let Some(index) = self.indexes.get(key) {
                if index.get(value).iter().any(|id| !targets.contains(id)) {
                    return Err(self.duplicate_key(key, value));
                }
            }
        }

        for &id in &targets {
            let Some(old) = self.rows.get(&id) else {
                continue;
            };
            let mut new = old.clone();
            for (column, value) in &coerced {
                new.insert(column.clone(), value.clone());
            }

            for (column, index) in self.indexes.iter_mut() {
                let (before, after) = (old.get(column), new.get(column));
                if before != after {
                    if let Some(v) = before {
                        index.remove(v, id);
                    }
                    if let Some(v) = after {
                        index.insert(v, id);
                    }
                }
            }
            self.rows.insert(id, new);
        }

        debug!(table = %self.name, count = targets.len(), "records updated");
        Ok(targets.len())
    }

    /// Delete matching records (all records when `predicate` is `None`)
    ///
    /// Every index is rebuilt from the remaining records. Returns the
    /// number of records removed.
    pub fn delete_records(&mut self, predicate: Option<&Predicate>) -> Result<usize> {
        self.check_predicate(predicate)?;

        let before = self.rows.len();
        match predicate {
            Some(p) => self.rows.retain(|_, r| !p.matches(r)),
            None => self.rows.clear(),
        }
        let removed = before - self.rows.len();

        let columns: Vec<String> = self.indexes.keys().cloned().collect();
        for column in columns {
            let index = HashIndex::build(&column, self.rows());
            self.indexes.insert(column, index);
        }

        debug!(table = %self.name, count = removed, "records deleted");
        Ok(removed)
    }

    /// Check internal consistency
    ///
    /// Every record must satisfy the schema and carry its primary key, every
    /// row id must be below the id counter, key columns must be indexed with
    /// at most one row per key, and every index must equal a rebuild from
    /// the current records.
    pub fn verify(&self) -> Result<()> {
        if let Some(id) = self.rows.keys().find(|&&id| id >= self.next_row_id) {
            return Err(Error::Schema(format!(
                "row id {} of table '{}' is out of range",
                id, self.name
            )));
        }

        for record in self.rows.values() {
            self.check_fields(record)?;
        }

        for column in self.key_columns() {
            if !self.indexes.contains_key(column) {
                return Err(Error::Schema(format!(
                    "key column '{}' of table '{}' has no index",
                    column, self.name
                )));
            }
        }

        for (column, index) in &self.indexes {
            self.check_column(column)?;
            if *index != HashIndex::build(column, self.rows()) {
                return Err(Error::Schema(format!(
                    "index on '{}'.'{}' does not match its records",
                    self.name, column
                )));
            }
        }

        for column in self.key_columns() {
            let duplicate = self
                .indexes
                .get(column)
                .and_then(|index| index.buckets().find(|(_, ids)| ids.len() > 1));
            if let Some((key, _)) = duplicate {
                return Err(Error::DuplicateKey {
                    table: self.name.clone(),
                    column: column.to_string(),
                    value: key.to_string(),
                });
            }
        }
        Ok(())
    }
}
