//! Hash index for MiniDB tables
//!
//! Maps a column's value key to the row ids holding that value. Buckets stay
//! sorted by row id, which is also insertion order, so an index lookup
//! returns rows in the same order as a full scan would.

use super::table::RowId;
use super::value::{Record, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Single-column hash index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashIndex {
    buckets: HashMap<String, Vec<RowId>>,
}

impl HashIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index over `column` from existing rows
    pub fn build<'a, I>(column: &str, rows: I) -> Self
    where
        I: IntoIterator<Item = (RowId, &'a Record)>,
    {
        let mut index = Self::new();
        for (id, record) in rows {
            if let Some(value) = record.get(column) {
                index.insert(value, id);
            }
        }
        index
    }

    /// Add a row id under `value`
    pub fn insert(&mut self, value: &Value, id: RowId) {
        let bucket = self.buckets.entry(value.key()).or_default();
        if let Err(pos) = bucket.binary_search(&id) {
            bucket.insert(pos, id);
        }
    }

    /// Remove a row id from the bucket of `value`
    pub fn remove(&mut self, value: &Value, id: RowId) {
        let key = value.key();
        if let Some(bucket) = self.buckets.get_mut(&key) {
            if let Ok(pos) = bucket.binary_search(&id) {
                bucket.remove(pos);
            }
            if bucket.is_empty() {
                self.buckets.remove(&key);
            }
        }
    }

    /// Row ids stored under `value`, in insertion order
    pub fn get(&self, value: &Value) -> &[RowId] {
        self.buckets
            .get(&value.key())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Check whether any row holds `value`
    pub fn contains(&self, value: &Value) -> bool {
        !self.get(value).is_empty()
    }

    /// Number of distinct keys
    pub fn key_count(&self) -> usize {
        self.buckets.len()
    }

    /// Total number of row references across all buckets
    pub fn entry_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Iterate over `(key, row ids)` buckets in arbitrary order
    pub fn buckets(&self) -> impl Iterator<Item = (&str, &[RowId])> {
        self.buckets
            .iter()
            .map(|(k, ids)| (k.as_str(), ids.as_slice()))
    }
}
