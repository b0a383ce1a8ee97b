//! Engine for MiniDB
//!
//! The engine owns every table by name and implements the two-table inner
//! join. It performs no locking; callers that share an engine across threads
//! must serialize access themselves.

use super::schema::Schema;
use crate::error::{Error, Result};
use crate::storage::{HashIndex, Record, Table};
use indexmap::IndexMap;
use tracing::{debug, warn};

/// Collection of named tables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Engine {
    /// Tables by name, in creation order
    tables: IndexMap<String, Table>,
}

impl Engine {
    /// Create a new empty engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild an engine from already-validated tables
    pub(crate) fn from_tables(tables: impl IntoIterator<Item = Table>) -> Result<Self> {
        let mut engine = Self::new();
        for table in tables {
            let name = table.name().to_string();
            if engine.tables.contains_key(&name) {
                return Err(Error::TableAlreadyExists(name));
            }
            engine.tables.insert(name, table);
        }
        Ok(engine)
    }

    /// Create a new table
    pub fn create_table(
        &mut self,
        name: &str,
        schema: Schema,
        primary_key: Option<&str>,
        unique_keys: &[&str],
    ) -> Result<&mut Table> {
        if self.tables.contains_key(name) {
            return Err(Error::TableAlreadyExists(name.to_string()));
        }

        let table = Table::new(name, schema, primary_key, unique_keys)?;
        debug!(table = name, primary_key = ?primary_key, "table created");

        Ok(self.tables.entry(name.to_string()).or_insert(table))
    }

    /// Get a table by name
    pub fn get_table(&self, name: &str) -> Result<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| Error::TableNotFound(name.to_string()))
    }

    /// Get a table by name for mutation
    pub fn get_table_mut(&mut self, name: &str) -> Result<&mut Table> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| Error::TableNotFound(name.to_string()))
    }

    /// Check if a table exists
    pub fn table_exists(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Drop a table, returning it
    pub fn drop_table(&mut self, name: &str) -> Result<Table> {
        let table = self
            .tables
            .shift_remove(name)
            .ok_or_else(|| Error::TableNotFound(name.to_string()))?;
        debug!(table = name, rows = table.len(), "table dropped");
        Ok(table)
    }

    /// List all table names in creation order
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }

    /// Iterate over all tables in creation order
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    /// Inner join `left` and `right` on `left.left_on = right.right_on`
    ///
    /// Left rows are scanned in order and looked up in the right table's
    /// index on `right_on`. Without one, a temporary index is built for the
    /// duration of the join. Output columns are `<table>.<column>`, left
    /// columns first; in a self join the right side is prefixed
    /// `<table>#2.` instead. Rows without a partner, or with a null key,
    /// produce nothing.
    pub fn inner_join(
        &self,
        left: &str,
        right: &str,
        left_on: &str,
        right_on: &str,
    ) -> Result<Vec<Record>> {
        let left_table = self.get_table(left)?;
        let right_table = self.get_table(right)?;

        if !left_table.schema().has_column(left_on) {
            return Err(Error::ColumnNotFound(left_on.to_string(), left.to_string()));
        }
        if !right_table.schema().has_column(right_on) {
            return Err(Error::ColumnNotFound(
                right_on.to_string(),
                right.to_string(),
            ));
        }

        let scratch;
        let index = match right_table.index(right_on) {
            Some(index) => index,
            None => {
                warn!(
                    table = right,
                    column = right_on,
                    rows = right_table.len(),
                    "no index on join column, building a temporary one"
                );
                scratch = HashIndex::build(right_on, right_table.rows());
                &scratch
            }
        };

        let right_prefix = if left == right {
            format!("{}#2", right)
        } else {
            right.to_string()
        };

        let mut joined = Vec::new();
        for left_row in left_table.read_records(None)? {
            let Some(key) = left_row.get(left_on) else {
                continue;
            };
            for right_row in index.get(key).iter().filter_map(|id| right_table.get(*id)) {
                joined.push(merge_rows(left, left_row, &right_prefix, right_row));
            }
        }

        debug!(left, right, rows = joined.len(), "inner join");
        Ok(joined)
    }
}

/// Combine two rows, prefixing every column with its side's prefix
fn merge_rows(left: &str, left_row: &Record, right: &str, right_row: &Record) -> Record {
    let prefixed = |prefix: &str, row: &Record| {
        row.iter()
            .map(|(col, val)| (format!("{}.{}", prefix, col), val.clone()))
            .collect::<Vec<_>>()
    };

    prefixed(left, left_row)
        .into_iter()
        .chain(prefixed(right, right_row))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DataType;
    use crate::storage::Value;

    fn schema(pairs: &[(&str, DataType)]) -> Schema {
        Schema::from_pairs(pairs.iter().map(|(n, t)| (*n, *t))).unwrap()
    }

    #[test]
    fn test_create_and_get_table() {
        let mut engine = Engine::new();
        engine
            .create_table(
                "users",
                schema(&[("id", DataType::Integer), ("name", DataType::Text)]),
                Some("id"),
                &[],
            )
            .unwrap();

        let table = engine.get_table("users").unwrap();
        assert_eq!(table.name(), "users");
        assert_eq!(table.schema().column_count(), 2);
        assert_eq!(engine.table_names(), vec!["users"]);
    }

    #[test]
    fn test_table_already_exists() {
        let mut engine = Engine::new();
        let s = schema(&[("id", DataType::Integer)]);
        engine.create_table("test", s.clone(), None, &[]).unwrap();

        let result = engine.create_table("test", s, None, &[]);
        assert!(matches!(result, Err(Error::TableAlreadyExists(_))));
    }

    #[test]
    fn test_primary_key_must_be_declared() {
        let mut engine = Engine::new();
        let result = engine.create_table(
            "test",
            schema(&[("id", DataType::Integer)]),
            Some("uid"),
            &[],
        );
        assert!(matches!(result, Err(Error::ColumnNotFound(..))));
        assert!(!engine.table_exists("test"));
    }

    #[test]
    fn test_drop_table() {
        let mut engine = Engine::new();
        engine
            .create_table("test", schema(&[("id", DataType::Integer)]), None, &[])
            .unwrap();
        assert!(engine.table_exists("test"));

        engine.drop_table("test").unwrap();
        assert!(!engine.table_exists("test"));
        assert!(matches!(
            engine.drop_table("test"),
            Err(Error::TableNotFound(_))
        ));
        assert!(matches!(
            engine.get_table("test"),
            Err(Error::TableNotFound(_))
        ));
    }

    fn join_fixture(index_right: bool) -> Engine {
        let mut engine = Engine::new();

        let a = engine
            .create_table(
                "a",
                schema(&[("k", DataType::Integer), ("v", DataType::Text)]),
                None,
                &[],
            )
            .unwrap();
        a.create_record(Record::new().with("k", 1).with("v", "x")).unwrap();
        a.create_record(Record::new().with("k", 2).with("v", "y")).unwrap();

        let b = engine
            .create_table(
                "b",
                schema(&[("k", DataType::Integer), ("w", DataType::Text)]),
                None,
                &[],
            )
            .unwrap();
        if index_right {
            b.create_index("k").unwrap();
        }
        b.create_record(Record::new().with("k", 1).with("w", "p")).unwrap();
        b.create_record(Record::new().with("k", 1).with("w", "q")).unwrap();
        b.create_record(Record::new().with("k", 3).with("w", "r")).unwrap();

        engine
    }

    #[test]
    fn test_inner_join() {
        for index_right in [false, true] {
            let engine = join_fixture(index_right);
            let rows = engine.inner_join("a", "b", "k", "k").unwrap();

            assert_eq!(rows.len(), 2);
            assert_eq!(
                rows[0],
                Record::new()
                    .with("a.k", 1)
                    .with("a.v", "x")
                    .with("b.k", 1)
                    .with("b.w", "p")
            );
            assert_eq!(rows[1].get("b.w"), Some(&Value::from("q")));
            assert!(rows.iter().all(|r| r.get("a.k") == Some(&Value::Integer(1))));
            assert_eq!(
                rows[0].columns().collect::<Vec<_>>(),
                vec!["a.k", "a.v", "b.k", "b.w"]
            );
        }
    }

    #[test]
    fn test_inner_join_errors() {
        let engine = join_fixture(false);
        assert!(matches!(
            engine.inner_join("a", "missing", "k", "k"),
            Err(Error::TableNotFound(_))
        ));
        assert!(matches!(
            engine.inner_join("a", "b", "k", "zzz"),
            Err(Error::ColumnNotFound(..))
        ));
    }

    #[test]
    fn test_self_join() {
        for index_right in [false, true] {
            let engine = join_fixture(index_right);
            let rows = engine.inner_join("b", "b", "k", "k").unwrap();
            // k=1 pairs 2x2, k=3 pairs with itself
            assert_eq!(rows.len(), 5);

            for row in &rows {
                assert_eq!(
                    row.columns().collect::<Vec<_>>(),
                    vec!["b.k", "b.w", "b#2.k", "b#2.w"]
                );
            }
            let pairs: Vec<(String, String)> = rows
                .iter()
                .map(|r| (r.get("b.w").unwrap().to_string(), r.get("b#2.w").unwrap().to_string()))
                .collect();
            let expected = [("p", "p"), ("p", "q"), ("q", "p"), ("q", "q"), ("r", "r")];
            assert_eq!(
                pairs,
                expected
                    .iter()
                    .map(|(l, r)| (l.to_string(), r.to_string()))
                    .collect::<Vec<_>>()
            );
        }
    }

    #[test]
    fn test_unindexed_join_leaves_table_untouched() {
        let engine = join_fixture(false);
        let before = engine.get_table("b").unwrap().clone();

        engine.inner_join("a", "b", "k", "k").unwrap();

        let after = engine.get_table("b").unwrap();
        assert!(after.indexed_columns().is_empty());
        assert_eq!(after, &before);
    }
}
