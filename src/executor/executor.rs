//! Statement Executor for MiniDB
//!
//! This module runs parsed statements against an [`Engine`] and returns
//! typed results. String rendering is only done on request, for
//! interactive callers.

use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::catalog::{Engine, Schema};
use crate::error::{Error, Result};
use crate::sql::ast::*;
use crate::sql::parser;
use crate::storage::{Predicate, Record};

/// Query result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum QueryResult {
    /// The statement was empty
    Empty,
    /// Rows returned by SELECT
    Rows {
        /// Column names, in schema order
        columns: Vec<String>,
        /// Result rows, in insertion order
        rows: Vec<Record>,
    },
    /// Status message for every other statement
    Status(String),
}

impl QueryResult {
    /// Create a result with a message
    pub fn with_message(message: impl Into<String>) -> Self {
        QueryResult::Status(message.into())
    }

    /// Returned rows, empty for non-SELECT results
    pub fn rows(&self) -> &[Record] {
        match self {
            QueryResult::Rows { rows, .. } => rows,
            _ => &[],
        }
    }

    /// Whether the statement changed engine state
    pub fn is_modification(&self) -> bool {
        matches!(self, QueryResult::Status(_))
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryResult::Empty => Ok(()),
            QueryResult::Status(message) => f.write_str(message),
            QueryResult::Rows { columns, rows } => f.write_str(&format_rows(columns, rows)),
        }
    }
}

/// Format rows as a text table
fn format_rows(columns: &[String], rows: &[Record]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| row.get(c).map_or_else(|| "NULL".to_string(), |v| v.to_string()))
                .collect()
        })
        .collect();

    // Calculate column widths
    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let separator: String = widths
        .iter()
        .map(|w| "-".repeat(*w + 2))
        .collect::<Vec<_>>()
        .join("+");
    let separator = format!("+{}+\n", separator);

    let mut output = String::new();

    // Header
    output.push_str(&separator);
    let header: String = columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!(" {:^width$} ", c, width = *w))
        .collect::<Vec<_>>()
        .join("|");
    output.push_str(&format!("|{}|\n", header));
    output.push_str(&separator);

    // Rows
    for row in &cells {
        let row_str: String = row
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!(" {:>width$} ", v, width = *w))
            .collect::<Vec<_>>()
            .join("|");
        output.push_str(&format!("|{}|\n", row_str));
    }

    if !cells.is_empty() {
        output.push_str(&separator);
    }

    output.push_str(&format!("{} row(s) returned", cells.len()));

    output
}

/// Statement executor
#[derive(Debug, Default)]
pub struct Executor {
    engine: Engine,
}

impl Executor {
    /// Create an executor over an empty engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an executor over an existing engine
    pub fn with_engine(engine: Engine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    pub fn into_engine(self) -> Engine {
        self.engine
    }

    /// Parse and execute one statement
    pub fn execute(&mut self, sql: &str) -> Result<QueryResult> {
        match parser::parse(sql)? {
            Some(stmt) => self.execute_statement(stmt),
            None => Ok(QueryResult::Empty),
        }
    }

    /// Execute one statement, rendering the outcome as text
    ///
    /// Errors come back as `Error: <message>`; an empty statement yields
    /// `None`.
    pub fn execute_to_string(&mut self, sql: &str) -> Option<String> {
        match self.execute(sql) {
            Ok(QueryResult::Empty) => None,
            Ok(result) => Some(result.to_string()),
            Err(e) => Some(format!("Error: {}", e)),
        }
    }

    /// Execute a parsed statement
    pub fn execute_statement(&mut self, stmt: Statement) -> Result<QueryResult> {
        debug!(statement = ?stmt, "executing statement");

        match stmt {
            Statement::CreateTable(s) => self.execute_create_table(s),
            Statement::CreateIndex(s) => self.execute_create_index(s),
            Statement::DropTable(name) => self.execute_drop_table(&name),
            Statement::Insert(s) => self.execute_insert(s),
            Statement::Select(s) => self.execute_select(s),
            Statement::Update(s) => self.execute_update(s),
            Statement::Delete(s) => self.execute_delete(s),
        }
    }

    fn execute_create_table(&mut self, stmt: CreateTableStatement) -> Result<QueryResult> {
        let schema = Schema::from_pairs(stmt.columns.into_iter().map(|c| (c.name, c.data_type)))?;
        let unique_keys: Vec<&str> = stmt.unique_keys.iter().map(String::as_str).collect();

        self.engine.create_table(
            &stmt.table_name,
            schema,
            stmt.primary_key.as_deref(),
            &unique_keys,
        )?;

        Ok(QueryResult::with_message(format!(
            "Table '{}' created.",
            stmt.table_name
        )))
    }

    fn execute_create_index(&mut self, stmt: CreateIndexStatement) -> Result<QueryResult> {
        self.engine
            .get_table_mut(&stmt.table_name)?
            .create_index(&stmt.column)?;

        Ok(QueryResult::with_message(format!(
            "Index on '{}'.'{}' created.",
            stmt.table_name, stmt.column
        )))
    }

    fn execute_drop_table(&mut self, table_name: &str) -> Result<QueryResult> {
        self.engine.drop_table(table_name)?;

        Ok(QueryResult::with_message(format!(
            "Table '{}' dropped.",
            table_name
        )))
    }

    fn execute_insert(&mut self, stmt: InsertStatement) -> Result<QueryResult> {
        let table = self.engine.get_table_mut(&stmt.table_name)?;

        // Values are positional: coerce each to its column's declared type
        let record = {
            let columns = table.schema().columns();
            if stmt.values.len() != columns.len() {
                return Err(Error::Schema(format!(
                    "expected {} values, got {}",
                    columns.len(),
                    stmt.values.len()
                )));
            }

            let mut record = Record::new();
            for (column, literal) in columns.iter().zip(&stmt.values) {
                record.insert(column.name.clone(), column.data_type.coerce(literal.to_value())?);
            }
            record
        };

        table.create_record(record)?;

        Ok(QueryResult::with_message("Record inserted successfully."))
    }

    fn execute_select(&mut self, stmt: SelectStatement) -> Result<QueryResult> {
        let table = self.engine.get_table(&stmt.table_name)?;
        let predicate = stmt.where_clause.as_ref().map(WhereClause::to_predicate);

        let rows = match &predicate {
            // Same rows and order as a scan, without touching unmatched records
            Some(p) if table.index(&p.column).is_some() => table.read_by_index(&p.column, &p.value)?,
            _ => table.read_records(predicate.as_ref())?,
        };

        Ok(QueryResult::Rows {
            columns: table
                .schema()
                .column_names()
                .into_iter()
                .map(String::from)
                .collect(),
            rows: rows.into_iter().cloned().collect(),
        })
    }

    fn execute_update(&mut self, stmt: UpdateStatement) -> Result<QueryResult> {
        let table = self.engine.get_table_mut(&stmt.table_name)?;
        let predicate: Option<Predicate> = stmt.where_clause.as_ref().map(WhereClause::to_predicate);

        let assignments = [(stmt.assignment.column, stmt.assignment.value.to_value())];
        let count = table.update_records(&assignments, predicate.as_ref())?;

        Ok(QueryResult::with_message(format!("Updated {} records.", count)))
    }

    fn execute_delete(&mut self, stmt: DeleteStatement) -> Result<QueryResult> {
        let table = self.engine.get_table_mut(&stmt.table_name)?;
        let predicate = stmt.where_clause.as_ref().map(WhereClause::to_predicate);

        let count = table.delete_records(predicate.as_ref())?;

        Ok(QueryResult::with_message(format!("Deleted {} records.", count)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::storage::Value;

    fn create_test_executor() -> Executor {
        let mut executor = Executor::new();
        executor
            .execute("CREATE TABLE users (id INT, name STR) PRIMARY KEY id")
            .unwrap();
        executor
            .execute("INSERT INTO users VALUES (1, 'Alice')")
            .unwrap();
        executor
            .execute("INSERT INTO users VALUES (2, 'Bob')")
            .unwrap();
        executor
    }

    fn names(result: &QueryResult) -> Vec<String> {
        result
            .rows()
            .iter()
            .map(|r| r.get("name").unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_create_table() {
        let mut executor = Executor::new();

        let result = executor
            .execute("CREATE TABLE users (id INT, name STR) PRIMARY KEY id")
            .unwrap();
        assert_eq!(result, QueryResult::Status("Table 'users' created.".to_string()));
        assert!(result.is_modification());

        let table = executor.engine().get_table("users").unwrap();
        assert_eq!(table.primary_key(), Some("id"));
        assert_eq!(table.indexed_columns(), vec!["id"]);

        let err = executor.execute("CREATE TABLE users (x INT)").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TableAlreadyExists);
    }

    #[test]
    fn test_create_table_bad_key() {
        let mut executor = Executor::new();

        let err = executor
            .execute("CREATE TABLE t (a INT) PRIMARY KEY b")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);

        let err = executor.execute("CREATE TABLE t (a INT, a STR)").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert!(!executor.engine().table_exists("t"));
    }

    #[test]
    fn test_insert_and_select() {
        let mut executor = create_test_executor();

        let result = executor.execute("SELECT * FROM users").unwrap();
        match &result {
            QueryResult::Rows { columns, rows } => {
                assert_eq!(columns, &vec!["id".to_string(), "name".to_string()]);
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[0].get("id"), Some(&Value::Integer(1)));
            }
            _ => panic!("Expected rows"),
        }
        assert!(!result.is_modification());
        assert_eq!(names(&result), vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_insert_coerces_by_position() {
        let mut executor = create_test_executor();

        executor
            .execute("INSERT INTO users VALUES ('3', 42)")
            .unwrap();
        let result = executor.execute("SELECT * FROM users WHERE id = 3").unwrap();
        assert_eq!(result.rows().len(), 1);
        assert_eq!(result.rows()[0].get("id"), Some(&Value::Integer(3)));
        assert_eq!(
            result.rows()[0].get("name"),
            Some(&Value::Text("42".to_string()))
        );
    }

    #[test]
    fn test_insert_errors() {
        let mut executor = create_test_executor();

        let err = executor
            .execute("INSERT INTO users VALUES ('abc', 'x')")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conversion);

        let err = executor.execute("INSERT INTO users VALUES (3)").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert!(err.to_string().contains("expected 2 values, got 1"));

        let err = executor
            .execute("INSERT INTO users VALUES (1, 'Again')")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConstraintViolation);

        let err = executor
            .execute("INSERT INTO nobody VALUES (1)")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TableNotFound);

        // Nothing above changed the table
        assert_eq!(executor.engine().get_table("users").unwrap().len(), 2);
    }

    #[test]
    fn test_where_uses_textual_equality() {
        let mut executor = create_test_executor();

        let result = executor.execute("SELECT * FROM users WHERE id = '2'").unwrap();
        assert_eq!(names(&result), vec!["Bob"]);

        executor
            .execute("INSERT INTO users VALUES (3, '7')")
            .unwrap();
        let result = executor.execute("SELECT * FROM users WHERE name = 7").unwrap();
        assert_eq!(result.rows().len(), 1);

        let result = executor.execute("SELECT * FROM users WHERE name = 'Zed'").unwrap();
        assert!(result.rows().is_empty());

        let err = executor
            .execute("SELECT * FROM users WHERE age = 1")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn test_update_rebuckets_index() {
        let mut executor = create_test_executor();
        executor.execute("CREATE INDEX ON users (name)").unwrap();

        let result = executor
            .execute("UPDATE users SET name = 'Charlie' WHERE id = 1")
            .unwrap();
        assert_eq!(result, QueryResult::Status("Updated 1 records.".to_string()));

        let result = executor
            .execute("SELECT * FROM users WHERE name = 'Charlie'")
            .unwrap();
        assert_eq!(result.rows().len(), 1);
        let result = executor
            .execute("SELECT * FROM users WHERE name = 'Alice'")
            .unwrap();
        assert!(result.rows().is_empty());

        executor.engine().get_table("users").unwrap().verify().unwrap();
    }

    #[test]
    fn test_update_all_and_key_conflicts() {
        let mut executor = create_test_executor();

        let result = executor.execute("UPDATE users SET name = 'Same'").unwrap();
        assert_eq!(result.to_string(), "Updated 2 records.");

        let err = executor.execute("UPDATE users SET id = 5").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConstraintViolation);

        let err = executor
            .execute("UPDATE users SET id = 2 WHERE id = 1")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConstraintViolation);

        let err = executor
            .execute("UPDATE users SET id = 'x' WHERE id = 1")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conversion);

        let err = executor.execute("UPDATE users SET age = 3").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn test_delete() {
        let mut executor = create_test_executor();

        let result = executor.execute("DELETE FROM users WHERE id = 1").unwrap();
        assert_eq!(result.to_string(), "Deleted 1 records.");
        assert_eq!(
            names(&executor.execute("SELECT * FROM users").unwrap()),
            vec!["Bob"]
        );

        // Primary key value is free again
        executor
            .execute("INSERT INTO users VALUES (1, 'Alice')")
            .unwrap();

        let result = executor.execute("DELETE FROM users").unwrap();
        assert_eq!(result.to_string(), "Deleted 2 records.");
        assert!(executor.engine().get_table("users").unwrap().is_empty());
    }

    #[test]
    fn test_drop_table() {
        let mut executor = create_test_executor();

        let result = executor.execute("DROP TABLE users").unwrap();
        assert_eq!(result.to_string(), "Table 'users' dropped.");

        let err = executor.execute("SELECT * FROM users").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TableNotFound);

        let err = executor.execute("DROP TABLE users").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TableNotFound);
    }

    #[test]
    fn test_create_index_messages() {
        let mut executor = create_test_executor();

        let result = executor.execute("CREATE INDEX ON users (name)").unwrap();
        assert_eq!(result.to_string(), "Index on 'users'.'name' created.");

        let err = executor.execute("CREATE INDEX ON users (age)").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn test_execute_to_string() {
        let mut executor = create_test_executor();

        assert_eq!(executor.execute_to_string(""), None);
        assert_eq!(executor.execute_to_string("   "), None);

        assert_eq!(
            executor.execute_to_string("SELECT * FROM nobody").unwrap(),
            "Error: Catalog error: table 'nobody' not found"
        );
        assert!(executor
            .execute_to_string("SELECT * FROM users;")
            .unwrap()
            .starts_with("Error: Lexer error"));

        let output = executor
            .execute_to_string("SELECT * FROM users WHERE id = 1")
            .unwrap();
        assert_eq!(
            output,
            "+----+-------+\n\
             | id | name  |\n\
             +----+-------+\n\
             |  1 | Alice |\n\
             +----+-------+\n\
             1 row(s) returned"
        );
    }

    #[test]
    fn test_empty_select_rendering() {
        let mut executor = create_test_executor();
        let output = executor
            .execute_to_string("SELECT * FROM users WHERE id = 9")
            .unwrap();
        assert!(output.ends_with("0 row(s) returned"));
    }
}
