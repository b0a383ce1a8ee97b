//! SQL Abstract Syntax Tree (AST)
//!
//! This module defines the AST nodes for MiniDB statements.

use crate::catalog::DataType;
use crate::storage::{Predicate, Value};

/// A SQL statement
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// CREATE TABLE statement
    CreateTable(CreateTableStatement),
    /// CREATE INDEX statement
    CreateIndex(CreateIndexStatement),
    /// DROP TABLE statement
    DropTable(String),
    /// INSERT statement
    Insert(InsertStatement),
    /// SELECT statement
    Select(SelectStatement),
    /// UPDATE statement
    Update(UpdateStatement),
    /// DELETE statement
    Delete(DeleteStatement),
}

/// CREATE TABLE statement
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableStatement {
    /// Table name
    pub table_name: String,
    /// Column definitions
    pub columns: Vec<ColumnDef>,
    /// PRIMARY KEY column
    pub primary_key: Option<String>,
    /// UNIQUE columns
    pub unique_keys: Vec<String>,
}

/// Column definition
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    /// Column name
    pub name: String,
    /// Data type
    pub data_type: DataType,
}

/// CREATE INDEX ON table (column)
#[derive(Debug, Clone, PartialEq)]
pub struct CreateIndexStatement {
    pub table_name: String,
    pub column: String,
}

/// INSERT statement
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    /// Target table name
    pub table_name: String,
    /// Positional values, one per schema column
    pub values: Vec<Literal>,
}

/// SELECT * statement
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    /// Source table name
    pub table_name: String,
    /// WHERE clause
    pub where_clause: Option<WhereClause>,
}

/// UPDATE statement
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    /// Target table name
    pub table_name: String,
    /// SET clause
    pub assignment: Assignment,
    /// WHERE clause
    pub where_clause: Option<WhereClause>,
}

/// Column assignment (for UPDATE)
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Column name
    pub column: String,
    /// New value
    pub value: Literal,
}

/// DELETE statement
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
    /// Target table name
    pub table_name: String,
    /// WHERE clause
    pub where_clause: Option<WhereClause>,
}

/// `WHERE <column> = <literal>`
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    pub column: String,
    pub value: Literal,
}

impl WhereClause {
    /// Convert to a storage predicate
    pub fn to_predicate(&self) -> Predicate {
        Predicate::eq(self.column.clone(), self.value.to_value())
    }
}

/// Literal value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// Integer
    Integer(i64),
    /// String
    String(String),
}

impl Literal {
    /// Convert to an untyped storage value
    pub fn to_value(&self) -> Value {
        match self {
            Literal::Integer(n) => Value::Integer(*n),
            Literal::String(s) => Value::Text(s.clone()),
        }
    }
}
