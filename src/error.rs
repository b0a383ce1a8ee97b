//! Error types for MiniDB
//!
//! This module defines all error types used throughout the engine. Every
//! variant belongs to exactly one [`ErrorKind`], which is what programmatic
//! callers should branch on; the `Display` text is meant for people.

use crate::catalog::DataType;
use thiserror::Error;

/// The main error type for MiniDB
#[derive(Error, Debug)]
pub enum Error {
    // ========== Lexer Errors ==========
    #[error("Lexer error: unexpected character '{0}' at position {1}")]
    UnexpectedCharacter(char, usize),

    #[error("Lexer error: invalid number '{0}' at position {1}")]
    InvalidNumber(String, usize),

    // ========== Parser Errors ==========
    #[error("Syntax error: unexpected token '{found}', expected {expected}")]
    UnexpectedToken { expected: String, found: String },

    #[error("Syntax error: unexpected end of statement, expected {0}")]
    UnexpectedEnd(String),

    #[error("Syntax error: {0}")]
    Syntax(String),

    // ========== Catalog Errors ==========
    #[error("Catalog error: table '{0}' not found")]
    TableNotFound(String),

    #[error("Catalog error: table '{0}' already exists")]
    TableAlreadyExists(String),

    // ========== Schema Errors ==========
    #[error("Schema error: column '{0}' does not exist in table '{1}'")]
    ColumnNotFound(String, String),

    #[error("Schema error: invalid type for column '{column}', expected {expected}, got {found}")]
    TypeMismatch {
        column: String,
        expected: DataType,
        found: DataType,
    },

    #[error("Schema error: {0}")]
    Schema(String),

    // ========== Constraint Errors ==========
    #[error("Constraint violation: primary key '{0}' cannot be null")]
    NullPrimaryKey(String),

    #[error("Constraint violation: duplicate entry '{value}' for key '{column}' in table '{table}'")]
    DuplicateKey {
        table: String,
        column: String,
        value: String,
    },

    // ========== Conversion Errors ==========
    #[error("Conversion error: cannot convert '{value}' to {target}")]
    Conversion { value: String, target: DataType },

    // ========== Snapshot Errors ==========
    #[error("Snapshot error: no snapshot found at '{0}'")]
    SnapshotNotFound(String),

    #[error("Snapshot error: corrupt snapshot - {0}")]
    SnapshotCorrupt(String),

    // ========== I/O Errors ==========
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    // ========== Internal Errors ==========
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification of [`Error`] values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unrecognized character in a statement
    Lex,
    /// Malformed token sequence
    Syntax,
    TableNotFound,
    TableAlreadyExists,
    /// Unknown column or type mismatch
    Schema,
    /// Null or duplicate key
    ConstraintViolation,
    /// Literal cannot be coerced to the declared column type
    Conversion,
    SnapshotNotFound,
    SnapshotCorrupt,
    Io,
    Internal,
}

impl Error {
    /// Get the taxonomy bucket this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnexpectedCharacter(..) | Error::InvalidNumber(..) => ErrorKind::Lex,
            Error::UnexpectedToken { .. } | Error::UnexpectedEnd(_) | Error::Syntax(_) => {
                ErrorKind::Syntax
            }
            Error::TableNotFound(_) => ErrorKind::TableNotFound,
            Error::TableAlreadyExists(_) => ErrorKind::TableAlreadyExists,
            Error::ColumnNotFound(..) | Error::TypeMismatch { .. } | Error::Schema(_) => {
                ErrorKind::Schema
            }
            Error::NullPrimaryKey(_) | Error::DuplicateKey { .. } => {
                ErrorKind::ConstraintViolation
            }
            Error::Conversion { .. } => ErrorKind::Conversion,
            Error::SnapshotNotFound(_) => ErrorKind::SnapshotNotFound,
            Error::SnapshotCorrupt(_) => ErrorKind::SnapshotCorrupt,
            Error::IoError(_) => ErrorKind::Io,
            Error::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Result type alias for MiniDB operations
pub type Result<T> = std::result::Result<T, Error>;
