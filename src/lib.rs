//! MiniDB - A minimal relational data engine written in Rust
//!
//! This library provides:
//! - SQL parsing (lexer, parser, AST) for a small single-statement dialect
//! - Typed tables with hash indexes and key constraints
//! - An engine owning named tables, with a two-table inner join
//! - Statement execution with typed results
//! - JSON snapshots of the whole engine

pub mod catalog;
pub mod config;
pub mod error;
pub mod executor;
pub mod sql;
pub mod storage;

pub use catalog::Engine;
pub use config::Config;
pub use error::{Error, ErrorKind, Result};
pub use executor::{Executor, QueryResult, SharedExecutor};
