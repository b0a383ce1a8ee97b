//! Storage engine module
//!
//! This module contains the in-memory storage components:
//! - Values and records
//! - Hash indexes
//! - Tables
//! - Whole-engine snapshots

pub mod index;
pub mod snapshot;
pub mod table;
pub mod value;

pub use index::HashIndex;
pub use table::{Predicate, RowId, Table};
pub use value::{Record, Value};
