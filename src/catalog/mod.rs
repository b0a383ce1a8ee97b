//! Catalog module
//!
//! This module contains the engine (table collection), schema definitions,
//! and data types.

pub mod engine;
pub mod schema;
pub mod types;

pub use engine::Engine;
pub use schema::{Column, Schema};
pub use types::DataType;
