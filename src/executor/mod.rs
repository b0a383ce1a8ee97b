//! Statement execution module
//!
//! This module contains the statement executor and its shared handle.

pub mod executor;
pub mod shared;

pub use executor::{Executor, QueryResult};
pub use shared::SharedExecutor;
