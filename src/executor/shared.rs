//! Shared executor handle
//!
//! The engine itself does no locking. `SharedExecutor` puts one executor
//! behind a single mutex so several threads can issue statements; each
//! statement runs with exclusive access.

use std::sync::{Arc, Mutex, MutexGuard};

use super::{Executor, QueryResult};
use crate::catalog::Engine;
use crate::error::{Error, Result};

/// Cloneable, thread-safe handle to one [`Executor`]
#[derive(Debug, Clone, Default)]
pub struct SharedExecutor {
    inner: Arc<Mutex<Executor>>,
}

impl SharedExecutor {
    pub fn new(executor: Executor) -> Self {
        Self {
            inner: Arc::new(Mutex::new(executor)),
        }
    }

    /// Execute one statement under the lock
    pub fn execute(&self, sql: &str) -> Result<QueryResult> {
        self.lock()?.execute(sql)
    }

    /// Execute one statement under the lock, rendering the outcome as text
    pub fn execute_to_string(&self, sql: &str) -> Result<Option<String>> {
        Ok(self.lock()?.execute_to_string(sql))
    }

    /// Run a read-only closure against the engine
    pub fn with_engine<R>(&self, f: impl FnOnce(&Engine) -> R) -> Result<R> {
        Ok(f(self.lock()?.engine()))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Executor>> {
        self.inner
            .lock()
            .map_err(|_| Error::Internal("executor lock poisoned".to_string()))
    }
}
