//! Whole-engine snapshots
//!
//! A snapshot is a single JSON document holding every table: schema, key
//! declarations, records with their row ids, and index buckets. Loading
//! validates the document before handing back an engine, so a bad snapshot
//! surfaces as `SnapshotCorrupt` instead of a half-built engine.

use super::table::Table;
use crate::catalog::Engine;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind as IoErrorKind;
use std::path::Path;
use tracing::info;

/// Current snapshot format version
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    format_version: u32,
    tables: Vec<&'a Table>,
}

#[derive(Deserialize)]
struct SnapshotData {
    format_version: u32,
    tables: Vec<Table>,
}

/// Serialize the full engine state
pub fn save(engine: &Engine) -> Result<Vec<u8>> {
    let snapshot = SnapshotRef {
        format_version: FORMAT_VERSION,
        tables: engine.tables().collect(),
    };
    serde_json::to_vec_pretty(&snapshot)
        .map_err(|e| Error::Internal(e.to_string()))
}

/// Rebuild an engine from bytes produced by [`save`]
pub fn load(bytes: &[u8]) -> Result<Engine> {
    let data: SnapshotData =
        serde_json::from_slice(bytes).map_err(|e| Error::SnapshotCorrupt(e.to_string()))?;

    if data.format_version != FORMAT_VERSION {
        return Err(Error::SnapshotCorrupt(format!(
            "unsupported format version {}",
            data.format_version
        )));
    }

    for table in &data.tables {
        table
            .verify()
            .map_err(|e| Error::SnapshotCorrupt(e.to_string()))?;
    }

    Engine::from_tables(data.tables).map_err(|e| Error::SnapshotCorrupt(e.to_string()))
}

/// Write a snapshot of `engine` to `path`
pub fn save_to_path(engine: &Engine, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let bytes = save(engine)?;
    std::fs::write(path, &bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "snapshot saved");
    Ok(())
}

/// Read a snapshot from `path`
///
/// A missing file yields `SnapshotNotFound`; unreadable contents yield
/// `SnapshotCorrupt`.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Engine> {
    let path = path.as_ref();
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == IoErrorKind::NotFound => {
            return Err(Error::SnapshotNotFound(path.display().to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    let engine = load(&bytes)?;
    info!(
        path = %path.display(),
        tables = engine.table_names().len(),
        "snapshot loaded"
    );
    Ok(engine)
}
