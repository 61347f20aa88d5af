//! Per-operation session acquisition.
//!
//! A session is one SQLite connection opened for exactly one logical unit of
//! work. Callers own the returned `Connection` and release it by dropping it,
//! which happens on every exit path of the scope that opened it.

use super::{open_db, DbResult};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Opens fresh, migrated sessions against one database file.
///
/// Cheap to clone; holds no open connection itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFactory {
    db_path: PathBuf,
}

impl SessionFactory {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Opens a new session. Schema migrations run on first use of a file.
    pub fn open(&self) -> DbResult<Connection> {
        open_db(&self.db_path)
    }
}
