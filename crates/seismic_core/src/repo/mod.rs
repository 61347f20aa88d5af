//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define single-purpose query and mutation contracts per entity.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Every mutation runs through `run_in_transaction`: commit on success,
//!   rollback and report on any failure, never retry.
//! - Station names and hazard labels pass through `normalize_label` on write
//!   and on lookup.
//! - Repositories refuse connections whose schema is not fully migrated.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod hazard_type_repo;
pub mod observation_repo;
pub mod station_repo;
mod support;

pub use support::{normalize_label, run_in_transaction};

pub type RepoResult<T> = Result<T, RepoError>;

/// Error shared by all repositories.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap failure, constraint violations included.
    Db(DbError),
    /// No row matched the lookup a mutation depends on.
    NotFound { entity: &'static str, key: String },
    /// Label is blank after trimming.
    InvalidLabel { field: &'static str, value: String },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl RepoError {
    pub(crate) fn not_found(entity: &'static str, key: impl Display) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Whether the failure is a rejected constraint (foreign key, unique,
    /// not-null, check).
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Self::Db(DbError::Sqlite(rusqlite::Error::SqliteFailure(err, _)))
                if err.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, key } => write!(f, "{entity} not found: {key}"),
            Self::InvalidLabel { field, value } => {
                write!(f, "{field} must not be blank, got `{value}`")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
