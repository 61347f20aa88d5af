//! Hazard type repository contract and SQLite implementation.
//!
//! # Invariants
//! - Labels are stored normalized in column `type`.

use super::support::{ensure_connection_ready, normalize_label, require_label, run_in_transaction};
use super::RepoResult;
use crate::model::hazard_type::{HazardType, HazardTypeId};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Repository interface for hazard classifications.
pub trait HazardTypeRepository {
    /// Inserts one hazard type and returns its generated id.
    fn add_hazard_type(&self, label: &str) -> RepoResult<HazardTypeId>;
    fn get_hazard_type(&self, id: HazardTypeId) -> RepoResult<Option<HazardType>>;
    fn get_hazard_type_by_label(&self, label: &str) -> RepoResult<Option<HazardType>>;
    fn list_hazard_types(&self) -> RepoResult<Vec<HazardType>>;
}

/// SQLite-backed hazard type repository.
pub struct SqliteHazardTypeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteHazardTypeRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "hazard_type", &["id", "type"])?;
        Ok(Self { conn })
    }
}

impl HazardTypeRepository for SqliteHazardTypeRepository<'_> {
    fn add_hazard_type(&self, label: &str) -> RepoResult<HazardTypeId> {
        let label = require_label("hazard type", label)?;
        run_in_transaction(self.conn, "add_hazard_type", |tx| {
            tx.execute("INSERT INTO hazard_type (type) VALUES (?1);", params![label])?;
            Ok(tx.last_insert_rowid())
        })
    }

    fn get_hazard_type(&self, id: HazardTypeId) -> RepoResult<Option<HazardType>> {
        let hazard_type = self
            .conn
            .query_row(
                "SELECT id, type FROM hazard_type WHERE id = ?1;",
                [id],
                parse_hazard_type_row,
            )
            .optional()?;
        Ok(hazard_type)
    }

    fn get_hazard_type_by_label(&self, label: &str) -> RepoResult<Option<HazardType>> {
        let Some(label) = normalize_label(label) else {
            return Ok(None);
        };
        let hazard_type = self
            .conn
            .query_row(
                "SELECT id, type FROM hazard_type WHERE type = ?1 ORDER BY id LIMIT 1;",
                [label],
                parse_hazard_type_row,
            )
            .optional()?;
        Ok(hazard_type)
    }

    fn list_hazard_types(&self) -> RepoResult<Vec<HazardType>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, type FROM hazard_type ORDER BY id ASC;")?;
        let hazard_types = stmt
            .query_map([], parse_hazard_type_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(hazard_types)
    }
}

fn parse_hazard_type_row(row: &Row<'_>) -> rusqlite::Result<HazardType> {
    Ok(HazardType {
        id: row.get("id")?,
        label: row.get("type")?,
    })
}
