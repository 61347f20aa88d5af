//! Station repository contract and SQLite implementation.
//!
//! # Invariants
//! - Names are stored normalized (see `normalize_label`).
//! - Name lookups are exact matches on the normalized value.

use super::support::{ensure_connection_ready, normalize_label, require_label, run_in_transaction};
use super::RepoResult;
use crate::model::station::{Station, StationId};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Repository interface for monitoring stations.
pub trait StationRepository {
    /// Inserts one station and returns its generated id.
    fn add_station(&self, name: &str) -> RepoResult<StationId>;
    fn get_station(&self, id: StationId) -> RepoResult<Option<Station>>;
    fn get_station_by_name(&self, name: &str) -> RepoResult<Option<Station>>;
    /// Lists all stations ordered by id.
    fn list_stations(&self) -> RepoResult<Vec<Station>>;
}

/// SQLite-backed station repository.
pub struct SqliteStationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStationRepository<'conn> {
    /// Constructs a repository over a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "station", &["id", "name"])?;
        Ok(Self { conn })
    }
}

impl StationRepository for SqliteStationRepository<'_> {
    fn add_station(&self, name: &str) -> RepoResult<StationId> {
        let name = require_label("station name", name)?;
        run_in_transaction(self.conn, "add_station", |tx| {
            tx.execute("INSERT INTO station (name) VALUES (?1);", params![name])?;
            Ok(tx.last_insert_rowid())
        })
    }

    fn get_station(&self, id: StationId) -> RepoResult<Option<Station>> {
        let station = self
            .conn
            .query_row(
                "SELECT id, name FROM station WHERE id = ?1;",
                [id],
                parse_station_row,
            )
            .optional()?;
        Ok(station)
    }

    fn get_station_by_name(&self, name: &str) -> RepoResult<Option<Station>> {
        let Some(name) = normalize_label(name) else {
            return Ok(None);
        };
        let station = self
            .conn
            .query_row(
                "SELECT id, name FROM station WHERE name = ?1 ORDER BY id LIMIT 1;",
                [name],
                parse_station_row,
            )
            .optional()?;
        Ok(station)
    }

    fn list_stations(&self) -> RepoResult<Vec<Station>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM station ORDER BY id ASC;")?;
        let stations = stmt
            .query_map([], parse_station_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(stations)
    }
}

fn parse_station_row(row: &Row<'_>) -> rusqlite::Result<Station> {
    Ok(Station {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}
