//! Observation repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the query and mutation operations over `observation` rows.
//! - Keep the station-name join and the magnitude conversion inside the
//!   persistence boundary.
//!
//! # Invariants
//! - "First match" means lowest observation id for the station.
//! - Every write stores `magnitude_f = convert_magnitude(magnitude)`.
//! - Updating a station without observations is `RepoError::NotFound`.
//! - Timestamps are epoch milliseconds; every update moves `updated_on`
//!   strictly forward, even within the same millisecond.

use super::support::{
    ensure_connection_ready, normalize_label, now_epoch_millis, run_in_transaction,
};
use super::{RepoError, RepoResult};
use crate::model::observation::{convert_magnitude, NewObservation, Observation, ObservationId};
use crate::model::station::StationId;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};

const OBSERVATION_SELECT_SQL: &str = "SELECT
    o.id AS id,
    o.magnitude AS magnitude,
    o.magnitude_f AS magnitude_f,
    o.frequency AS frequency,
    o.type AS type,
    o.station AS station,
    o.created_on AS created_on,
    o.updated_on AS updated_on
FROM observation o";

const OBSERVATION_COLUMNS: &[&str] = &[
    "id",
    "magnitude",
    "magnitude_f",
    "frequency",
    "type",
    "station",
    "created_on",
    "updated_on",
];

/// Repository interface for observation reads and writes.
pub trait ObservationRepository {
    /// Full scan ordered by id.
    fn get_all_observations(&self) -> RepoResult<Vec<Observation>>;
    fn get_observation(&self, id: ObservationId) -> RepoResult<Option<Observation>>;
    /// First observation recorded for the station, if any.
    fn get_observation_by_station_id(&self, station_id: StationId)
        -> RepoResult<Option<Observation>>;
    /// First observation of the station with the given (normalized) name.
    fn get_observation_by_station_name(&self, station_name: &str)
        -> RepoResult<Option<Observation>>;
    fn get_all_observations_by_station_name(&self, station_name: &str)
        -> RepoResult<Vec<Observation>>;
    /// Inserts exactly one observation. Missing station or hazard type is
    /// rejected by the foreign keys and leaves no row behind.
    fn create_observation(&self, observation: &NewObservation) -> RepoResult<ObservationId>;
    /// Rewrites magnitude and frequency of the station's first observation.
    fn update_observation_magnitude_and_frequency(
        &self,
        magnitude: i64,
        frequency: i64,
        station_id: StationId,
    ) -> RepoResult<ObservationId>;
    /// Deletes every observation of the named station; returns the count.
    fn delete_observations_by_station_name(&self, station_name: &str) -> RepoResult<usize>;
}

/// SQLite-backed observation repository.
pub struct SqliteObservationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteObservationRepository<'conn> {
    /// Constructs a repository over a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "observation", OBSERVATION_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl ObservationRepository for SqliteObservationRepository<'_> {
    fn get_all_observations(&self) -> RepoResult<Vec<Observation>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{OBSERVATION_SELECT_SQL} ORDER BY o.id ASC;"))?;
        let observations = stmt
            .query_map([], parse_observation_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(observations)
    }

    fn get_observation(&self, id: ObservationId) -> RepoResult<Option<Observation>> {
        let observation = self
            .conn
            .query_row(
                &format!("{OBSERVATION_SELECT_SQL} WHERE o.id = ?1;"),
                [id],
                parse_observation_row,
            )
            .optional()?;
        Ok(observation)
    }

    fn get_observation_by_station_id(
        &self,
        station_id: StationId,
    ) -> RepoResult<Option<Observation>> {
        let observation = self
            .conn
            .query_row(
                &format!(
                    "{OBSERVATION_SELECT_SQL}
                     WHERE o.station = ?1
                     ORDER BY o.id ASC
                     LIMIT 1;"
                ),
                [station_id],
                parse_observation_row,
            )
            .optional()?;
        Ok(observation)
    }

    fn get_observation_by_station_name(
        &self,
        station_name: &str,
    ) -> RepoResult<Option<Observation>> {
        let Some(station_name) = normalize_label(station_name) else {
            return Ok(None);
        };
        let observation = self
            .conn
            .query_row(
                &format!(
                    "{OBSERVATION_SELECT_SQL}
                     INNER JOIN station s ON s.id = o.station
                     WHERE s.name = ?1
                     ORDER BY o.id ASC
                     LIMIT 1;"
                ),
                [station_name],
                parse_observation_row,
            )
            .optional()?;
        Ok(observation)
    }

    fn get_all_observations_by_station_name(
        &self,
        station_name: &str,
    ) -> RepoResult<Vec<Observation>> {
        let Some(station_name) = normalize_label(station_name) else {
            return Ok(Vec::new());
        };
        let mut stmt = self.conn.prepare(&format!(
            "{OBSERVATION_SELECT_SQL}
             INNER JOIN station s ON s.id = o.station
             WHERE s.name = ?1
             ORDER BY o.id ASC;"
        ))?;
        let observations = stmt
            .query_map([station_name], parse_observation_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(observations)
    }

    fn create_observation(&self, observation: &NewObservation) -> RepoResult<ObservationId> {
        let magnitude_f = observation.converted_magnitude();
        let now = now_epoch_millis();
        run_in_transaction(self.conn, "create_observation", |tx| {
            tx.execute(
                "INSERT INTO observation (
                    magnitude,
                    magnitude_f,
                    frequency,
                    type,
                    station,
                    created_on,
                    updated_on
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6);",
                params![
                    observation.magnitude,
                    magnitude_f,
                    observation.frequency,
                    observation.hazard_type_id,
                    observation.station_id,
                    now,
                ],
            )?;
            Ok(tx.last_insert_rowid())
        })
    }

    fn update_observation_magnitude_and_frequency(
        &self,
        magnitude: i64,
        frequency: i64,
        station_id: StationId,
    ) -> RepoResult<ObservationId> {
        let now = now_epoch_millis();
        run_in_transaction(self.conn, "update_observation", |tx| {
            let target: Option<ObservationId> = tx
                .query_row(
                    "SELECT id
                     FROM observation
                     WHERE station = ?1
                     ORDER BY id ASC
                     LIMIT 1;",
                    [station_id],
                    |row| row.get(0),
                )
                .optional()?;
            let Some(observation_id) = target else {
                return Err(RepoError::not_found(
                    "observation",
                    format!("station_id={station_id}"),
                ));
            };

            tx.execute(
                "UPDATE observation
                 SET
                    magnitude = ?2,
                    magnitude_f = ?3,
                    frequency = ?4,
                    updated_on = MAX(?5, updated_on + 1)
                 WHERE id = ?1;",
                params![
                    observation_id,
                    magnitude,
                    convert_magnitude(magnitude),
                    frequency,
                    now
                ],
            )?;
            Ok(observation_id)
        })
    }

    fn delete_observations_by_station_name(&self, station_name: &str) -> RepoResult<usize> {
        let Some(station_name) = normalize_label(station_name) else {
            return Ok(0);
        };
        let deleted = run_in_transaction(self.conn, "delete_observations", |tx| {
            let changed = tx.execute(
                "DELETE FROM observation
                 WHERE station IN (
                    SELECT id FROM station WHERE name = ?1
                 );",
                [station_name.as_str()],
            )?;
            Ok(changed)
        })?;
        debug!(
            "event=observations_delete module=repo status=ok station={station_name} deleted={deleted}"
        );
        Ok(deleted)
    }
}

fn parse_observation_row(row: &Row<'_>) -> rusqlite::Result<Observation> {
    Ok(Observation {
        id: row.get("id")?,
        magnitude: row.get("magnitude")?,
        magnitude_f: row.get("magnitude_f")?,
        frequency: row.get("frequency")?,
        hazard_type_id: row.get("type")?,
        station_id: row.get("station")?,
        created_on: row.get("created_on")?,
        updated_on: row.get("updated_on")?,
    })
}
