//! Observation use-case service.
//!
//! # Responsibility
//! - Open one storage session per operation and release it on every exit
//!   path.
//! - Sequence repository calls and map entities to transfer objects.
//! - Translate repository failures into the service error taxonomy.
//!
//! # Invariants
//! - No operation spans more than one session.
//! - Station names and hazard labels reach storage normalized.
//! - A storage failure is always reported together with the operation that
//!   failed; nothing is retried.

use crate::db::SessionFactory;
use crate::dto::{HazardTypeDto, ObservationDto, StationDto};
use crate::model::observation::NewObservation;
use crate::model::station::StationId;
use crate::repo::hazard_type_repo::{HazardTypeRepository, SqliteHazardTypeRepository};
use crate::repo::observation_repo::{ObservationRepository, SqliteObservationRepository};
use crate::repo::station_repo::{SqliteStationRepository, StationRepository};
use crate::repo::{normalize_label, RepoError};
use log::{info, warn};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Station names seeded by `populate` when none are given.
pub const DEFAULT_STATIONS: &[&str] = &["Kurils", "Kamchatka", "Kavkaz"];
/// Hazard labels seeded by `populate` when none are given.
pub const DEFAULT_HAZARD_TYPES: &[&str] = &["Safe", "Unsafe", "Danger", "Very Danger"];
/// Magnitude of the reading written by `add_sample_observation`.
pub const SAMPLE_MAGNITUDE: i64 = 6;
/// Frequency of the reading written by `add_sample_observation`.
pub const SAMPLE_FREQUENCY: i64 = 400;

/// Service operation families, used to label storage failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceOperation {
    ListObservations,
    GetObservation,
    AddObservation,
    UpdateObservation,
    DeleteObservations,
    AddStation,
    AddHazardType,
    ListReferenceData,
    Populate,
}

impl ServiceOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ListObservations => "list_observations",
            Self::GetObservation => "get_observation",
            Self::AddObservation => "add_observation",
            Self::UpdateObservation => "update_observation",
            Self::DeleteObservations => "delete_observations",
            Self::AddStation => "add_station",
            Self::AddHazardType => "add_hazard_type",
            Self::ListReferenceData => "list_reference_data",
            Self::Populate => "populate",
        }
    }
}

impl Display for ServiceOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from observation service operations.
#[derive(Debug)]
pub enum ServiceError {
    /// The record an operation depends on does not exist.
    NotFound(String),
    /// Caller input was rejected before reaching storage.
    InvalidInput(String),
    /// Storage rejected or failed the operation; its transaction was rolled
    /// back.
    Storage {
        operation: ServiceOperation,
        source: RepoError,
    },
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl ServiceError {
    /// Classifies a repository error raised while running `operation`.
    fn from_repo(operation: ServiceOperation, err: RepoError) -> Self {
        match err {
            RepoError::NotFound { entity, key } => {
                Self::NotFound(format!("{entity} not found: {key}"))
            }
            RepoError::InvalidLabel { .. } => Self::InvalidInput(err.to_string()),
            other => {
                warn!(
                    "event=service_call module=service status=error operation={operation} error={other}"
                );
                Self::Storage {
                    operation,
                    source: other,
                }
            }
        }
    }

    fn storage(operation: ServiceOperation) -> impl FnOnce(RepoError) -> Self {
        move |err| Self::from_repo(operation, err)
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(message) => write!(f, "{message}"),
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::Storage { operation, source } => {
                write!(f, "storage failure in {operation}: {source}")
            }
            Self::InconsistentState(details) => write!(f, "inconsistent state: {details}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Counts of reference rows inserted by `populate`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PopulateReport {
    pub stations_added: usize,
    pub hazard_types_added: usize,
}

/// Observation service over per-operation SQLite sessions.
#[derive(Debug, Clone)]
pub struct ObservationService {
    sessions: SessionFactory,
}

impl ObservationService {
    pub fn new(sessions: SessionFactory) -> Self {
        Self { sessions }
    }

    pub fn sessions(&self) -> &SessionFactory {
        &self.sessions
    }

    /// Lists every stored observation.
    pub fn list_observations(&self) -> ServiceResult<Vec<ObservationDto>> {
        self.with_session(ServiceOperation::ListObservations, |conn| {
            let repo = SqliteObservationRepository::try_new(conn)?;
            let observations = repo.get_all_observations()?;
            Ok(observations.iter().map(ObservationDto::from).collect())
        })
    }

    /// First observation of a station, by station id.
    pub fn observation_by_station_id(
        &self,
        station_id: StationId,
    ) -> ServiceResult<Option<ObservationDto>> {
        self.with_session(ServiceOperation::GetObservation, |conn| {
            let repo = SqliteObservationRepository::try_new(conn)?;
            let observation = repo.get_observation_by_station_id(station_id)?;
            Ok(observation.as_ref().map(ObservationDto::from))
        })
    }

    /// First observation of a station, by station name.
    pub fn observation_by_station_name(
        &self,
        station_name: &str,
    ) -> ServiceResult<Option<ObservationDto>> {
        self.with_session(ServiceOperation::GetObservation, |conn| {
            let repo = SqliteObservationRepository::try_new(conn)?;
            let observation = repo.get_observation_by_station_name(station_name)?;
            Ok(observation.as_ref().map(ObservationDto::from))
        })
    }

    /// All observations of a station, by station name.
    pub fn observations_by_station_name(
        &self,
        station_name: &str,
    ) -> ServiceResult<Vec<ObservationDto>> {
        self.with_session(ServiceOperation::ListObservations, |conn| {
            let repo = SqliteObservationRepository::try_new(conn)?;
            let observations = repo.get_all_observations_by_station_name(station_name)?;
            Ok(observations.iter().map(ObservationDto::from).collect())
        })
    }

    /// Records a new observation. `dto.id` and `dto.updated_on` are ignored.
    pub fn add_observation(&self, dto: &ObservationDto) -> ServiceResult<ObservationDto> {
        let new_observation =
            NewObservation::new(dto.magnitude, dto.frequency, dto.station, dto.hazard_type);
        let created = self.with_session(ServiceOperation::AddObservation, |conn| {
            let repo = SqliteObservationRepository::try_new(conn)?;
            let observation_id = repo.create_observation(&new_observation)?;
            repo.get_observation(observation_id)
        })?;

        let created = created.ok_or(ServiceError::InconsistentState(
            "created observation not found in read-back",
        ))?;
        info!(
            "event=observation_create module=service status=ok observation_id={} station_id={}",
            created.id, created.station_id
        );
        Ok(ObservationDto::from(&created))
    }

    /// Rewrites magnitude and frequency of the first observation of
    /// `dto.station`.
    ///
    /// Returns `ServiceError::NotFound` when the station has no observation.
    pub fn update_observation(&self, dto: &ObservationDto) -> ServiceResult<ObservationDto> {
        let updated = self.with_session(ServiceOperation::UpdateObservation, |conn| {
            let repo = SqliteObservationRepository::try_new(conn)?;
            let observation_id = repo.update_observation_magnitude_and_frequency(
                dto.magnitude,
                dto.frequency,
                dto.station,
            )?;
            repo.get_observation(observation_id)
        })?;

        let updated = updated.ok_or(ServiceError::InconsistentState(
            "updated observation not found in read-back",
        ))?;
        info!(
            "event=observation_update module=service status=ok observation_id={} station_id={}",
            updated.id, updated.station_id
        );
        Ok(ObservationDto::from(&updated))
    }

    /// Deletes all observations of the named station. Returns the count;
    /// zero matches is still a success.
    pub fn delete_observations_by_station_name(&self, station_name: &str) -> ServiceResult<usize> {
        let deleted = self.with_session(ServiceOperation::DeleteObservations, |conn| {
            let repo = SqliteObservationRepository::try_new(conn)?;
            repo.delete_observations_by_station_name(station_name)
        })?;
        info!("event=observations_delete module=service status=ok deleted={deleted}");
        Ok(deleted)
    }

    /// Adds a station. The name is stored trimmed and uppercase.
    pub fn add_station(&self, dto: &StationDto) -> ServiceResult<StationDto> {
        let name = normalize_label(&dto.name)
            .ok_or_else(|| ServiceError::InvalidInput("station name must not be blank".into()))?;
        let id = self.with_session(ServiceOperation::AddStation, |conn| {
            SqliteStationRepository::try_new(conn)?.add_station(&name)
        })?;
        info!("event=station_create module=service status=ok station_id={id}");
        Ok(StationDto { id, name })
    }

    /// Adds a hazard type. The label is stored trimmed and uppercase.
    pub fn add_type(&self, dto: &HazardTypeDto) -> ServiceResult<HazardTypeDto> {
        let label = normalize_label(&dto.label)
            .ok_or_else(|| ServiceError::InvalidInput("hazard type must not be blank".into()))?;
        let id = self.with_session(ServiceOperation::AddHazardType, |conn| {
            SqliteHazardTypeRepository::try_new(conn)?.add_hazard_type(&label)
        })?;
        info!("event=hazard_type_create module=service status=ok hazard_type_id={id}");
        Ok(HazardTypeDto { id, label })
    }

    /// Lists all stations.
    pub fn list_stations(&self) -> ServiceResult<Vec<StationDto>> {
        self.with_session(ServiceOperation::ListReferenceData, |conn| {
            let stations = SqliteStationRepository::try_new(conn)?.list_stations()?;
            Ok(stations.iter().map(StationDto::from).collect())
        })
    }

    /// Lists all hazard types.
    pub fn list_hazard_types(&self) -> ServiceResult<Vec<HazardTypeDto>> {
        self.with_session(ServiceOperation::ListReferenceData, |conn| {
            let hazard_types = SqliteHazardTypeRepository::try_new(conn)?.list_hazard_types()?;
            Ok(hazard_types.iter().map(HazardTypeDto::from).collect())
        })
    }

    /// Seeds reference data, skipping labels that already exist.
    ///
    /// Safe to run repeatedly against the same database.
    pub fn populate(
        &self,
        stations: &[&str],
        hazard_types: &[&str],
    ) -> ServiceResult<PopulateReport> {
        let report = self.with_session(ServiceOperation::Populate, |conn| {
            let station_repo = SqliteStationRepository::try_new(conn)?;
            let hazard_type_repo = SqliteHazardTypeRepository::try_new(conn)?;
            let mut report = PopulateReport::default();

            for name in stations {
                if station_repo.get_station_by_name(name)?.is_none() {
                    station_repo.add_station(name)?;
                    report.stations_added += 1;
                }
            }
            for label in hazard_types {
                if hazard_type_repo.get_hazard_type_by_label(label)?.is_none() {
                    hazard_type_repo.add_hazard_type(label)?;
                    report.hazard_types_added += 1;
                }
            }
            Ok(report)
        })?;

        info!(
            "event=populate module=service status=ok stations_added={} hazard_types_added={}",
            report.stations_added, report.hazard_types_added
        );
        Ok(report)
    }

    /// Records one sample reading for an existing station and hazard type,
    /// both addressed by label.
    ///
    /// Returns `ServiceError::NotFound` when either label is unknown.
    pub fn add_sample_observation(
        &self,
        station_name: &str,
        hazard_label: &str,
    ) -> ServiceResult<ObservationDto> {
        let created = self.with_session(ServiceOperation::Populate, |conn| {
            let station = SqliteStationRepository::try_new(conn)?
                .get_station_by_name(station_name)?
                .ok_or_else(|| RepoError::not_found("station", station_name))?;
            let hazard_type = SqliteHazardTypeRepository::try_new(conn)?
                .get_hazard_type_by_label(hazard_label)?
                .ok_or_else(|| RepoError::not_found("hazard_type", hazard_label))?;

            let repo = SqliteObservationRepository::try_new(conn)?;
            let observation_id = repo.create_observation(&NewObservation::new(
                SAMPLE_MAGNITUDE,
                SAMPLE_FREQUENCY,
                station.id,
                hazard_type.id,
            ))?;
            repo.get_observation(observation_id)
        })?;

        let created = created.ok_or(ServiceError::InconsistentState(
            "sample observation not found in read-back",
        ))?;
        info!(
            "event=populate_sample module=service status=ok observation_id={} station_id={}",
            created.id, created.station_id
        );
        Ok(ObservationDto::from(&created))
    }

    fn with_session<T>(
        &self,
        operation: ServiceOperation,
        work: impl FnOnce(&Connection) -> Result<T, RepoError>,
    ) -> ServiceResult<T> {
        let conn = self
            .sessions
            .open()
            .map_err(|err| ServiceError::from_repo(operation, RepoError::from(err)))?;
        work(&conn).map_err(ServiceError::storage(operation))
    }
}
