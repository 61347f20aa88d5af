//! Core domain logic for the seismic observation service.
//! Owns the entity model, storage, and the use-case layer the HTTP surface calls.

pub mod db;
pub mod dto;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError, DbResult, SessionFactory};
pub use dto::{HazardTypeDto, ObservationDto, StationDto};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::hazard_type::{HazardType, HazardTypeId};
pub use model::observation::{convert_magnitude, NewObservation, Observation, ObservationId};
pub use model::station::{Station, StationId};
pub use repo::{normalize_label, RepoError, RepoResult};
pub use service::observation_service::{
    ObservationService, PopulateReport, ServiceError, ServiceOperation, ServiceResult,
    DEFAULT_HAZARD_TYPES, DEFAULT_STATIONS, SAMPLE_FREQUENCY, SAMPLE_MAGNITUDE,
};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
