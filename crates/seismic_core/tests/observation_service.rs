use seismic_core::{
    HazardTypeDto, ObservationDto, ObservationService, PopulateReport, ServiceError,
    ServiceOperation, SessionFactory, StationDto, DEFAULT_HAZARD_TYPES, DEFAULT_STATIONS,
    SAMPLE_FREQUENCY, SAMPLE_MAGNITUDE,
};
use tempfile::TempDir;

fn service() -> (TempDir, ObservationService) {
    let dir = tempfile::tempdir().unwrap();
    let sessions = SessionFactory::new(dir.path().join("seismic.sqlite3"));
    (dir, ObservationService::new(sessions))
}

fn observation(station: i64, hazard_type: i64, magnitude: i64, frequency: i64) -> ObservationDto {
    ObservationDto {
        id: 0,
        magnitude,
        frequency,
        hazard_type,
        station,
        updated_on: None,
    }
}

fn add_reference(service: &ObservationService, station: &str, hazard: &str) -> (i64, i64) {
    let station = service
        .add_station(&StationDto {
            id: 0,
            name: station.to_string(),
        })
        .unwrap();
    let hazard_type = service
        .add_type(&HazardTypeDto {
            id: 0,
            label: hazard.to_string(),
        })
        .unwrap();
    (station.id, hazard_type.id)
}

#[test]
fn kurils_danger_scenario_end_to_end() {
    let (_dir, service) = service();
    let (station_id, hazard_type_id) = add_reference(&service, "kurils", "danger");

    let created = service
        .add_observation(&observation(station_id, hazard_type_id, 25, 3))
        .unwrap();
    assert!(created.id > 0);
    assert!(created.updated_on.is_some());

    let by_name = service.observation_by_station_name("KURILS").unwrap().unwrap();
    assert_eq!(by_name, created);
    let by_id = service.observation_by_station_id(station_id).unwrap().unwrap();
    assert_eq!(by_id, created);
    assert_eq!(service.list_observations().unwrap(), vec![created.clone()]);

    let updated = service
        .update_observation(&observation(station_id, hazard_type_id, 30, 5))
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.magnitude, 30);
    assert_eq!(updated.frequency, 5);

    assert_eq!(service.delete_observations_by_station_name("Kurils").unwrap(), 1);
    assert!(service.observation_by_station_name("KURILS").unwrap().is_none());
    assert!(service.observations_by_station_name("KURILS").unwrap().is_empty());
}

#[test]
fn kurils_station_one_scenario() {
    let (_dir, service) = service();
    let (station_id, hazard_type_id) = add_reference(&service, "KURILS", "DANGER");
    assert_eq!((station_id, hazard_type_id), (1, 1));

    service.add_observation(&observation(1, 1, 25, 740)).unwrap();

    let fetched = service.observation_by_station_name("KURILS").unwrap().unwrap();
    assert_eq!(fetched.magnitude, 25);
    assert_eq!(fetched.frequency, 740);
    assert_eq!(fetched.hazard_type, 1);
    assert_eq!(fetched.station, 1);

    assert_eq!(service.delete_observations_by_station_name("KURILS").unwrap(), 1);
    assert!(service.observation_by_station_id(1).unwrap().is_none());
}

#[test]
fn update_right_after_create_advances_updated_on() {
    let (_dir, service) = service();
    let (station_id, hazard_type_id) = add_reference(&service, "Kamchatka", "Unsafe");

    let created = service
        .add_observation(&observation(station_id, hazard_type_id, 10, 200))
        .unwrap();
    let updated = service
        .update_observation(&observation(station_id, hazard_type_id, 11, 210))
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert!(
        updated.updated_on > created.updated_on,
        "created={:?} updated={:?}",
        created.updated_on,
        updated.updated_on
    );
}

#[test]
fn add_station_normalizes_and_rejects_blank_names() {
    let (_dir, service) = service();

    let station = service
        .add_station(&StationDto {
            id: 77,
            name: "  kamchatka ".to_string(),
        })
        .unwrap();
    assert_eq!(station.name, "KAMCHATKA");
    assert_ne!(station.id, 77);

    let err = service
        .add_station(&StationDto {
            id: 0,
            name: "   ".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
    assert_eq!(service.list_stations().unwrap(), vec![station]);
}

#[test]
fn add_type_rejects_blank_label() {
    let (_dir, service) = service();

    let err = service
        .add_type(&HazardTypeDto {
            id: 0,
            label: String::new(),
        })
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
    assert!(service.list_hazard_types().unwrap().is_empty());
}

#[test]
fn duplicate_station_is_a_storage_failure() {
    let (_dir, service) = service();
    let dto = StationDto {
        id: 0,
        name: "Kavkaz".to_string(),
    };
    service.add_station(&dto).unwrap();

    match service.add_station(&dto).unwrap_err() {
        ServiceError::Storage { operation, source } => {
            assert_eq!(operation, ServiceOperation::AddStation);
            assert!(source.is_constraint_violation());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn add_observation_with_unknown_references_is_a_storage_failure() {
    let (_dir, service) = service();

    let err = service.add_observation(&observation(1, 1, 5, 5)).unwrap_err();
    match err {
        ServiceError::Storage { operation, .. } => {
            assert_eq!(operation, ServiceOperation::AddObservation);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(service.list_observations().unwrap().is_empty());
}

#[test]
fn update_on_station_without_observations_is_not_found() {
    let (_dir, service) = service();
    let (station_id, hazard_type_id) = add_reference(&service, "Kavkaz", "Safe");

    let err = service
        .update_observation(&observation(station_id, hazard_type_id, 1, 1))
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)), "unexpected error: {err}");
}

#[test]
fn delete_with_no_matches_succeeds_with_zero() {
    let (_dir, service) = service();

    assert_eq!(service.delete_observations_by_station_name("NOWHERE").unwrap(), 0);
}

#[test]
fn populate_is_idempotent() {
    let (_dir, service) = service();

    let first = service.populate(DEFAULT_STATIONS, DEFAULT_HAZARD_TYPES).unwrap();
    assert_eq!(
        first,
        PopulateReport {
            stations_added: DEFAULT_STATIONS.len(),
            hazard_types_added: DEFAULT_HAZARD_TYPES.len(),
        }
    );

    let second = service.populate(DEFAULT_STATIONS, DEFAULT_HAZARD_TYPES).unwrap();
    assert_eq!(second, PopulateReport::default());

    let labels = service
        .list_hazard_types()
        .unwrap()
        .into_iter()
        .map(|hazard_type| hazard_type.label)
        .collect::<Vec<_>>();
    assert_eq!(labels, vec!["SAFE", "UNSAFE", "DANGER", "VERY DANGER"]);
}

#[test]
fn sessions_share_one_database_file() {
    let (dir, service) = service();
    add_reference(&service, "Kurils", "Danger");

    let other = ObservationService::new(SessionFactory::new(dir.path().join("seismic.sqlite3")));
    assert_eq!(other.list_stations().unwrap().len(), 1);
    assert_eq!(other.sessions(), service.sessions());
}

#[test]
fn sample_observation_uses_seeded_labels() {
    let (_dir, service) = service();
    service.populate(DEFAULT_STATIONS, DEFAULT_HAZARD_TYPES).unwrap();

    let sample = service.add_sample_observation("Kurils", "Unsafe").unwrap();

    let station = service.list_stations().unwrap()[0].clone();
    let hazard_type = service.list_hazard_types().unwrap()[1].clone();
    assert_eq!(sample.station, station.id);
    assert_eq!(sample.hazard_type, hazard_type.id);
    assert_eq!(sample.magnitude, SAMPLE_MAGNITUDE);
    assert_eq!(sample.frequency, SAMPLE_FREQUENCY);
    assert_eq!(service.list_observations().unwrap(), vec![sample]);
}

#[test]
fn sample_observation_without_seed_is_not_found() {
    let (_dir, service) = service();

    let err = service.add_sample_observation("Kurils", "Unsafe").unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)), "unexpected error: {err}");
    assert!(service.list_observations().unwrap().is_empty());
}
