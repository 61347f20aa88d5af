use chrono::{TimeZone, Utc};
use seismic_core::{HazardTypeDto, ObservationDto, StationDto};
use serde_json::json;

#[test]
fn observation_dto_uses_wire_field_names() {
    let dto = ObservationDto {
        id: 4,
        magnitude: 25,
        frequency: 3,
        hazard_type: 2,
        station: 1,
        updated_on: Some(Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()),
    };

    let value = serde_json::to_value(&dto).unwrap();
    assert_eq!(value["type"], 2);
    assert_eq!(value["station"], 1);
    assert_eq!(value["updated_on"], "2023-11-14T22:13:20Z");
    assert!(value.get("hazard_type").is_none());
}

#[test]
fn observation_dto_input_may_omit_id_and_updated_on() {
    let dto: ObservationDto = serde_json::from_value(json!({
        "magnitude": 25,
        "frequency": 3,
        "type": 1,
        "station": 1
    }))
    .unwrap();

    assert_eq!(dto.id, 0);
    assert!(dto.updated_on.is_none());
}

#[test]
fn observation_dto_requires_magnitude() {
    let result = serde_json::from_value::<ObservationDto>(json!({
        "frequency": 3,
        "type": 1,
        "station": 1
    }));
    assert!(result.is_err());
}

#[test]
fn reference_dtos_round_trip_field_names() {
    let station: StationDto = serde_json::from_value(json!({"name": "Kurils"})).unwrap();
    assert_eq!(station.name, "Kurils");

    let hazard_type: HazardTypeDto =
        serde_json::from_value(json!({"id": 3, "type": "Danger"})).unwrap();
    assert_eq!(hazard_type.label, "Danger");
    assert_eq!(
        serde_json::to_value(&hazard_type).unwrap(),
        json!({"id": 3, "type": "Danger"})
    );
}
