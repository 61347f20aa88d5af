//! Transfer objects exchanged at the API boundary.
//!
//! # Responsibility
//! - Provide flat, serde-backed shapes for observations, stations and hazard
//!   types.
//! - Map persisted entities into their transfer shape.
//!
//! # Invariants
//! - Wire field names are `type`, `station`, `updated_on`; Rust field names
//!   may differ.
//! - `id` is accepted on input but ignored by write paths.

use crate::model::hazard_type::HazardType;
use crate::model::observation::Observation;
use crate::model::station::Station;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Observation transfer object used for create, update and read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationDto {
    #[serde(default)]
    pub id: i64,
    pub magnitude: i64,
    pub frequency: i64,
    /// Hazard type id.
    #[serde(rename = "type")]
    pub hazard_type: i64,
    /// Station id.
    pub station: i64,
    #[serde(default)]
    pub updated_on: Option<DateTime<Utc>>,
}

impl From<&Observation> for ObservationDto {
    fn from(value: &Observation) -> Self {
        Self {
            id: value.id,
            magnitude: value.magnitude,
            frequency: value.frequency,
            hazard_type: value.hazard_type_id,
            station: value.station_id,
            updated_on: DateTime::from_timestamp_millis(value.updated_on),
        }
    }
}

/// Station transfer object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationDto {
    #[serde(default)]
    pub id: i64,
    pub name: String,
}

impl From<&Station> for StationDto {
    fn from(value: &Station) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
        }
    }
}

/// Hazard type transfer object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardTypeDto {
    #[serde(default)]
    pub id: i64,
    #[serde(rename = "type")]
    pub label: String,
}

impl From<&HazardType> for HazardTypeDto {
    fn from(value: &HazardType) -> Self {
        Self {
            id: value.id,
            label: value.label.clone(),
        }
    }
}
