//! Observation entity and its write-time magnitude conversion.
//!
//! # Invariants
//! - `magnitude_f` always equals `convert_magnitude(magnitude)` for rows
//!   written through the repository.
//! - `updated_on >= created_on`; both are epoch milliseconds.
//! - Each update strictly increases `updated_on`.

use super::hazard_type::HazardTypeId;
use super::station::StationId;

/// Storage-generated observation identifier.
pub type ObservationId = i64;

const MAGNITUDE_OFFSET: f64 = 32.0;
const MAGNITUDE_DIVISOR: f64 = 0.5556;

/// Converts a raw magnitude reading into the secondary scale stored in
/// `observation.magnitude_f`.
///
/// Linear transform `32.0 + magnitude / 0.5556`. Pure; the repository calls
/// it on create and on every magnitude update.
pub fn convert_magnitude(magnitude: i64) -> f64 {
    MAGNITUDE_OFFSET + (magnitude as f64 / MAGNITUDE_DIVISOR)
}

/// One persisted seismic-activity reading.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub id: ObservationId,
    pub magnitude: i64,
    /// Derived from `magnitude` at write time.
    pub magnitude_f: f64,
    pub frequency: i64,
    /// Stored in column `type`.
    pub hazard_type_id: HazardTypeId,
    /// Stored in column `station`.
    pub station_id: StationId,
    pub created_on: i64,
    pub updated_on: i64,
}

/// Write model for creating an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewObservation {
    pub magnitude: i64,
    pub frequency: i64,
    pub station_id: StationId,
    pub hazard_type_id: HazardTypeId,
}

impl NewObservation {
    pub fn new(
        magnitude: i64,
        frequency: i64,
        station_id: StationId,
        hazard_type_id: HazardTypeId,
    ) -> Self {
        Self {
            magnitude,
            frequency,
            station_id,
            hazard_type_id,
        }
    }

    /// The derived value persisted alongside `magnitude`.
    pub fn converted_magnitude(&self) -> f64 {
        convert_magnitude(self.magnitude)
    }
}

#[cfg(test)]
mod tests {
    use super::{convert_magnitude, NewObservation};

    #[test]
    fn zero_magnitude_maps_to_offset() {
        assert_eq!(convert_magnitude(0), 32.0);
    }

    #[test]
    fn conversion_is_linear() {
        let step = convert_magnitude(2) - convert_magnitude(1);
        let next = convert_magnitude(11) - convert_magnitude(10);
        assert!((step - next).abs() < 1e-9);
        assert!((step - 1.0 / 0.5556).abs() < 1e-9);
    }

    #[test]
    fn new_observation_exposes_converted_value() {
        let observation = NewObservation::new(25, 740, 1, 1);
        assert!((observation.converted_magnitude() - 76.9964).abs() < 1e-3);
    }
}
