//! Persisted entity model for seismic observations.
//!
//! # Responsibility
//! - Define the stored shape of stations, hazard types and observations.
//! - Own the magnitude conversion applied on every observation write.
//!
//! # Invariants
//! - Identifiers are generated by storage and never reused by callers.
//! - An observation only references its station and hazard type by id.

pub mod hazard_type;
pub mod observation;
pub mod station;
