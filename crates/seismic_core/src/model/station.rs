//! Monitoring station entity.

/// Storage-generated station identifier.
pub type StationId = i64;

/// A named monitoring location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    pub id: StationId,
    /// Normalized (trimmed, uppercase) station name.
    pub name: String,
}
