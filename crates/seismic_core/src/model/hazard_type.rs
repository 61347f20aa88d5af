//! Hazard classification entity.

/// Storage-generated hazard type identifier.
pub type HazardTypeId = i64;

/// A hazard classification label such as `SAFE` or `DANGER`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HazardType {
    pub id: HazardTypeId,
    /// Normalized (trimmed, uppercase) label. Stored in column `type`.
    pub label: String,
}
