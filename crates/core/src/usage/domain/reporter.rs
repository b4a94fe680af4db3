use crate::shared::transport::TransportError;

/// Domain interface for the usage-counting backend.
///
/// `report` sends how many faces one submission found (always ≥ 1; the
/// pipeline never reports zero) and returns the backend's updated running
/// total for the user — an authoritative count, not a delta. Reporting is
/// fire-and-forget relative to the detection flow: a failure never rolls
/// back what the user was already shown.
pub trait UsageReporter: Send + Sync {
    fn report(&self, user_id: &str, face_count: usize) -> Result<u64, TransportError>;
}
