use crate::detection::domain::response::RawDetectionResponse;
use crate::shared::transport::TransportError;

/// One face-detection attempt. Created per submission and discarded once
/// the call completes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetectionRequest {
    pub image_url: String,
}

/// Domain interface for the remote face-detection service.
///
/// One call per submission. Implementations do not retry, back off, or
/// cache; a failed attempt is reported upward immediately.
pub trait FaceDetectionProvider: Send + Sync {
    fn detect(&self, request: &DetectionRequest) -> Result<RawDetectionResponse, TransportError>;
}
