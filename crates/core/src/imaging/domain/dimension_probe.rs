use crate::shared::geometry::ImageDimensions;
use crate::shared::transport::TransportError;

/// Domain interface for discovering the pixel size of the displayed image.
///
/// The detection service reports face positions as fractions of the
/// image; real boxes can only be computed once the image itself has been
/// loaded and its dimensions are known. Completion is independent of the
/// detection call — the probe for submission N may well finish after
/// submission N+1 has started.
pub trait DimensionProbe: Send + Sync {
    fn probe(&self, image_url: &str) -> Result<ImageDimensions, TransportError>;
}
