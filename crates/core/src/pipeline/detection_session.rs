use crate::detection::domain::normalizer::{normalize, NormalizedResult};
use crate::detection::domain::provider::DetectionRequest;
use crate::detection::domain::response::RawDetectionResponse;
use crate::shared::constants::{NO_FACES_MESSAGE, PROCESSING_ERROR_MESSAGE};
use crate::shared::geometry::{map_to_pixels, FaceBox, ImageDimensions};
use crate::shared::transport::TransportError;

/// Monotonically increasing identifier tagging one detection attempt.
///
/// Detection results and image-load notifications both carry the token of
/// the submission that started them. The session only applies events
/// whose token matches its current one, so results from a superseded
/// submission are discarded no matter how late they arrive.
pub type SubmissionToken = u64;

/// Where the current submission stands.
#[derive(Clone, Debug, PartialEq)]
pub enum SubmissionState {
    Idle,
    Loading { image_url: String },
    Succeeded(NormalizedResult),
    NoFacesFound,
    Failed { reason: String },
}

/// Handle for one submission: the token events must echo back, and the
/// request to hand to a [`FaceDetectionProvider`].
///
/// [`FaceDetectionProvider`]: crate::detection::domain::provider::FaceDetectionProvider
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    pub token: SubmissionToken,
    pub request: DetectionRequest,
}

/// The detection pipeline's state machine.
///
/// Owns the submission lifecycle, the last normalized result, the
/// published pixel boxes, and the single user-visible status message.
/// All methods run on the caller's thread; collaborator calls happen
/// elsewhere and come back in through [`apply_detection`] and
/// [`image_loaded`], in whatever order they complete.
///
/// The stored result lives inside [`SubmissionState::Succeeded`], so a
/// new submission or a reset structurally invalidates it before any new
/// result can be stored. That discipline is what keeps a slow image-load
/// from a superseded submission from ever painting boxes for the wrong
/// image.
///
/// [`apply_detection`]: DetectionSession::apply_detection
/// [`image_loaded`]: DetectionSession::image_loaded
#[derive(Debug)]
pub struct DetectionSession {
    state: SubmissionState,
    current_token: SubmissionToken,
    displayed_image: Option<String>,
    boxes: Vec<FaceBox>,
    message: Option<String>,
}

impl DetectionSession {
    pub fn new() -> Self {
        Self {
            state: SubmissionState::Idle,
            current_token: 0,
            displayed_image: None,
            boxes: Vec::new(),
            message: None,
        }
    }

    /// Starts a new submission for `image_url`.
    ///
    /// Clears the displayed image, the boxes, and the message from any
    /// prior attempt, advances the token, and enters `Loading`. The
    /// returned [`Submission`] carries everything the driver needs to
    /// run the detection call and tag its completion.
    pub fn submit(&mut self, image_url: &str) -> Submission {
        self.clear_displayed();
        self.current_token += 1;
        self.state = SubmissionState::Loading {
            image_url: image_url.to_string(),
        };
        Submission {
            token: self.current_token,
            request: DetectionRequest {
                image_url: image_url.to_string(),
            },
        }
    }

    /// Applies a completed detection call.
    ///
    /// Events tagged with a stale token — or arriving when no submission
    /// is in flight — are discarded. Returns `Some(face_count)` exactly
    /// when the driver should fire a usage report: a successful response
    /// with at least one face. The report does not gate the transition;
    /// by the time the driver sees the count, the message and displayed
    /// image are already set.
    pub fn apply_detection(
        &mut self,
        token: SubmissionToken,
        outcome: Result<RawDetectionResponse, TransportError>,
    ) -> Option<usize> {
        if token != self.current_token {
            log::debug!(
                "discarding detection result for superseded submission {token} (current {})",
                self.current_token
            );
            return None;
        }
        let SubmissionState::Loading { image_url } = &self.state else {
            log::debug!("ignoring duplicate detection result for submission {token}");
            return None;
        };
        let image_url = image_url.clone();

        match outcome {
            Ok(raw) => match normalize(&raw) {
                Some(result) => {
                    let face_count = result.face_count();
                    self.state = SubmissionState::Succeeded(result);
                    self.displayed_image = Some(image_url);
                    self.message = Some(face_count_message(face_count));
                    Some(face_count)
                }
                None => {
                    self.state = SubmissionState::NoFacesFound;
                    self.message = Some(NO_FACES_MESSAGE.to_string());
                    None
                }
            },
            Err(err) => {
                log::warn!("detection request failed: {err}");
                self.state = SubmissionState::Failed {
                    reason: err.to_string(),
                };
                self.message = Some(PROCESSING_ERROR_MESSAGE.to_string());
                None
            }
        }
    }

    /// Image-load rendezvous: the displayed image finished loading and
    /// its pixel size is now known.
    ///
    /// Publishes pixel boxes only when the notification belongs to the
    /// submission that set the current image and a result is stored. A
    /// late notification from a superseded submission, or one arriving
    /// after a reset, is a no-op — never an error.
    pub fn image_loaded(&mut self, token: SubmissionToken, dimensions: ImageDimensions) {
        if token != self.current_token {
            log::debug!(
                "discarding image-load for superseded submission {token} (current {})",
                self.current_token
            );
            return;
        }
        let SubmissionState::Succeeded(result) = &self.state else {
            return;
        };
        self.boxes = map_to_pixels(result.regions(), dimensions);
    }

    /// Sign-out: discard everything and return to `Idle`.
    ///
    /// Advances the token so that in-flight calls from before the reset
    /// are discarded when they eventually complete.
    pub fn reset(&mut self) {
        self.current_token += 1;
        self.state = SubmissionState::Idle;
        self.clear_displayed();
    }

    fn clear_displayed(&mut self) {
        self.displayed_image = None;
        self.boxes.clear();
        self.message = None;
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn current_token(&self) -> SubmissionToken {
        self.current_token
    }

    /// URL of the image currently shown, set only once detection
    /// succeeded for it.
    pub fn displayed_image(&self) -> Option<&str> {
        self.displayed_image.as_deref()
    }

    /// Pixel boxes for the displayed image; empty until the image-load
    /// rendezvous has fired.
    pub fn face_boxes(&self) -> &[FaceBox] {
        &self.boxes
    }

    /// The single user-visible status message, if any.
    pub fn status_message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl Default for DetectionSession {
    fn default() -> Self {
        Self::new()
    }
}

fn face_count_message(face_count: usize) -> String {
    let plural = if face_count == 1 { "" } else { "s" };
    format!("{face_count} face{plural} detected!")
}
