use std::sync::Arc;
use std::thread;

use crossbeam_channel::Sender;

use crate::detection::domain::provider::FaceDetectionProvider;
use crate::detection::domain::response::RawDetectionResponse;
use crate::imaging::domain::dimension_probe::DimensionProbe;
use crate::pipeline::detection_session::{DetectionSession, Submission, SubmissionToken};
use crate::shared::geometry::ImageDimensions;
use crate::shared::transport::TransportError;
use crate::usage::domain::reporter::UsageReporter;

/// Completions from background collaborator calls, applied to the
/// session in whatever order they arrive.
#[derive(Debug)]
pub enum SessionEvent {
    DetectionFinished {
        token: SubmissionToken,
        outcome: Result<RawDetectionResponse, TransportError>,
    },
    ImageLoaded {
        token: SubmissionToken,
        outcome: Result<ImageDimensions, TransportError>,
    },
    UsageReported {
        outcome: Result<u64, TransportError>,
    },
}

/// Drives one submission end-to-end on background threads.
///
/// The detection call runs first. Only a successful submission starts
/// the image fetch — mirroring an image element that is only given a
/// source once detection succeeded — and the usage report; those two
/// then genuinely race, and their completions are applied in arrival
/// order. The usage report is fire-and-forget: its failure is logged
/// and changes nothing the user already sees.
pub struct ThreadedSessionRunner {
    detector: Arc<dyn FaceDetectionProvider>,
    probe: Arc<dyn DimensionProbe>,
    reporter: Arc<dyn UsageReporter>,
}

impl ThreadedSessionRunner {
    pub fn new(
        detector: Arc<dyn FaceDetectionProvider>,
        probe: Arc<dyn DimensionProbe>,
        reporter: Arc<dyn UsageReporter>,
    ) -> Self {
        Self {
            detector,
            probe,
            reporter,
        }
    }

    /// Runs `image_url` through the pipeline for `user_id`, blocking
    /// until every spawned call has settled. Returns the updated entry
    /// count when the usage backend acknowledged the report.
    pub fn run_submission(
        &self,
        session: &mut DetectionSession,
        user_id: &str,
        image_url: &str,
    ) -> Option<u64> {
        let (tx, rx) = crossbeam_channel::unbounded::<SessionEvent>();

        let submission = session.submit(image_url);
        self.spawn_detection(submission, tx.clone());

        let mut updated_entries = None;
        let mut pending = 1usize;
        while pending > 0 {
            let Ok(event) = rx.recv() else { break };
            pending -= 1;
            match event {
                SessionEvent::DetectionFinished { token, outcome } => {
                    if let Some(face_count) = session.apply_detection(token, outcome) {
                        if let Some(url) = session.displayed_image() {
                            self.spawn_probe(token, url.to_string(), tx.clone());
                            pending += 1;
                        }
                        self.spawn_report(user_id.to_string(), face_count, tx.clone());
                        pending += 1;
                    }
                }
                SessionEvent::ImageLoaded { token, outcome } => match outcome {
                    Ok(dimensions) => session.image_loaded(token, dimensions),
                    Err(err) => log::warn!("displayed image never loaded: {err}"),
                },
                SessionEvent::UsageReported { outcome } => match outcome {
                    Ok(total) => updated_entries = Some(total),
                    Err(err) => log::warn!("usage report failed: {err}"),
                },
            }
        }
        updated_entries
    }

    fn spawn_detection(&self, submission: Submission, tx: Sender<SessionEvent>) {
        let detector = Arc::clone(&self.detector);
        thread::spawn(move || {
            let outcome = detector.detect(&submission.request);
            let _ = tx.send(SessionEvent::DetectionFinished {
                token: submission.token,
                outcome,
            });
        });
    }

    fn spawn_probe(&self, token: SubmissionToken, image_url: String, tx: Sender<SessionEvent>) {
        let probe = Arc::clone(&self.probe);
        thread::spawn(move || {
            let outcome = probe.probe(&image_url);
            let _ = tx.send(SessionEvent::ImageLoaded { token, outcome });
        });
    }

    fn spawn_report(&self, user_id: String, face_count: usize, tx: Sender<SessionEvent>) {
        let reporter = Arc::clone(&self.reporter);
        thread::spawn(move || {
            let outcome = reporter.report(&user_id, face_count);
            let _ = tx.send(SessionEvent::UsageReported { outcome });
        });
    }
}
