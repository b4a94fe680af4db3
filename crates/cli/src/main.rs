use std::process;
use std::sync::Arc;

use clap::Parser;

use facescan_core::detection::infrastructure::clarifai_provider::{
    ClarifaiConfig, ClarifaiProvider,
};
use facescan_core::imaging::infrastructure::http_dimension_probe::HttpDimensionProbe;
use facescan_core::pipeline::detection_session::{DetectionSession, SubmissionState};
use facescan_core::pipeline::infrastructure::threaded_session_runner::ThreadedSessionRunner;
use facescan_core::shared::constants::{
    DEFAULT_BACKEND_URL, DEFAULT_DETECTION_BASE_URL, DEFAULT_MODEL_ID, DEFAULT_MODEL_VERSION_ID,
};
use facescan_core::usage::infrastructure::http_usage_reporter::HttpUsageReporter;

/// Detect faces in a remote image and track usage counts.
#[derive(Parser)]
#[command(name = "facescan")]
struct Cli {
    /// URL of the image to scan.
    image_url: String,

    /// User whose entry count is updated when faces are found.
    #[arg(long, env = "FACESCAN_USER_ID")]
    user_id: String,

    /// Detection service API key.
    #[arg(long, env = "FACESCAN_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Detection service account the model runs under.
    #[arg(long, env = "FACESCAN_API_USER_ID")]
    api_user_id: String,

    /// Detection service application id.
    #[arg(long, env = "FACESCAN_APP_ID")]
    app_id: String,

    /// Base URL of the detection service.
    #[arg(long, default_value = DEFAULT_DETECTION_BASE_URL)]
    detection_url: String,

    /// Base URL of the usage-tracking backend.
    #[arg(long, default_value = DEFAULT_BACKEND_URL)]
    backend_url: String,

    /// Detection model to run.
    #[arg(long, default_value = DEFAULT_MODEL_ID)]
    model_id: String,

    /// Version of the detection model.
    #[arg(long, default_value = DEFAULT_MODEL_VERSION_ID)]
    model_version_id: String,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let reporter = HttpUsageReporter::new(&cli.backend_url);
    if let Err(e) = reporter.check_health() {
        log::warn!("usage backend is not reachable: {e}");
    }

    let config = ClarifaiConfig {
        base_url: cli.detection_url,
        api_key: cli.api_key,
        user_id: cli.api_user_id,
        app_id: cli.app_id,
        model_id: cli.model_id,
        model_version_id: cli.model_version_id,
    };
    let runner = ThreadedSessionRunner::new(
        Arc::new(ClarifaiProvider::new(config)),
        Arc::new(HttpDimensionProbe::new()),
        Arc::new(reporter),
    );

    let mut session = DetectionSession::new();
    let updated_entries = runner.run_submission(&mut session, &cli.user_id, &cli.image_url);

    if let Some(message) = session.status_message() {
        println!("{message}");
    }
    for face in session.face_boxes() {
        println!(
            "  face {}: left {:.1}px, top {:.1}px, right inset {:.1}px, bottom inset {:.1}px",
            face.id, face.left_col, face.top_row, face.right_col, face.bottom_row
        );
    }
    if let Some(entries) = updated_entries {
        println!("Total entries: {entries}");
    }

    if let SubmissionState::Failed { reason } = session.state() {
        return Err(reason.clone().into());
    }
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.image_url.trim().is_empty() {
        return Err("Image URL must not be empty".into());
    }
    if !cli.image_url.starts_with("http://") && !cli.image_url.starts_with("https://") {
        return Err(format!(
            "Image URL must start with http:// or https://, got '{}'",
            cli.image_url
        )
        .into());
    }
    if cli.user_id.trim().is_empty() {
        return Err("User id must not be empty".into());
    }
    Ok(())
}
