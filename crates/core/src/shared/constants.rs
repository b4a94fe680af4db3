pub const DEFAULT_MODEL_ID: &str = "face-detection";
pub const DEFAULT_MODEL_VERSION_ID: &str = "6dc7e46bc9124c5c8824be4822abe105";

pub const DEFAULT_DETECTION_BASE_URL: &str = "https://api.clarifai.com";
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3000";

pub const NO_FACES_MESSAGE: &str = "No faces detected. Verify the URL and try again.";
pub const PROCESSING_ERROR_MESSAGE: &str = "Error processing the image.";
