use serde::Serialize;

use crate::detection::domain::provider::{DetectionRequest, FaceDetectionProvider};
use crate::detection::domain::response::RawDetectionResponse;
use crate::shared::constants::{
    DEFAULT_DETECTION_BASE_URL, DEFAULT_MODEL_ID, DEFAULT_MODEL_VERSION_ID,
};
use crate::shared::transport::TransportError;

/// Credentials and model coordinates for the hosted detection service.
#[derive(Clone, Debug)]
pub struct ClarifaiConfig {
    pub base_url: String,
    pub api_key: String,
    pub user_id: String,
    pub app_id: String,
    pub model_id: String,
    pub model_version_id: String,
}

impl ClarifaiConfig {
    /// Config against the production endpoint and default face model.
    pub fn new(
        api_key: impl Into<String>,
        user_id: impl Into<String>,
        app_id: impl Into<String>,
    ) -> Self {
        Self {
            base_url: DEFAULT_DETECTION_BASE_URL.to_string(),
            api_key: api_key.into(),
            user_id: user_id.into(),
            app_id: app_id.into(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            model_version_id: DEFAULT_MODEL_VERSION_ID.to_string(),
        }
    }
}

#[derive(Serialize)]
struct DetectBody<'a> {
    user_app_id: UserAppId<'a>,
    inputs: [DetectInput<'a>; 1],
}

#[derive(Serialize)]
struct UserAppId<'a> {
    user_id: &'a str,
    app_id: &'a str,
}

#[derive(Serialize)]
struct DetectInput<'a> {
    data: InputData<'a>,
}

#[derive(Serialize)]
struct InputData<'a> {
    image: InputImage<'a>,
}

#[derive(Serialize)]
struct InputImage<'a> {
    url: &'a str,
}

/// HTTP client for the model-scoped face-detection endpoint.
///
/// Sends the image URL (not the image bytes); the service fetches the
/// image itself. Non-success statuses carry the response body as
/// diagnostic text but are never parsed as a detection result.
pub struct ClarifaiProvider {
    config: ClarifaiConfig,
    client: reqwest::blocking::Client,
}

impl ClarifaiProvider {
    pub fn new(config: ClarifaiConfig) -> Self {
        Self {
            config,
            client: reqwest::blocking::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v2/models/{}/versions/{}/outputs",
            self.config.base_url.trim_end_matches('/'),
            self.config.model_id,
            self.config.model_version_id
        )
    }
}

impl FaceDetectionProvider for ClarifaiProvider {
    fn detect(&self, request: &DetectionRequest) -> Result<RawDetectionResponse, TransportError> {
        let url = self.endpoint();
        let body = DetectBody {
            user_app_id: UserAppId {
                user_id: &self.config.user_id,
                app_id: &self.config.app_id,
            },
            inputs: [DetectInput {
                data: InputData {
                    image: InputImage {
                        url: &request.image_url,
                    },
                },
            }],
        };

        log::debug!("submitting {} for detection", request.image_url);
        let response = self
            .client
            .post(&url)
            .header("Accept", "application/json")
            .header("Authorization", format!("Key {}", self.config.api_key))
            .json(&body)
            .send()
            .map_err(|e| TransportError::Network {
                url: url.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(TransportError::Status {
                url,
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().map_err(|e| TransportError::Network {
            url: url.clone(),
            source: e,
        })?;
        serde_json::from_str(&text).map_err(|e| TransportError::Decode {
            url,
            detail: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::normalizer::normalize;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::sync::mpsc;
    use std::thread;

    /// Serves exactly one request on an ephemeral port and hands the raw
    /// request text back over a channel.
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            let response = format!(
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            let _ = tx.send(request);
        });
        (format!("http://{addr}"), rx)
    }

    fn read_request(stream: &mut TcpStream) -> String {
        let mut data = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = stream.read(&mut buf).unwrap();
            data.extend_from_slice(&buf[..n]);
            if let Some(end) = find(&data, b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&data[..end]).to_string();
                let content_length = headers
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())?
                    })
                    .unwrap_or(0);
                if data.len() - (end + 4) >= content_length {
                    break;
                }
            }
            if n == 0 {
                break;
            }
        }
        String::from_utf8_lossy(&data).to_string()
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    fn provider_for(base_url: &str) -> ClarifaiProvider {
        let mut config = ClarifaiConfig::new("secret-key", "acct", "my-app");
        config.base_url = base_url.to_string();
        ClarifaiProvider::new(config)
    }

    fn request() -> DetectionRequest {
        DetectionRequest {
            image_url: "https://example.com/group.jpg".to_string(),
        }
    }

    const ONE_FACE_BODY: &str = r#"{"outputs":[{"data":{"regions":[{"region_info":{"bounding_box":{"top_row":0.1,"left_col":0.2,"bottom_row":0.9,"right_col":0.8}}}]}}]}"#;

    #[test]
    fn test_detect_posts_to_model_scoped_endpoint() {
        let (base, rx) = serve_once("HTTP/1.1 200 OK", ONE_FACE_BODY);
        provider_for(&base).detect(&request()).unwrap();

        let sent = rx.recv().unwrap();
        assert!(sent.starts_with(&format!(
            "POST /v2/models/{DEFAULT_MODEL_ID}/versions/{DEFAULT_MODEL_VERSION_ID}/outputs"
        )));
    }

    #[test]
    fn test_detect_sends_key_authorization_and_body() {
        let (base, rx) = serve_once("HTTP/1.1 200 OK", ONE_FACE_BODY);
        provider_for(&base).detect(&request()).unwrap();

        let sent = rx.recv().unwrap();
        assert!(sent.lines().any(|l| l.eq_ignore_ascii_case("authorization: Key secret-key")));
        assert!(sent.contains(r#""user_app_id":{"user_id":"acct","app_id":"my-app"}"#));
        assert!(sent.contains(r#""image":{"url":"https://example.com/group.jpg"}"#));
    }

    #[test]
    fn test_successful_response_is_normalizable() {
        let (base, _rx) = serve_once("HTTP/1.1 200 OK", ONE_FACE_BODY);
        let raw = provider_for(&base).detect(&request()).unwrap();
        assert_eq!(normalize(&raw).unwrap().face_count(), 1);
    }

    #[test]
    fn test_non_success_status_surfaces_body_as_diagnostic() {
        let (base, _rx) = serve_once("HTTP/1.1 401 Unauthorized", r#"{"status":"invalid key"}"#);
        let err = provider_for(&base).detect(&request()).unwrap_err();
        match err {
            TransportError::Status { status, body, .. } => {
                assert_eq!(status, 401);
                assert!(body.contains("invalid key"));
            }
            other => panic!("expected Status error, got {other:?}"),
        }
    }

    #[test]
    fn test_undecodable_body_is_a_decode_error() {
        let (base, _rx) = serve_once("HTTP/1.1 200 OK", "not json at all");
        let err = provider_for(&base).detect(&request()).unwrap_err();
        assert!(matches!(err, TransportError::Decode { .. }));
    }

    #[test]
    fn test_unreachable_host_is_a_network_error() {
        // Port 1 on localhost is essentially never listening.
        let provider = provider_for("http://127.0.0.1:1");
        let err = provider.detect(&request()).unwrap_err();
        assert!(matches!(err, TransportError::Network { .. }));
    }
}
