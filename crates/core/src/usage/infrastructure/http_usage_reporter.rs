use serde::Serialize;

use crate::shared::transport::TransportError;
use crate::usage::domain::reporter::UsageReporter;

#[derive(Serialize)]
struct ReportBody<'a> {
    id: &'a str,
    #[serde(rename = "faceCount")]
    face_count: usize,
}

/// HTTP client for the usage-tracking backend.
pub struct HttpUsageReporter {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpUsageReporter {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::blocking::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    /// Startup connectivity check against the backend root.
    ///
    /// Callers log a failure and carry on; an unreachable backend only
    /// costs usage tracking, never detection.
    pub fn check_health(&self) -> Result<(), TransportError> {
        let url = self.url("/");
        let response = self
            .client
            .get(&url)
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
        log::debug!("usage backend reachable at {url}");
        Ok(())
    }
}

impl UsageReporter for HttpUsageReporter {
    fn report(&self, user_id: &str, face_count: usize) -> Result<u64, TransportError> {
        let url = self.url("/image");
        let response = self
            .client
            .put(&url)
            .json(&ReportBody {
                id: user_id,
                face_count,
            })
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

        // The backend replies with the bare updated entry count.
        let text = response.text().map_err(|e| TransportError::Network {
            url: url.clone(),
            source: e,
        })?;
        text.trim().parse::<u64>().map_err(|_| TransportError::Decode {
            url,
            detail: format!("expected an integer entry count, got {text:?}"),
        })
    }
}
