use thiserror::Error;

/// Failure talking to a remote collaborator: the detection service, the
/// usage backend, or the host serving the submitted image.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
    #[error("could not decode response from {url}: {detail}")]
    Decode { url: String, detail: String },
}
