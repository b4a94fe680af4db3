use std::io::Cursor;

use image::ImageReader;

use crate::imaging::domain::dimension_probe::DimensionProbe;
use crate::shared::geometry::ImageDimensions;
use crate::shared::transport::TransportError;

/// Fetches the submitted image over HTTP and reads its pixel size.
///
/// Only the header is decoded, not the full pixel data; the probe exists
/// to learn dimensions, not to render.
pub struct HttpDimensionProbe {
    client: reqwest::blocking::Client,
}

impl HttpDimensionProbe {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for HttpDimensionProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl DimensionProbe for HttpDimensionProbe {
    fn probe(&self, image_url: &str) -> Result<ImageDimensions, TransportError> {
        let response = self
            .client
            .get(image_url)
            .send()
            .map_err(|e| TransportError::Network {
                url: image_url.to_string(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(TransportError::Status {
                url: image_url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().map_err(|e| TransportError::Network {
            url: image_url.to_string(),
            source: e,
        })?;

        let reader = ImageReader::new(Cursor::new(bytes.as_ref()))
            .with_guessed_format()
            .map_err(|e| TransportError::Decode {
                url: image_url.to_string(),
                detail: e.to_string(),
            })?;
        let (width, height) = reader.into_dimensions().map_err(|e| TransportError::Decode {
            url: image_url.to_string(),
            detail: e.to_string(),
        })?;

        log::debug!("{image_url} decoded as {width}x{height}");
        Ok(ImageDimensions { width, height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serves one GET request with the given body bytes.
    fn serve_bytes(status_line: &'static str, body: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            // GET request: headers only, read until the blank line.
            let mut buf = [0u8; 2048];
            let mut seen = Vec::new();
            loop {
                let n = stream.read(&mut buf).unwrap();
                seen.extend_from_slice(&buf[..n]);
                if n == 0 || seen.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            let header = format!(
                "{status_line}\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            stream.write_all(header.as_bytes()).unwrap();
            stream.write_all(&body).unwrap();
        });
        format!("http://{addr}/photo.png")
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::new(width, height);
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_probe_reads_dimensions_from_served_image() {
        let url = serve_bytes("HTTP/1.1 200 OK", png_bytes(12, 7));
        let dims = HttpDimensionProbe::new().probe(&url).unwrap();
        assert_eq!(
            dims,
            ImageDimensions {
                width: 12,
                height: 7
            }
        );
    }

    #[test]
    fn test_non_success_status_is_a_status_error() {
        let url = serve_bytes("HTTP/1.1 404 Not Found", b"gone".to_vec());
        let err = HttpDimensionProbe::new().probe(&url).unwrap_err();
        match err {
            TransportError::Status { status, .. } => assert_eq!(status, 404),
            other => panic!("expected Status error, got {other:?}"),
        }
    }

    #[test]
    fn test_undecodable_bytes_are_a_decode_error() {
        let url = serve_bytes("HTTP/1.1 200 OK", b"definitely not an image".to_vec());
        let err = HttpDimensionProbe::new().probe(&url).unwrap_err();
        assert!(matches!(err, TransportError::Decode { .. }));
    }

    #[test]
    fn test_unreachable_host_is_a_network_error() {
        let err = HttpDimensionProbe::new()
            .probe("http://127.0.0.1:1/photo.png")
            .unwrap_err();
        assert!(matches!(err, TransportError::Network { .. }));
    }
}
