//! HTTP transport for script retrieval.
//!
//! Single blocking GET per script, no retries, no authentication.

use std::time::Duration;

use crate::error::{HardenError, Result};

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Capability seam for the network.
pub trait HttpClient {
    /// Issue a GET. Transport failures are errors; any HTTP status is `Ok`.
    fn get(&self, url: &str) -> Result<HttpResponse>;
}

/// `reqwest::blocking` implementation.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// `timeout = None` waits indefinitely.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("hardenkit/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HardenError::http(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| HardenError::http(format!("request to {} failed: {}", url, e)))?;

        let status = response.status().as_u16();
        let body = response.bytes().map_err(|e| {
            HardenError::http(format!("failed to read response body from {}: {}", url, e))
        })?;

        tracing::debug!("GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_200_is_ok() {
        let ok = HttpResponse { status: 200, body: vec![] };
        let not_found = HttpResponse { status: 404, body: vec![] };
        let no_content = HttpResponse { status: 204, body: vec![] };
        assert!(ok.is_ok());
        assert!(!not_found.is_ok());
        assert!(!no_content.is_ok());
    }

    #[test]
    fn test_client_builds_without_timeout() {
        assert!(ReqwestClient::new(None).is_ok());
        assert!(ReqwestClient::new(Some(Duration::from_secs(5))).is_ok());
    }
}
