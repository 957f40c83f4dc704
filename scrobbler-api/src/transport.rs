//! Synchronous transport collaborator.
//!
//! A transport owns scheme and host; callers only hand it an absolute path
//! with query string (`/2.0/?method=...`). Timeouts and connection reuse are
//! the transport's business.

use crate::error::{Result, ScrobblerError};
use reqwest::blocking::{Client, Response};
use std::time::Duration;
use tracing::{debug, warn};

/// Default web service host.
pub const BASE_URL: &str = "http://ws.audioscrobbler.com";
const USER_AGENT: &str = concat!("scrobbler-api/", env!("CARGO_PKG_VERSION"));

/// Executes requests against the web service and returns the raw body.
pub trait Transport: Send + Sync {
    fn get(&self, path: &str) -> Result<String>;
    fn post(&self, path: &str) -> Result<String>;
}

/// Blocking HTTP transport backed by [`reqwest`].
pub struct HttpTransport {
    http: Client,
    base_url: String,
}

impl HttpTransport {
    /// Transport against [`BASE_URL`].
    pub fn new() -> Result<Self> {
        Self::with_base_url(BASE_URL)
    }

    /// Transport against another host (mirrors, local test servers).
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }
}

impl Transport for HttpTransport {
    fn get(&self, path: &str) -> Result<String> {
        let url = format!("{}{path}", self.base_url);
        let resp = self.http.get(&url).send()?;
        read_body(resp)
    }

    fn post(&self, path: &str) -> Result<String> {
        let url = format!("{}{path}", self.base_url);
        let resp = self.http.post(&url).send()?;
        read_body(resp)
    }
}

/// Read the body, mapping non-2xx statuses to [`ScrobblerError::Status`].
fn read_body(resp: Response) -> Result<String> {
    let status = resp.status();
    let body = resp.text()?;
    debug!(status = status.as_u16(), bytes = body.len(), "response");
    if !status.is_success() {
        warn!(status = status.as_u16(), "non-success response");
        return Err(ScrobblerError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let t = HttpTransport::with_base_url("http://localhost:8080/").unwrap();
        assert_eq!(t.base_url, "http://localhost:8080");
    }
}
