//! HTTP transport.
//!
//! The dispatcher only needs one primitive: GET a URL and hand back the
//! body. Keeping it behind [`Transport`] lets tests run the whole client
//! against canned responses.

use crate::error::{Result, SubsonicError};
use bytes::Bytes;
use reqwest::blocking::Client;
use std::time::Duration;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("subsonic-api/", env!("CARGO_PKG_VERSION"));

/// Performs blocking GET requests.
pub trait Transport: Send + Sync {
    /// Fetch `url` and return the response body.
    ///
    /// Implementations must map transport failures to
    /// [`SubsonicError::Http`] / [`SubsonicError::Timeout`] and any status
    /// outside `200..300` to [`SubsonicError::Status`].
    fn get(&self, url: &str) -> Result<Bytes>;
}

/// [`Transport`] backed by a [`reqwest::blocking::Client`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { http })
    }

    /// Wrap an already configured client.
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<Bytes> {
        let resp = self.http.get(url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SubsonicError::Status(status.as_u16()));
        }
        Ok(resp.bytes()?)
    }
}
