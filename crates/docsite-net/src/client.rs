//! Shared HTTP client bound to the documentation site's base URL

use std::time::Duration;

use docsite_core::prelude::*;
use url::Url;

/// Default request timeout for page, suggestion and analytics calls
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client plus the site base URL every relative path is resolved against.
///
/// Cloning is cheap; the underlying `reqwest::Client` is reference counted.
#[derive(Debug, Clone)]
pub struct SiteClient {
    http: reqwest::Client,
    base: Url,
}

impl SiteClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base = Url::parse(base_url)?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("docsite/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::http(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn host(&self) -> Option<&str> {
        self.base.host_str()
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Resolve a site-relative path (or absolute URL) against the base
    pub fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path)?)
    }
}

/// Map a non-success status to [`Error::HttpStatus`]
pub(crate) fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        Err(Error::HttpStatus {
            status: status.as_u16(),
            url: resp.url().to_string(),
        })
    }
}

pub(crate) fn transport_error(e: reqwest::Error) -> Error {
    Error::http(e.to_string())
}
