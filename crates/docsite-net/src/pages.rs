//! Page source: fetch rendered HTML and parse it into a [`Page`]

use docsite_core::prelude::*;
use docsite_core::Page;
use url::Url;

use crate::client::{check_status, transport_error, SiteClient};

/// Fetches pages for navigation and hover card previews
#[trait_variant::make(PageSource: Send)]
pub trait LocalPageSource {
    /// Fetch and parse the page at `url`
    async fn fetch_page(&self, url: &Url) -> Result<Page>;
}

/// [`PageSource`] backed by the running documentation server
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: SiteClient,
}

impl HttpPageSource {
    pub fn new(client: SiteClient) -> Self {
        Self { client }
    }
}

impl PageSource for HttpPageSource {
    async fn fetch_page(&self, url: &Url) -> Result<Page> {
        debug!("Fetching page {}", url);
        let resp = self
            .client
            .http()
            .get(url.clone())
            .header("accept", "text/html")
            .send()
            .await
            .map_err(transport_error)?;
        let html = check_status(resp)?.text().await.map_err(transport_error)?;

        let host = url.host_str().or(self.client.host());
        Page::from_html(url.path(), host, &html)
    }
}
