//! Search suggestion source (autocomplete endpoint)

use docsite_core::prelude::*;
use docsite_core::Suggestion;
use serde::Deserialize;

use crate::client::{check_status, transport_error, SiteClient};

/// Default autocomplete endpoint path
pub const DEFAULT_SUGGESTIONS_PATH: &str = "/api/search/autocomplete";

/// Answers autocomplete queries. An empty query asks for the top-queries set.
#[trait_variant::make(SuggestionSource: Send)]
pub trait LocalSuggestionSource {
    async fn suggest(&self, query: &str) -> Result<Vec<Suggestion>>;
}

/// [`SuggestionSource`] backed by `GET {path}?query=<q>`
#[derive(Debug, Clone)]
pub struct HttpSuggestionSource {
    client: SiteClient,
    path: String,
}

impl HttpSuggestionSource {
    pub fn new(client: SiteClient) -> Self {
        Self::with_path(client, DEFAULT_SUGGESTIONS_PATH)
    }

    pub fn with_path(client: SiteClient, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
        }
    }
}

impl SuggestionSource for HttpSuggestionSource {
    async fn suggest(&self, query: &str) -> Result<Vec<Suggestion>> {
        let mut url = self.client.url(&self.path)?;
        url.query_pairs_mut().append_pair("query", query);

        let resp = self
            .client
            .http()
            .get(url)
            .send()
            .await
            .map_err(transport_error)?;
        let body = check_status(resp)?.text().await.map_err(transport_error)?;
        parse_suggestions(&body)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SuggestionBody {
    Wrapped { hits: Vec<RawHit> },
    Bare(Vec<RawHit>),
}

#[derive(Deserialize)]
struct RawHit {
    #[serde(default, alias = "term", alias = "title")]
    text: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// Parse an autocomplete response body, preserving order.
///
/// Accepts `{"hits": [...]}` or a bare array; each hit needs a `text`
/// (or `term` / `title`) and may carry a `url`. Hits without text are skipped.
pub fn parse_suggestions(body: &str) -> Result<Vec<Suggestion>> {
    let parsed: SuggestionBody = serde_json::from_str(body)
        .map_err(|e| Error::malformed(format!("suggestion response: {e}")))?;
    let hits = match parsed {
        SuggestionBody::Wrapped { hits } => hits,
        SuggestionBody::Bare(hits) => hits,
    };

    Ok(hits
        .into_iter()
        .filter_map(|hit| {
            let text = hit.text?.trim().to_string();
            if text.is_empty() {
                return None;
            }
            Some(Suggestion {
                text,
                target_url: hit.url.filter(|u| !u.is_empty()),
            })
        })
        .collect())
}
