//! In-memory collaborators for tests
//!
//! Enabled for this crate's own tests and, through the `test-helpers`
//! feature, for the engine and integration tests of dependent crates.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use docsite_core::prelude::*;
use docsite_core::{AnalyticsEvent, Page, Suggestion};
use url::Url;

use crate::analytics::AnalyticsSink;
use crate::pages::PageSource;
use crate::suggestions::SuggestionSource;

/// Serves HTML registered per path and counts fetches
#[derive(Debug, Clone, Default)]
pub struct StaticPageSource {
    pages: Arc<Mutex<HashMap<String, String>>>,
    fetches: Arc<Mutex<Vec<String>>>,
}

impl StaticPageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `html` under `path` (builder style)
    pub fn with_page(self, path: &str, html: &str) -> Self {
        self.insert(path, html);
        self
    }

    pub fn insert(&self, path: &str, html: &str) {
        if let Ok(mut pages) = self.pages.lock() {
            pages.insert(path.to_string(), html.to_string());
        }
    }

    /// Paths fetched so far, in order
    pub fn fetched_paths(&self) -> Vec<String> {
        self.fetches.lock().map(|f| f.clone()).unwrap_or_default()
    }
}

impl PageSource for StaticPageSource {
    async fn fetch_page(&self, url: &Url) -> Result<Page> {
        let path = url.path().to_string();
        if let Ok(mut fetches) = self.fetches.lock() {
            fetches.push(path.clone());
        }
        let html = self
            .pages
            .lock()
            .ok()
            .and_then(|pages| pages.get(&path).cloned());
        match html {
            Some(html) => Page::from_html(&path, url.host_str(), &html),
            None => Err(Error::HttpStatus {
                status: 404,
                url: url.to_string(),
            }),
        }
    }
}

/// Canned suggestion responses with optional per-query latency
#[derive(Debug, Clone, Default)]
pub struct ScriptedSuggestionSource {
    responses: Arc<Mutex<HashMap<String, Vec<Suggestion>>>>,
    delays: Arc<Mutex<HashMap<String, Duration>>>,
    failing: Arc<Mutex<Vec<String>>>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl ScriptedSuggestionSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, query: &str, hits: Vec<Suggestion>) -> Self {
        if let Ok(mut responses) = self.responses.lock() {
            responses.insert(query.to_string(), hits);
        }
        self
    }

    pub fn delay(self, query: &str, delay: Duration) -> Self {
        if let Ok(mut delays) = self.delays.lock() {
            delays.insert(query.to_string(), delay);
        }
        self
    }

    pub fn fail(self, query: &str) -> Self {
        if let Ok(mut failing) = self.failing.lock() {
            failing.push(query.to_string());
        }
        self
    }

    /// Queries received so far, in order
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

impl SuggestionSource for ScriptedSuggestionSource {
    async fn suggest(&self, query: &str) -> Result<Vec<Suggestion>> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.to_string());
        }
        let delay = self
            .delays
            .lock()
            .ok()
            .and_then(|d| d.get(query).copied());
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let fails = self
            .failing
            .lock()
            .map(|f| f.iter().any(|q| q == query))
            .unwrap_or(false);
        if fails {
            return Err(Error::http("scripted failure"));
        }
        Ok(self
            .responses
            .lock()
            .ok()
            .and_then(|r| r.get(query).cloned())
            .unwrap_or_default())
    }
}

/// Records delivered events; can be told to fail every delivery
#[derive(Debug, Clone, Default)]
pub struct RecordingAnalyticsSink {
    events: Arc<Mutex<Vec<AnalyticsEvent>>>,
    attempts: Arc<AtomicUsize>,
    fail: bool,
}

impl RecordingAnalyticsSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl AnalyticsSink for RecordingAnalyticsSink {
    async fn send(&self, event: &AnalyticsEvent) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::http("scripted failure"));
        }
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
        Ok(())
    }
}
