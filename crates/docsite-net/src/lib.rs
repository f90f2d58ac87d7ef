//! # docsite-net - Site Collaborators
//!
//! The widget engine talks to three external collaborators, each behind a
//! narrow async trait so the engine can run against a live documentation
//! server or against in-memory fakes:
//!
//! - [`PageSource`] - fetch and parse a rendered page ([`HttpPageSource`])
//! - [`SuggestionSource`] - search autocomplete ([`HttpSuggestionSource`])
//! - [`AnalyticsSink`] - `POST /api/events` ([`HttpAnalyticsSink`]), fed by the
//!   fire-and-forget [`AnalyticsDispatcher`]
//!
//! Depends on [`docsite_core`] for domain types and error handling.

pub mod analytics;
pub mod client;
pub mod pages;
pub mod suggestions;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use analytics::{
    AnalyticsDispatcher, AnalyticsHandle, AnalyticsSink, HttpAnalyticsSink, LocalAnalyticsSink,
    NullAnalyticsSink,
};
pub use client::SiteClient;
pub use pages::{HttpPageSource, LocalPageSource, PageSource};
pub use suggestions::{
    parse_suggestions, HttpSuggestionSource, LocalSuggestionSource, SuggestionSource,
};
