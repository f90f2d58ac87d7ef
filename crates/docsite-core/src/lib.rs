//! # docsite-core - Core Domain Types
//!
//! Foundation crate for the docsite widget engine. Provides domain types,
//! the page model parsed from rendered HTML, analytics payloads, URL helpers
//! and error handling.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, chrono, thiserror, scraper, url, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`PickerKind`], [`PickerSelection`] - Content picker kinds and selections
//! - [`SurveyVote`], [`SurveyPhase`] - Survey widget vote and phase
//! - [`Suggestion`] - One search autocomplete candidate
//! - [`AppPhase`] - Engine lifecycle phase
//!
//! ### Page Model (`page`)
//! - [`Page`] - Parsed page: pickers, sections, minitoc, links, code samples
//! - [`LinkKind`] - Link classification used for hover card eligibility
//!
//! ### Analytics (`analytics`)
//! - [`AnalyticsEvent`], [`EventContext`], [`EventType`] - `/api/events` payloads
//!
//! ### Locations (`location`)
//! - [`split_locale()`], [`with_locale()`], [`set_query_param()`] - URL helpers
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with a `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use docsite_core::prelude::*;
//! ```

pub mod analytics;
pub mod error;
pub mod location;
pub mod logging;
pub mod page;
pub mod types;

/// Prelude for common imports used throughout all docsite crates
pub mod prelude {
    pub use super::error::{Error, Result};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use analytics::{new_event_id, AnalyticsEvent, EventContext, EventType};
pub use error::{Error, Result};
pub use location::{query_param, remove_query_param, set_query_param, split_locale, with_locale};
pub use page::{CodeSample, ContentSection, LinkKind, MinitocEntry, Page, PageLink, PickerDecl};
pub use types::{AppPhase, PickerKind, PickerSelection, Suggestion, SurveyPhase, SurveyVote};
