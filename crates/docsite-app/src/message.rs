//! Message types for the application (TEA pattern)

use docsite_core::{Page, PickerKind, Suggestion, SurveyVote};
use url::Url;

use crate::hover::HoverPreview;
use crate::input_key::InputKey;

/// All possible messages/actions in the application
#[derive(Debug, Clone)]
pub enum Message {
    // ─────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────
    /// Go to a path or absolute URL (resolved against the current location)
    Navigate { target: String },

    /// Reload the current location
    Reload,

    /// Page fetch finished for navigation `nav_id`
    PageLoaded {
        nav_id: u64,
        url: Url,
        result: Result<Box<Page>, String>,
    },

    // ─────────────────────────────────────────────────────────
    // Pickers, locale and version
    // ─────────────────────────────────────────────────────────
    SelectPicker { kind: PickerKind, value: String },

    SelectLocale { locale: String },

    SelectVersion { version: String },

    // ─────────────────────────────────────────────────────────
    // Survey
    // ─────────────────────────────────────────────────────────
    SurveyVote(SurveyVote),

    SurveyComment(String),

    SurveyEmail(String),

    SurveySubmit,

    SurveyCancel,

    // ─────────────────────────────────────────────────────────
    // Search overlay
    // ─────────────────────────────────────────────────────────
    /// Open the overlay, optionally prefilled
    OpenSearch { initial: String },

    /// Replace the overlay input text
    SearchInput(String),

    /// Debounce window for request `seq` elapsed
    SearchDebounceElapsed { seq: u64 },

    /// Suggestion response for request `seq`
    SuggestionsLoaded {
        seq: u64,
        result: Result<Vec<Suggestion>, String>,
    },

    // ─────────────────────────────────────────────────────────
    // Hover cards
    // ─────────────────────────────────────────────────────────
    HoverLink { link_id: String },

    UnhoverLink,

    CardEnter,

    CardLeave,

    /// Keyboard focus moved (`None` = focus left the links)
    FocusLink { link_id: Option<String> },

    HoverShowElapsed { token: u64 },

    HoverHideElapsed { token: u64 },

    HoverPreviewLoaded {
        href: String,
        result: Result<HoverPreview, String>,
    },

    // ─────────────────────────────────────────────────────────
    // Input and lifecycle
    // ─────────────────────────────────────────────────────────
    Key(InputKey),

    Quit,
}
