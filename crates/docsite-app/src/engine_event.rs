//! Domain events emitted by the Engine for external consumers
//!
//! Handlers queue events on `AppState::outbox`; the engine broadcasts them
//! after each message processing cycle via `Engine::subscribe()`, followed by
//! any phase change it detected.

use std::collections::BTreeMap;

use docsite_core::{AppPhase, EventType, PickerKind, Suggestion, SurveyPhase};
use url::Url;

use crate::hover::HoverPreview;
use crate::state::RenderedSample;

#[derive(Debug, Clone)]
pub enum EngineEvent {
    // ─────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────
    /// A navigation passed negotiation and its page is being fetched
    Navigated { url: Url, locale: String, version: String },

    /// Negotiation sent the request elsewhere before anything loaded
    Redirected { from: Url, to: Url },

    NavigationFailed { url: Url, error: String },

    /// Page loaded and every widget initialised
    PageReady {
        path: String,
        title: String,
        selections: BTreeMap<PickerKind, String>,
        visible_sections: Vec<String>,
        visible_minitoc: Vec<String>,
        has_survey: bool,
    },

    /// Location changed without a reload
    LocationReplaced { url: Url },

    // ─────────────────────────────────────────────────────────
    // Pickers and versions
    // ─────────────────────────────────────────────────────────
    SectionsChanged {
        kind: PickerKind,
        value: String,
        visible_sections: Vec<String>,
        visible_minitoc: Vec<String>,
    },

    /// A picker, locale or version choice was refused; nothing changed
    SelectionRejected {
        control: String,
        value: String,
        reason: String,
    },

    CodeSamplesUpdated {
        version: String,
        samples: Vec<RenderedSample>,
    },

    // ─────────────────────────────────────────────────────────
    // Survey
    // ─────────────────────────────────────────────────────────
    SurveyPhaseChanged { phase: SurveyPhase },

    /// Submit refused (invalid email); the widget stays voted
    SurveyRejected { reason: String },

    // ─────────────────────────────────────────────────────────
    // Search overlay
    // ─────────────────────────────────────────────────────────
    SearchOverlayToggled { open: bool },

    SuggestionsUpdated {
        query: String,
        suggestions: Vec<Suggestion>,
    },

    SearchHighlightChanged { index: Option<usize> },

    // ─────────────────────────────────────────────────────────
    // Hover cards
    // ─────────────────────────────────────────────────────────
    /// Card opened, or its preview arrived
    HoverCardShown {
        link_id: String,
        href: String,
        preview: Option<HoverPreview>,
    },

    HoverCardHidden { link_id: String },

    // ─────────────────────────────────────────────────────────
    // Analytics
    // ─────────────────────────────────────────────────────────
    AnalyticsQueued { event_type: EventType },

    // ─────────────────────────────────────────────────────────
    // Engine Lifecycle
    // ─────────────────────────────────────────────────────────
    PhaseChanged { old_phase: AppPhase, new_phase: AppPhase },

    /// Engine is shutting down
    Shutdown,
}

impl EngineEvent {
    /// Returns a short string label for this event type (for logging/debugging).
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Navigated { .. } => "navigated",
            Self::Redirected { .. } => "redirected",
            Self::NavigationFailed { .. } => "navigation_failed",
            Self::PageReady { .. } => "page_ready",
            Self::LocationReplaced { .. } => "location_replaced",
            Self::SectionsChanged { .. } => "sections_changed",
            Self::SelectionRejected { .. } => "selection_rejected",
            Self::CodeSamplesUpdated { .. } => "code_samples_updated",
            Self::SurveyPhaseChanged { .. } => "survey_phase_changed",
            Self::SurveyRejected { .. } => "survey_rejected",
            Self::SearchOverlayToggled { .. } => "search_overlay_toggled",
            Self::SuggestionsUpdated { .. } => "suggestions_updated",
            Self::SearchHighlightChanged { .. } => "search_highlight_changed",
            Self::HoverCardShown { .. } => "hover_card_shown",
            Self::HoverCardHidden { .. } => "hover_card_hidden",
            Self::AnalyticsQueued { .. } => "analytics_queued",
            Self::PhaseChanged { .. } => "phase_changed",
            Self::Shutdown => "shutdown",
        }
    }
}
