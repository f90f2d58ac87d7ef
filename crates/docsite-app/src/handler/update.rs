//! Main update function - handles state transitions (TEA pattern)

use docsite_core::prelude::*;
use docsite_core::{AnalyticsEvent, AppPhase};

use crate::engine_event::EngineEvent;
use crate::message::Message;
use crate::state::AppState;

use super::{hover, keys, navigation, picker, search, survey, UpdateAction, UpdateResult};

/// Process a message and update state
/// Returns an action for the event loop to perform, if any
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Quit => {
            let mut actions = Vec::new();
            if let Some(exit) = navigation::teardown_scope(state) {
                actions.push(exit);
            }
            state.phase = AppPhase::Quitting;
            UpdateResult::actions(actions)
        }

        // ─────────────────────────────────────────────────────────
        // Navigation
        // ─────────────────────────────────────────────────────────
        Message::Navigate { target } => match state.resolve(&target) {
            Ok(url) => navigation::navigate(state, url),
            Err(e) => {
                warn!("Cannot navigate to '{}': {}", target, e);
                UpdateResult::none()
            }
        },

        Message::Reload => match state.location.clone() {
            Some(url) => navigation::navigate(state, url),
            None => {
                debug!("Reload requested before any navigation");
                UpdateResult::none()
            }
        },

        Message::PageLoaded {
            nav_id,
            url,
            result,
        } => navigation::handle_page_loaded(state, nav_id, url, result),

        // ─────────────────────────────────────────────────────────
        // Pickers, locale and version
        // ─────────────────────────────────────────────────────────
        Message::SelectPicker { kind, value } => picker::handle_select(state, kind, &value),

        Message::SelectLocale { locale } => picker::handle_select_locale(state, &locale),

        Message::SelectVersion { version } => picker::handle_select_version(state, &version),

        // ─────────────────────────────────────────────────────────
        // Survey
        // ─────────────────────────────────────────────────────────
        Message::SurveyVote(vote) => survey::handle_vote(state, vote),

        Message::SurveyComment(text) => survey::handle_comment(state, &text),

        Message::SurveyEmail(text) => survey::handle_email(state, &text),

        Message::SurveySubmit => survey::handle_submit(state),

        Message::SurveyCancel => survey::handle_cancel(state),

        // ─────────────────────────────────────────────────────────
        // Search overlay
        // ─────────────────────────────────────────────────────────
        Message::OpenSearch { initial } => search::handle_open(state, &initial),

        Message::SearchInput(text) => search::handle_input(state, &text),

        Message::SearchDebounceElapsed { seq } => search::handle_debounce_elapsed(state, seq),

        Message::SuggestionsLoaded { seq, result } => {
            search::handle_suggestions_loaded(state, seq, result)
        }

        // ─────────────────────────────────────────────────────────
        // Hover cards
        // ─────────────────────────────────────────────────────────
        Message::HoverLink { link_id } => hover::handle_hover(state, &link_id),

        Message::UnhoverLink => hover::handle_unhover(state),

        Message::CardEnter => hover::handle_card_enter(state),

        Message::CardLeave => hover::handle_card_leave(state),

        Message::FocusLink { link_id } => hover::handle_focus(state, link_id.as_deref()),

        Message::HoverShowElapsed { token } => hover::handle_show_elapsed(state, token),

        Message::HoverHideElapsed { token } => hover::handle_hide_elapsed(state, token),

        Message::HoverPreviewLoaded { href, result } => {
            hover::handle_preview_loaded(state, &href, result)
        }

        Message::Key(key) => keys::handle_key(state, key),
    }
}

/// Queue an analytics event and announce it
pub(super) fn analytics(state: &mut AppState, event: AnalyticsEvent) -> UpdateAction {
    state.emit(EngineEvent::AnalyticsQueued {
        event_type: event.event_type,
    });
    UpdateAction::SendAnalytics(Box::new(event))
}
