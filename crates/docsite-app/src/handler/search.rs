//! Search overlay handlers

use docsite_core::prelude::*;
use docsite_core::{AnalyticsEvent, Suggestion};

use crate::engine_event::EngineEvent;
use crate::message::Message;
use crate::search::submission_url;
use crate::state::AppState;

use super::update::analytics;
use super::{navigation, TimerSlot, UpdateAction, UpdateResult};

pub(crate) fn handle_open(state: &mut AppState, initial: &str) -> UpdateResult {
    let Some(scope) = state.scope.as_mut() else {
        debug!("Ignoring search open without a loaded page");
        return UpdateResult::none();
    };
    let seq = scope.search.open(initial);
    let query = scope.search.query().to_string();

    state.emit(EngineEvent::SearchOverlayToggled { open: true });
    UpdateResult::actions(vec![
        UpdateAction::CancelTimer(TimerSlot::SearchDebounce),
        UpdateAction::FetchSuggestions { seq, query },
    ])
}

/// Input changed: restart the debounce window
pub(crate) fn handle_input(state: &mut AppState, text: &str) -> UpdateResult {
    let Some(scope) = state.scope.as_mut() else {
        return UpdateResult::none();
    };
    match scope.search.set_input(text) {
        Some(seq) => debounce(state, seq),
        None => UpdateResult::none(),
    }
}

pub(crate) fn push_char(state: &mut AppState, c: char) -> UpdateResult {
    match state.scope.as_mut().and_then(|scope| scope.search.push_char(c)) {
        Some(seq) => debounce(state, seq),
        None => UpdateResult::none(),
    }
}

pub(crate) fn pop_char(state: &mut AppState) -> UpdateResult {
    match state.scope.as_mut().and_then(|scope| scope.search.pop_char()) {
        Some(seq) => debounce(state, seq),
        None => UpdateResult::none(),
    }
}

fn debounce(state: &AppState, seq: u64) -> UpdateResult {
    UpdateResult::action(UpdateAction::schedule(
        TimerSlot::SearchDebounce,
        state.settings.search.debounce(),
        Message::SearchDebounceElapsed { seq },
    ))
}

pub(crate) fn handle_debounce_elapsed(state: &mut AppState, seq: u64) -> UpdateResult {
    let query = state
        .scope
        .as_ref()
        .and_then(|scope| scope.search.debounce_elapsed(seq));
    match query {
        Some(query) => UpdateResult::action(UpdateAction::FetchSuggestions { seq, query }),
        None => {
            trace!("Debounce for superseded seq {} ignored", seq);
            UpdateResult::none()
        }
    }
}

pub(crate) fn handle_suggestions_loaded(
    state: &mut AppState,
    seq: u64,
    result: std::result::Result<Vec<Suggestion>, String>,
) -> UpdateResult {
    let Some(scope) = state.scope.as_mut() else {
        return UpdateResult::none();
    };
    if !scope
        .search
        .apply_suggestions(seq, result, &state.settings.search)
    {
        return UpdateResult::none();
    }
    let event = EngineEvent::SuggestionsUpdated {
        query: scope.search.query().to_string(),
        suggestions: scope.search.suggestions().to_vec(),
    };
    state.emit(event);
    UpdateResult::none()
}

/// Move the highlight down (`forward`) or up the list
pub(crate) fn move_highlight(state: &mut AppState, forward: bool) -> UpdateResult {
    let Some(scope) = state.scope.as_mut() else {
        return UpdateResult::none();
    };
    let moved = if forward {
        scope.search.highlight_next()
    } else {
        scope.search.highlight_prev()
    };
    if moved {
        let index = scope.search.highlight();
        state.emit(EngineEvent::SearchHighlightChanged { index });
    }
    UpdateResult::none()
}

/// `Enter`: record the query and leave for the results or suggestion page
pub(crate) fn submit(state: &mut AppState) -> UpdateResult {
    let Some(scope) = state.scope.as_ref() else {
        return UpdateResult::none();
    };
    let Some(target) = scope.search.target() else {
        trace!("Nothing to submit");
        return UpdateResult::none();
    };
    let raw_input = scope.search.input().to_string();

    let base = state.location.as_ref().unwrap_or(&state.base_url);
    let url = match submission_url(base, &state.locale, &state.settings.search, &target, &raw_input)
    {
        Ok(url) => url,
        Err(e) => {
            warn!("Cannot build search URL for '{}': {}", target.text(), e);
            return UpdateResult::none();
        }
    };

    let event = AnalyticsEvent::search(state.event_context(), target.text());
    let search_event = analytics(state, event);

    close(state);
    let mut result = navigation::navigate(state, url);
    result.action = UpdateAction::batch(
        std::iter::once(search_event)
            .chain(result.action.take())
            .collect(),
    );
    result
}

/// `Escape`: close the overlay and drop any pending request
pub(crate) fn handle_close(state: &mut AppState) -> UpdateResult {
    if close(state) {
        UpdateResult::action(UpdateAction::CancelTimer(TimerSlot::SearchDebounce))
    } else {
        UpdateResult::none()
    }
}

fn close(state: &mut AppState) -> bool {
    let closed = state
        .scope
        .as_mut()
        .is_some_and(|scope| scope.search.close());
    if closed {
        state.emit(EngineEvent::SearchOverlayToggled { open: false });
    }
    closed
}
