//! Key routing per UI mode

use docsite_core::prelude::*;

use crate::input_key::InputKey;
use crate::state::{AppState, UiMode};

use super::{hover, search, UpdateResult};

pub(crate) fn handle_key(state: &mut AppState, key: InputKey) -> UpdateResult {
    if state.scope.is_none() {
        trace!("Key {:?} ignored without a loaded page", key);
        return UpdateResult::none();
    }
    match state.ui_mode() {
        UiMode::SearchOverlay => handle_key_search(state, key),
        UiMode::Article => handle_key_article(state, key),
    }
}

fn handle_key_search(state: &mut AppState, key: InputKey) -> UpdateResult {
    match key {
        InputKey::Down | InputKey::Tab => search::move_highlight(state, true),
        InputKey::Up | InputKey::BackTab => search::move_highlight(state, false),
        InputKey::Enter => search::submit(state),
        InputKey::Esc => {
            // Escape closes a hover card in every mode
            let search = search::handle_close(state);
            let hover = hover::close_card(state);
            UpdateResult::actions(search.action.into_iter().chain(hover.action).collect())
        }
        InputKey::Backspace => search::pop_char(state),
        InputKey::Char(c) => search::push_char(state, c),
        InputKey::AltUp => UpdateResult::none(),
    }
}

fn handle_key_article(state: &mut AppState, key: InputKey) -> UpdateResult {
    match key {
        InputKey::AltUp => hover::open_focused(state),
        InputKey::Esc => hover::close_card(state),
        InputKey::Tab => cycle_focus(state, true),
        InputKey::BackTab => cycle_focus(state, false),
        InputKey::Char('/') => search::handle_open(state, ""),
        _ => UpdateResult::none(),
    }
}

/// Move keyboard focus across the page's links without opening a card
fn cycle_focus(state: &mut AppState, forward: bool) -> UpdateResult {
    let Some(scope) = state.scope.as_ref() else {
        return UpdateResult::none();
    };
    let links = &scope.page.links;
    if links.is_empty() {
        return UpdateResult::none();
    }

    let current = scope
        .hover
        .focused()
        .and_then(|id| links.iter().position(|link| link.id == id));
    let next = match (current, forward) {
        (None, true) => Some(0),
        (None, false) => Some(links.len() - 1),
        (Some(i), true) if i + 1 < links.len() => Some(i + 1),
        (Some(i), false) if i > 0 => Some(i - 1),
        // Focus leaves the link list
        (Some(_), _) => None,
    };
    let link_id = next.map(|i| links[i].id.clone());
    hover::handle_focus(state, link_id.as_deref())
}
