//! Hover card handlers

use docsite_core::prelude::*;

use crate::engine_event::EngineEvent;
use crate::hover::{HoverPreview, HoverTimer};
use crate::message::Message;
use crate::state::AppState;

use super::{TimerSlot, UpdateAction, UpdateResult};

/// Translate a hover state timer request into an action
fn timer_action(state: &AppState, timer: HoverTimer) -> Option<UpdateAction> {
    let hover = &state.settings.hover;
    match timer {
        HoverTimer::Nothing => None,
        HoverTimer::ArmShow(token) => Some(UpdateAction::schedule(
            TimerSlot::HoverShow,
            hover.show_delay(),
            Message::HoverShowElapsed { token },
        )),
        HoverTimer::ArmHide(token) => Some(UpdateAction::schedule(
            TimerSlot::HoverHide,
            hover.hide_delay(),
            Message::HoverHideElapsed { token },
        )),
        HoverTimer::CancelShow => Some(UpdateAction::CancelTimer(TimerSlot::HoverShow)),
        HoverTimer::CancelHide => Some(UpdateAction::CancelTimer(TimerSlot::HoverHide)),
    }
}

fn timers_result(state: &AppState, timers: Vec<HoverTimer>) -> UpdateResult {
    UpdateResult::actions(
        timers
            .into_iter()
            .filter_map(|timer| timer_action(state, timer))
            .collect(),
    )
}

pub(crate) fn handle_hover(state: &mut AppState, link_id: &str) -> UpdateResult {
    let Some(scope) = state.scope.as_mut() else {
        return UpdateResult::none();
    };
    let Some(link) = scope.page.link(link_id) else {
        debug!("Hover on unknown link '{}'", link_id);
        return UpdateResult::none();
    };
    let timer = scope.hover.hover(link);
    timers_result(state, vec![timer])
}

pub(crate) fn handle_unhover(state: &mut AppState) -> UpdateResult {
    let Some(scope) = state.scope.as_mut() else {
        return UpdateResult::none();
    };
    let timers = scope.hover.unhover();
    timers_result(state, timers)
}

pub(crate) fn handle_card_enter(state: &mut AppState) -> UpdateResult {
    let Some(scope) = state.scope.as_mut() else {
        return UpdateResult::none();
    };
    let timer = scope.hover.card_enter();
    timers_result(state, vec![timer])
}

pub(crate) fn handle_card_leave(state: &mut AppState) -> UpdateResult {
    let Some(scope) = state.scope.as_mut() else {
        return UpdateResult::none();
    };
    let timer = scope.hover.card_leave();
    timers_result(state, vec![timer])
}

/// Keyboard focus only records the target; it never opens a card
pub(crate) fn handle_focus(state: &mut AppState, link_id: Option<&str>) -> UpdateResult {
    if let Some(scope) = state.scope.as_mut() {
        scope.hover.focus(link_id);
    }
    UpdateResult::none()
}

pub(crate) fn handle_show_elapsed(state: &mut AppState, token: u64) -> UpdateResult {
    let link_id = state
        .scope
        .as_mut()
        .and_then(|scope| scope.hover.show_elapsed(token));
    match link_id {
        Some(link_id) => open_card(state, &link_id),
        None => {
            trace!("Show delay {} no longer pending", token);
            UpdateResult::none()
        }
    }
}

pub(crate) fn handle_hide_elapsed(state: &mut AppState, token: u64) -> UpdateResult {
    let Some(scope) = state.scope.as_mut() else {
        return UpdateResult::none();
    };
    let link_id = scope.hover.card().map(|card| card.link_id.clone());
    if scope.hover.hide_elapsed(token) {
        if let Some(link_id) = link_id {
            state.emit(EngineEvent::HoverCardHidden { link_id });
        }
    }
    UpdateResult::none()
}

/// Open the card for `link_id` now and fetch its preview when not cached
pub(crate) fn open_card(state: &mut AppState, link_id: &str) -> UpdateResult {
    let Some(scope) = state.scope.as_mut() else {
        return UpdateResult::none();
    };
    let Some(link) = scope.page.link(link_id).filter(|l| l.hovercard_eligible) else {
        debug!("Link '{}' has no hover card", link_id);
        return UpdateResult::none();
    };
    let href = link.href.clone();
    let needs_fetch = scope.hover.open(link);
    let preview = scope.hover.cached(&href).cloned();

    state.emit(EngineEvent::HoverCardShown {
        link_id: link_id.to_string(),
        href: href.clone(),
        preview,
    });

    let mut actions = vec![
        UpdateAction::CancelTimer(TimerSlot::HoverShow),
        UpdateAction::CancelTimer(TimerSlot::HoverHide),
    ];
    if needs_fetch {
        match state.resolve(&href) {
            Ok(url) => actions.push(UpdateAction::FetchHoverPreview { href, url }),
            Err(e) => warn!("Cannot resolve hover target '{}': {}", href, e),
        }
    }
    UpdateResult::actions(actions)
}

/// `Alt+ArrowUp`: open the card for the focused link immediately
pub(crate) fn open_focused(state: &mut AppState) -> UpdateResult {
    let focused = state
        .scope
        .as_ref()
        .and_then(|scope| scope.hover.focused().map(str::to_string));
    match focused {
        Some(link_id) => open_card(state, &link_id),
        None => {
            trace!("Alt+Up without a focused link");
            UpdateResult::none()
        }
    }
}

/// `Escape`: close the card and forget pending delays
pub(crate) fn close_card(state: &mut AppState) -> UpdateResult {
    let Some(scope) = state.scope.as_mut() else {
        return UpdateResult::none();
    };
    let link_id = scope.hover.card().map(|card| card.link_id.clone());
    scope.hover.close();
    if let Some(link_id) = link_id {
        state.emit(EngineEvent::HoverCardHidden { link_id });
    }
    UpdateResult::actions(vec![
        UpdateAction::CancelTimer(TimerSlot::HoverShow),
        UpdateAction::CancelTimer(TimerSlot::HoverHide),
    ])
}

pub(crate) fn handle_preview_loaded(
    state: &mut AppState,
    href: &str,
    result: std::result::Result<HoverPreview, String>,
) -> UpdateResult {
    let preview = match result {
        Ok(preview) => preview,
        Err(e) => {
            debug!("Hover preview for '{}' failed: {}", href, e);
            return UpdateResult::none();
        }
    };
    let Some(scope) = state.scope.as_mut() else {
        return UpdateResult::none();
    };
    if !scope.hover.preview_loaded(href, preview.clone()) {
        return UpdateResult::none();
    }
    if let Some(card) = scope.hover.card() {
        let event = EngineEvent::HoverCardShown {
            link_id: card.link_id.clone(),
            href: card.href.clone(),
            preview: Some(preview),
        };
        state.emit(event);
    }
    UpdateResult::none()
}
