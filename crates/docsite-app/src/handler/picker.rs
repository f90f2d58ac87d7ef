//! Picker, locale and version selection handlers

use docsite_core::prelude::*;
use docsite_core::PickerKind;

use crate::engine_event::EngineEvent;
use crate::negotiator::{locale_change, version_change, VersionChange};
use crate::state::{render_code_samples, AppState};
use crate::store::{PreferenceStore, LOCALE_KEY, VERSION_KEY};

use super::navigation;
use super::UpdateResult;

fn reject(state: &mut AppState, control: &str, value: &str, error: Error) -> UpdateResult {
    debug!("Rejected {} '{}': {}", control, value, error);
    state.emit(EngineEvent::SelectionRejected {
        control: control.to_string(),
        value: value.to_string(),
        reason: error.to_string(),
    });
    UpdateResult::none()
}

/// A picker choice on the current page
pub(crate) fn handle_select(state: &mut AppState, kind: PickerKind, value: &str) -> UpdateResult {
    if kind == PickerKind::Version {
        return handle_select_version(state, value);
    }

    let Some(scope) = state.scope.as_mut() else {
        debug!("Ignoring {} selection without a loaded page", kind);
        return UpdateResult::none();
    };

    match scope
        .pickers
        .select(&scope.page, &state.picker_store, kind, value)
    {
        Ok(changed) => {
            trace!("{} -> {} (visibility changed: {})", kind, value, changed);
            let event = EngineEvent::SectionsChanged {
                kind,
                value: value.to_string(),
                visible_sections: scope.pickers.visible_sections(),
                visible_minitoc: scope.pickers.visible_minitoc().to_vec(),
            };
            state.emit(event);
            UpdateResult::none()
        }
        Err(e) => reject(state, kind.as_str(), value, e),
    }
}

/// An explicit locale choice: persist it and reload in that locale
pub(crate) fn handle_select_locale(state: &mut AppState, locale: &str) -> UpdateResult {
    let current = state
        .location
        .clone()
        .unwrap_or_else(|| state.base_url.clone());

    match locale_change(&current, &state.settings.site, locale) {
        Ok(url) => {
            if let Err(e) = state.negotiator_store.set(LOCALE_KEY, locale) {
                warn!("Failed to persist locale '{}': {}", locale, e);
            }
            navigation::navigate(state, url)
        }
        Err(e) => reject(state, "locale", locale, e),
    }
}

/// An explicit version choice.
///
/// Query-parameter versions swap the location in place and re-render code
/// samples; path-segment versions navigate.
pub(crate) fn handle_select_version(state: &mut AppState, version: &str) -> UpdateResult {
    let control = PickerKind::Version.as_str();

    let declared = state
        .scope
        .as_ref()
        .and_then(|scope| scope.page.picker(PickerKind::Version));
    let offered_by_page = match declared {
        Some(decl) if !decl.offers(version) => {
            let error = Error::invalid_selection(PickerKind::Version, version);
            return reject(state, control, version, error);
        }
        Some(_) => true,
        None => false,
    };

    let current = state
        .location
        .clone()
        .unwrap_or_else(|| state.base_url.clone());
    let change = match version_change(&current, &state.settings.site, version, offered_by_page) {
        Ok(change) => change,
        Err(e) => return reject(state, control, version, e),
    };

    if let Err(e) = state.negotiator_store.set(VERSION_KEY, version) {
        warn!("Failed to persist version '{}': {}", version, e);
    }

    let url = match change {
        VersionChange::Navigate(url) => return navigation::navigate(state, url),
        VersionChange::ReplaceInPlace(url) => url,
    };

    state.location = Some(url.clone());
    state.version = version.to_string();
    state.emit(EngineEvent::LocationReplaced { url });

    let mut events = Vec::new();
    if let Some(scope) = state.scope.as_mut() {
        if scope.page.picker(PickerKind::Version).is_some() {
            scope.pickers.sync_version(&scope.page, version);
            events.push(EngineEvent::SectionsChanged {
                kind: PickerKind::Version,
                value: version.to_string(),
                visible_sections: scope.pickers.visible_sections(),
                visible_minitoc: scope.pickers.visible_minitoc().to_vec(),
            });
        }
        scope.code_samples = render_code_samples(&scope.page, &state.settings, version);
        events.push(EngineEvent::CodeSamplesUpdated {
            version: version.to_string(),
            samples: scope.code_samples.clone(),
        });
    }
    for event in events {
        state.emit(event);
    }
    UpdateResult::none()
}
