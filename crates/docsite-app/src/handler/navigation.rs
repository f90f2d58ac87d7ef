//! Navigation handlers: negotiation, page loading and scope teardown

use docsite_core::prelude::*;
use docsite_core::{query_param, AnalyticsEvent, AppPhase, Page};
use url::Url;

use crate::engine_event::EngineEvent;
use crate::message::Message;
use crate::negotiator::{negotiate, Negotiation};
use crate::picker::PickerState;
use crate::state::{render_code_samples, AppState, PageScope};
use crate::store::{PreferenceStore, LOCALE_KEY};

use super::update::analytics;
use super::{UpdateAction, UpdateResult};

/// Redirects followed for a single navigation before giving up
const MAX_REDIRECTS: usize = 3;

/// Close the current page scope.
///
/// Queues the exit event for the outgoing page and cancels every timer the
/// scope armed. `None` when no page is loaded.
pub(crate) fn teardown_scope(state: &mut AppState) -> Option<UpdateAction> {
    state.scope.as_ref()?;
    let exit = AnalyticsEvent::exit(state.event_context());
    state.scope = None;
    let exit = analytics(state, exit);
    Some(UpdateAction::Batch(vec![UpdateAction::CancelAllTimers, exit]))
}

/// Start a navigation to `url`
pub(crate) fn navigate(state: &mut AppState, url: Url) -> UpdateResult {
    let mut actions = Vec::new();
    if let Some(teardown) = teardown_scope(state) {
        actions.push(teardown);
    }

    // Any in-flight load belongs to the previous navigation from here on
    state.nav_seq += 1;

    let mut url = url;
    let mut redirects = 0;
    let resolved = loop {
        match negotiate(&url, &state.negotiator_store, &state.settings.site) {
            Negotiation::Proceed(resolved) => break resolved,
            Negotiation::Redirect(to) => {
                debug!("Redirecting {} -> {}", url, to);
                state.emit(EngineEvent::Redirected {
                    from: url.clone(),
                    to: to.clone(),
                });
                url = to;
                redirects += 1;
                if redirects > MAX_REDIRECTS {
                    warn!("Redirect loop at {}", url);
                    state.location = Some(url.clone());
                    state.phase = AppPhase::Failed;
                    state.emit(EngineEvent::NavigationFailed {
                        url,
                        error: "too many redirects".to_string(),
                    });
                    return UpdateResult::actions(actions);
                }
            }
        }
    };

    if resolved.write_locale_cookie {
        if let Err(e) = state.negotiator_store.set(LOCALE_KEY, &resolved.locale) {
            warn!("Failed to persist locale '{}': {}", resolved.locale, e);
        }
    }

    info!(
        "Navigating to {} (locale {}, version {} from {:?})",
        url, resolved.locale, resolved.version, resolved.version_source
    );
    state.locale = resolved.locale;
    state.version = resolved.version;
    state.location = Some(url.clone());
    state.phase = AppPhase::Loading;
    state.emit(EngineEvent::Navigated {
        url: url.clone(),
        locale: state.locale.clone(),
        version: state.version.clone(),
    });

    actions.push(UpdateAction::LoadPage {
        nav_id: state.nav_seq,
        url,
    });
    UpdateResult::actions(actions)
}

/// Page fetch finished; build the new scope if it is still wanted
pub(crate) fn handle_page_loaded(
    state: &mut AppState,
    nav_id: u64,
    url: Url,
    result: std::result::Result<Box<Page>, String>,
) -> UpdateResult {
    if nav_id != state.nav_seq {
        debug!(
            "Dropping stale page load {} (latest navigation {})",
            nav_id, state.nav_seq
        );
        return UpdateResult::none();
    }

    let page = match result {
        Ok(page) => *page,
        Err(error) => {
            warn!("Failed to load {}: {}", url, error);
            state.phase = AppPhase::Failed;
            state.emit(EngineEvent::NavigationFailed { url, error });
            return UpdateResult::none();
        }
    };

    let pickers = PickerState::initialize(&page, &state.picker_store, Some(&state.version));
    let code_samples = render_code_samples(&page, &state.settings, &state.version);
    state.scope = Some(PageScope::new(nav_id, page, pickers, code_samples));

    let pageview = AnalyticsEvent::pageview(state.event_context());
    let event_id = pageview.context.event_id.clone();

    let mut ready = None;
    let mut samples = Vec::new();
    if let Some(scope) = state.scope.as_mut() {
        scope.pageview_event_id = Some(event_id);
        ready = Some(EngineEvent::PageReady {
            path: scope.page.path.clone(),
            title: scope.page.title.clone(),
            selections: scope.pickers.selections().clone(),
            visible_sections: scope.pickers.visible_sections(),
            visible_minitoc: scope.pickers.visible_minitoc().to_vec(),
            has_survey: scope.page.has_survey,
        });
        samples = scope.code_samples.clone();
    }

    state.phase = AppPhase::Ready;
    if let Some(ready) = ready {
        state.emit(ready);
    }
    if !samples.is_empty() {
        state.emit(EngineEvent::CodeSamplesUpdated {
            version: state.version.clone(),
            samples,
        });
    }

    let action = analytics(state, pageview);

    // A search results URL reopens the overlay with the text the user typed
    let initial = query_param(&url, &state.settings.search.overlay_param)
        .filter(|text| !text.trim().is_empty());

    UpdateResult {
        message: initial.map(|initial| Message::OpenSearch { initial }),
        action: Some(action),
    }
}
