//! Application state (Model in TEA pattern)

use std::sync::Arc;

use docsite_core::prelude::*;
use docsite_core::{AppPhase, EventContext, Page, PickerKind};
use serde::Serialize;
use url::Url;

use crate::config::Settings;
use crate::engine_event::EngineEvent;
use crate::hover::HoverState;
use crate::negotiator::version_hostname;
use crate::picker::PickerState;
use crate::search::SearchState;
use crate::store::{PreferenceStore, ScopedStore};
use crate::survey::SurveyState;

/// Which surface owns keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiMode {
    /// Article body (links, hover cards, pickers)
    #[default]
    Article,
    /// Search overlay is open and focused
    SearchOverlay,
}

/// Code sample text after hostname substitution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedSample {
    pub id: String,
    pub text: String,
}

/// Render every code sample of `page` for `version`
pub fn render_code_samples(page: &Page, settings: &Settings, version: &str) -> Vec<RenderedSample> {
    let hostname = version_hostname(&settings.site, version);
    page.code_samples
        .iter()
        .map(|sample| RenderedSample {
            id: sample.id.clone(),
            text: sample.render(&settings.site.hostname_placeholder, hostname),
        })
        .collect()
}

/// Everything that lives exactly as long as one loaded page.
///
/// Dropped and rebuilt on every navigation, including reloads.
#[derive(Debug, Clone)]
pub struct PageScope {
    pub nav_id: u64,
    pub page: Page,
    pub pickers: PickerState,
    pub survey: SurveyState,
    pub search: SearchState,
    pub hover: HoverState,
    pub code_samples: Vec<RenderedSample>,
    /// Event id of this load's pageview; other events point back at it
    pub pageview_event_id: Option<String>,
}

impl PageScope {
    pub fn new(nav_id: u64, page: Page, pickers: PickerState, code_samples: Vec<RenderedSample>) -> Self {
        Self {
            nav_id,
            page,
            pickers,
            survey: SurveyState::new(),
            search: SearchState::new(),
            hover: HoverState::new(),
            code_samples,
            pageview_event_id: None,
        }
    }
}

/// Complete application state (the Model in TEA)
#[derive(Debug)]
pub struct AppState {
    pub phase: AppPhase,

    pub settings: Settings,

    /// Site root every relative target resolves against
    pub base_url: Url,

    /// Current address bar location
    pub location: Option<Url>,

    /// Id of the latest navigation; `PageLoaded` for any other id is stale
    pub nav_seq: u64,

    /// Effective locale and version of the current navigation
    pub locale: String,
    pub version: String,

    /// Live page widgets; `None` while loading or after a failed load
    pub scope: Option<PageScope>,

    /// Picker view of the preference store
    pub picker_store: ScopedStore,

    /// Locale/version view of the preference store
    pub negotiator_store: ScopedStore,

    /// Events produced by the last update, drained by the engine
    pub outbox: Vec<EngineEvent>,
}

impl AppState {
    pub fn new(settings: Settings, base_url: Url, store: Arc<dyn PreferenceStore>) -> Self {
        Self {
            phase: AppPhase::Initializing,
            locale: settings.site.default_locale.clone(),
            version: settings.site.default_version.clone(),
            settings,
            base_url,
            location: None,
            nav_seq: 0,
            scope: None,
            picker_store: ScopedStore::pickers(store.clone()),
            negotiator_store: ScopedStore::negotiator(store),
            outbox: Vec::new(),
        }
    }

    pub fn ui_mode(&self) -> UiMode {
        match &self.scope {
            Some(scope) if scope.search.is_open() => UiMode::SearchOverlay,
            _ => UiMode::Article,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.phase == AppPhase::Quitting
    }

    pub fn emit(&mut self, event: EngineEvent) {
        self.outbox.push(event);
    }

    /// Resolve a path or absolute URL against the current location
    pub fn resolve(&self, target: &str) -> Result<Url> {
        let base = self.location.as_ref().unwrap_or(&self.base_url);
        Ok(base.join(target)?)
    }

    /// Analytics context for the current page
    pub fn event_context(&self) -> EventContext {
        let path = match (&self.scope, &self.location) {
            (Some(scope), _) => scope.page.path.clone(),
            (None, Some(location)) => location.path().to_string(),
            (None, None) => "/".to_string(),
        };
        let mut context = EventContext::new(path, &self.locale, &self.version);
        context.platform_preference = self.preference(PickerKind::Platform);
        context.tool_preference = self.preference(PickerKind::Tool);
        context.page_event_id = self
            .scope
            .as_ref()
            .and_then(|scope| scope.pageview_event_id.clone());
        context
    }

    /// Current selection for `kind`, falling back to the stored preference
    fn preference(&self, kind: PickerKind) -> Option<String> {
        self.scope
            .as_ref()
            .and_then(|scope| scope.pickers.current(kind).map(str::to_string))
            .or_else(|| self.picker_store.get(kind.as_str()))
    }
}
