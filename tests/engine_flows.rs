//! End-to-end widget flows through the Engine
//!
//! Each test runs the real message channel, timers and spawned fetches
//! against in-memory collaborators. Time is paused so debounce and hover
//! delays elapse instantly and in order.
//!
//! Run with: cargo test --test engine_flows

use std::sync::Arc;
use std::time::Duration;

use docsite_app::config::{Settings, VersionSettings};
use docsite_app::{Engine, EngineEvent, InputKey, MemoryStore, Message, PreferenceStore};
use docsite_core::{AppPhase, EventType, PickerKind, Suggestion, SurveyVote};
use docsite_net::test_utils::{
    RecordingAnalyticsSink, ScriptedSuggestionSource, StaticPageSource,
};
use docsite_net::AnalyticsDispatcher;
use tokio::sync::broadcast;
use url::Url;

type TestEngine = Engine<StaticPageSource, ScriptedSuggestionSource>;

const GUIDE: &str = r#"<html><body>
<main>
  <h1>Installing</h1>
  <p data-intro>How to install the CLI.</p>
  <div data-picker="platform" data-default="linux">
    <button data-option="mac">macOS</button>
    <button data-option="linux">Linux</button>
  </div>
  <section id="mac-steps" data-requires="platform:mac"><h2>macOS</h2></section>
  <section id="linux-steps" data-requires="platform:linux"><h2>Linux</h2></section>
  <p><a data-link-id="ssh" href="/en/ssh">SSH</a></p>
  <pre data-code-sample="curl">curl https://HOSTNAME/user</pre>
</main>
</body></html>"#;

const SSH: &str = r#"<main><h1>SSH</h1><p data-intro>Keys and agents.</p></main>"#;

// ─────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────

struct Harness {
    engine: TestEngine,
    events: broadcast::Receiver<EngineEvent>,
    store: Arc<MemoryStore>,
    pages: StaticPageSource,
    suggestions: ScriptedSuggestionSource,
    sink: RecordingAnalyticsSink,
}

fn site() -> StaticPageSource {
    StaticPageSource::new()
        .with_page("/en/installing", GUIDE)
        .with_page("/ja/installing", GUIDE)
        .with_page("/en/ssh", SSH)
}

fn harness_with(
    settings: Settings,
    store: MemoryStore,
    suggestions: ScriptedSuggestionSource,
) -> Harness {
    let store = Arc::new(store);
    let pages = site();
    let sink = RecordingAnalyticsSink::new();
    let engine = Engine::new(
        settings,
        Url::parse("http://localhost:4000").unwrap(),
        store.clone(),
        pages.clone(),
        suggestions.clone(),
        AnalyticsDispatcher::spawn(sink.clone()),
    );
    let events = engine.subscribe();
    Harness {
        engine,
        events,
        store,
        pages,
        suggestions,
        sink,
    }
}

fn harness() -> Harness {
    harness_with(
        Settings::default(),
        MemoryStore::new().with("locale", "en"),
        ScriptedSuggestionSource::new(),
    )
}

impl Harness {
    /// Navigate and wait until the page is ready
    async fn open(&mut self, target: &str) {
        self.engine.process_message(Message::Navigate {
            target: target.into(),
        });
        self.next().await;
        assert_eq!(self.engine.state.phase, AppPhase::Ready);
    }

    async fn next(&mut self) {
        assert!(self.engine.process_next().await, "channel closed");
    }

    fn send(&mut self, msg: Message) {
        self.engine.process_message(msg);
    }

    fn drain(&mut self) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }

    fn card_open(&self) -> bool {
        self.engine
            .state
            .scope
            .as_ref()
            .is_some_and(|scope| scope.hover.is_open())
    }
}

// ─────────────────────────────────────────────────────────
// Pickers and negotiation
// ─────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_picker_choice_persists_across_reload() {
    let mut h = harness();
    h.open("/en/installing").await;

    h.send(Message::SelectPicker {
        kind: PickerKind::Platform,
        value: "mac".into(),
    });
    assert_eq!(h.store.get("platform").as_deref(), Some("mac"));

    h.send(Message::Reload);
    h.next().await;
    h.drain();

    let scope = h.engine.state.scope.as_ref().unwrap();
    assert_eq!(scope.pickers.current(PickerKind::Platform), Some("mac"));
    assert_eq!(scope.pickers.visible_sections(), vec!["mac-steps".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_locale_cookie_redirects_before_fetch() {
    let mut h = harness_with(
        Settings::default(),
        MemoryStore::new().with("locale", "ja"),
        ScriptedSuggestionSource::new(),
    );

    h.open("/en/installing").await;

    assert_eq!(h.pages.fetched_paths(), vec!["/ja/installing"]);
    let events = h.drain();
    assert!(matches!(
        events.first(),
        Some(EngineEvent::Redirected { to, .. }) if to.path() == "/ja/installing"
    ));
    assert_eq!(h.engine.state.locale, "ja");
}

#[tokio::test(start_paused = true)]
async fn test_version_switch_updates_code_samples() {
    let mut settings = Settings::default();
    settings.site.versions = vec![
        VersionSettings {
            id: "free-pro-team@latest".into(),
            hostname: "api.github.com".into(),
            in_path: false,
        },
        VersionSettings {
            id: "enterprise-cloud@latest".into(),
            hostname: "api.ghe.com".into(),
            in_path: false,
        },
    ];
    let mut h = harness_with(
        settings,
        MemoryStore::new().with("locale", "en"),
        ScriptedSuggestionSource::new(),
    );
    h.open("/en/installing").await;
    h.drain();

    h.send(Message::SelectVersion {
        version: "enterprise-cloud@latest".into(),
    });

    let samples = h
        .drain()
        .into_iter()
        .find_map(|e| match e {
            EngineEvent::CodeSamplesUpdated { samples, .. } => Some(samples),
            _ => None,
        })
        .expect("samples re-rendered");
    assert_eq!(samples[0].text, "curl https://api.ghe.com/user");
    assert_eq!(h.pages.fetched_paths().len(), 1);
}

// ─────────────────────────────────────────────────────────
// Survey and analytics
// ─────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_survey_events_and_exit_are_flushed_on_shutdown() {
    let mut h = harness();
    h.open("/en/installing").await;

    h.send(Message::SurveyVote(SurveyVote::Up));
    h.send(Message::SurveyComment("Clear steps".into()));
    h.send(Message::SurveySubmit);
    h.send(Message::Quit);
    h.engine.shutdown().await;

    let events = h.sink.events();
    let types: Vec<_> = events.iter().map(|e| e.event_type).collect();
    assert_eq!(
        types,
        vec![
            EventType::Pageview,
            EventType::Survey,
            EventType::Survey,
            EventType::Exit
        ]
    );
    assert_eq!(events[2].survey_comment.as_deref(), Some("Clear steps"));

    let pageview_id = events[0].context.event_id.clone();
    for event in &events[1..] {
        assert_eq!(event.context.page_event_id.as_deref(), Some(pageview_id.as_str()));
    }
}

// ─────────────────────────────────────────────────────────
// Search overlay
// ─────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_slow_response_never_overwrites_newer_query() {
    let suggestions = ScriptedSuggestionSource::new()
        .respond("", vec![Suggestion::query("actions")])
        .respond("ss", vec![Suggestion::query("ss stale")])
        .delay("ss", Duration::from_millis(500))
        .respond("ssh", vec![Suggestion::query("ssh keys")]);
    let mut h = harness_with(
        Settings::default(),
        MemoryStore::new().with("locale", "en"),
        suggestions,
    );
    h.open("/en/installing").await;

    h.send(Message::OpenSearch {
        initial: String::new(),
    });
    h.next().await; // top queries

    h.send(Message::SearchInput("ss".into()));
    h.next().await; // debounce for "ss", slow fetch starts

    h.send(Message::SearchInput("ssh".into()));
    h.next().await; // debounce for "ssh"
    h.next().await; // "ssh" answers
    h.next().await; // "ss" answers late

    assert_eq!(h.suggestions.queries(), vec!["", "ss", "ssh"]);
    let shown: Vec<_> = h
        .drain()
        .into_iter()
        .filter_map(|e| match e {
            EngineEvent::SuggestionsUpdated { query, suggestions } => Some((query, suggestions)),
            _ => None,
        })
        .collect();
    assert_eq!(shown.len(), 2);
    assert_eq!(shown[0].0, "");
    let (query, list) = &shown[1];
    assert_eq!(query, "ssh");
    assert!(list.iter().all(|s| s.text != "ss stale"));
}

// ─────────────────────────────────────────────────────────
// Hover cards
// ─────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_hover_card_opens_after_delay_with_preview() {
    let mut h = harness();
    h.open("/en/installing").await;
    h.drain();

    h.send(Message::HoverLink {
        link_id: "ssh".into(),
    });
    assert!(!h.card_open());

    h.next().await; // show delay
    assert!(h.card_open());
    h.next().await; // preview fetched

    let previews: Vec<_> = h
        .drain()
        .into_iter()
        .filter_map(|e| match e {
            EngineEvent::HoverCardShown { preview, .. } => Some(preview),
            _ => None,
        })
        .collect();
    assert_eq!(previews.len(), 2);
    assert!(previews[0].is_none());
    let preview = previews[1].as_ref().unwrap();
    assert_eq!(preview.title, "SSH");
    assert_eq!(preview.intro.as_deref(), Some("Keys and agents."));
}

#[tokio::test(start_paused = true)]
async fn test_alt_up_then_escape_closes_without_timers() {
    let mut h = harness();
    h.open("/en/installing").await;
    h.send(Message::FocusLink {
        link_id: Some("ssh".into()),
    });
    assert!(!h.card_open());

    h.send(Message::Key(InputKey::AltUp));
    assert!(h.card_open());

    h.send(Message::Key(InputKey::Esc));
    assert!(!h.card_open());
    assert!(h
        .drain()
        .iter()
        .any(|e| matches!(e, EngineEvent::HoverCardHidden { link_id } if link_id == "ssh")));
}
