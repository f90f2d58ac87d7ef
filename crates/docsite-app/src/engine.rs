//! Engine - orchestration state shared by every frontend
//!
//! The Engine owns the TEA state, the message channel, the armed timers and
//! the analytics dispatcher. Frontends feed it messages and subscribe to the
//! [`EngineEvent`]s it broadcasts after each processing cycle.

use std::sync::Arc;

use docsite_core::prelude::*;
use docsite_core::AppPhase;
use docsite_net::client::DEFAULT_TIMEOUT;
use docsite_net::{
    AnalyticsDispatcher, HttpAnalyticsSink, HttpPageSource, HttpSuggestionSource,
    NullAnalyticsSink, PageSource, SiteClient, SuggestionSource,
};
use tokio::sync::{broadcast, mpsc, watch};
use url::Url;

use crate::actions::{Services, TimerSlots};
use crate::config::Settings;
use crate::engine_event::EngineEvent;
use crate::message::Message;
use crate::process;
use crate::state::AppState;
use crate::store::PreferenceStore;

/// Lightweight snapshot of state for change detection.
///
/// Captured before message processing, compared after to detect
/// what changed and emit appropriate EngineEvents.
#[derive(Debug, Clone)]
struct StateSnapshot {
    phase: AppPhase,
}

impl StateSnapshot {
    fn capture(state: &AppState) -> Self {
        Self { phase: state.phase }
    }
}

/// Orchestration engine for the documentation site widgets.
///
/// Encapsulates:
/// - TEA state management
/// - Message channel
/// - Timer slots and spawned fetches
/// - Analytics queue
/// - Shutdown signaling
/// - Event broadcasting for external consumers
pub struct Engine<P, Q> {
    /// TEA application state (the Model)
    pub state: AppState,

    /// Sender half of the unified message channel.
    /// Clone this to give to input sources.
    pub msg_tx: mpsc::Sender<Message>,

    /// Receiver half of the unified message channel.
    pub msg_rx: mpsc::Receiver<Message>,

    /// Flipped to `true` by `shutdown()`; spawned fetches watch it
    shutdown_tx: watch::Sender<bool>,

    services: Services<P, Q>,

    timers: TimerSlots,

    /// Taken on shutdown to flush queued events
    analytics: Option<AnalyticsDispatcher>,

    /// Event broadcaster for external consumers.
    /// Subscribers receive EngineEvents after each message processing cycle.
    event_tx: broadcast::Sender<EngineEvent>,
}

impl Engine<HttpPageSource, HttpSuggestionSource> {
    /// Engine talking to the live site at `settings.site.base_url`.
    ///
    /// Must be called inside a tokio runtime (the analytics worker is
    /// spawned here).
    pub fn connect(settings: Settings, store: Arc<dyn PreferenceStore>) -> Result<Self> {
        let client = SiteClient::new(&settings.site.base_url, DEFAULT_TIMEOUT)?;
        let base_url = client.base().clone();

        let pages = HttpPageSource::new(client.clone());
        let suggestions =
            HttpSuggestionSource::with_path(client.clone(), settings.search.suggestions_path.clone());
        let dispatcher = if settings.analytics.enabled {
            AnalyticsDispatcher::spawn(HttpAnalyticsSink::new(
                client,
                &settings.analytics.events_path,
            )?)
        } else {
            info!("Analytics disabled");
            AnalyticsDispatcher::spawn(NullAnalyticsSink)
        };

        Ok(Self::new(
            settings,
            base_url,
            store,
            pages,
            suggestions,
            dispatcher,
        ))
    }
}

impl<P, Q> Engine<P, Q>
where
    P: PageSource + Sync + 'static,
    Q: SuggestionSource + Sync + 'static,
{
    /// Create an engine over the given collaborators.
    ///
    /// - Creates AppState with settings and the preference store
    /// - Creates message channel (capacity 256)
    /// - Creates shutdown signal channel
    /// - Creates event broadcast channel (capacity 256)
    pub fn new(
        settings: Settings,
        base_url: Url,
        store: Arc<dyn PreferenceStore>,
        pages: P,
        suggestions: Q,
        analytics: AnalyticsDispatcher,
    ) -> Self {
        let state = AppState::new(settings, base_url, store);

        let (msg_tx, msg_rx) = mpsc::channel::<Message>(256);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (event_tx, _) = broadcast::channel(256);

        let services = Services::new(pages, suggestions, Some(analytics.handle()), shutdown_rx);

        Self {
            state,
            msg_tx,
            msg_rx,
            shutdown_tx,
            services,
            timers: TimerSlots::new(),
            analytics: Some(analytics),
            event_tx,
        }
    }

    /// Subscribe to engine events.
    ///
    /// If the subscriber falls behind (buffer full), older events are
    /// dropped. Use `broadcast::error::RecvError::Lagged` to detect this.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// Process a single message through the TEA update cycle, then broadcast
    /// the events it produced.
    pub fn process_message(&mut self, msg: Message) {
        let pre = StateSnapshot::capture(&self.state);

        process::process_message(
            &mut self.state,
            msg,
            &self.msg_tx,
            &self.services,
            &mut self.timers,
        );

        let post = StateSnapshot::capture(&self.state);
        self.emit_events(&pre, &post);
    }

    /// Wait for the next message (timer, fetch result or input) and process it.
    ///
    /// Returns `false` if the channel closed.
    pub async fn process_next(&mut self) -> bool {
        match self.msg_rx.recv().await {
            Some(msg) => {
                self.process_message(msg);
                true
            }
            None => false,
        }
    }

    /// Get a clone of the message sender for spawning input sources.
    pub fn msg_sender(&self) -> mpsc::Sender<Message> {
        self.msg_tx.clone()
    }

    pub fn should_quit(&self) -> bool {
        self.state.should_quit()
    }

    /// Armed timers (read-only)
    pub fn timers(&self) -> &TimerSlots {
        &self.timers
    }

    /// Initiate shutdown: cancel timers, signal background tasks and flush
    /// queued analytics events.
    pub async fn shutdown(&mut self) {
        self.emit(EngineEvent::Shutdown);

        self.timers.cancel_all();
        let _ = self.shutdown_tx.send(true);

        // The worker only finishes once every handle is gone
        self.services.analytics = None;
        if let Some(dispatcher) = self.analytics.take() {
            let timeout = self.state.settings.analytics.flush_timeout();
            dispatcher.flush(timeout).await;
            info!("Analytics queue flushed");
        }
    }

    /// Broadcast queued handler events, then any phase change
    fn emit_events(&mut self, pre: &StateSnapshot, post: &StateSnapshot) {
        for event in std::mem::take(&mut self.state.outbox) {
            trace!("Engine event: {}", event.event_type());
            self.emit(event);
        }

        if pre.phase != post.phase {
            self.emit(EngineEvent::PhaseChanged {
                old_phase: pre.phase,
                new_phase: post.phase,
            });
        }
    }

    /// Emit a single EngineEvent to all subscribers.
    ///
    /// send() returns Err only if there are no receivers -- that's fine.
    fn emit(&self, event: EngineEvent) {
        let _ = self.event_tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use docsite_core::EventType;
    use docsite_net::test_utils::{RecordingAnalyticsSink, ScriptedSuggestionSource, StaticPageSource};
    use std::time::Duration;

    type TestEngine = Engine<StaticPageSource, ScriptedSuggestionSource>;

    const PAGE: &str = r#"
        <main>
          <h1>Quickstart</h1>
          <p data-intro>Get going.</p>
        </main>
    "#;

    fn engine(sink: RecordingAnalyticsSink) -> TestEngine {
        Engine::new(
            Settings::default(),
            Url::parse("http://localhost:4000").unwrap(),
            Arc::new(MemoryStore::new()),
            StaticPageSource::new().with_page("/en/quickstart", PAGE),
            ScriptedSuggestionSource::new(),
            AnalyticsDispatcher::spawn(sink),
        )
    }

    fn drain(rx: &mut broadcast::Receiver<EngineEvent>) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_engine_new_creates_valid_state() {
        let engine = engine(RecordingAnalyticsSink::new());
        assert!(!engine.should_quit());
        assert_eq!(engine.state.phase, AppPhase::Initializing);
    }

    #[tokio::test]
    async fn test_engine_process_quit_message() {
        let mut engine = engine(RecordingAnalyticsSink::new());
        engine.process_message(Message::Quit);
        assert!(engine.should_quit());
    }

    #[tokio::test]
    async fn test_subscribe_receives_shutdown_event() {
        let mut engine = engine(RecordingAnalyticsSink::new());
        let mut rx = engine.subscribe();

        engine.shutdown().await;

        match tokio::time::timeout(Duration::from_millis(100), rx.recv()).await {
            Ok(Ok(event)) => assert!(matches!(event, EngineEvent::Shutdown)),
            _ => panic!("Should have received shutdown event"),
        }
    }

    #[tokio::test]
    async fn test_no_subscribers_no_error() {
        let mut engine = engine(RecordingAnalyticsSink::new());
        engine.process_message(Message::Quit);
    }

    #[tokio::test]
    async fn test_phase_change_event() {
        let mut engine = engine(RecordingAnalyticsSink::new());
        let mut rx = engine.subscribe();

        engine.process_message(Message::Quit);

        let events = drain(&mut rx);
        assert!(events.iter().any(|e| matches!(
            e,
            EngineEvent::PhaseChanged {
                old_phase: AppPhase::Initializing,
                new_phase: AppPhase::Quitting,
            }
        )));
    }

    #[tokio::test]
    async fn test_navigate_loads_page_and_broadcasts() {
        let mut engine = engine(RecordingAnalyticsSink::new());
        let mut rx = engine.subscribe();

        engine.process_message(Message::Navigate {
            target: "/en/quickstart".into(),
        });
        assert_eq!(engine.state.phase, AppPhase::Loading);
        assert!(engine.process_next().await);
        assert_eq!(engine.state.phase, AppPhase::Ready);

        let labels: Vec<_> = drain(&mut rx).iter().map(|e| e.event_type()).collect();
        assert_eq!(
            labels,
            vec![
                "navigated",
                "phase_changed",
                "page_ready",
                "analytics_queued",
                "phase_changed"
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_loads_after_shutdown_never_report_back() {
        let mut engine = engine(RecordingAnalyticsSink::new());
        engine.shutdown().await;

        engine.process_message(Message::Navigate {
            target: "/en/quickstart".into(),
        });
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(engine.msg_rx.try_recv().is_err());
        assert_eq!(engine.state.phase, AppPhase::Loading);
    }

    #[tokio::test]
    async fn test_shutdown_flushes_queued_analytics() {
        let sink = RecordingAnalyticsSink::new();
        let mut engine = engine(sink.clone());

        engine.process_message(Message::Navigate {
            target: "/en/quickstart".into(),
        });
        assert!(engine.process_next().await);
        engine.process_message(Message::Quit);
        engine.shutdown().await;

        let types: Vec<_> = sink.events().iter().map(|e| e.event_type).collect();
        assert_eq!(types, vec![EventType::Pageview, EventType::Exit]);
    }
}
