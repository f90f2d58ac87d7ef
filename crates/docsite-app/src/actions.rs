//! Action handlers: UpdateAction dispatch and background task spawning

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use docsite_net::{AnalyticsHandle, PageSource, SuggestionSource};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::handler::{TimerSlot, UpdateAction};
use crate::hover::HoverPreview;
use crate::message::Message;

/// Collaborators the spawned tasks talk to
pub struct Services<P, Q> {
    pub pages: Arc<P>,
    pub suggestions: Arc<Q>,
    /// Analytics queue; `None` once the engine has started flushing
    pub analytics: Option<AnalyticsHandle>,
    /// Flips to `true` on engine shutdown; in-flight fetches give up
    pub shutdown_rx: watch::Receiver<bool>,
}

impl<P, Q> Services<P, Q> {
    pub fn new(
        pages: P,
        suggestions: Q,
        analytics: Option<AnalyticsHandle>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            pages: Arc::new(pages),
            suggestions: Arc::new(suggestions),
            analytics,
            shutdown_rx,
        }
    }
}

/// Resolves once shutdown is signalled. Never resolves if the engine is gone.
async fn shutdown_signalled(mut shutdown_rx: watch::Receiver<bool>) {
    let sender_gone = shutdown_rx.wait_for(|stop| *stop).await.is_err();
    if sender_gone {
        std::future::pending::<()>().await;
    }
}

/// Run `fetch` on its own task and report its message, unless shutdown wins
fn spawn_fetch<F>(
    label: &'static str,
    fetch: F,
    msg_tx: &mpsc::Sender<Message>,
    shutdown_rx: &watch::Receiver<bool>,
)
where
    F: Future<Output = Message> + Send + 'static,
{
    let tx = msg_tx.clone();
    let shutdown_rx = shutdown_rx.clone();
    tokio::spawn(async move {
        tokio::select! {
            biased;
            _ = shutdown_signalled(shutdown_rx) => {
                debug!("{} abandoned on shutdown", label);
            }
            msg = fetch => {
                if tx.send(msg).await.is_err() {
                    trace!("{} finished after the engine closed", label);
                }
            }
        }
    });
}

/// Armed timers, at most one per slot
#[derive(Debug, Default)]
pub struct TimerSlots {
    slots: HashMap<TimerSlot, JoinHandle<()>>,
}

impl TimerSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `message` after `delay`, replacing whatever the slot held
    pub fn arm(
        &mut self,
        slot: TimerSlot,
        delay: Duration,
        message: Message,
        msg_tx: mpsc::Sender<Message>,
    ) {
        self.cancel(slot);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = msg_tx.send(message).await;
        });
        self.slots.insert(slot, handle);
    }

    pub fn cancel(&mut self, slot: TimerSlot) {
        if let Some(handle) = self.slots.remove(&slot) {
            handle.abort();
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, handle) in self.slots.drain() {
            handle.abort();
        }
    }

    /// Whether `slot` holds a timer that has not fired yet
    pub fn is_armed(&self, slot: TimerSlot) -> bool {
        self.slots
            .get(&slot)
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for TimerSlots {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

/// Execute an action, spawning background tasks where it needs I/O
pub fn handle_action<P, Q>(
    action: UpdateAction,
    msg_tx: &mpsc::Sender<Message>,
    services: &Services<P, Q>,
    timers: &mut TimerSlots,
) where
    P: PageSource + Sync + 'static,
    Q: SuggestionSource + Sync + 'static,
{
    match action {
        UpdateAction::LoadPage { nav_id, url } => {
            let pages = services.pages.clone();
            let fetch = async move {
                let result = pages
                    .fetch_page(&url)
                    .await
                    .map(Box::new)
                    .map_err(|e| e.to_string());
                Message::PageLoaded { nav_id, url, result }
            };
            spawn_fetch("Page load", fetch, msg_tx, &services.shutdown_rx);
        }

        UpdateAction::FetchSuggestions { seq, query } => {
            let suggestions = services.suggestions.clone();
            let fetch = async move {
                let result = suggestions.suggest(&query).await.map_err(|e| e.to_string());
                Message::SuggestionsLoaded { seq, result }
            };
            spawn_fetch("Suggestion fetch", fetch, msg_tx, &services.shutdown_rx);
        }

        UpdateAction::FetchHoverPreview { href, url } => {
            let pages = services.pages.clone();
            let fetch = async move {
                let result = pages
                    .fetch_page(&url)
                    .await
                    .map(|page| HoverPreview::from_page(&page))
                    .map_err(|e| e.to_string());
                Message::HoverPreviewLoaded { href, result }
            };
            spawn_fetch("Preview fetch", fetch, msg_tx, &services.shutdown_rx);
        }

        UpdateAction::SendAnalytics(event) => match &services.analytics {
            Some(analytics) => analytics.dispatch(*event),
            None => debug!(
                "Analytics closed; dropping {} event",
                event.event_type.as_str()
            ),
        },

        UpdateAction::ScheduleTimer {
            slot,
            delay,
            message,
        } => {
            trace!("Arming {:?} for {:?}", slot, delay);
            timers.arm(slot, delay, *message, msg_tx.clone());
        }

        UpdateAction::CancelTimer(slot) => timers.cancel(slot),

        UpdateAction::CancelAllTimers => timers.cancel_all(),

        UpdateAction::Batch(actions) => {
            for action in actions {
                handle_action(action, msg_tx, services, timers);
            }
        }
    }
}
