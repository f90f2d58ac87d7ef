//! Analytics sink and the fire-and-forget dispatcher in front of it
//!
//! Callers never observe delivery: [`AnalyticsHandle::dispatch`] only enqueues.
//! A single worker task drains the queue into the sink. The queue is owned by
//! the engine rather than by any page, so events queued right before a
//! navigation (the `exit` event in particular) still go out, which is the
//! guarantee a browser beacon gives.

use std::time::Duration;

use docsite_core::prelude::*;
use docsite_core::AnalyticsEvent;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use url::Url;

use crate::client::{check_status, transport_error, SiteClient};

/// Default analytics endpoint path
pub const DEFAULT_EVENTS_PATH: &str = "/api/events";

/// Receives analytics events
#[trait_variant::make(AnalyticsSink: Send)]
pub trait LocalAnalyticsSink {
    async fn send(&self, event: &AnalyticsEvent) -> Result<()>;
}

/// [`AnalyticsSink`] posting JSON to the site's events endpoint
#[derive(Debug, Clone)]
pub struct HttpAnalyticsSink {
    client: SiteClient,
    endpoint: Url,
}

impl HttpAnalyticsSink {
    pub fn new(client: SiteClient, path: &str) -> Result<Self> {
        let endpoint = client.url(path)?;
        Ok(Self { client, endpoint })
    }
}

impl AnalyticsSink for HttpAnalyticsSink {
    async fn send(&self, event: &AnalyticsEvent) -> Result<()> {
        let resp = self
            .client
            .http()
            .post(self.endpoint.clone())
            .json(event)
            .send()
            .await
            .map_err(transport_error)?;
        check_status(resp)?;
        Ok(())
    }
}

/// Sink that drops everything (analytics disabled)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAnalyticsSink;

impl AnalyticsSink for NullAnalyticsSink {
    async fn send(&self, _event: &AnalyticsEvent) -> Result<()> {
        Ok(())
    }
}

/// Cloneable, non-blocking enqueue capability
#[derive(Debug, Clone)]
pub struct AnalyticsHandle {
    tx: mpsc::UnboundedSender<AnalyticsEvent>,
}

impl AnalyticsHandle {
    /// Queue an event. Never blocks and never reports failure to the caller.
    pub fn dispatch(&self, event: AnalyticsEvent) {
        let event_type = event.event_type.as_str();
        if self.tx.send(event).is_err() {
            debug!("Analytics dispatcher closed; dropping {} event", event_type);
        }
    }
}

/// Owns the worker task that drains queued events into a sink
pub struct AnalyticsDispatcher {
    handle: AnalyticsHandle,
    worker: JoinHandle<()>,
}

impl AnalyticsDispatcher {
    /// Spawn the worker on the current tokio runtime
    pub fn spawn<S>(sink: S) -> Self
    where
        S: AnalyticsSink + Sync + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<AnalyticsEvent>();

        let worker = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let event_type = event.event_type.as_str();
                match sink.send(&event).await {
                    Ok(()) => trace!("Delivered {} event {}", event_type, event.context.event_id),
                    Err(e) => debug!("Dropping {} event after delivery failure: {}", event_type, e),
                }
            }
            debug!("Analytics worker exiting");
        });

        Self {
            handle: AnalyticsHandle { tx },
            worker,
        }
    }

    pub fn handle(&self) -> AnalyticsHandle {
        self.handle.clone()
    }

    /// Close the queue and wait (bounded) for already queued events.
    ///
    /// Every other [`AnalyticsHandle`] clone must be dropped first or the
    /// worker keeps waiting until the timeout.
    pub async fn flush(self, timeout: Duration) {
        let Self { handle, worker } = self;
        drop(handle);
        if tokio::time::timeout(timeout, worker).await.is_err() {
            warn!("Analytics flush timed out after {:?}", timeout);
        }
    }
}
