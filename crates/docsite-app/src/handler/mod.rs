//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `navigation`: Negotiation, page loading and scope teardown
//! - `picker`: Picker, locale and version selection
//! - `survey`: Survey widget transitions
//! - `search`: Search overlay input, suggestions and submission
//! - `hover`: Hover card delays and previews
//! - `keys`: Key routing per UI mode

pub(crate) mod hover;
pub(crate) mod keys;
pub(crate) mod navigation;
pub(crate) mod picker;
pub(crate) mod search;
pub(crate) mod survey;
pub(crate) mod update;


use std::time::Duration;

use docsite_core::AnalyticsEvent;
use url::Url;

use crate::message::Message;

// Re-export main entry point
pub use update::update;

/// Named timer slots. Arming a slot replaces whatever was armed in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerSlot {
    SearchDebounce,
    HoverShow,
    HoverHide,
}

/// Actions that the event loop should perform after update
#[derive(Debug, Clone)]
pub enum UpdateAction {
    /// Fetch and parse the page for navigation `nav_id`
    LoadPage { nav_id: u64, url: Url },

    /// Ask the suggestion source for `query`, tagged with request `seq`
    FetchSuggestions { seq: u64, query: String },

    /// Fetch the page behind a hover card link for its preview
    FetchHoverPreview { href: String, url: Url },

    /// Queue an analytics event (fire-and-forget)
    SendAnalytics(Box<AnalyticsEvent>),

    /// Deliver `message` after `delay` unless the slot is re-armed or cancelled
    ScheduleTimer {
        slot: TimerSlot,
        delay: Duration,
        message: Box<Message>,
    },

    CancelTimer(TimerSlot),

    /// Scope boundary: cancel every armed timer
    CancelAllTimers,

    /// Several actions, performed in order
    Batch(Vec<UpdateAction>),
}

impl UpdateAction {
    /// Combine optional actions, collapsing empty and single-element lists
    pub fn batch(actions: Vec<UpdateAction>) -> Option<UpdateAction> {
        let mut actions = actions;
        match actions.len() {
            0 => None,
            1 => actions.pop(),
            _ => Some(UpdateAction::Batch(actions)),
        }
    }

    pub fn schedule(slot: TimerSlot, delay: Duration, message: Message) -> Self {
        UpdateAction::ScheduleTimer {
            slot,
            delay,
            message: Box::new(message),
        }
    }

    /// Flattened view of this action (batches expanded)
    pub fn flatten(&self) -> Vec<&UpdateAction> {
        match self {
            UpdateAction::Batch(actions) => actions.iter().flat_map(|a| a.flatten()).collect(),
            other => vec![other],
        }
    }
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }

    /// Several actions; empty means none
    pub fn actions(actions: Vec<UpdateAction>) -> Self {
        Self {
            message: None,
            action: UpdateAction::batch(actions),
        }
    }
}
