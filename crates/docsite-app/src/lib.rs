//! docsite-app - Widget state machines and orchestration for the docsite client
//!
//! This crate implements the TEA (The Elm Architecture) pattern for the page
//! widgets of a documentation site (pickers, survey, search overlay, hover
//! cards) plus locale/version negotiation, the Engine that drives them, the
//! preference store and configuration loading.

pub mod actions;
pub mod config;
pub mod engine;
pub mod engine_event;
pub mod handler;
pub mod hover;
pub mod input_key;
pub mod message;
pub mod negotiator;
pub mod picker;
pub mod process;
pub mod search;
pub mod state;
pub mod store;
pub mod survey;

// Re-export primary types
pub use engine::Engine;
pub use engine_event::EngineEvent;
pub use handler::{TimerSlot, UpdateAction, UpdateResult};
pub use input_key::InputKey;
pub use message::Message;
pub use state::{AppState, UiMode};
pub use store::{FileStore, MemoryStore, PreferenceStore, ScopedStore};
