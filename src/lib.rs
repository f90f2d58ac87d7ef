//! docsite - Headless driver for the documentation-site widget engine
//!
//! The widget state machines live in `docsite-app`; this crate wires them to
//! stdin/stdout so sessions can be scripted without a browser.

pub mod headless;

// Re-export main entry points
pub use headless::runner::{run_headless, HeadlessOptions};
