//! Configuration file parsing for the docsite engine
//!
//! Supports:
//! - `.docsite/config.toml` - Engine settings

pub mod settings;
pub mod types;

pub use settings::{init_config_dir, load_settings, DOCSITE_DIR};
pub use types::*;
