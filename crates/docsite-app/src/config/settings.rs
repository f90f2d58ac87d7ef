//! Settings loading for `.docsite/config.toml`

use std::path::Path;

use docsite_core::prelude::*;

use super::types::Settings;

const CONFIG_FILENAME: &str = "config.toml";

/// Directory holding docsite config and the preference file
pub const DOCSITE_DIR: &str = ".docsite";

// ─────────────────────────────────────────────────────────────────────────────
// Settings Loading
// ─────────────────────────────────────────────────────────────────────────────

/// Load settings from .docsite/config.toml
///
/// Returns default settings if file doesn't exist or can't be parsed.
pub fn load_settings(config_root: &Path) -> Settings {
    let config_path = config_root.join(DOCSITE_DIR).join(CONFIG_FILENAME);

    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Create .docsite/ with a commented default config.toml if absent
pub fn init_config_dir(config_root: &Path) -> Result<()> {
    let docsite_dir = config_root.join(DOCSITE_DIR);

    if !docsite_dir.exists() {
        std::fs::create_dir_all(&docsite_dir)
            .map_err(|e| Error::config(format!("Failed to create .docsite dir: {}", e)))?;
    }

    let config_path = docsite_dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        std::fs::write(&config_path, generate_default_config())
            .map_err(|e| Error::config(format!("Failed to write config.toml: {}", e)))?;
        info!("Wrote default config to {:?}", config_path);
    }

    Ok(())
}

fn generate_default_config() -> String {
    r#"# docsite engine configuration

[site]
base_url = "http://localhost:4000"
locales = ["en", "es", "ja", "pt", "zh", "ru", "fr", "ko", "de"]
default_locale = "en"
default_version = "free-pro-team@latest"
version_param = "apiVersion"      # ?apiVersion=... selects a version in place
hostname_placeholder = "HOSTNAME" # Replaced inside pre[data-code-sample]

[[site.versions]]
id = "free-pro-team@latest"
hostname = "api.github.com"
in_path = false                   # true = version is a path segment

[search]
debounce_ms = 300
max_top_queries = 4               # Suggestions for the empty query
max_query_suggestions = 3         # Typed query, echo included
suggestions_path = "/api/search/autocomplete"
search_path = "/search"
query_param = "query"
overlay_param = "search-overlay-input"

[hover]
show_delay_ms = 300               # Never zero
hide_delay_ms = 200

[analytics]
enabled = true
events_path = "/api/events"
flush_timeout_ms = 2000

[preferences]
backend = "file"                  # "file" (.docsite/preferences.toml) or "memory"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::StoreBackend;
    use tempfile::tempdir;

    #[test]
    fn test_load_settings_defaults() {
        let temp = tempdir().unwrap();
        let settings = load_settings(temp.path());
        assert_eq!(settings.site.default_locale, "en");
        assert_eq!(settings.search.debounce_ms, 300);
    }

    #[test]
    fn test_load_settings_custom() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join(DOCSITE_DIR);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join(CONFIG_FILENAME),
            r#"
[site]
default_locale = "ja"

[search]
debounce_ms = 50

[preferences]
backend = "memory"
"#,
        )
        .unwrap();

        let settings = load_settings(temp.path());
        assert_eq!(settings.site.default_locale, "ja");
        assert_eq!(settings.search.debounce_ms, 50);
        assert_eq!(settings.search.max_top_queries, 4);
        assert_eq!(settings.preferences.backend, StoreBackend::Memory);
    }

    #[test]
    fn test_load_settings_invalid_toml() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join(DOCSITE_DIR);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(CONFIG_FILENAME), "[search\ndebounce_ms = ").unwrap();

        let settings = load_settings(temp.path());
        assert_eq!(settings.search.debounce_ms, 300);
    }

    #[test]
    fn test_init_config_dir() {
        let temp = tempdir().unwrap();
        init_config_dir(temp.path()).unwrap();

        let path = temp.path().join(DOCSITE_DIR).join(CONFIG_FILENAME);
        assert!(path.exists());

        // The generated file must round-trip to the defaults
        let settings = load_settings(temp.path());
        assert_eq!(settings.hover.show_delay_ms, 300);
        assert_eq!(settings.site.versions.len(), 1);
    }

    #[test]
    fn test_init_config_dir_idempotent() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join(DOCSITE_DIR);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(CONFIG_FILENAME), "[hover]\nshow_delay_ms = 10\n").unwrap();

        init_config_dir(temp.path()).unwrap();
        assert_eq!(load_settings(temp.path()).hover.show_delay_ms, 10);
    }
}
