//! Configuration types for the docsite engine
//!
//! Defines:
//! - `Settings` - Global engine settings (`.docsite/config.toml`)
//! - Per-widget sub-sections (`[site]`, `[search]`, `[hover]`, ...)

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Engine settings (.docsite/config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub site: SiteSettings,

    #[serde(default)]
    pub search: SearchSettings,

    #[serde(default)]
    pub hover: HoverSettings,

    #[serde(default)]
    pub analytics: AnalyticsSettings,

    #[serde(default)]
    pub preferences: PreferenceSettings,
}

/// One product version the site serves
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VersionSettings {
    /// Version id as it appears in URLs and cookies
    pub id: String,

    /// Hostname substituted into code samples for this version
    pub hostname: String,

    /// Version lives in a path segment (`/en/<id>/...`) instead of the
    /// version query parameter
    #[serde(default)]
    pub in_path: bool,
}

/// Site-wide settings: base URL, locales, versions
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteSettings {
    /// Base URL of the running documentation server
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Locales recognised as the first path segment
    #[serde(default = "default_locales")]
    pub locales: Vec<String>,

    #[serde(default = "default_locale")]
    pub default_locale: String,

    #[serde(default = "default_versions")]
    pub versions: Vec<VersionSettings>,

    #[serde(default = "default_version")]
    pub default_version: String,

    /// Query parameter carrying the version (`?apiVersion=...`)
    #[serde(default = "default_version_param")]
    pub version_param: String,

    /// Placeholder replaced by the version hostname inside code samples
    #[serde(default = "default_hostname_placeholder")]
    pub hostname_placeholder: String,
}

impl SiteSettings {
    pub fn version(&self, id: &str) -> Option<&VersionSettings> {
        self.versions.iter().find(|v| v.id == id)
    }

    pub fn has_locale(&self, locale: &str) -> bool {
        self.locales.iter().any(|l| l == locale)
    }
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            locales: default_locales(),
            default_locale: default_locale(),
            versions: default_versions(),
            default_version: default_version(),
            version_param: default_version_param(),
            hostname_placeholder: default_hostname_placeholder(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:4000".to_string()
}

fn default_locales() -> Vec<String> {
    ["en", "es", "ja", "pt", "zh", "ru", "fr", "ko", "de"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_versions() -> Vec<VersionSettings> {
    vec![VersionSettings {
        id: default_version(),
        hostname: "api.github.com".to_string(),
        in_path: false,
    }]
}

fn default_version() -> String {
    "free-pro-team@latest".to_string()
}

fn default_version_param() -> String {
    "apiVersion".to_string()
}

fn default_hostname_placeholder() -> String {
    "HOSTNAME".to_string()
}

/// Search overlay settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchSettings {
    /// Quiet period after the last keystroke before suggestions are fetched
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Maximum suggestions shown for the empty query (top queries)
    #[serde(default = "default_max_top_queries")]
    pub max_top_queries: usize,

    /// Maximum suggestions shown for a typed query, echo included
    #[serde(default = "default_max_query_suggestions")]
    pub max_query_suggestions: usize,

    /// Autocomplete endpoint path
    #[serde(default = "default_suggestions_path")]
    pub suggestions_path: String,

    /// Path of the general search results page (after the locale)
    #[serde(default = "default_search_path")]
    pub search_path: String,

    #[serde(default = "default_query_param")]
    pub query_param: String,

    #[serde(default = "default_overlay_param")]
    pub overlay_param: String,
}

impl SearchSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            max_top_queries: default_max_top_queries(),
            max_query_suggestions: default_max_query_suggestions(),
            suggestions_path: default_suggestions_path(),
            search_path: default_search_path(),
            query_param: default_query_param(),
            overlay_param: default_overlay_param(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_max_top_queries() -> usize {
    4
}

fn default_max_query_suggestions() -> usize {
    3
}

fn default_suggestions_path() -> String {
    "/api/search/autocomplete".to_string()
}

fn default_search_path() -> String {
    "/search".to_string()
}

fn default_query_param() -> String {
    "query".to_string()
}

fn default_overlay_param() -> String {
    "search-overlay-input".to_string()
}

/// Hover card settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HoverSettings {
    /// Delay before a hovered link opens its card (must be non-zero)
    #[serde(default = "default_show_delay_ms")]
    pub show_delay_ms: u64,

    /// Delay before an unhovered card closes
    #[serde(default = "default_hide_delay_ms")]
    pub hide_delay_ms: u64,
}

impl HoverSettings {
    /// Show delay, clamped to at least 1ms so hovering never opens instantly
    pub fn show_delay(&self) -> Duration {
        Duration::from_millis(self.show_delay_ms.max(1))
    }

    pub fn hide_delay(&self) -> Duration {
        Duration::from_millis(self.hide_delay_ms)
    }
}

impl Default for HoverSettings {
    fn default() -> Self {
        Self {
            show_delay_ms: default_show_delay_ms(),
            hide_delay_ms: default_hide_delay_ms(),
        }
    }
}

fn default_show_delay_ms() -> u64 {
    300
}

fn default_hide_delay_ms() -> u64 {
    200
}

/// Analytics settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalyticsSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_events_path")]
    pub events_path: String,

    /// How long shutdown waits for queued events
    #[serde(default = "default_flush_timeout_ms")]
    pub flush_timeout_ms: u64,
}

impl AnalyticsSettings {
    pub fn flush_timeout(&self) -> Duration {
        Duration::from_millis(self.flush_timeout_ms)
    }
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            events_path: default_events_path(),
            flush_timeout_ms: default_flush_timeout_ms(),
        }
    }
}

fn default_events_path() -> String {
    "/api/events".to_string()
}

fn default_flush_timeout_ms() -> u64 {
    2000
}

fn default_true() -> bool {
    true
}

/// Where preferences (the cookie jar) live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// `.docsite/preferences.toml`, survives restarts
    #[default]
    File,
    /// In-memory, gone on exit
    Memory,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PreferenceSettings {
    #[serde(default)]
    pub backend: StoreBackend,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.site.default_locale, "en");
        assert!(settings.site.has_locale("ja"));
        assert_eq!(settings.search.max_top_queries, 4);
        assert_eq!(settings.search.max_query_suggestions, 3);
        assert_eq!(settings.search.overlay_param, "search-overlay-input");
        assert!(settings.analytics.enabled);
        assert_eq!(settings.preferences.backend, StoreBackend::File);
    }

    #[test]
    fn test_show_delay_never_zero() {
        let hover = HoverSettings {
            show_delay_ms: 0,
            hide_delay_ms: 0,
        };
        assert_eq!(hover.show_delay(), Duration::from_millis(1));
        assert_eq!(hover.hide_delay(), Duration::ZERO);
    }

    #[test]
    fn test_versions_deserialize() {
        let toml = r#"
[site]
default_version = "enterprise-server@3.12"

[[site.versions]]
id = "enterprise-server@3.12"
hostname = "HOSTNAME/api/v3"
in_path = true
"#;
        let settings: Settings = toml::from_str(toml).unwrap();
        let v = settings.site.version("enterprise-server@3.12").unwrap();
        assert!(v.in_path);
        assert_eq!(v.hostname, "HOSTNAME/api/v3");
        assert!(settings.site.version("free-pro-team@latest").is_none());
    }
}
