//! Application error types with rich context

use thiserror::Error;

use crate::types::PickerKind;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    // ─────────────────────────────────────────────────────────────
    // Widget Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid selection: '{value}' is not offered for {kind} on this page")]
    InvalidSelection { kind: PickerKind, value: String },

    #[error("Invalid email address: {email}")]
    InvalidEmail { email: String },

    #[error("Unknown locale: {locale}")]
    UnknownLocale { locale: String },

    #[error("Unknown version: {version}")]
    UnknownVersion { version: String },

    // ─────────────────────────────────────────────────────────────
    // Preference Store Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Preference store error: {message}")]
    Store { message: String },

    #[error("Preference key '{key}' is outside this store scope")]
    StoreScope { key: String },

    // ─────────────────────────────────────────────────────────────
    // Network Errors
    // ─────────────────────────────────────────────────────────────
    #[error("HTTP error: {message}")]
    Http { message: String },

    #[error("Unexpected HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    #[error("Page parse error: {message}")]
    Page { message: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn invalid_selection(kind: PickerKind, value: impl Into<String>) -> Self {
        Self::InvalidSelection {
            kind,
            value: value.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    pub fn http(message: impl Into<String>) -> Self {
        Self::Http {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    pub fn page(message: impl Into<String>) -> Self {
        Self::Page {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error
    ///
    /// Recoverable errors are absorbed locally by the widget that hit them
    /// (empty suggestion list, dropped analytics event, rejected selection).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::InvalidSelection { .. }
                | Error::InvalidEmail { .. }
                | Error::UnknownLocale { .. }
                | Error::UnknownVersion { .. }
                | Error::Store { .. }
                | Error::StoreScope { .. }
                | Error::Http { .. }
                | Error::HttpStatus { .. }
                | Error::MalformedResponse { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = Error::invalid_selection(PickerKind::Platform, "beos");
        assert_eq!(
            err.to_string(),
            "Invalid selection: 'beos' is not offered for platform on this page"
        );

        let err = Error::HttpStatus {
            status: 502,
            url: "http://localhost/api/events".to_string(),
        };
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_from_url_parse() {
        let err: Error = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, Error::Url(_)));
    }

    #[test]
    fn test_error_is_recoverable() {
        assert!(Error::http("connection refused").is_recoverable());
        assert!(Error::malformed("expected array").is_recoverable());
        assert!(Error::invalid_selection(PickerKind::Tool, "vim").is_recoverable());
        assert!(Error::store("disk full").is_recoverable());
        assert!(!Error::config("bad base_url").is_recoverable());
    }
}
