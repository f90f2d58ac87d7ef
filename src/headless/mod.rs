//! Headless mode - NDJSON event output for scripted sessions
//!
//! The headless driver reads line commands from stdin and writes every
//! engine event to stdout as one JSON object per line. This keeps scripts and
//! E2E tests independent of any rendering.
//!
//! # Event Format
//!
//! Each event has an "event" field indicating its type, along with
//! event-specific data and a millisecond timestamp.
//!
//! # Example Output
//!
//! ```json
//! {"event":"navigated","url":"http://localhost:4000/en/get-started","locale":"en","version":"free-pro-team@latest","timestamp":1704700001000}
//! {"event":"page_ready","path":"/en/get-started","title":"Get started","selections":{"platform":"linux"},"visible_sections":["linux"],"visible_minitoc":[],"has_survey":true,"timestamp":1704700001042}
//! {"event":"analytics_queued","event_type":"pageview","timestamp":1704700001042}
//! ```

pub mod commands;
pub mod runner;

use std::collections::BTreeMap;
use std::io::{self, Write};

use chrono::Utc;
use docsite_app::hover::HoverPreview;
use docsite_app::state::RenderedSample;
use docsite_app::EngineEvent;
use docsite_core::{AppPhase, EventType, Suggestion, SurveyPhase};
use serde::Serialize;
use tracing::error;

/// Events emitted in headless mode
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    Navigated {
        url: String,
        locale: String,
        version: String,
        timestamp: i64,
    },

    Redirected {
        from: String,
        to: String,
        timestamp: i64,
    },

    NavigationFailed {
        url: String,
        error: String,
        timestamp: i64,
    },

    PageReady {
        path: String,
        title: String,
        selections: BTreeMap<String, String>,
        visible_sections: Vec<String>,
        visible_minitoc: Vec<String>,
        has_survey: bool,
        timestamp: i64,
    },

    LocationReplaced { url: String, timestamp: i64 },

    SectionsChanged {
        picker: String,
        value: String,
        visible_sections: Vec<String>,
        visible_minitoc: Vec<String>,
        timestamp: i64,
    },

    SelectionRejected {
        control: String,
        value: String,
        reason: String,
        timestamp: i64,
    },

    CodeSamplesUpdated {
        version: String,
        samples: Vec<RenderedSample>,
        timestamp: i64,
    },

    SurveyPhaseChanged { phase: SurveyPhase, timestamp: i64 },

    SurveyRejected { reason: String, timestamp: i64 },

    SearchOverlayToggled { open: bool, timestamp: i64 },

    SuggestionsUpdated {
        query: String,
        suggestions: Vec<Suggestion>,
        timestamp: i64,
    },

    SearchHighlightChanged {
        index: Option<usize>,
        timestamp: i64,
    },

    HoverCardShown {
        link_id: String,
        href: String,
        preview: Option<HoverPreview>,
        timestamp: i64,
    },

    HoverCardHidden { link_id: String, timestamp: i64 },

    AnalyticsQueued {
        event_type: EventType,
        timestamp: i64,
    },

    PhaseChanged {
        old_phase: AppPhase,
        new_phase: AppPhase,
        timestamp: i64,
    },

    Shutdown { timestamp: i64 },

    /// Bad command or startup problem
    Error {
        message: String,
        fatal: bool,
        timestamp: i64,
    },
}

impl HeadlessEvent {
    /// Emit this event to stdout as JSON
    pub fn emit(&self) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize headless event: {}", e);
                return;
            }
        };

        // Write to stdout with newline (NDJSON format)
        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", json) {
            error!("Failed to write headless event to stdout: {}", e);
            return;
        }

        // Flush to ensure immediate output
        if let Err(e) = stdout.flush() {
            error!("Failed to flush headless stdout: {}", e);
        }
    }

    /// Get current timestamp in milliseconds
    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    pub fn error(message: impl Into<String>, fatal: bool) -> Self {
        Self::Error {
            message: message.into(),
            fatal,
            timestamp: Self::now(),
        }
    }
}

impl From<&EngineEvent> for HeadlessEvent {
    fn from(event: &EngineEvent) -> Self {
        let timestamp = Self::now();
        match event.clone() {
            EngineEvent::Navigated {
                url,
                locale,
                version,
            } => Self::Navigated {
                url: url.into(),
                locale,
                version,
                timestamp,
            },
            EngineEvent::Redirected { from, to } => Self::Redirected {
                from: from.into(),
                to: to.into(),
                timestamp,
            },
            EngineEvent::NavigationFailed { url, error } => Self::NavigationFailed {
                url: url.into(),
                error,
                timestamp,
            },
            EngineEvent::PageReady {
                path,
                title,
                selections,
                visible_sections,
                visible_minitoc,
                has_survey,
            } => Self::PageReady {
                path,
                title,
                selections: selections
                    .into_iter()
                    .map(|(kind, value)| (kind.as_str().to_string(), value))
                    .collect(),
                visible_sections,
                visible_minitoc,
                has_survey,
                timestamp,
            },
            EngineEvent::LocationReplaced { url } => Self::LocationReplaced {
                url: url.into(),
                timestamp,
            },
            EngineEvent::SectionsChanged {
                kind,
                value,
                visible_sections,
                visible_minitoc,
            } => Self::SectionsChanged {
                picker: kind.as_str().to_string(),
                value,
                visible_sections,
                visible_minitoc,
                timestamp,
            },
            EngineEvent::SelectionRejected {
                control,
                value,
                reason,
            } => Self::SelectionRejected {
                control,
                value,
                reason,
                timestamp,
            },
            EngineEvent::CodeSamplesUpdated { version, samples } => Self::CodeSamplesUpdated {
                version,
                samples,
                timestamp,
            },
            EngineEvent::SurveyPhaseChanged { phase } => {
                Self::SurveyPhaseChanged { phase, timestamp }
            }
            EngineEvent::SurveyRejected { reason } => Self::SurveyRejected { reason, timestamp },
            EngineEvent::SearchOverlayToggled { open } => {
                Self::SearchOverlayToggled { open, timestamp }
            }
            EngineEvent::SuggestionsUpdated { query, suggestions } => Self::SuggestionsUpdated {
                query,
                suggestions,
                timestamp,
            },
            EngineEvent::SearchHighlightChanged { index } => {
                Self::SearchHighlightChanged { index, timestamp }
            }
            EngineEvent::HoverCardShown {
                link_id,
                href,
                preview,
            } => Self::HoverCardShown {
                link_id,
                href,
                preview,
                timestamp,
            },
            EngineEvent::HoverCardHidden { link_id } => {
                Self::HoverCardHidden { link_id, timestamp }
            }
            EngineEvent::AnalyticsQueued { event_type } => Self::AnalyticsQueued {
                event_type,
                timestamp,
            },
            EngineEvent::PhaseChanged {
                old_phase,
                new_phase,
            } => Self::PhaseChanged {
                old_phase,
                new_phase,
                timestamp,
            },
            EngineEvent::Shutdown => Self::Shutdown { timestamp },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsite_core::PickerKind;
    use url::Url;

    #[test]
    fn test_event_tag_matches_engine_label() {
        let engine_event = EngineEvent::SectionsChanged {
            kind: PickerKind::Platform,
            value: "mac".into(),
            visible_sections: vec!["mac-steps".into()],
            visible_minitoc: vec![],
        };
        let json = serde_json::to_value(HeadlessEvent::from(&engine_event)).unwrap();
        assert_eq!(json["event"], engine_event.event_type());
        assert_eq!(json["picker"], "platform");
        assert!(json["timestamp"].as_i64().unwrap() > 0);
    }

    #[test]
    fn test_page_ready_serializes_selections_by_name() {
        let mut selections = BTreeMap::new();
        selections.insert(PickerKind::Tool, "cli".to_string());
        let event = HeadlessEvent::from(&EngineEvent::PageReady {
            path: "/en/a".into(),
            title: "A".into(),
            selections,
            visible_sections: vec![],
            visible_minitoc: vec![],
            has_survey: true,
        });
        let json = serde_json::to_value(event).unwrap();
        assert_eq!(json["event"], "page_ready");
        assert_eq!(json["selections"]["tool"], "cli");
    }

    #[test]
    fn test_urls_serialize_as_strings() {
        let event = HeadlessEvent::from(&EngineEvent::Redirected {
            from: Url::parse("http://localhost:4000/en/a").unwrap(),
            to: Url::parse("http://localhost:4000/ja/a").unwrap(),
        });
        let json = serde_json::to_value(event).unwrap();
        assert_eq!(json["to"], "http://localhost:4000/ja/a");
    }

    #[test]
    fn test_phase_values_are_snake_case() {
        let event = HeadlessEvent::from(&EngineEvent::PhaseChanged {
            old_phase: AppPhase::Loading,
            new_phase: AppPhase::Ready,
        });
        let json = serde_json::to_value(event).unwrap();
        assert_eq!(json["new_phase"], "ready");
        assert_eq!(json["old_phase"], "loading");
    }
}
