//! Core domain types shared by every docsite crate

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Engine lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppPhase {
    /// No page requested yet
    #[default]
    Initializing,
    /// A navigation is in flight
    Loading,
    /// A page is loaded and its widgets are live
    Ready,
    /// The last navigation failed; no page content is shown
    Failed,
    /// Shutting down
    Quitting,
}

// ─────────────────────────────────────────────────────────────────
// Pickers
// ─────────────────────────────────────────────────────────────────

/// Kind of content picker a page can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickerKind {
    Platform,
    Tool,
    Language,
    Version,
}

impl PickerKind {
    pub const ALL: [PickerKind; 4] = [
        PickerKind::Platform,
        PickerKind::Tool,
        PickerKind::Language,
        PickerKind::Version,
    ];

    /// Preference store key for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            PickerKind::Platform => "platform",
            PickerKind::Tool => "tool",
            PickerKind::Language => "language",
            PickerKind::Version => "version",
        }
    }
}

impl fmt::Display for PickerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PickerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "platform" | "os" => Ok(PickerKind::Platform),
            "tool" => Ok(PickerKind::Tool),
            "language" | "lang" => Ok(PickerKind::Language),
            "version" => Ok(PickerKind::Version),
            other => Err(format!("unknown picker kind: {other}")),
        }
    }
}

/// A single `kind = value` selection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PickerSelection {
    pub kind: PickerKind,
    pub value: String,
}

impl PickerSelection {
    pub fn new(kind: PickerKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    /// Parse the `kind:value` form used in `data-requires` attributes
    pub fn parse(token: &str) -> Option<Self> {
        let (kind, value) = token.split_once(':')?;
        let kind = kind.parse().ok()?;
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        Some(Self::new(kind, value))
    }
}

impl fmt::Display for PickerSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.value)
    }
}

// ─────────────────────────────────────────────────────────────────
// Survey
// ─────────────────────────────────────────────────────────────────

/// Thumbs up / thumbs down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurveyVote {
    Up,
    Down,
}

impl SurveyVote {
    /// Wire representation (`survey_vote: boolean`)
    pub fn as_bool(&self) -> bool {
        matches!(self, SurveyVote::Up)
    }
}

impl FromStr for SurveyVote {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "yes" | "true" => Ok(SurveyVote::Up),
            "down" | "no" | "false" => Ok(SurveyVote::Down),
            other => Err(format!("unknown vote: {other}")),
        }
    }
}

/// Survey widget phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurveyPhase {
    #[default]
    Idle,
    Voted,
    Submitted,
}

impl fmt::Display for SurveyPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurveyPhase::Idle => write!(f, "idle"),
            SurveyPhase::Voted => write!(f, "voted"),
            SurveyPhase::Submitted => write!(f, "submitted"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Search
// ─────────────────────────────────────────────────────────────────

/// One autocomplete candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
    #[serde(default, rename = "url", skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,
}

impl Suggestion {
    pub fn query(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            target_url: None,
        }
    }

    pub fn link(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            target_url: Some(url.into()),
        }
    }
}
