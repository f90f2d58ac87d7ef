//! Analytics event payloads posted to `/api/events`

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::SurveyVote;

/// Event type discriminator (`type` field on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Pageview,
    Exit,
    Survey,
    Search,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Pageview => "pageview",
            EventType::Exit => "exit",
            EventType::Survey => "survey",
            EventType::Search => "search",
        }
    }
}

/// Context shared by every event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventContext {
    pub event_id: String,
    /// Id of the pageview event of the page this event belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_event_id: Option<String>,
    pub created: DateTime<Utc>,
    pub path: String,
    pub path_language: String,
    pub path_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_preference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_preference: Option<String>,
}

impl EventContext {
    pub fn new(path: impl Into<String>, locale: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            event_id: new_event_id(),
            page_event_id: None,
            created: Utc::now(),
            path: path.into(),
            path_language: locale.into(),
            path_version: version.into(),
            platform_preference: None,
            tool_preference: None,
        }
    }
}

/// One analytics event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub context: EventContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub survey_vote: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub survey_comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub survey_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
}

impl AnalyticsEvent {
    fn bare(event_type: EventType, context: EventContext) -> Self {
        Self {
            event_type,
            context,
            survey_vote: None,
            survey_comment: None,
            survey_email: None,
            search_query: None,
        }
    }

    pub fn pageview(context: EventContext) -> Self {
        Self::bare(EventType::Pageview, context)
    }

    pub fn exit(context: EventContext) -> Self {
        Self::bare(EventType::Exit, context)
    }

    /// Survey event; comment and email are omitted when empty
    pub fn survey(
        context: EventContext,
        vote: SurveyVote,
        comment: Option<&str>,
        email: Option<&str>,
    ) -> Self {
        let non_empty = |s: Option<&str>| {
            s.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            survey_vote: Some(vote.as_bool()),
            survey_comment: non_empty(comment),
            survey_email: non_empty(email),
            ..Self::bare(EventType::Survey, context)
        }
    }

    pub fn search(context: EventContext, query: impl Into<String>) -> Self {
        Self {
            search_query: Some(query.into()),
            ..Self::bare(EventType::Search, context)
        }
    }
}

/// Random 128-bit id rendered as lowercase hex
pub fn new_event_id() -> String {
    let id: u128 = rand::thread_rng().gen();
    format!("{id:032x}")
}
