//! Search overlay controller state
//!
//! Suggestion requests are keyed by a sequence number that every input change
//! bumps. A response is applied only while its sequence is still the latest
//! issued one, so a slow answer to an earlier keystroke never overwrites the
//! list for a fresher query.

use docsite_core::prelude::*;
use docsite_core::{query_param, set_query_param, Suggestion};
use url::Url;

use crate::config::SearchSettings;

/// Where `Enter` leads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTarget {
    /// General search results page for this text
    Query(String),
    /// A suggestion with its own destination
    Link { text: String, url: String },
}

impl SearchTarget {
    /// Text recorded as the submitted query
    pub fn text(&self) -> &str {
        match self {
            SearchTarget::Query(text) => text,
            SearchTarget::Link { text, .. } => text,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    open: bool,
    input: String,
    seq: u64,
    suggestions: Vec<Suggestion>,
    highlight: Option<usize>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Text sent to the suggestion endpoint: the input without surrounding
    /// whitespace
    pub fn query(&self) -> &str {
        self.input.trim()
    }

    /// Latest issued request sequence
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn highlight(&self) -> Option<usize> {
        self.highlight
    }

    /// The list region is shown only while it has entries
    pub fn list_visible(&self) -> bool {
        self.open && !self.suggestions.is_empty()
    }

    /// Open and focus the input, prefilled with `initial`.
    ///
    /// Returns the sequence of the request to issue right away.
    pub fn open(&mut self, initial: &str) -> u64 {
        self.open = true;
        self.input = initial.to_string();
        self.suggestions.clear();
        self.highlight = None;
        self.seq += 1;
        self.seq
    }

    /// Close the overlay; in-flight responses become stale
    pub fn close(&mut self) -> bool {
        if !self.open {
            return false;
        }
        self.open = false;
        self.suggestions.clear();
        self.highlight = None;
        self.seq += 1;
        true
    }

    /// Replace the input text. Returns the sequence the debounce timer must
    /// carry, or `None` while closed or when the text did not change.
    pub fn set_input(&mut self, text: &str) -> Option<u64> {
        if !self.open || self.input == text {
            return None;
        }
        self.input = text.to_string();
        self.highlight = None;
        self.seq += 1;
        Some(self.seq)
    }

    pub fn push_char(&mut self, c: char) -> Option<u64> {
        let mut text = self.input.clone();
        text.push(c);
        self.set_input(&text)
    }

    pub fn pop_char(&mut self) -> Option<u64> {
        let mut text = self.input.clone();
        text.pop()?;
        self.set_input(&text)
    }

    /// Query to fetch when the debounce timer for `seq` fires, if still current
    pub fn debounce_elapsed(&self, seq: u64) -> Option<String> {
        (self.open && seq == self.seq).then(|| self.query().to_string())
    }

    /// Apply a suggestion response. Returns `false` for stale responses.
    ///
    /// Failures and empty responses empty the list. A non-empty query puts
    /// the input first exactly as typed; the echo counts towards the cap.
    pub fn apply_suggestions(
        &mut self,
        seq: u64,
        result: std::result::Result<Vec<Suggestion>, String>,
        settings: &SearchSettings,
    ) -> bool {
        if !self.open || seq != self.seq {
            trace!("Dropping stale suggestions for seq {} (latest {})", seq, self.seq);
            return false;
        }

        self.highlight = None;
        let hits = match result {
            Ok(hits) => hits,
            Err(e) => {
                debug!("Suggestion fetch failed: {}", e);
                self.suggestions.clear();
                return true;
            }
        };

        let query = self.query();
        self.suggestions = if hits.is_empty() {
            Vec::new()
        } else if query.is_empty() {
            hits.into_iter().take(settings.max_top_queries).collect()
        } else {
            std::iter::once(Suggestion::query(self.input.as_str()))
                .chain(
                    hits.into_iter()
                        .filter(|h| !(h.target_url.is_none() && h.text == query)),
                )
                .take(settings.max_query_suggestions)
                .collect()
        };
        true
    }

    /// `none -> 0 -> ... -> n-1 -> none`
    pub fn highlight_next(&mut self) -> bool {
        let n = self.suggestions.len();
        if !self.open || n == 0 {
            return false;
        }
        self.highlight = match self.highlight {
            None => Some(0),
            Some(i) if i + 1 < n => Some(i + 1),
            Some(_) => None,
        };
        true
    }

    /// `none -> n-1 -> ... -> 0 -> none`
    pub fn highlight_prev(&mut self) -> bool {
        let n = self.suggestions.len();
        if !self.open || n == 0 {
            return false;
        }
        self.highlight = match self.highlight {
            None => Some(n - 1),
            Some(0) => None,
            Some(i) => Some(i - 1),
        };
        true
    }

    /// Resolve `Enter`. `None` when there is nothing to submit.
    pub fn target(&self) -> Option<SearchTarget> {
        if !self.open {
            return None;
        }
        match self.highlight.and_then(|i| self.suggestions.get(i)) {
            Some(Suggestion {
                text,
                target_url: Some(url),
            }) => Some(SearchTarget::Link {
                text: text.clone(),
                url: url.clone(),
            }),
            Some(s) => Some(SearchTarget::Query(s.text.clone())),
            None => {
                let query = self.query();
                (!query.is_empty()).then(|| SearchTarget::Query(query.to_string()))
            }
        }
    }
}

/// Destination of a submission.
///
/// Both `query` and the overlay-input parameter are always present. The
/// overlay-input carries the raw typed text; a suggestion URL that already
/// has either parameter keeps its own value.
pub fn submission_url(
    base: &Url,
    locale: &str,
    settings: &SearchSettings,
    target: &SearchTarget,
    raw_input: &str,
) -> Result<Url> {
    match target {
        SearchTarget::Query(text) => {
            let mut url = base.join(&format!("/{}{}", locale, settings.search_path))?;
            set_query_param(&mut url, &settings.query_param, text);
            set_query_param(&mut url, &settings.overlay_param, raw_input);
            Ok(url)
        }
        SearchTarget::Link { text, url } => {
            let mut url = base.join(url)?;
            if query_param(&url, &settings.query_param).is_none() {
                set_query_param(&mut url, &settings.query_param, text);
            }
            if query_param(&url, &settings.overlay_param).is_none() {
                set_query_param(&mut url, &settings.overlay_param, raw_input);
            }
            Ok(url)
        }
    }
}
