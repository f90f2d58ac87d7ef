//! Survey widget state machine
//!
//! `idle --vote--> voted --submit--> submitted`, with `voted --cancel--> idle`.
//! Every other input is a no-op. A fresh `SurveyState` is created per page
//! load.

use std::sync::LazyLock;

use docsite_core::prelude::*;
use docsite_core::{SurveyPhase, SurveyVote};
use regex::Regex;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").expect("Invalid email regex")
});

/// What a successful submit sends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveySubmission {
    pub vote: SurveyVote,
    pub comment: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurveyState {
    vote: Option<SurveyVote>,
    comment: String,
    email: String,
    phase: SurveyPhase,
}

impl SurveyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SurveyPhase {
        self.phase
    }

    pub fn vote(&self) -> Option<SurveyVote> {
        self.vote
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Comment/email fields and Send/Cancel are shown only while voted
    pub fn details_visible(&self) -> bool {
        self.phase == SurveyPhase::Voted
    }

    /// Record a vote. Returns `true` only for the `idle -> voted` transition.
    pub fn cast_vote(&mut self, vote: SurveyVote) -> bool {
        if self.phase != SurveyPhase::Idle {
            return false;
        }
        self.vote = Some(vote);
        self.phase = SurveyPhase::Voted;
        true
    }

    pub fn set_comment(&mut self, text: &str) -> bool {
        if self.phase != SurveyPhase::Voted {
            return false;
        }
        self.comment = text.to_string();
        true
    }

    pub fn set_email(&mut self, text: &str) -> bool {
        if self.phase != SurveyPhase::Voted {
            return false;
        }
        self.email = text.to_string();
        true
    }

    /// `voted -> idle`, clearing the vote and both inputs
    pub fn cancel(&mut self) -> bool {
        if self.phase != SurveyPhase::Voted {
            return false;
        }
        *self = Self::default();
        true
    }

    /// `voted -> submitted`.
    ///
    /// `Ok(None)` when not in `voted`. A non-empty email that does not look
    /// like an address fails with `InvalidEmail` and keeps the widget voted.
    pub fn submit(&mut self) -> Result<Option<SurveySubmission>> {
        let (SurveyPhase::Voted, Some(vote)) = (self.phase, self.vote) else {
            return Ok(None);
        };

        let email = self.email.trim();
        if !email.is_empty() && !EMAIL_PATTERN.is_match(email) {
            return Err(Error::InvalidEmail {
                email: email.to_string(),
            });
        }

        self.phase = SurveyPhase::Submitted;
        Ok(Some(SurveySubmission {
            vote,
            comment: non_empty(&self.comment),
            email: non_empty(email),
        }))
    }
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_then_submit() {
        let mut survey = SurveyState::new();
        assert!(!survey.details_visible());

        assert!(survey.cast_vote(SurveyVote::Up));
        assert_eq!(survey.phase(), SurveyPhase::Voted);
        assert!(survey.details_visible());

        assert!(survey.set_comment("  Very helpful "));
        assert!(survey.set_email("octocat@github.com"));
        let sent = survey.submit().unwrap().unwrap();
        assert_eq!(
            sent,
            SurveySubmission {
                vote: SurveyVote::Up,
                comment: Some("Very helpful".into()),
                email: Some("octocat@github.com".into()),
            }
        );
        assert_eq!(survey.phase(), SurveyPhase::Submitted);
    }

    #[test]
    fn test_repeated_controls_are_ignored() {
        let mut survey = SurveyState::new();
        assert!(!survey.cancel());
        assert_eq!(survey.submit().unwrap(), None);

        survey.cast_vote(SurveyVote::Down);
        assert!(!survey.cast_vote(SurveyVote::Up));
        assert_eq!(survey.vote(), Some(SurveyVote::Down));

        survey.submit().unwrap();
        assert!(!survey.cast_vote(SurveyVote::Up));
        assert_eq!(survey.submit().unwrap(), None);
        assert!(!survey.cancel());
        assert!(!survey.set_comment("late"));
    }

    #[test]
    fn test_cancel_clears_inputs() {
        let mut survey = SurveyState::new();
        survey.cast_vote(SurveyVote::Up);
        survey.set_comment("draft");
        survey.set_email("a@b.co");

        assert!(survey.cancel());
        assert_eq!(survey, SurveyState::new());
    }

    #[test]
    fn test_inputs_rejected_while_idle() {
        let mut survey = SurveyState::new();
        assert!(!survey.set_comment("hello"));
        assert!(!survey.set_email("a@b.co"));
        assert_eq!(survey.comment(), "");
        assert_eq!(survey.email(), "");
    }

    #[test]
    fn test_invalid_email_keeps_voted() {
        let mut survey = SurveyState::new();
        survey.cast_vote(SurveyVote::Up);
        survey.set_comment("typo in step 3");
        survey.set_email("not-an-email");

        let err = survey.submit().unwrap_err();
        assert!(matches!(err, Error::InvalidEmail { .. }));
        assert_eq!(survey.phase(), SurveyPhase::Voted);
        assert_eq!(survey.comment(), "typo in step 3");

        survey.set_email("");
        let sent = survey.submit().unwrap().unwrap();
        assert_eq!(sent.email, None);
    }

    #[test]
    fn test_email_pattern() {
        for ok in ["a@b.co", "first.last+tag@sub.example.org"] {
            assert!(EMAIL_PATTERN.is_match(ok), "{ok}");
        }
        for bad in ["a@b", "@b.co", "a b@c.de", "a@b.", "a@@b.co"] {
            assert!(!EMAIL_PATTERN.is_match(bad), "{bad}");
        }
    }
}
