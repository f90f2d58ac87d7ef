//! Survey widget handlers

use docsite_core::prelude::*;
use docsite_core::{AnalyticsEvent, SurveyVote};

use crate::engine_event::EngineEvent;
use crate::state::{AppState, PageScope};

use super::update::analytics;
use super::UpdateResult;

/// The current page's scope, if it carries a survey
fn survey_scope(state: &mut AppState) -> Option<&mut PageScope> {
    let scope = state.scope.as_mut().filter(|scope| scope.page.has_survey);
    if scope.is_none() {
        debug!("Ignoring survey input: no survey on this page");
    }
    scope
}

pub(crate) fn handle_vote(state: &mut AppState, vote: SurveyVote) -> UpdateResult {
    let Some(scope) = survey_scope(state) else {
        return UpdateResult::none();
    };
    if !scope.survey.cast_vote(vote) {
        trace!("Survey already past voting; {:?} ignored", vote);
        return UpdateResult::none();
    }
    let phase = scope.survey.phase();

    state.emit(EngineEvent::SurveyPhaseChanged { phase });
    let event = AnalyticsEvent::survey(state.event_context(), vote, None, None);
    UpdateResult::action(analytics(state, event))
}

pub(crate) fn handle_comment(state: &mut AppState, text: &str) -> UpdateResult {
    if let Some(scope) = survey_scope(state) {
        if !scope.survey.set_comment(text) {
            trace!("Survey comment ignored outside the voted phase");
        }
    }
    UpdateResult::none()
}

pub(crate) fn handle_email(state: &mut AppState, text: &str) -> UpdateResult {
    if let Some(scope) = survey_scope(state) {
        if !scope.survey.set_email(text) {
            trace!("Survey email ignored outside the voted phase");
        }
    }
    UpdateResult::none()
}

pub(crate) fn handle_submit(state: &mut AppState) -> UpdateResult {
    let Some(scope) = survey_scope(state) else {
        return UpdateResult::none();
    };

    let submission = match scope.survey.submit() {
        Ok(Some(submission)) => submission,
        Ok(None) => {
            trace!("Nothing to submit");
            return UpdateResult::none();
        }
        Err(e) => {
            debug!("Survey submit rejected: {}", e);
            state.emit(EngineEvent::SurveyRejected {
                reason: e.to_string(),
            });
            return UpdateResult::none();
        }
    };
    let phase = scope.survey.phase();

    state.emit(EngineEvent::SurveyPhaseChanged { phase });
    let event = AnalyticsEvent::survey(
        state.event_context(),
        submission.vote,
        submission.comment.as_deref(),
        submission.email.as_deref(),
    );
    UpdateResult::action(analytics(state, event))
}

pub(crate) fn handle_cancel(state: &mut AppState) -> UpdateResult {
    let Some(scope) = survey_scope(state) else {
        return UpdateResult::none();
    };
    if scope.survey.cancel() {
        let phase = scope.survey.phase();
        state.emit(EngineEvent::SurveyPhaseChanged { phase });
    }
    UpdateResult::none()
}
