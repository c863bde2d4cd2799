//! Pure state transition function
//!
//! Given the same session and event this always produces the same result,
//! and it performs no I/O. The runtime commits `new_session` only on `Ok`.

use super::state::{
    FailureKind, Question, Response, Session, SessionOutcome, SessionState,
};
use super::{Effect, Event};
use crate::capture::{CaptureError, Submission, SubmitTrigger};
use crate::collaborators::{EvaluationRequest, QuestionRequest, ResponseSummary, SummaryRequest};
use crate::db::{CandidateRecord, OutcomeRecord, ResponseRecord};
use crate::sequencer::QuestionSequencer;
use crate::timer::TimerState;
use crate::transcript::{completion_message, question_announcement, welcome_message};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_session: Session,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(session: Session) -> Self {
        Self {
            new_session: session,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Where the session was when a transition was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorContext {
    pub state: &'static str,
    pub question_index: Option<usize>,
}

impl ErrorContext {
    pub fn of(session: &Session) -> Self {
        Self {
            state: session.state.name(),
            question_index: session.state.question_index(),
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.question_index {
            Some(index) => write!(f, "state {}, question {}", self.state, index),
            None => write!(f, "state {}", self.state),
        }
    }
}

/// Errors that can occur during transition. The session is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("{reason} ({context})")]
    Validation {
        reason: String,
        context: ErrorContext,
    },
    #[error("Session is busy, try again shortly ({context})")]
    Busy { context: ErrorContext },
    #[error("{message} ({context})")]
    InvalidState {
        message: String,
        context: ErrorContext,
    },
}

impl TransitionError {
    fn invalid(message: impl Into<String>, session: &Session) -> Self {
        TransitionError::InvalidState {
            message: message.into(),
            context: ErrorContext::of(session),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            TransitionError::Validation { .. } => "validation",
            TransitionError::Busy { .. } => "busy",
            TransitionError::InvalidState { .. } => "invalid_state",
        }
    }

    pub fn context(&self) -> ErrorContext {
        match self {
            TransitionError::Validation { context, .. }
            | TransitionError::Busy { context }
            | TransitionError::InvalidState { context, .. } => *context,
        }
    }
}

/// Pure transition function
#[allow(clippy::too_many_lines)] // One arm per edge of the interview graph
pub fn transition(session: &Session, event: Event) -> Result<TransitionResult, TransitionError> {
    match (&session.state, event) {
        // ============================================================
        // Start and question generation
        // ============================================================
        (SessionState::NotStarted, Event::Start) => {
            let mut next = session.clone();
            next.state = SessionState::GeneratingQuestions;
            Ok(TransitionResult::new(next)
                .with_effect(Effect::PersistCandidate(CandidateRecord::new(
                    &session.id,
                    &session.candidate,
                )))
                .with_effect(Effect::GenerateQuestions(QuestionRequest {
                    candidate_name: session.candidate.name.clone(),
                    resume_text: session.candidate.resume_text.clone(),
                }))
                .with_effect(Effect::NotifyState))
        }

        (SessionState::GeneratingQuestions, Event::QuestionsGenerated { questions }) => {
            let sequencer = QuestionSequencer::new(questions);
            if sequencer.is_empty() {
                return Ok(fail(
                    session,
                    FailureKind::GenerationFailed,
                    "Question generator returned no questions",
                ));
            }
            let mut next = session.clone();
            let welcome = next
                .transcript
                .push_system(welcome_message(&next.candidate.name, sequencer.len()));
            next.sequencer = sequencer;
            next.state = SessionState::Presenting { index: 0 };
            Ok(TransitionResult::new(next).with_effects([
                Effect::NotifyMessage(welcome),
                Effect::NotifyState,
                Effect::Continue,
            ]))
        }

        (SessionState::GeneratingQuestions, Event::GenerationFailed { message }) => {
            Ok(fail(session, FailureKind::GenerationFailed, message))
        }

        // ============================================================
        // Presenting -> AwaitingAnswer
        // ============================================================
        (SessionState::Presenting { index }, Event::Continue) => {
            let index = *index;
            let question = current_question(session)?;
            let allotted = question.allotted_units();

            let mut next = session.clone();
            let announcement = next.transcript.push_system(question_announcement(
                index,
                next.sequencer.len(),
                &question,
            ));
            next.capture.begin(index, allotted);
            next.timer = TimerState::started(allotted);
            next.state = SessionState::AwaitingAnswer { index };
            let timer = next.timer;

            Ok(TransitionResult::new(next).with_effects([
                Effect::NotifyMessage(announcement),
                Effect::StartTimer {
                    question_index: index,
                    duration_units: allotted,
                },
                Effect::NotifyTimer(timer),
                Effect::NotifyState,
            ]))
        }

        // ============================================================
        // AwaitingAnswer: draft, submit, timer
        // ============================================================
        (SessionState::AwaitingAnswer { index }, Event::DraftUpdated { text })
            if session.capture.active_index() == Some(*index) =>
        {
            let mut next = session.clone();
            next.capture
                .set_draft(text)
                .map_err(|e| TransitionError::invalid(e.to_string(), session))?;
            Ok(TransitionResult::new(next))
        }

        (SessionState::AwaitingAnswer { index }, Event::Submit) => {
            let index = *index;
            let mut next = session.clone();
            let remaining = next.timer.remaining;
            let submission = next
                .capture
                .submit(SubmitTrigger::Manual, remaining)
                .map_err(|e| match e {
                    CaptureError::EmptyAnswer => TransitionError::Validation {
                        reason: e.to_string(),
                        context: ErrorContext::of(session),
                    },
                    CaptureError::NoActiveQuestion => TransitionError::invalid(e.to_string(), session),
                })?;
            begin_evaluation(next, index, submission)
        }

        (SessionState::AwaitingAnswer { index }, Event::TimerTick { question_index, remaining })
            if *index == question_index =>
        {
            let mut next = session.clone();
            next.timer.set_remaining(remaining);
            let timer = next.timer;
            Ok(TransitionResult::new(next).with_effect(Effect::NotifyTimer(timer)))
        }

        (SessionState::AwaitingAnswer { index }, Event::TimerExpired { question_index })
            if *index == question_index =>
        {
            let index = *index;
            let mut next = session.clone();
            next.timer.set_remaining(0);
            let submission = next
                .capture
                .submit(SubmitTrigger::Timeout, 0)
                .map_err(|e| TransitionError::invalid(e.to_string(), session))?;
            if submission.blank {
                record_unanswered(next, index, &submission)
            } else {
                begin_evaluation(next, index, submission)
            }
        }

        // Late ticks or expiry from a question that is no longer awaiting an answer
        (_, Event::TimerTick { .. } | Event::TimerExpired { .. }) => {
            Ok(TransitionResult::new(session.clone()))
        }

        // ============================================================
        // Evaluating -> Recorded
        // ============================================================
        (
            SessionState::Evaluating { index, submission },
            Event::Evaluated {
                question_index,
                score,
                feedback,
            },
        ) if *index == question_index => {
            let index = *index;
            let question = current_question(session)?;
            let response = Response::evaluated(question, submission, score, feedback.clone());

            let mut next = session.clone();
            let feedback_message = next.transcript.push_system(feedback);
            let record = ResponseRecord::new(&session.id, index, &response);
            next.responses.push(response);
            advance(&mut next)?;
            next.state = SessionState::Recorded { index };

            Ok(TransitionResult::new(next).with_effects([
                Effect::PersistResponse(record),
                Effect::NotifyMessage(feedback_message),
                Effect::NotifyState,
                Effect::Continue,
            ]))
        }

        (
            SessionState::Evaluating { index, .. },
            Event::EvaluationFailed {
                question_index,
                message,
            },
        ) if *index == question_index => Ok(fail(session, FailureKind::EvaluationFailed, message)),

        // ============================================================
        // Recorded -> Presenting(i+1) | Summarizing
        // ============================================================
        (SessionState::Recorded { index }, Event::Continue) => {
            let mut next = session.clone();
            if next.sequencer.is_exhausted() {
                next.state = SessionState::Summarizing;
                let request = SummaryRequest {
                    candidate_name: next.candidate.name.clone(),
                    responses: next.responses.iter().map(ResponseSummary::from).collect(),
                };
                Ok(TransitionResult::new(next)
                    .with_effect(Effect::Summarize(request))
                    .with_effect(Effect::NotifyState))
            } else {
                next.state = SessionState::Presenting { index: index + 1 };
                Ok(TransitionResult::new(next)
                    .with_effect(Effect::NotifyState)
                    .with_effect(Effect::Continue))
            }
        }

        // ============================================================
        // Summarizing -> Completed
        // ============================================================
        // The outcome is staged and written first; Completed is only entered
        // once the sink has accepted it.
        (SessionState::Summarizing, Event::Summarized { score, summary }) => {
            let mut next = session.clone();
            next.outcome = Some(SessionOutcome {
                score,
                summary: summary.clone(),
            });

            Ok(TransitionResult::new(next).with_effects([
                Effect::PersistOutcome(OutcomeRecord {
                    session_id: session.id.clone(),
                    score,
                    summary,
                }),
                Effect::Continue,
            ]))
        }

        (SessionState::Summarizing, Event::Continue) => {
            let Some(outcome) = &session.outcome else {
                return Err(TransitionError::invalid("No outcome to complete with", session));
            };
            let mut next = session.clone();
            let message = next
                .transcript
                .push_system(completion_message(outcome.score, &outcome.summary));
            next.state = SessionState::Completed;
            next.timer = TimerState::default();

            Ok(TransitionResult::new(next)
                .with_effect(Effect::NotifyMessage(message))
                .with_effect(Effect::NotifyState))
        }

        (SessionState::Summarizing, Event::SummaryFailed { message }) => {
            Ok(fail(session, FailureKind::SummaryFailed, message))
        }

        // ============================================================
        // Sink failures
        // ============================================================
        (state, Event::PersistenceFailed { message }) if !state.is_terminal() => {
            Ok(fail(session, FailureKind::PersistenceFailed, message))
        }

        // ============================================================
        // Terminal states
        // ============================================================
        (state, event) if state.is_terminal() && event.is_command() => {
            Err(TransitionError::invalid("Session already finished", session))
        }

        // Late collaborator results and sink failures after the session ended
        (state, _) if state.is_terminal() => Ok(TransitionResult::new(session.clone())),

        // ============================================================
        // Busy and invalid
        // ============================================================
        (state, Event::DraftUpdated { .. } | Event::Submit) if state.is_busy() => {
            Err(TransitionError::Busy {
                context: ErrorContext::of(session),
            })
        }

        (_, Event::Start) => Err(TransitionError::invalid("Session already started", session)),

        (state, event) => Err(TransitionError::invalid(
            format!("Event {} is not valid in state {}", event.name(), state.name()),
            session,
        )),
    }
}

/// Question at the sequencer cursor
fn current_question(session: &Session) -> Result<Question, TransitionError> {
    session
        .sequencer
        .next_question()
        .cloned()
        .map_err(|e| TransitionError::invalid(e.to_string(), session))
}

fn advance(next: &mut Session) -> Result<(), TransitionError> {
    let context = ErrorContext::of(next);
    next.sequencer
        .advance()
        .map(|_| ())
        .map_err(|e| TransitionError::InvalidState {
            message: e.to_string(),
            context,
        })
}

/// AwaitingAnswer -> Evaluating. Manual submit and non-empty timeout share this.
fn begin_evaluation(
    mut next: Session,
    index: usize,
    submission: Submission,
) -> Result<TransitionResult, TransitionError> {
    let question = current_question(&next)?;
    let answer = next.transcript.push_candidate(submission.answer_text.clone());
    next.timer = TimerState::default();
    let request = EvaluationRequest {
        question: question.text,
        answer: submission.answer_text.clone(),
        difficulty: question.difficulty,
    };
    next.state = SessionState::Evaluating { index, submission };
    let timer = next.timer;

    Ok(TransitionResult::new(next).with_effects([
        Effect::StopTimer,
        Effect::NotifyMessage(answer),
        Effect::NotifyTimer(timer),
        Effect::Evaluate {
            question_index: index,
            request,
        },
        Effect::NotifyState,
    ]))
}

/// AwaitingAnswer -> Recorded for a timeout with nothing typed. No evaluator call.
fn record_unanswered(
    mut next: Session,
    index: usize,
    submission: &Submission,
) -> Result<TransitionResult, TransitionError> {
    let question = current_question(&next)?;
    let response = Response::unanswered(question, submission);
    let record = ResponseRecord::new(&next.id, index, &response);

    let placeholder = next.transcript.push_candidate(submission.answer_text.clone());
    next.responses.push(response);
    advance(&mut next)?;
    next.timer = TimerState::default();
    next.state = SessionState::Recorded { index };
    let timer = next.timer;

    Ok(TransitionResult::new(next).with_effects([
        Effect::StopTimer,
        Effect::NotifyMessage(placeholder),
        Effect::NotifyTimer(timer),
        Effect::PersistResponse(record),
        Effect::NotifyState,
        Effect::Continue,
    ]))
}

/// Move to `Failed`, keeping everything recorded so far
fn fail(session: &Session, kind: FailureKind, message: impl Into<String>) -> TransitionResult {
    let mut next = session.clone();
    let question_index = session.state.question_index();
    next.capture.clear();
    next.timer = TimerState::default();
    next.outcome = None;
    next.state = SessionState::Failed {
        kind,
        message: message.into(),
        question_index,
    };
    TransitionResult::new(next)
        .with_effect(Effect::StopTimer)
        .with_effect(Effect::NotifyTimer(TimerState::default()))
        .with_effect(Effect::NotifyState)
}
