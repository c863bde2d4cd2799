//! Effects produced by state transitions

use crate::collaborators::{EvaluationRequest, QuestionRequest, SummaryRequest};
use crate::db::{CandidateRecord, OutcomeRecord, ResponseRecord};
use crate::timer::TimerState;
use crate::transcript::Message;

/// Effects to be executed by the runtime after a transition commits
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Call the question generator (spawns as background task)
    GenerateQuestions(QuestionRequest),

    /// Call the answer evaluator (spawns as background task)
    Evaluate {
        question_index: usize,
        request: EvaluationRequest,
    },

    /// Call the summarizer (spawns as background task)
    Summarize(SummaryRequest),

    /// Start the countdown for a question, replacing any running one
    StartTimer {
        question_index: usize,
        duration_units: u32,
    },

    /// Stop the countdown without firing expiry
    StopTimer,

    PersistCandidate(CandidateRecord),
    PersistResponse(ResponseRecord),
    PersistOutcome(OutcomeRecord),

    /// Feed `Event::Continue` back in before any other input
    Continue,

    // Client notifications
    NotifyMessage(Message),
    NotifyState,
    NotifyTimer(TimerState),
}
