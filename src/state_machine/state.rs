//! Interview session state types

use crate::capture::{AnswerCapture, Submission};
use crate::sequencer::QuestionSequencer;
use crate::timer::{TimerState, Urgency};
use crate::transcript::{Message, Transcript};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Questions
// ============================================================================

/// Question difficulty. Closed set; anything else fails to deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Time budget for a question of this difficulty, in timer units
    pub fn allotted_units(self) -> u32 {
        match self {
            Difficulty::Easy => 20,
            Difficulty::Medium => 60,
            Difficulty::Hard => 120,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub difficulty: Difficulty,
}

impl Question {
    pub fn new(text: impl Into<String>, difficulty: Difficulty) -> Self {
        Self {
            text: text.into(),
            difficulty,
        }
    }

    pub fn allotted_units(&self) -> u32 {
        self.difficulty.allotted_units()
    }
}

// ============================================================================
// Candidate and responses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub resume_text: String,
}

impl Candidate {
    /// Name and resume are required to generate questions
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Candidate name is required".to_string());
        }
        if self.resume_text.trim().is_empty() {
            return Err("Resume text is required".to_string());
        }
        Ok(())
    }
}

/// Recorded outcome for one question. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub question: Question,
    pub answer_text: String,
    pub time_taken_units: u32,
    /// `None` for unanswered questions, which are never evaluated
    pub score: Option<u8>,
    pub feedback: Option<String>,
}

impl Response {
    pub fn difficulty(&self) -> Difficulty {
        self.question.difficulty
    }

    pub fn evaluated(question: Question, submission: &Submission, score: u8, feedback: String) -> Self {
        Self {
            question,
            answer_text: submission.answer_text.clone(),
            time_taken_units: submission.time_taken_units,
            score: Some(score),
            feedback: Some(feedback),
        }
    }

    pub fn unanswered(question: Question, submission: &Submission) -> Self {
        Self {
            question,
            answer_text: submission.answer_text.clone(),
            time_taken_units: submission.time_taken_units,
            score: None,
            feedback: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub score: u8,
    pub summary: String,
}

// ============================================================================
// Session state
// ============================================================================

/// Why a session ended in `Failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    GenerationFailed,
    EvaluationFailed,
    SummaryFailed,
    PersistenceFailed,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::GenerationFailed => "generation_failed",
            FailureKind::EvaluationFailed => "evaluation_failed",
            FailureKind::SummaryFailed => "summary_failed",
            FailureKind::PersistenceFailed => "persistence_failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum SessionState {
    /// Created, waiting for the start event
    #[default]
    NotStarted,

    /// Question generator call in flight
    GeneratingQuestions,

    /// About to announce question `index` and start its timer
    Presenting { index: usize },

    /// Timer running, accepting draft updates and submit
    AwaitingAnswer { index: usize },

    /// Evaluator call in flight for the captured answer
    Evaluating { index: usize, submission: Submission },

    /// Response for `index` appended; deciding what comes next
    Recorded { index: usize },

    /// Summarizer call in flight
    Summarizing,

    Completed,

    Failed {
        kind: FailureKind,
        message: String,
        question_index: Option<usize>,
    },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::NotStarted => "not_started",
            SessionState::GeneratingQuestions => "generating_questions",
            SessionState::Presenting { .. } => "presenting",
            SessionState::AwaitingAnswer { .. } => "awaiting_answer",
            SessionState::Evaluating { .. } => "evaluating",
            SessionState::Recorded { .. } => "recorded",
            SessionState::Summarizing => "summarizing",
            SessionState::Completed => "completed",
            SessionState::Failed { .. } => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Completed | SessionState::Failed { .. })
    }

    /// States in which draft and submit commands are refused with Busy
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            SessionState::GeneratingQuestions
                | SessionState::Presenting { .. }
                | SessionState::Evaluating { .. }
                | SessionState::Recorded { .. }
                | SessionState::Summarizing
        )
    }

    pub fn question_index(&self) -> Option<usize> {
        match self {
            SessionState::Presenting { index }
            | SessionState::AwaitingAnswer { index }
            | SessionState::Evaluating { index, .. }
            | SessionState::Recorded { index } => Some(*index),
            SessionState::Failed { question_index, .. } => *question_index,
            _ => None,
        }
    }
}

// ============================================================================
// Session
// ============================================================================

/// One candidate's interview. Owned by exactly one runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: String,
    pub candidate: Candidate,
    pub state: SessionState,
    pub sequencer: QuestionSequencer,
    pub capture: AnswerCapture,
    pub timer: TimerState,
    pub responses: Vec<Response>,
    pub transcript: Transcript,
    pub outcome: Option<SessionOutcome>,
}

impl Session {
    pub fn new(id: impl Into<String>, candidate: Candidate) -> Self {
        Self {
            id: id.into(),
            candidate,
            state: SessionState::NotStarted,
            sequencer: QuestionSequencer::default(),
            capture: AnswerCapture::default(),
            timer: TimerState::default(),
            responses: Vec::new(),
            transcript: Transcript::default(),
            outcome: None,
        }
    }

    pub fn current_index(&self) -> usize {
        self.sequencer.current_index()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id.clone(),
            candidate_name: self.candidate.name.clone(),
            state: self.state.clone(),
            current_index: self.current_index(),
            total_questions: self.sequencer.len(),
            questions: self.sequencer.questions().to_vec(),
            responses: self.responses.clone(),
            messages: self.transcript.messages().to_vec(),
            timer: TimerView::from(self.timer),
            draft: self.capture.draft().to_string(),
            outcome: self.outcome.clone(),
        }
    }
}

/// Timer as shown to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimerView {
    pub remaining: u32,
    pub total: u32,
    pub urgency: Urgency,
    pub display: String,
}

impl From<TimerState> for TimerView {
    fn from(timer: TimerState) -> Self {
        Self {
            remaining: timer.remaining,
            total: timer.total,
            urgency: timer.urgency(),
            display: timer.to_string(),
        }
    }
}

/// Read-only view of a session returned to callers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub id: String,
    pub candidate_name: String,
    pub state: SessionState,
    pub current_index: usize,
    pub total_questions: usize,
    pub questions: Vec<Question>,
    pub responses: Vec<Response>,
    pub messages: Vec<Message>,
    pub timer: TimerView,
    pub draft: String,
    pub outcome: Option<SessionOutcome>,
}
