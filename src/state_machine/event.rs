//! Events that drive a session

use crate::state_machine::state::Question;

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    // Lifecycle
    Start,
    /// Internal step out of `Presenting` and `Recorded`
    Continue,

    // Caller commands
    DraftUpdated {
        text: String,
    },
    Submit,

    // Timer
    TimerTick {
        question_index: usize,
        remaining: u32,
    },
    TimerExpired {
        question_index: usize,
    },

    // Collaborator results
    QuestionsGenerated {
        questions: Vec<Question>,
    },
    GenerationFailed {
        message: String,
    },
    Evaluated {
        question_index: usize,
        score: u8,
        feedback: String,
    },
    EvaluationFailed {
        question_index: usize,
        message: String,
    },
    Summarized {
        score: u8,
        summary: String,
    },
    SummaryFailed {
        message: String,
    },
    PersistenceFailed {
        message: String,
    },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::Start => "start",
            Event::Continue => "continue",
            Event::DraftUpdated { .. } => "draft_updated",
            Event::Submit => "submit",
            Event::TimerTick { .. } => "timer_tick",
            Event::TimerExpired { .. } => "timer_expired",
            Event::QuestionsGenerated { .. } => "questions_generated",
            Event::GenerationFailed { .. } => "generation_failed",
            Event::Evaluated { .. } => "evaluated",
            Event::EvaluationFailed { .. } => "evaluation_failed",
            Event::Summarized { .. } => "summarized",
            Event::SummaryFailed { .. } => "summary_failed",
            Event::PersistenceFailed { .. } => "persistence_failed",
        }
    }

    /// Events that originate from a caller command rather than inside the runtime
    pub fn is_command(&self) -> bool {
        matches!(self, Event::DraftUpdated { .. } | Event::Submit)
    }
}
