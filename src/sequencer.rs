//! Ordered question list with a cursor

use crate::state_machine::state::Question;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequencerError {
    #[error("All {total} questions have already been asked")]
    Exhausted { total: usize },
}

/// Holds the generated questions and the index of the next one to ask.
///
/// `current_index` only ever moves forward, one slot at a time, and never
/// past `questions.len()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionSequencer {
    questions: Vec<Question>,
    current_index: usize,
}

impl QuestionSequencer {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            current_index: 0,
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn is_exhausted(&self) -> bool {
        self.current_index >= self.questions.len()
    }

    /// The question at the cursor, or `Exhausted`
    pub fn next_question(&self) -> Result<&Question, SequencerError> {
        self.questions
            .get(self.current_index)
            .ok_or(SequencerError::Exhausted {
                total: self.questions.len(),
            })
    }

    /// Move the cursor forward by exactly one. Returns the new index.
    pub fn advance(&mut self) -> Result<usize, SequencerError> {
        if self.is_exhausted() {
            return Err(SequencerError::Exhausted {
                total: self.questions.len(),
            });
        }
        self.current_index += 1;
        Ok(self.current_index)
    }
}
