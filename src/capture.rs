//! Draft answer for the active question

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shown and recorded when the timer expires with nothing typed
pub const NO_ANSWER_PLACEHOLDER: &str = "(No answer provided)";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("No question is active")]
    NoActiveQuestion,
    #[error("Please provide an answer")]
    EmptyAnswer,
}

/// What caused the answer to be taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitTrigger {
    Manual,
    Timeout,
}

/// Snapshot of an answer at the moment it became final
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub question_index: usize,
    pub answer_text: String,
    pub time_taken_units: u32,
    pub trigger: SubmitTrigger,
    /// Timed out with a blank draft; `answer_text` is the placeholder
    pub blank: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct ActiveQuestion {
    index: usize,
    allotted_units: u32,
}

/// Holds the in-progress answer for one question at a time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerCapture {
    active: Option<ActiveQuestion>,
    draft: String,
}

impl AnswerCapture {
    /// Activate a new question, discarding any previous draft
    pub fn begin(&mut self, index: usize, allotted_units: u32) {
        self.active = Some(ActiveQuestion {
            index,
            allotted_units,
        });
        self.draft.clear();
    }

    pub fn set_draft(&mut self, text: impl Into<String>) -> Result<(), CaptureError> {
        if self.active.is_none() {
            return Err(CaptureError::NoActiveQuestion);
        }
        self.draft = text.into();
        Ok(())
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active.map(|a| a.index)
    }

    /// Whitespace-only drafts count as blank
    pub fn has_usable_draft(&self) -> bool {
        !self.draft.trim().is_empty()
    }

    /// Take the draft as final and deactivate.
    ///
    /// `remaining_units` is the countdown value at the moment of
    /// submission; time taken is `allotted - remaining` clamped to
    /// `[0, allotted]`. A blank draft is only accepted on timeout, where it
    /// becomes the placeholder answer with the full duration.
    pub fn submit(
        &mut self,
        trigger: SubmitTrigger,
        remaining_units: u32,
    ) -> Result<Submission, CaptureError> {
        let active = self.active.ok_or(CaptureError::NoActiveQuestion)?;

        let submission = if self.has_usable_draft() {
            Submission {
                question_index: active.index,
                answer_text: self.draft.clone(),
                time_taken_units: active.allotted_units.saturating_sub(remaining_units),
                trigger,
                blank: false,
            }
        } else {
            match trigger {
                SubmitTrigger::Manual => return Err(CaptureError::EmptyAnswer),
                SubmitTrigger::Timeout => Submission {
                    question_index: active.index,
                    answer_text: NO_ANSWER_PLACEHOLDER.to_string(),
                    time_taken_units: active.allotted_units,
                    trigger,
                    blank: true,
                },
            }
        };

        self.active = None;
        self.draft.clear();
        Ok(submission)
    }

    pub fn clear(&mut self) {
        self.active = None;
        self.draft.clear();
    }
}
