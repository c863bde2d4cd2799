//! Append-only interview transcript

use crate::state_machine::state::Question;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    Candidate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// 1-based, strictly increasing
    pub sequence_number: u64,
}

/// Time-ordered log of everything said during a session.
///
/// Messages can only be appended; there is no way to edit or reorder them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn push_system(&mut self, content: impl Into<String>) -> Message {
        self.push(Role::System, content.into())
    }

    pub fn push_candidate(&mut self, content: impl Into<String>) -> Message {
        self.push(Role::Candidate, content.into())
    }

    fn push(&mut self, role: Role, content: String) -> Message {
        let message = Message {
            role,
            content,
            sequence_number: self.messages.len() as u64 + 1,
        };
        self.messages.push(message.clone());
        message
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }
}

pub fn welcome_message(candidate_name: &str, total_questions: usize) -> String {
    format!(
        "Welcome {candidate_name}! Let's begin your interview. \
         I'll ask you {total_questions} questions. Ready?"
    )
}

pub fn question_announcement(index: usize, total: usize, question: &Question) -> String {
    format!(
        "Question {}/{} ({}): {}",
        index + 1,
        total,
        question.difficulty,
        question.text
    )
}

pub fn completion_message(score: u8, summary: &str) -> String {
    format!("Thank you for completing the interview! Your score: {score}/100\n\n{summary}")
}
