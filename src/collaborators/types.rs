//! Request and result types exchanged with collaborators

use crate::state_machine::state::{Difficulty, Question, Response};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRequest {
    pub candidate_name: String,
    pub resume_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
    pub question: String,
    pub answer: String,
    pub difficulty: Difficulty,
}

/// One answered question as the summarizer sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSummary {
    pub question: String,
    pub answer: String,
    pub difficulty: Difficulty,
    pub score: Option<u8>,
    pub feedback: Option<String>,
}

impl From<&Response> for ResponseSummary {
    fn from(response: &Response) -> Self {
        Self {
            question: response.question.text.clone(),
            answer: response.answer_text.clone(),
            difficulty: response.difficulty(),
            score: response.score,
            feedback: response.feedback.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    pub candidate_name: String,
    pub responses: Vec<ResponseSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// 0..=100
    pub score: u8,
    pub feedback: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// 0..=100
    pub score: u8,
    pub summary: String,
}

/// Generated question as it appears on the wire
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedQuestion {
    pub question: String,
    pub difficulty: Difficulty,
}

impl From<GeneratedQuestion> for Question {
    fn from(generated: GeneratedQuestion) -> Self {
        Question::new(generated.question, generated.difficulty)
    }
}

/// Clamp a collaborator-supplied score into 0..=100
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped first
pub fn clamp_score(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.clamp(0.0, 100.0).round() as u8
}
