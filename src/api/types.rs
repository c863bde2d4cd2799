//! API request and response types

use crate::db::{StoredCandidate, StoredResponse};
use crate::runtime::SessionSummary;
use crate::state_machine::ErrorContext;
use serde::{Deserialize, Serialize};

/// Request to start an interview
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub resume_text: String,
}

/// Request to replace the answer draft
#[derive(Debug, Deserialize)]
pub struct DraftRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionSummary>,
}

/// Persisted results for one session
#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub candidate: StoredCandidate,
    pub responses: Vec<StoredResponse>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Error body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_index: Option<usize>,
}

impl ErrorResponse {
    pub fn new(kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            kind,
            state: None,
            question_index: None,
        }
    }

    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.state = Some(context.state);
        self.question_index = context.question_index;
        self
    }
}
