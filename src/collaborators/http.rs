//! HTTP/JSON collaborator client

use super::{
    clamp_score, AnswerEvaluator, CollaboratorError, Evaluation, EvaluationRequest,
    GeneratedQuestion, QuestionGenerator, QuestionRequest, Summarizer, Summary, SummaryRequest,
};
use crate::state_machine::state::Question;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Collaborator endpoint configuration
#[derive(Debug, Clone)]
pub struct CollaboratorConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl CollaboratorConfig {
    /// Reads `COLLABORATOR_BASE_URL`, `COLLABORATOR_API_KEY` and
    /// `COLLABORATOR_TIMEOUT_SECS`. `None` when no base URL is set.
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("COLLABORATOR_BASE_URL").ok()?;
        let timeout_secs = std::env::var("COLLABORATOR_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Some(Self {
            base_url,
            api_key: std::env::var("COLLABORATOR_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Talks to a collaborator service exposing the three interview endpoints
#[derive(Clone)]
pub struct HttpCollaborators {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpCollaborators {
    pub fn new(config: &CollaboratorConfig) -> Result<Self, CollaboratorError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CollaboratorError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, CollaboratorError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}/{path}", self.base_url);
        let mut request = self.client.post(&url).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                CollaboratorError::network(format!("Request timeout: {e}"))
            } else if e.is_connect() {
                CollaboratorError::network(format!("Connection failed: {e}"))
            } else {
                CollaboratorError::unknown(format!("Request failed: {e}"))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CollaboratorError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(classify_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            CollaboratorError::invalid_response(format!(
                "Failed to parse response from {path}: {e}"
            ))
        })
    }
}

fn classify_error(status: reqwest::StatusCode, body: &str) -> CollaboratorError {
    match status.as_u16() {
        401 | 403 => CollaboratorError::auth(format!("Authentication failed: {body}")),
        429 => CollaboratorError::rate_limit(format!("Rate limited: {body}")),
        400 | 422 => CollaboratorError::invalid_request(format!("Invalid request: {body}")),
        500..=599 => CollaboratorError::server_error(format!("Server error: {body}")),
        _ => CollaboratorError::unknown(format!("HTTP {status}: {body}")),
    }
}

// Wire types

#[derive(Debug, Deserialize)]
struct QuestionList {
    questions: Vec<GeneratedQuestion>,
}

#[derive(Debug, Deserialize)]
struct WireEvaluation {
    score: f64,
    feedback: String,
}

#[derive(Debug, Deserialize)]
struct WireSummary {
    score: f64,
    summary: String,
}

#[async_trait]
impl QuestionGenerator for HttpCollaborators {
    async fn generate_questions(
        &self,
        request: &QuestionRequest,
    ) -> Result<Vec<Question>, CollaboratorError> {
        let list: QuestionList = self.post_json("generate-questions", request).await?;
        Ok(list.questions.into_iter().map(Question::from).collect())
    }
}

#[async_trait]
impl AnswerEvaluator for HttpCollaborators {
    async fn evaluate(&self, request: &EvaluationRequest) -> Result<Evaluation, CollaboratorError> {
        let wire: WireEvaluation = self.post_json("evaluate-response", request).await?;
        Ok(Evaluation {
            score: clamp_score(wire.score),
            feedback: wire.feedback,
        })
    }
}

#[async_trait]
impl Summarizer for HttpCollaborators {
    async fn summarize(&self, request: &SummaryRequest) -> Result<Summary, CollaboratorError> {
        let wire: WireSummary = self.post_json("generate-summary", request).await?;
        Ok(Summary {
            score: clamp_score(wire.score),
            summary: wire.summary,
        })
    }
}
