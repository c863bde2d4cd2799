//! External collaborators: question generation, answer evaluation and
//! interview summarization.

mod error;
mod http;
mod types;

pub use error::{CollaboratorError, CollaboratorErrorKind};
pub use http::{CollaboratorConfig, HttpCollaborators};
pub use types::*;

use crate::state_machine::state::Question;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    /// Produce an ordered question list for the candidate
    async fn generate_questions(
        &self,
        request: &QuestionRequest,
    ) -> Result<Vec<Question>, CollaboratorError>;
}

#[async_trait]
pub trait AnswerEvaluator: Send + Sync {
    async fn evaluate(&self, request: &EvaluationRequest) -> Result<Evaluation, CollaboratorError>;
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, request: &SummaryRequest) -> Result<Summary, CollaboratorError>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: QuestionGenerator + ?Sized> QuestionGenerator for Arc<T> {
    async fn generate_questions(
        &self,
        request: &QuestionRequest,
    ) -> Result<Vec<Question>, CollaboratorError> {
        (**self).generate_questions(request).await
    }
}

#[async_trait]
impl<T: AnswerEvaluator + ?Sized> AnswerEvaluator for Arc<T> {
    async fn evaluate(&self, request: &EvaluationRequest) -> Result<Evaluation, CollaboratorError> {
        (**self).evaluate(request).await
    }
}

#[async_trait]
impl<T: Summarizer + ?Sized> Summarizer for Arc<T> {
    async fn summarize(&self, request: &SummaryRequest) -> Result<Summary, CollaboratorError> {
        (**self).summarize(request).await
    }
}

// ============================================================================
// Logging wrapper
// ============================================================================

/// Logs duration and outcome of every collaborator call
#[derive(Clone)]
pub struct LoggingCollaborators<T> {
    inner: T,
}

impl<T> LoggingCollaborators<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

fn log_outcome<R>(operation: &'static str, start: Instant, result: &Result<R, CollaboratorError>) {
    let duration = start.elapsed();
    match result {
        Ok(_) => {
            tracing::info!(
                operation,
                duration_ms = %duration.as_millis(),
                "Collaborator call completed"
            );
        }
        Err(e) => {
            tracing::error!(
                operation,
                duration_ms = %duration.as_millis(),
                error = %e.message,
                retryable = e.kind.is_retryable(),
                "Collaborator call failed"
            );
        }
    }
}

#[async_trait]
impl<T: QuestionGenerator> QuestionGenerator for LoggingCollaborators<T> {
    async fn generate_questions(
        &self,
        request: &QuestionRequest,
    ) -> Result<Vec<Question>, CollaboratorError> {
        let start = Instant::now();
        let result = self.inner.generate_questions(request).await;
        if let Ok(questions) = &result {
            tracing::debug!(count = questions.len(), "Questions generated");
        }
        log_outcome("generate_questions", start, &result);
        result
    }
}

#[async_trait]
impl<T: AnswerEvaluator> AnswerEvaluator for LoggingCollaborators<T> {
    async fn evaluate(&self, request: &EvaluationRequest) -> Result<Evaluation, CollaboratorError> {
        let start = Instant::now();
        let result = self.inner.evaluate(request).await;
        log_outcome("evaluate", start, &result);
        result
    }
}

#[async_trait]
impl<T: Summarizer> Summarizer for LoggingCollaborators<T> {
    async fn summarize(&self, request: &SummaryRequest) -> Result<Summary, CollaboratorError> {
        let start = Instant::now();
        let result = self.inner.summarize(request).await;
        log_outcome("summarize", start, &result);
        result
    }
}
