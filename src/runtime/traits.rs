//! Trait abstractions for runtime I/O
//!
//! These traits let the executor run against mock collaborators and an
//! in-memory sink in tests.

use crate::collaborators::{AnswerEvaluator, QuestionGenerator, Summarizer};
use crate::db::{CandidateRecord, Database, OutcomeRecord, ResponseRecord};
use async_trait::async_trait;
use std::sync::Arc;

/// Write-only destination for interview results
#[async_trait]
pub trait ResultSink: Send + Sync {
    async fn record_candidate(&self, record: &CandidateRecord) -> Result<(), String>;

    async fn record_response(&self, record: &ResponseRecord) -> Result<(), String>;

    async fn record_outcome(&self, record: &OutcomeRecord) -> Result<(), String>;
}

/// Everything a session calls out to
pub trait Collaborators: QuestionGenerator + AnswerEvaluator + Summarizer {}
impl<T: QuestionGenerator + AnswerEvaluator + Summarizer> Collaborators for T {}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: ResultSink + ?Sized> ResultSink for Arc<T> {
    async fn record_candidate(&self, record: &CandidateRecord) -> Result<(), String> {
        (**self).record_candidate(record).await
    }

    async fn record_response(&self, record: &ResponseRecord) -> Result<(), String> {
        (**self).record_response(record).await
    }

    async fn record_outcome(&self, record: &OutcomeRecord) -> Result<(), String> {
        (**self).record_outcome(record).await
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

/// Adapter to use Database as a `ResultSink`
#[derive(Clone)]
pub struct DatabaseSink {
    db: Database,
}

impl DatabaseSink {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ResultSink for DatabaseSink {
    async fn record_candidate(&self, record: &CandidateRecord) -> Result<(), String> {
        self.db.insert_candidate(record).map_err(|e| e.to_string())
    }

    async fn record_response(&self, record: &ResponseRecord) -> Result<(), String> {
        self.db.insert_response(record).map_err(|e| e.to_string())
    }

    async fn record_outcome(&self, record: &OutcomeRecord) -> Result<(), String> {
        self.db.update_outcome(record).map_err(|e| e.to_string())
    }
}
