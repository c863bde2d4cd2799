//! Database schema and record types

use crate::state_machine::state::{Candidate, Difficulty, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// SQL schema for initialization
pub const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS candidates (
    session_id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL DEFAULT '',
    phone TEXT NOT NULL DEFAULT '',
    score INTEGER,
    summary TEXT,
    created_at TEXT NOT NULL,
    completed_at TEXT
);

CREATE TABLE IF NOT EXISTS interview_responses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id TEXT NOT NULL,
    question_index INTEGER NOT NULL,
    question TEXT NOT NULL,
    answer TEXT NOT NULL,
    difficulty TEXT NOT NULL,
    time_taken INTEGER NOT NULL,
    score INTEGER,
    feedback TEXT,
    created_at TEXT NOT NULL,

    UNIQUE (session_id, question_index),
    FOREIGN KEY (session_id) REFERENCES candidates(session_id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_responses_session ON interview_responses(session_id, question_index);
";

/// Written once when a session starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub session_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl CandidateRecord {
    pub fn new(session_id: &str, candidate: &Candidate) -> Self {
        Self {
            session_id: session_id.to_string(),
            name: candidate.name.clone(),
            email: candidate.email.clone(),
            phone: candidate.phone.clone(),
        }
    }
}

/// Written once per answered or timed-out question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub session_id: String,
    pub question_index: usize,
    pub question: String,
    pub answer: String,
    pub difficulty: Difficulty,
    pub time_taken_units: u32,
    pub score: Option<u8>,
    pub feedback: Option<String>,
}

impl ResponseRecord {
    pub fn new(session_id: &str, question_index: usize, response: &Response) -> Self {
        Self {
            session_id: session_id.to_string(),
            question_index,
            question: response.question.text.clone(),
            answer: response.answer_text.clone(),
            difficulty: response.difficulty(),
            time_taken_units: response.time_taken_units,
            score: response.score,
            feedback: response.feedback.clone(),
        }
    }
}

/// Written once on completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub session_id: String,
    pub score: u8,
    pub summary: String,
}

/// Candidate row as read back
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCandidate {
    pub session_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub score: Option<u8>,
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Response row as read back
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredResponse {
    pub question_index: usize,
    pub question: String,
    pub answer: String,
    pub difficulty: Difficulty,
    pub time_taken_units: u32,
    pub score: Option<u8>,
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
}
