//! Database module for the interview orchestrator
//!
//! Write-side sink for candidate records, responses and final outcomes.

mod schema;

pub use schema::*;

use crate::state_machine::state::Difficulty;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Candidate not found: {0}")]
    CandidateNotFound(String),
    #[error("Database lock poisoned")]
    LockPoisoned,
    #[error("Invalid stored value: {0}")]
    InvalidValue(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Thread-safe database handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    #[allow(dead_code)] // Used in tests
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::LockPoisoned)
    }

    fn run_migrations(&self) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    // ==================== Candidate Operations ====================

    pub fn insert_candidate(&self, record: &CandidateRecord) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO candidates (session_id, name, email, phone, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.session_id,
                record.name,
                record.email,
                record.phone,
                Utc::now().to_rfc3339()
            ],
        )?;
        Ok(())
    }

    /// Store the final score and summary
    pub fn update_outcome(&self, record: &OutcomeRecord) -> DbResult<()> {
        let conn = self.lock()?;
        let updated = conn.execute(
            "UPDATE candidates SET score = ?1, summary = ?2, completed_at = ?3
             WHERE session_id = ?4",
            params![
                record.score,
                record.summary,
                Utc::now().to_rfc3339(),
                record.session_id
            ],
        )?;
        if updated == 0 {
            return Err(DbError::CandidateNotFound(record.session_id.clone()));
        }
        Ok(())
    }

    pub fn get_candidate(&self, session_id: &str) -> DbResult<StoredCandidate> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT session_id, name, email, phone, score, summary, created_at, completed_at
             FROM candidates WHERE session_id = ?1",
            params![session_id],
            |row| {
                Ok(StoredCandidate {
                    session_id: row.get(0)?,
                    name: row.get(1)?,
                    email: row.get(2)?,
                    phone: row.get(3)?,
                    score: row.get(4)?,
                    summary: row.get(5)?,
                    created_at: parse_datetime(&row.get::<_, String>(6)?),
                    completed_at: row
                        .get::<_, Option<String>>(7)?
                        .map(|s| parse_datetime(&s)),
                })
            },
        )
        .optional()?
        .ok_or_else(|| DbError::CandidateNotFound(session_id.to_string()))
    }

    // ==================== Response Operations ====================

    pub fn insert_response(&self, record: &ResponseRecord) -> DbResult<()> {
        let conn = self.lock()?;
        let question_index = i64::try_from(record.question_index)
            .map_err(|_| DbError::InvalidValue(format!("question index {}", record.question_index)))?;
        conn.execute(
            "INSERT INTO interview_responses
                (session_id, question_index, question, answer, difficulty, time_taken, score, feedback, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                record.session_id,
                question_index,
                record.question,
                record.answer,
                record.difficulty.as_str(),
                record.time_taken_units,
                record.score,
                record.feedback,
                Utc::now().to_rfc3339()
            ],
        )?;
        Ok(())
    }

    /// Responses for a session in question order
    pub fn get_responses(&self, session_id: &str) -> DbResult<Vec<StoredResponse>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT question_index, question, answer, difficulty, time_taken, score, feedback, created_at
             FROM interview_responses WHERE session_id = ?1
             ORDER BY question_index ASC",
        )?;

        let rows = stmt.query_map(params![session_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, u32>(4)?,
                row.get::<_, Option<u8>>(5)?,
                row.get::<_, Option<String>>(6)?,
                row.get::<_, String>(7)?,
            ))
        })?;

        let mut responses = Vec::new();
        for row in rows {
            let (index, question, answer, difficulty, time_taken, score, feedback, created_at) = row?;
            responses.push(StoredResponse {
                question_index: usize::try_from(index)
                    .map_err(|_| DbError::InvalidValue(format!("question index {index}")))?,
                question,
                answer,
                difficulty: parse_difficulty(&difficulty)?,
                time_taken_units: time_taken,
                score,
                feedback,
                created_at: parse_datetime(&created_at),
            });
        }
        Ok(responses)
    }
}

fn parse_difficulty(s: &str) -> DbResult<Difficulty> {
    Difficulty::ALL
        .into_iter()
        .find(|d| d.as_str() == s)
        .ok_or_else(|| DbError::InvalidValue(format!("difficulty {s}")))
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc))
}
