//! Runtime for executing interview sessions
//!
//! Each session runs as its own tokio task. The manager hands out snapshots
//! and forwards caller commands over channels; it never touches session
//! state directly.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::SessionRuntime;
pub use traits::*;

use crate::state_machine::state::{Candidate, SessionState, TimerView};
use crate::state_machine::{SessionSnapshot, TransitionError};
use crate::transcript::Message;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot, RwLock};

const DEFAULT_TICK_MS: u64 = 1000;
const DEFAULT_RETAIN_FINISHED_SECS: u64 = 600;

/// Commands a caller can send to a running session
#[derive(Debug)]
pub enum SessionCommand {
    UpdateDraft {
        text: String,
        reply: oneshot::Sender<Result<SessionSnapshot, TransitionError>>,
    },
    Submit {
        reply: oneshot::Sender<Result<SessionSnapshot, TransitionError>>,
    },
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
}

/// Updates pushed to subscribers
#[derive(Debug, Clone)]
pub enum SessionUpdate {
    Message {
        message: Message,
    },
    StateChange {
        state: SessionState,
        current_index: usize,
    },
    Timer {
        timer: TimerView,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Rejected(#[from] TransitionError),
    #[error("Session runtime stopped: {0}")]
    Stopped(String),
    #[error("Invalid candidate: {0}")]
    InvalidCandidate(String),
}

/// Runtime tuning
#[derive(Debug, Clone, Copy)]
pub struct RuntimeSettings {
    /// Wall-clock length of one timer unit
    pub tick: Duration,
    /// How long a completed or failed session stays live before it is dropped
    pub retain_finished: Duration,
}

impl RuntimeSettings {
    pub fn from_env() -> Self {
        let tick_ms = std::env::var("INTERVIEW_TICK_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_TICK_MS);
        let retain_secs = std::env::var("INTERVIEW_RETAIN_FINISHED_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_RETAIN_FINISHED_SECS);
        Self {
            tick: Duration::from_millis(tick_ms),
            retain_finished: Duration::from_secs(retain_secs),
        }
    }
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(DEFAULT_TICK_MS),
            retain_finished: Duration::from_secs(DEFAULT_RETAIN_FINISHED_SECS),
        }
    }
}

/// Handle to interact with a running session
#[derive(Clone)]
pub struct SessionHandle {
    pub command_tx: mpsc::Sender<SessionCommand>,
    pub broadcast_tx: broadcast::Sender<SessionUpdate>,
}

/// One line of the session listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: String,
    pub candidate_name: String,
    pub state: &'static str,
    pub current_index: usize,
    pub total_questions: usize,
}

/// Manager for all live sessions
pub struct SessionManager {
    collaborators: Arc<dyn Collaborators>,
    sink: Arc<dyn ResultSink>,
    settings: RuntimeSettings,
    sessions: Arc<RwLock<HashMap<String, SessionHandle>>>,
}

impl SessionManager {
    pub fn new(
        collaborators: Arc<dyn Collaborators>,
        sink: Arc<dyn ResultSink>,
        settings: RuntimeSettings,
    ) -> Self {
        Self {
            collaborators,
            sink,
            settings,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a session for `candidate` and start it
    pub async fn create_session(&self, candidate: Candidate) -> Result<SessionSnapshot, SessionError> {
        candidate.validate().map_err(SessionError::InvalidCandidate)?;

        let id = uuid::Uuid::new_v4().to_string();
        let (command_tx, command_rx) = mpsc::channel(32);
        let (broadcast_tx, lifecycle_rx) = broadcast::channel(256);

        let runtime = SessionRuntime::new(
            crate::state_machine::Session::new(&id, candidate),
            self.collaborators.clone(),
            self.sink.clone(),
            self.settings.tick,
            command_rx,
            broadcast_tx.clone(),
        );

        let session_id = id.clone();
        tokio::spawn(async move {
            runtime.run().await;
            tracing::info!(session_id = %session_id, "Session runtime finished");
        });

        self.sessions.write().await.insert(
            id.clone(),
            SessionHandle {
                command_tx,
                broadcast_tx,
            },
        );
        self.schedule_retirement(id.clone(), lifecycle_rx);
        tracing::info!(session_id = %id, "Session created");

        self.snapshot(&id).await
    }

    /// Drop the session `retain_finished` after it reaches a terminal state.
    /// Persisted results stay readable through the database.
    fn schedule_retirement(&self, session_id: String, mut updates: broadcast::Receiver<SessionUpdate>) {
        let sessions = self.sessions.clone();
        let retain = self.settings.retain_finished;
        tokio::spawn(async move {
            loop {
                match updates.recv().await {
                    Ok(SessionUpdate::StateChange { state, .. }) if state.is_terminal() => break,
                    Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                    // Runtime gone: the session was abandoned
                    Err(broadcast::error::RecvError::Closed) => return,
                }
            }
            drop(updates);

            tokio::time::sleep(retain).await;
            if sessions.write().await.remove(&session_id).is_some() {
                tracing::info!(session_id = %session_id, "Retired finished session");
            }
        });
    }

    async fn handle(&self, session_id: &str) -> Result<SessionHandle, SessionError> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))
    }

    async fn send(&self, session_id: &str, command: SessionCommand) -> Result<(), SessionError> {
        self.handle(session_id)
            .await?
            .command_tx
            .send(command)
            .await
            .map_err(|_| SessionError::Stopped(session_id.to_string()))
    }

    pub async fn snapshot(&self, session_id: &str) -> Result<SessionSnapshot, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(session_id, SessionCommand::Snapshot { reply }).await?;
        rx.await
            .map_err(|_| SessionError::Stopped(session_id.to_string()))
    }

    pub async fn update_draft(
        &self,
        session_id: &str,
        text: String,
    ) -> Result<SessionSnapshot, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(session_id, SessionCommand::UpdateDraft { text, reply })
            .await?;
        rx.await
            .map_err(|_| SessionError::Stopped(session_id.to_string()))?
            .map_err(SessionError::from)
    }

    pub async fn submit(&self, session_id: &str) -> Result<SessionSnapshot, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(session_id, SessionCommand::Submit { reply }).await?;
        rx.await
            .map_err(|_| SessionError::Stopped(session_id.to_string()))?
            .map_err(SessionError::from)
    }

    /// Drop the session. Its runtime stops the timer and exits once the
    /// command channel closes; in-flight collaborator results are discarded.
    pub async fn abandon(&self, session_id: &str) -> Result<(), SessionError> {
        let removed = self.sessions.write().await.remove(session_id);
        match removed {
            Some(_) => {
                tracing::info!(session_id = %session_id, "Session abandoned");
                Ok(())
            }
            None => Err(SessionError::NotFound(session_id.to_string())),
        }
    }

    /// Subscribe to updates. The snapshot is taken after subscribing so no
    /// update between the two is lost.
    pub async fn subscribe(
        &self,
        session_id: &str,
    ) -> Result<(SessionSnapshot, broadcast::Receiver<SessionUpdate>), SessionError> {
        let rx = self.handle(session_id).await?.broadcast_tx.subscribe();
        let snapshot = self.snapshot(session_id).await?;
        Ok((snapshot, rx))
    }

    pub async fn list(&self) -> Vec<SessionSummary> {
        let ids: Vec<String> = self.sessions.read().await.keys().cloned().collect();
        let mut summaries = Vec::with_capacity(ids.len());
        for id in ids {
            if let Ok(snapshot) = self.snapshot(&id).await {
                summaries.push(SessionSummary {
                    id: snapshot.id,
                    candidate_name: snapshot.candidate_name,
                    state: snapshot.state.name(),
                    current_index: snapshot.current_index,
                    total_questions: snapshot.total_questions,
                });
            }
        }
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        summaries
    }
}
