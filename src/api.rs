//! HTTP API for the interview orchestrator

mod handlers;
mod sse;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::db::Database;
use crate::runtime::SessionManager;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
    /// Read side of the result store
    pub db: Database,
}

impl AppState {
    pub fn new(sessions: SessionManager, db: Database) -> Self {
        Self {
            sessions: Arc::new(sessions),
            db,
        }
    }
}
