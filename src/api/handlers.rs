//! HTTP request handlers

use super::sse::sse_stream;
use super::types::{
    CreateSessionRequest, DraftRequest, ErrorResponse, ResultsResponse, SessionListResponse,
    SuccessResponse,
};
use super::AppState;
use crate::db::DbError;
use crate::runtime::SessionError;
use crate::state_machine::state::Candidate;
use crate::state_machine::{SessionSnapshot, TransitionError};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Session lifecycle
        .route("/api/sessions", post(create_session).get(list_sessions))
        .route("/api/sessions/:id", get(get_session))
        .route("/api/sessions/:id/abandon", post(abandon_session))
        // Candidate actions
        .route("/api/sessions/:id/draft", put(update_draft))
        .route("/api/sessions/:id/submit", post(submit_answer))
        // Live updates
        .route("/api/sessions/:id/stream", get(stream_session))
        // Persisted results
        .route("/api/sessions/:id/results", get(get_results))
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Session Lifecycle
// ============================================================

async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionSnapshot>), AppError> {
    let candidate = Candidate {
        name: req.name,
        email: req.email,
        phone: req.phone,
        resume_text: req.resume_text,
    };
    let snapshot = state.sessions.create_session(candidate).await?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

async fn list_sessions(State(state): State<AppState>) -> Json<SessionListResponse> {
    Json(SessionListResponse {
        sessions: state.sessions.list().await,
    })
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.sessions.snapshot(&id).await?))
}

async fn abandon_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.sessions.abandon(&id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

// ============================================================
// Candidate Actions
// ============================================================

async fn update_draft(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<DraftRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.sessions.update_draft(&id, req.text).await?))
}

async fn submit_answer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.sessions.submit(&id).await?))
}

// ============================================================
// Streaming
// ============================================================

async fn stream_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let (snapshot, updates) = state.sessions.subscribe(&id).await?;
    Ok(sse_stream(snapshot, updates))
}

// ============================================================
// Results
// ============================================================

async fn get_results(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ResultsResponse>, AppError> {
    let candidate = state.db.get_candidate(&id)?;
    let responses = state.db.get_responses(&id)?;
    Ok(Json(ResultsResponse {
        candidate,
        responses,
    }))
}

async fn get_version() -> &'static str {
    concat!("interview-orchestrator ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

enum AppError {
    BadRequest(ErrorResponse),
    NotFound(ErrorResponse),
    Conflict(ErrorResponse),
    Internal(ErrorResponse),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        let message = err.to_string();
        match err {
            SessionError::NotFound(_) => AppError::NotFound(ErrorResponse::new("not_found", message)),
            SessionError::InvalidCandidate(_) => {
                AppError::BadRequest(ErrorResponse::new("invalid_candidate", message))
            }
            SessionError::Stopped(_) => AppError::Internal(ErrorResponse::new("stopped", message)),
            SessionError::Rejected(rejection) => {
                let body = ErrorResponse::new(rejection.kind(), message)
                    .with_context(rejection.context());
                match rejection {
                    TransitionError::Validation { .. } => AppError::BadRequest(body),
                    TransitionError::Busy { .. } | TransitionError::InvalidState { .. } => {
                        AppError::Conflict(body)
                    }
                }
            }
        }
    }
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        let message = err.to_string();
        match err {
            DbError::CandidateNotFound(_) => {
                AppError::NotFound(ErrorResponse::new("not_found", message))
            }
            _ => {
                tracing::error!(error = %message, "Database read failed");
                AppError::Internal(ErrorResponse::new("internal", message))
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BadRequest(body) => (StatusCode::BAD_REQUEST, body),
            AppError::NotFound(body) => (StatusCode::NOT_FOUND, body),
            AppError::Conflict(body) => (StatusCode::CONFLICT, body),
            AppError::Internal(body) => (StatusCode::INTERNAL_SERVER_ERROR, body),
        };
        (status, Json(body)).into_response()
    }
}
