//! Interview orchestrator
//!
//! Runs timed, AI-assisted technical interviews: questions are generated
//! from a resume, each answer is captured under a countdown and scored,
//! and a final summary is produced and persisted.

mod api;
mod capture;
mod collaborators;
mod db;
mod runtime;
mod sequencer;
mod state_machine;
mod timer;
mod transcript;

use api::{create_router, AppState};
use collaborators::{CollaboratorConfig, HttpCollaborators, LoggingCollaborators};
use db::Database;
use runtime::{DatabaseSink, RuntimeSettings, SessionManager};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "interview_orchestrator=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let db_path = std::env::var("INTERVIEW_DB_PATH").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
        format!("{home}/.interview-orchestrator/interview.db")
    });

    let port: u16 = std::env::var("INTERVIEW_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);

    let Some(collaborator_config) = CollaboratorConfig::from_env() else {
        tracing::error!("COLLABORATOR_BASE_URL is not set");
        return Err("COLLABORATOR_BASE_URL must point at the collaborator service".into());
    };

    // Ensure database directory exists
    if let Some(parent) = PathBuf::from(&db_path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::info!(path = %db_path, "Opening database");
    let db = Database::open(&db_path)?;

    tracing::info!(
        base_url = %collaborator_config.base_url,
        authenticated = collaborator_config.api_key.is_some(),
        "Collaborator client configured"
    );
    let collaborators = LoggingCollaborators::new(HttpCollaborators::new(&collaborator_config)?);

    let settings = RuntimeSettings::from_env();
    tracing::info!(tick = ?settings.tick, "Runtime settings");

    let manager = SessionManager::new(
        Arc::new(collaborators),
        Arc::new(DatabaseSink::new(db.clone())),
        settings,
    );
    let state = AppState::new(manager, db);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state)
        .layer(cors)
        .layer(compression)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Interview orchestrator listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
