//! HTTP Endpoints
//!
//! REST API the conversational engine uses to drive intake sessions.

use axum::{
    extract::{Json, Path, State},
    http::{HeaderValue, Method, StatusCode},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use doorman_agent::{intake_tool_definitions, TurnOutcome};
use doorman_core::{Intent, ToolCall};

use crate::state::AppState;
use crate::ServerError;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(
        &state.config.server.cors_origins,
        state.config.server.cors_enabled,
    );

    Router::new()
        // Session endpoints
        .route("/api/sessions", post(create_session).get(list_sessions))
        .route("/api/sessions/:id", get(get_session).delete(delete_session))
        // Conversation turns
        .route("/api/sessions/:id/intents", post(handle_intent))
        .route("/api/sessions/:id/tool-calls", post(handle_tool_call))
        // Tool definitions
        .route("/api/tools", get(list_tools))
        // Health check
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// Disabled CORS allows every origin; an empty or unparsable origin list
/// falls back to localhost:3000.
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    let methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    if parsed_origins.is_empty() {
        tracing::info!("No usable CORS origins configured, defaulting to localhost:3000");
        return CorsLayer::new()
            .allow_origin(HeaderValue::from_static("http://localhost:3000"))
            .allow_methods(methods)
            .allow_headers(Any);
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods(methods)
        .allow_headers(Any)
}

/// Start a new intake session
async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<serde_json::Value>), StatusCode> {
    let session = state.create_session().map_err(|e| {
        tracing::warn!(error = %e, "Failed to create session");
        StatusCode::from(e)
    })?;

    let mut intake = state.config.intake.clone();
    intake.validation_enabled = state.validation_enabled();
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "session_id": session.id,
            "greeting": intake.greeting,
            "instructions": intake.effective_instructions(),
            "validation_enabled": state.validation_enabled(),
            "tools": intake_tool_definitions(state.validation_enabled()),
        })),
    ))
}

/// Get session state and summary
async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let session = state.session(&id).map_err(StatusCode::from)?;
    let snapshot = session.intake.snapshot().await;

    Ok(Json(serde_json::json!({
        "session_id": session.id,
        "created_at": session.intake.created_at(),
        "state": snapshot.state,
        "validation_enabled": snapshot.validation_enabled,
        "resident_validation": snapshot.record.resident_validation(),
        "confirmed": snapshot.record.is_confirmed(),
        "summary": snapshot.summary,
        "missing": snapshot.missing,
        "delivery_failures": snapshot.delivery_failures,
    })))
}

/// Delete session
async fn delete_session(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    if state.sessions.remove(&id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::from(ServerError::SessionNotFound(id))
    }
}

/// List sessions
async fn list_sessions(State(state): State<AppState>) -> Json<serde_json::Value> {
    let sessions = state.sessions.list();
    Json(serde_json::json!({
        "sessions": sessions,
        "count": sessions.len(),
    }))
}

/// Apply one intent to a session
async fn handle_intent(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(intent): Json<Intent>,
) -> Result<Json<TurnOutcome>, StatusCode> {
    let session = state.session(&id).map_err(StatusCode::from)?;
    session.touch();

    let outcome = session
        .intake
        .handle(intent)
        .await
        .map_err(|e| turn_error(&id, e))?;
    Ok(Json(outcome))
}

/// Apply one language-model tool call to a session
async fn handle_tool_call(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(call): Json<ToolCall>,
) -> Result<Json<TurnOutcome>, StatusCode> {
    let session = state.session(&id).map_err(StatusCode::from)?;
    session.touch();

    let outcome = session
        .intake
        .handle_tool_call(&call)
        .await
        .map_err(|e| turn_error(&id, e))?;
    Ok(Json(outcome))
}

fn turn_error(session_id: &str, err: doorman_core::Error) -> StatusCode {
    tracing::warn!(session_id = %session_id, error = %err, "Turn rejected");
    StatusCode::from(ServerError::from(err))
}

/// List tool definitions for the engine
async fn list_tools(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "tools": intake_tool_definitions(state.validation_enabled()),
    }))
}

/// Health check
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": state.sessions.count(),
        "directory": state.directory.as_ref().map(|d| d.name().to_string()),
        "notifier": state.notifier.name(),
    }))
}
