//! HTTP handlers: /query, /health, /catalog/reload
//!
//! The transport resolves the per-session conversation state, locks it for
//! the duration of the turn (turns for one session id are strictly
//! serialized), runs the engine, and clears the session once an endpoint
//! call completes.

use crate::catalog::CatalogStore;
use crate::orchestrator::{Message, OrchestrationEngine, SessionStore};
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Shared application state
pub struct AppState {
    pub engine: Arc<OrchestrationEngine>,
    pub sessions: SessionStore,
    pub catalog: Arc<CatalogStore>,
}

/// Incoming query request
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    /// Free-text user query
    pub query: String,
    /// Optional transcript carried by the client
    #[serde(default)]
    pub history: Option<Vec<Message>>,
    /// Optional session id for multi-user setups
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Outgoing query response
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    /// Main reply message
    pub response: String,
    /// Transcript after this turn
    pub history: Vec<Message>,
    /// Accumulated slot values
    pub params: HashMap<String, String>,
    /// Name of the endpoint currently in play
    pub current_endpoint: Option<String>,
    /// Whether the session was cleared after a completed call
    pub session_cleared: bool,
}

/// Process one conversation turn
pub async fn query_handler(
    state: web::Data<AppState>,
    request: web::Json<QueryRequest>,
) -> HttpResponse {
    let request = request.into_inner();
    let session_id = request.session_id.as_deref().unwrap_or("default").to_string();

    let session = state.sessions.get_or_create(&session_id);
    let mut conversation = session.lock().await;

    // The client may carry the transcript; adopt it before the turn
    if let Some(history) = request.history {
        conversation.history = history;
    }

    let outcome = state.engine.run_turn(&request.query, &mut conversation).await;

    let response = QueryResponse {
        response: outcome.message().to_string(),
        history: conversation.history.clone(),
        params: conversation.params.clone(),
        current_endpoint: conversation.current_endpoint.clone(),
        session_cleared: outcome.is_completed(),
    };

    // A completed call ends the conversation; the next query starts fresh.
    // Remove before releasing the turn lock so a request racing on the same
    // session id gets a fresh state instead of a doomed one.
    if outcome.is_completed() {
        state.sessions.remove(&session_id);
        info!("Session '{}' completed and cleared", session_id);
    }
    drop(conversation);

    HttpResponse::Ok().json(response)
}

/// Health check endpoint
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "finperf-gateway"
    }))
}

/// Explicitly reload the endpoint catalogue
pub async fn catalog_reload_handler(state: web::Data<AppState>) -> HttpResponse {
    match state.catalog.reload() {
        Ok(()) => {
            let catalog = state.catalog.current();
            HttpResponse::Ok().json(serde_json::json!({
                "status": "reloaded",
                "endpoints": catalog.endpoints().len()
            }))
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": e.to_string()
        })),
    }
}
