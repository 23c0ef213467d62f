//! HTTP API gateway for GreenMow.
//!
//! Three endpoints:
//! - `POST /chat` — one conversation turn
//! - `POST /reload_kb` — reindex the knowledge base
//! - `GET /health` — liveness probe
//!
//! Built on Axum.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use greenmow_agent::{ChatEngine, TurnRequest};
use greenmow_core::{Error, Language};
use greenmow_kb::KnowledgeBase;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

/// Shared application state for the gateway.
#[derive(Clone)]
pub struct GatewayState {
    pub engine: Arc<ChatEngine>,
    pub kb: Arc<KnowledgeBase>,
}

/// Build the Axum router with all gateway routes.
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/chat", post(chat_handler))
        .route("/reload_kb", post(reload_kb_handler))
        .route("/health", get(health_handler))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
pub async fn start(
    state: GatewayState,
    host: &str,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("gateway listening on http://{addr}");
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

// --- Wire types ---

fn default_top_k() -> usize {
    4
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub use_rag: bool,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub sources: Vec<String>,
    pub session_id: String,
    pub lang: Language,
}

#[derive(Debug, Serialize)]
pub struct ReloadKbResponse {
    pub ok: bool,
    pub chunks: usize,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Wraps engine errors into 500 responses with a JSON body.
struct GatewayError(Error);

impl From<Error> for GatewayError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

// --- Handlers ---

async fn chat_handler(
    State(state): State<GatewayState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, GatewayError> {
    let result = state
        .engine
        .run_turn(TurnRequest {
            message: req.message,
            use_retrieval: req.use_rag,
            top_k: req.top_k,
            session_id: req.session_id,
        })
        .await?;

    Ok(Json(ChatResponse {
        reply: result.reply,
        sources: result.sources,
        session_id: result.session_id,
        lang: result.language,
    }))
}

async fn reload_kb_handler(
    State(state): State<GatewayState>,
) -> Result<Json<ReloadKbResponse>, GatewayError> {
    let chunks = state.kb.reload().await?;
    Ok(Json(ReloadKbResponse { ok: true, chunks }))
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
