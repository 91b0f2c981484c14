//! REST API route handlers.
//!
//! Provides endpoints for one chat turn, conversation teardown, and server
//! status.

use std::sync::{Arc, PoisonError};

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /api/status
// ---------------------------------------------------------------------------

/// Response payload for the `/api/status` endpoint.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Number of rules in the loaded table.
    pub intents: usize,
    pub active_sessions: u64,
}

/// Return basic server status.
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        intents: state.rules.len(),
        active_sessions: state.active_sessions(),
    })
}

// ---------------------------------------------------------------------------
// POST /api/chat
// ---------------------------------------------------------------------------

/// Request body for a chat turn.
#[derive(Debug, Default, Deserialize)]
pub struct ChatBody {
    /// The user's message.  Absent is treated as empty.
    #[serde(default)]
    pub message: String,
    /// Conversation to continue.  Absent starts a new one.
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Response body for a chat turn.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    pub session_id: String,
    /// Whether the pizza dialog has reached its terminal state.
    pub done: bool,
}

/// Run one conversation turn.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatBody>,
) -> impl IntoResponse {
    let session_id = body
        .session_id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| Uuid::now_v7().to_string());

    let engine = match state.engine_for(&session_id) {
        Ok(engine) => engine,
        Err(e) => {
            tracing::error!(session_id = %session_id, error = %e, "failed to start conversation");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": e.to_string()})),
            )
                .into_response();
        }
    };

    let (reply, done) = {
        let mut engine = engine.lock().unwrap_or_else(|poisoned| {
            tracing::warn!(session_id = %session_id, "recovering poisoned conversation lock");
            PoisonError::into_inner(poisoned)
        });
        let reply = engine.respond(&body.message);
        (reply, engine.is_done())
    };

    (
        StatusCode::OK,
        Json(ChatResponse {
            reply,
            session_id,
            done,
        }),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// Session management endpoints
// ---------------------------------------------------------------------------

/// DELETE /api/sessions/:id: end a conversation.
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    if state.end(&id) {
        tracing::debug!(session_id = %id, "conversation ended");
        StatusCode::NO_CONTENT.into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"error": format!("no conversation with id {id}")})),
        )
            .into_response()
    }
}
