//! Chat endpoint and chat history queries.
//!
//! Every exchange is stored atomically: the user message and the assistant response land
//! under the same session or not at all. A request without `session_id` opens a new session
//! titled from the message.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use arogya_core::{StoreError, ERROR_RESPONSE, NO_MESSAGE_RESPONSE};

use crate::AppState;

const NOT_LOGGED_IN: &str = "User not logged in";
const SESSION_NOT_FOUND: &str = "Chat session not found";

#[derive(serde::Deserialize)]
pub(crate) struct ChatRequest {
    #[serde(default)]
    message: String,
    /// Identity supplied by the session layer in front of the gateway.
    #[serde(default)]
    user_email: Option<String>,
    #[serde(default)]
    session_id: Option<u64>,
}

/// POST /api/v1/chat – answer a message and record the exchange.
pub(crate) async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Json<serde_json::Value> {
    let correlation_id = uuid::Uuid::new_v4();
    let message = req.message.trim();
    tracing::info!(
        target: "arogya::chat",
        %correlation_id,
        chars = message.len(),
        session_id = ?req.session_id,
        "Chat request received"
    );

    if message.is_empty() {
        return Json(serde_json::json!({ "error": NO_MESSAGE_RESPONSE }));
    }
    let user_email = match req.user_email.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(u) => u,
        None => return Json(serde_json::json!({ "error": NOT_LOGGED_IN })),
    };

    let exchange = state
        .history
        .record_exchange(user_email, req.session_id, message, |m| {
            Ok(state.assistant.handle_message(m))
        });
    match exchange {
        Ok(Some((session_id, response))) => {
            tracing::info!(target: "arogya::chat", %correlation_id, session_id, "Chat response generated");
            Json(serde_json::json!({
                "response": response,
                "session_id": session_id,
            }))
        }
        Ok(None) => Json(serde_json::json!({ "error": SESSION_NOT_FOUND })),
        Err(e) => {
            tracing::error!(target: "arogya::chat", %correlation_id, error = %e, "Error in chat endpoint");
            Json(serde_json::json!({ "error": ERROR_RESPONSE }))
        }
    }
}

#[derive(serde::Deserialize)]
pub(crate) struct SessionsQuery {
    #[serde(default)]
    user_email: Option<String>,
}

/// GET /api/v1/sessions?user_email= – the user's sessions, most recent first.
pub(crate) async fn list_sessions(
    State(state): State<AppState>,
    Query(q): Query<SessionsQuery>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let user_email = q
        .user_email
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(StatusCode::UNAUTHORIZED)?;
    let sessions = state.history.list_sessions(user_email).map_err(|e| {
        tracing::error!(target: "arogya::chat", error = %e, "Failed to list chat sessions");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok(Json(serde_json::json!({ "sessions": sessions })))
}

/// GET /api/v1/sessions/:session_id/messages – messages of one session, oldest first.
pub(crate) async fn session_messages(
    State(state): State<AppState>,
    Path(session_id): Path<u64>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let internal = |e: StoreError| {
        tracing::error!(target: "arogya::chat", session_id, error = %e, "Failed to read chat session");
        StatusCode::INTERNAL_SERVER_ERROR
    };
    let session = state
        .history
        .session(session_id)
        .map_err(internal)?
        .ok_or(StatusCode::NOT_FOUND)?;
    let messages = state.history.session_messages(session_id).map_err(internal)?;
    Ok(Json(serde_json::json!({
        "session": session,
        "messages": messages,
    })))
}
