//! Chat relay handler.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use relay_core::assistant::relay_message;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{ChatRequest, ChatResponse};

/// `POST /api/chat` — relay one message to the assistant and return its reply.
pub async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Json<ChatResponse>> {
    let Json(body) = payload.map_err(|rejection| {
        error!(error = %rejection, "unreadable chat request body");
        AppError::Internal(rejection.body_text())
    })?;

    let message = message_text(body.message)?;

    info!(message_len = message.len(), "chat message received");

    let reply = relay_message(
        state.assistant.as_ref(),
        &state.config.assistant_id,
        &message,
        state.config.poll,
    )
    .await
    .map_err(|e| {
        error!(error = ?e, "chat relay failed");
        AppError::from(e)
    })?;

    Ok(Json(ChatResponse { reply }))
}

/// Extract the text to relay.
///
/// Absent, `null`, `false`, `0`, `""`, `[]` and `{}` mean no message.
/// Any other non-string value cannot be relayed.
fn message_text(message: Option<Value>) -> AppResult<String> {
    let value = match message {
        Some(value) if !is_falsy(&value) => value,
        _ => {
            warn!("no message provided in chat request");
            return Err(AppError::Validation("No message provided".into()));
        }
    };

    match value {
        Value::String(text) => Ok(text),
        other => {
            error!(message = %other, "chat message is not a string");
            Err(AppError::Internal(format!(
                "message must be a string, got {other}"
            )))
        }
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}
