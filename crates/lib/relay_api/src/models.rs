//! Request and response bodies.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `POST /api/chat` request body.
///
/// `message` is kept untyped: any falsy JSON value counts as absent.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<Value>,
}

/// `POST /api/chat` success body.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// Error body returned for every failure.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
