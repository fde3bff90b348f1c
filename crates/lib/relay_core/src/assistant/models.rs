//! Wire types for the hosted assistant service.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A conversation thread. Only the id is used.
#[derive(Debug, Clone, Deserialize)]
pub struct Thread {
    pub id: String,
}

/// A run of an assistant against a thread.
#[derive(Debug, Clone, Deserialize)]
pub struct Run {
    pub id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub last_error: Option<RunError>,
}

/// Error detail reported on a run that did not complete.
#[derive(Debug, Clone, Deserialize)]
pub struct RunError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// Run lifecycle states as reported by the service.
///
/// Unrecognised values deserialize to [`RunStatus::Unknown`] and are polled
/// like any other non-final state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    /// Whether the run may still change state on its own.
    ///
    /// `requires_action` is treated as settled: the relay never submits tool
    /// outputs, so such a run would otherwise sit until it expires.
    pub fn is_pending(self) -> bool {
        matches!(
            self,
            RunStatus::Queued | RunStatus::InProgress | RunStatus::Cancelling | RunStatus::Unknown
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Failed => "failed",
            RunStatus::Completed => "completed",
            RunStatus::Incomplete => "incomplete",
            RunStatus::Expired => "expired",
            RunStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message in a thread.
#[derive(Debug, Clone, Deserialize)]
pub struct ThreadMessage {
    pub id: String,
    pub role: String,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

impl ThreadMessage {
    /// The value of the first `text` block, skipping images and other kinds.
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(|block| match block {
            ContentBlock::Text { text } => Some(text.value.as_str()),
            ContentBlock::Other => None,
        })
    }
}

/// One block of message content.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: TextContent },
    #[serde(other)]
    Other,
}

/// Text payload of a `text` content block. Annotations are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct TextContent {
    pub value: String,
}

/// Page of messages returned by the list endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct MessageList {
    pub data: Vec<ThreadMessage>,
}

#[derive(Serialize)]
pub(crate) struct NewMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Serialize)]
pub(crate) struct NewRun<'a> {
    pub assistant_id: &'a str,
}
