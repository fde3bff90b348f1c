//! Assistant module — relays a single chat message through a hosted assistant.
//!
//! The hosted service is driven through the thread/run workflow:
//! create a thread, append the user message, start a run of a pre-configured
//! assistant, poll the run until it settles, then read the newest message.
//!
//! # Public API
//!
//! - [`AssistantApi`] — the five external operations the relay needs
//! - [`openai::OpenAiAssistants`] — reqwest-backed implementation
//! - [`relay::relay_message`] — the full create/append/run/poll/reply sequence
//! - [`config::AssistantSettings`] / [`config::PollSettings`] — startup configuration

pub mod config;
pub mod models;
pub mod openai;
pub mod relay;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use config::{AssistantSettings, PollSettings};
pub use models::{ContentBlock, Run, RunStatus, Thread, ThreadMessage};
pub use openai::OpenAiAssistants;
pub use relay::relay_message;

/// Errors that can occur while relaying a message.
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("Assistant request failed: {0}")]
    Transport(String),

    #[error("Assistant API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Assistant response parse error: {0}")]
    Decode(String),

    #[error("Assistant run ended with status {status}")]
    RunFailed {
        status: RunStatus,
        reason: Option<String>,
    },

    #[error("Assistant returned an empty reply")]
    EmptyReply,

    #[error("Timed out waiting for assistant after {}s", .0.as_secs_f64())]
    TimedOut(Duration),
}

/// External assistant operations used by the relay.
///
/// Implementations own their transport; every call maps failures into
/// [`AssistantError`].
#[async_trait]
pub trait AssistantApi: Send + Sync {
    /// Create an empty conversation thread.
    async fn create_thread(&self) -> Result<Thread, AssistantError>;

    /// Append a `user` message to a thread.
    async fn add_message(
        &self,
        thread_id: &str,
        text: &str,
    ) -> Result<ThreadMessage, AssistantError>;

    /// Start a run of `assistant_id` against a thread.
    async fn create_run(&self, thread_id: &str, assistant_id: &str)
    -> Result<Run, AssistantError>;

    /// Fetch the current state of a run.
    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AssistantError>;

    /// List the thread's messages, newest first.
    async fn latest_messages(&self, thread_id: &str)
    -> Result<Vec<ThreadMessage>, AssistantError>;
}
