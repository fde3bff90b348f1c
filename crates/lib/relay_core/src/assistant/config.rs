//! Assistant client and polling configuration.

use std::fmt;
use std::time::Duration;

/// Default base URL for the hosted assistant API.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Default delay between run status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Default upper bound on waiting for a run to settle.
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(120);

/// Default timeout for a single HTTP call to the assistant API.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the assistant API client.
#[derive(Clone)]
pub struct AssistantSettings {
    /// Bearer credential. May be empty; requests will then be rejected upstream.
    pub api_key: String,
    /// API base URL, without trailing slash.
    pub api_base: String,
    /// Timeout applied to each HTTP call.
    pub request_timeout: Duration,
}

impl AssistantSettings {
    /// Settings for the public API with default timeouts.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

// Keeps the credential out of logs.
impl fmt::Debug for AssistantSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssistantSettings")
            .field("api_key", &if self.has_api_key() { "<set>" } else { "<empty>" })
            .field("api_base", &self.api_base)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// How run status is polled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollSettings {
    /// Delay between consecutive status checks.
    pub interval: Duration,
    /// Total time allowed for the run to settle.
    pub max_wait: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_wait: DEFAULT_MAX_WAIT,
        }
    }
}
