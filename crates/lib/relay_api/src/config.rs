//! API server configuration.

use relay_core::assistant::PollSettings;

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "0.0.0.0:10000").
    pub bind_addr: String,
    /// Id of the pre-configured assistant each chat request runs.
    pub assistant_id: String,
    /// Run status polling behaviour.
    pub poll: PollSettings,
}
