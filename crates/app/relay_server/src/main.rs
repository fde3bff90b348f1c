//! Assistant relay server binary.
//!
//! Serves `POST /api/chat` and relays each message to a hosted assistant.
//! Credentials come from the environment (or `.env`) and are read once at startup.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use relay_api::config::ApiConfig;
use relay_core::assistant::{AssistantSettings, OpenAiAssistants, PollSettings};
use tracing::{info, warn};

/// CLI arguments for the relay server.
#[derive(Parser, Debug)]
#[command(name = "relay_server", version, about = "Assistant relay server")]
struct Args {
    /// Interface to listen on.
    #[arg(long, env = "RELAY_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 10000)]
    port: u16,

    /// API key for the hosted assistant service.
    #[arg(long, env = "OPENAI_API_KEY", default_value = "", hide_env_values = true)]
    api_key: String,

    /// Id of the pre-configured assistant to run.
    #[arg(long, env = "OPENAI_ASSISTANT_ID", default_value = "")]
    assistant_id: String,

    /// Base URL of the assistant API.
    #[arg(
        long,
        env = "OPENAI_BASE_URL",
        default_value = relay_core::assistant::config::DEFAULT_API_BASE
    )]
    api_base: String,

    /// Delay between run status checks, in milliseconds.
    #[arg(long, env = "RELAY_POLL_INTERVAL_MS", default_value_t = 500)]
    poll_interval_ms: u64,

    /// Maximum time to wait for a run to settle, in seconds.
    #[arg(long, env = "RELAY_MAX_WAIT_SECS", default_value_t = 120)]
    max_wait_secs: u64,

    /// Timeout for each HTTP call to the assistant API, in seconds.
    #[arg(long, env = "RELAY_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    request_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,relay_api=debug,relay_core=debug".into()),
        )
        .init();

    let args = Args::parse();

    info!(version = relay_core::version(), "starting relay_server");

    let settings = AssistantSettings {
        api_key: args.api_key,
        api_base: args.api_base,
        request_timeout: Duration::from_secs(args.request_timeout_secs),
    };

    // Missing credentials are reported, not fatal.
    info!(
        api_key_loaded = settings.has_api_key(),
        assistant_id = %args.assistant_id,
        api_base = %settings.api_base,
        "assistant configuration"
    );
    if !settings.has_api_key() {
        warn!("OPENAI_API_KEY is not set; assistant calls will be rejected");
    }
    if args.assistant_id.is_empty() {
        warn!("OPENAI_ASSISTANT_ID is not set; runs will be rejected");
    }

    let config = ApiConfig {
        bind_addr: format!("{}:{}", args.host, args.port),
        assistant_id: args.assistant_id,
        poll: PollSettings {
            interval: Duration::from_millis(args.poll_interval_ms),
            max_wait: Duration::from_secs(args.max_wait_secs),
        },
    };

    let state = relay_api::AppState {
        config: config.clone(),
        assistant: Arc::new(OpenAiAssistants::new(settings)?),
    };

    let app = relay_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;

    info!(
        addr = %local_addr,
        poll_interval_ms = args.poll_interval_ms,
        max_wait_secs = args.max_wait_secs,
        "REST API listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;

    Ok(())
}
