//! # relay_api
//!
//! HTTP API library for the assistant relay.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;

use std::sync::Arc;

use axum::Router;
use axum::routing::post;
use relay_core::assistant::AssistantApi;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ApiConfig;
use crate::handlers::chat;

/// Route paths.
pub mod routes {
    pub const POST_API_CHAT: &str = "/api/chat";
}

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: ApiConfig,
    /// Client for the hosted assistant service.
    pub assistant: Arc<dyn AssistantApi>,
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(routes::POST_API_CHAT, post(chat::chat_handler))
        .layer(cors)
        .with_state(state)
}
