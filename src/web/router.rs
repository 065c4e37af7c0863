//! Router configuration for the hub.

use std::sync::Arc;

use axum::{middleware, response::Html, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::middleware::security_headers;
use super::page;
use super::ws::{chat_ws_handler, ChatState};

/// Create the hub router: the chat page, the websocket endpoint and a health check.
pub fn create_router(state: Arc<ChatState>) -> Router {
    Router::new()
        .route("/", get(chat_page))
        .route("/ws", get(chat_ws_handler))
        .with_state(state)
        .merge(create_health_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(security_headers)),
        )
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Chat page handler.
async fn chat_page() -> Html<String> {
    Html(page::render())
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
