//! Web module for the chat hub.
//!
//! Serves the browser chat page at `/`, the participant websocket at `/ws` and a
//! health check at `/health`.

pub mod middleware;
pub mod page;
pub mod router;
pub mod server;
pub mod ws;

pub use router::create_router;
pub use server::ChatServer;
pub use ws::{chat_ws_handler, ChatState};
