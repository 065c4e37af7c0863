//! Chat WebSocket handler.
//!
//! Each upgraded socket runs one session task: it relays inbound text frames through the
//! hub and drains the session's outbound queue into the socket until either side closes
//! or the hub prunes the connection.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};

use crate::chat::{BroadcastHub, ConnectionRegistry, Session, WireCodec};

/// State for the WebSocket chat handler.
#[derive(Clone)]
pub struct ChatState {
    /// Broadcast hub (and through it, the connection registry).
    pub hub: Arc<BroadcastHub>,
    /// Payload codec applied to relayed messages.
    pub codec: WireCodec,
}

impl ChatState {
    /// Create chat state over an existing registry.
    pub fn new(registry: Arc<ConnectionRegistry>, codec: WireCodec) -> Self {
        Self {
            hub: Arc::new(BroadcastHub::new(registry)),
            codec,
        }
    }

    /// The connection registry.
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        self.hub.registry()
    }
}

/// WebSocket chat handler.
///
/// GET /ws
pub async fn chat_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ChatState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Run one participant session over an upgraded socket.
async fn handle_socket(socket: WebSocket, state: Arc<ChatState>) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let (session, mut outbound) = Session::open(state.hub.clone(), state.codec).await;
    let identity = session.connection().identity();

    loop {
        tokio::select! {
            msg_result = ws_receiver.next() => {
                match msg_result {
                    Some(Ok(Message::Text(text))) => {
                        if session.relay(&text).await.is_none() {
                            break;
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if ws_sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::debug!(identity, "WebSocket closed by client");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!(identity, error = %e, "WebSocket read error");
                        break;
                    }
                }
            }

            frame = outbound.recv() => {
                match frame {
                    Some(frame) => {
                        if let Err(e) = ws_sender.send(Message::Text(frame.to_string())).await {
                            tracing::debug!(identity, error = %e, "WebSocket write error");
                            break;
                        }
                    }
                    None => break,
                }
            }

            _ = session.closed() => {
                tracing::debug!(identity, "session closed by hub");
                break;
            }
        }
    }

    session.close().await;
    let _ = ws_sender.close().await;
}
