//! Per-connection session lifecycle.
//!
//! ```text
//! Connecting --open--> Active --relay--> Active --close--> Closed
//! ```
//!
//! `open` registers the connection and announces the join to everyone, the new
//! participant included. `relay` frames inbound text with the sender's colour and sends
//! it to everyone else. `close` deregisters and announces the leave with the colour the
//! participant held. A closed session is never reopened; rejoining means a new identity.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use super::envelope::{Envelope, WireCodec};
use super::hub::{BroadcastHub, BroadcastReport};
use super::registry::Connection;

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Transport accepted, not yet registered.
    Connecting,
    /// Registered and relaying.
    Active,
    /// Deregistered. Terminal.
    Closed,
}

/// An active participant session.
pub struct Session {
    hub: Arc<BroadcastHub>,
    codec: WireCodec,
    connection: Arc<Connection>,
    state: SessionState,
}

impl Session {
    /// Register a new connection and announce the join.
    ///
    /// Returns the session and the queue of frames destined for its transport.
    pub async fn open(
        hub: Arc<BroadcastHub>,
        codec: WireCodec,
    ) -> (Self, mpsc::Receiver<Arc<str>>) {
        let registration = hub.registry().register().await;
        let connection = registration.connection;

        info!(
            identity = connection.identity(),
            color = connection.color_index(),
            "participant joined"
        );
        hub.broadcast(&Envelope::presence(connection.color_index()), None)
            .await;

        let session = Self {
            hub,
            codec,
            connection,
            state: SessionState::Active,
        };
        (session, registration.outbound)
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The registered connection.
    pub fn connection(&self) -> &Arc<Connection> {
        &self.connection
    }

    /// Relay one inbound message to every other participant.
    ///
    /// Returns `None` if the hub has already pruned this connection; the caller should
    /// then close the session.
    pub async fn relay(&self, text: &str) -> Option<BroadcastReport> {
        if self.state != SessionState::Active {
            return None;
        }
        let identity = self.connection.identity();
        if !self.hub.registry().is_registered(identity).await {
            debug!(identity, "dropping message from pruned connection");
            return None;
        }

        let envelope = Envelope::new(
            self.connection.color_index(),
            self.codec.encode_payload(text),
        );
        Some(self.hub.broadcast(&envelope, Some(identity)).await)
    }

    /// Resolves when the hub asks this session to close.
    pub async fn closed(&self) {
        self.connection.closed().await;
    }

    /// Deregister and announce the leave.
    pub async fn close(mut self) -> SessionState {
        let identity = self.connection.identity();
        self.hub.registry().deregister(identity).await;
        self.hub
            .broadcast(&Envelope::presence(self.connection.color_index()), None)
            .await;

        let elapsed = chrono::Utc::now() - self.connection.joined_at();
        info!(
            identity,
            color = self.connection.color_index(),
            seconds = elapsed.num_seconds(),
            "participant left"
        );
        self.state = SessionState::Closed;
        self.state
    }
}
