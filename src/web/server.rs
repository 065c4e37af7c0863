//! Web server for the chat hub.

use std::io::ErrorKind;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::{HuddleError, Result};

use super::router::create_router;
use super::ws::ChatState;

/// The hub's HTTP/WebSocket server.
///
/// The listener is bound in `bind`, so a port conflict is reported before anything is
/// announced to the operator.
pub struct ChatServer {
    listener: TcpListener,
    state: Arc<ChatState>,
}

impl ChatServer {
    /// Bind the hub listener.
    ///
    /// Fails with `HuddleError::PortInUse` if the port is taken.
    pub async fn bind(config: &ServerConfig, state: ChatState) -> Result<Self> {
        let addr = format!("{}:{}", config.host, config.port);
        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            if e.kind() == ErrorKind::AddrInUse {
                HuddleError::PortInUse(config.port)
            } else {
                HuddleError::Io(e)
            }
        })?;

        Ok(Self {
            listener,
            state: Arc::new(state),
        })
    }

    /// Get the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Shared chat state.
    pub fn state(&self) -> &Arc<ChatState> {
        &self.state
    }

    /// Run the server until it fails.
    pub async fn run(self) -> Result<()> {
        let local_addr = self.listener.local_addr()?;
        tracing::info!("Chat hub listening on http://{}", local_addr);

        let router = create_router(self.state);
        axum::serve(self.listener, router).await?;
        Ok(())
    }

    /// Serve in a background task and return the bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub fn spawn(self) -> Result<SocketAddr> {
        let local_addr = self.listener.local_addr()?;
        tracing::info!("Chat hub listening on http://{}", local_addr);

        let router = create_router(self.state);
        let listener = self.listener;
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Chat hub error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
