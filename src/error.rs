//! Error types for Huddle.

use thiserror::Error;

/// Common error type for Huddle.
#[derive(Error, Debug)]
pub enum HuddleError {
    /// A connection credential could not be decoded.
    ///
    /// Recoverable: the operator can re-enter the credential or type an address.
    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    /// The hub port is already bound by another process.
    #[error("port {0} is already in use")]
    PortInUse(u16),

    /// The websocket transport closed under a session.
    #[error("transport closed")]
    TransportClosed,

    /// Websocket handshake or framing failure on the terminal peer.
    #[error("transport error: {0}")]
    Transport(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for HuddleError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        use tokio_tungstenite::tungstenite::Error as WsError;
        match e {
            WsError::ConnectionClosed | WsError::AlreadyClosed => HuddleError::TransportClosed,
            other => HuddleError::Transport(other.to_string()),
        }
    }
}

/// Result type alias for Huddle operations.
pub type Result<T> = std::result::Result<T, HuddleError>;
