//! Chat module for Huddle.
//!
//! This module provides the broadcast chat core:
//! - Connection registry with monotonically increasing identities
//! - Broadcast hub with best-effort fan-out and pruning of dead recipients
//! - Envelope framing (`colorIndex:payload`) and the optional payload scrambler
//! - Per-connection session lifecycle (join, relay, leave)

mod envelope;
mod hub;
mod registry;
mod session;

pub use envelope::{
    obscure, obscure_bytes, reveal, reveal_bytes, Envelope, Frame, WireCodec, OBSCURE_KEY,
};
pub use hub::{BroadcastHub, BroadcastReport};
pub use registry::{
    color_index_for, Connection, ConnectionRegistry, Registration, SendFailure,
    DEFAULT_OUTBOUND_BUFFER,
};
pub use session::{Session, SessionState};
