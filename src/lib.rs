//! Huddle - a tiny colour-coded broadcast chat.
//!
//! One process hosts a hub; browsers and terminal peers connect to it over websockets and
//! every message is fanned out to everyone else. A short credential token lets a second
//! machine find the hub without typing an address.

pub mod chat;
pub mod client;
pub mod config;
pub mod credential;
pub mod error;
pub mod logging;
pub mod net;
pub mod prompt;
pub mod screen;
pub mod web;

pub use chat::{
    BroadcastHub, BroadcastReport, Connection, ConnectionRegistry, Envelope, Frame, Session,
    SessionState, WireCodec,
};
pub use client::{SessionEnd, TerminalClient};
pub use config::Config;
pub use credential::Credential;
pub use error::{HuddleError, Result};
pub use screen::{create_screen, Color, Screen, PALETTE_SIZE};
pub use web::{ChatServer, ChatState};
