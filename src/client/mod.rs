//! Terminal chat peer.

mod display;
mod terminal;

pub use display::{render_frame, render_prompt, Display};
pub use terminal::{hub_url, SessionEnd, TerminalClient};
