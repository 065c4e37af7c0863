//! Plain text screen implementation.

use super::{Color, Screen};

/// Plain text screen implementation (no ANSI support).
///
/// All methods return empty strings, so colour markers render as bare text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainScreen;

impl PlainScreen {
    /// Create a new plain screen.
    pub fn new() -> Self {
        Self
    }
}

impl Screen for PlainScreen {
    fn fg(&self, _color: Color) -> String {
        String::new()
    }

    fn reset(&self) -> String {
        String::new()
    }

    fn clear_screen(&self) -> String {
        String::new()
    }

    fn is_ansi_enabled(&self) -> bool {
        false
    }
}
