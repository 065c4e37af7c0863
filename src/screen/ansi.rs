//! ANSI escape sequence implementation.

use super::{Color, Screen};

/// Escape character for ANSI sequences.
const ESC: char = '\x1b';

/// ANSI-capable screen implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiScreen;

impl AnsiScreen {
    /// Create a new ANSI screen.
    pub fn new() -> Self {
        Self
    }
}

impl Screen for AnsiScreen {
    fn fg(&self, color: Color) -> String {
        format!("{ESC}[{}m", color.fg_code())
    }

    fn reset(&self) -> String {
        format!("{ESC}[0m")
    }

    fn clear_screen(&self) -> String {
        format!("{ESC}[2J{ESC}[H")
    }

    fn is_ansi_enabled(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fg() {
        let screen = AnsiScreen::new();
        assert_eq!(screen.fg(Color::Red), "\x1b[91m");
        assert_eq!(screen.fg(Color::White), "\x1b[97m");
    }

    #[test]
    fn test_reset() {
        assert_eq!(AnsiScreen::new().reset(), "\x1b[0m");
    }

    #[test]
    fn test_clear_screen() {
        assert_eq!(AnsiScreen::new().clear_screen(), "\x1b[2J\x1b[H");
    }

    #[test]
    fn test_color_text() {
        let screen = AnsiScreen::new();
        assert_eq!(screen.color_text("|", Color::Cyan), "\x1b[96m|\x1b[0m");
    }
}
