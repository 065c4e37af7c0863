//! Screen display module.
//!
//! Provides the participant colour palette together with ANSI escape sequences for the
//! terminal peer and a plain text fallback.

mod ansi;
mod plain;

pub use ansi::AnsiScreen;
pub use plain::PlainScreen;

/// Number of participant colours.
pub const PALETTE_SIZE: usize = 7;

/// Participant colours, in palette order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Red (palette index 0).
    Red = 0,
    /// Green (palette index 1).
    Green = 1,
    /// Yellow (palette index 2).
    Yellow = 2,
    /// Blue (palette index 3).
    Blue = 3,
    /// Magenta (palette index 4).
    Magenta = 4,
    /// Cyan (palette index 5).
    Cyan = 5,
    /// White (palette index 6).
    White = 6,
}

/// The palette, indexed by colour index.
pub const PALETTE: [Color; PALETTE_SIZE] = [
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
    Color::White,
];

impl Color {
    /// Palette colour for a colour index. Indices wrap around the palette.
    pub fn from_index(index: usize) -> Self {
        PALETTE[index % PALETTE_SIZE]
    }

    /// Bright ANSI foreground code (91-97).
    pub fn fg_code(self) -> u8 {
        91 + self as u8
    }

    /// CSS colour name used by the browser page.
    pub fn css_name(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Blue => "blue",
            Color::Magenta => "magenta",
            Color::Cyan => "cyan",
            Color::White => "white",
        }
    }
}

/// Screen output trait for terminal decoration.
///
/// Implementations include `AnsiScreen` for ANSI-capable terminals and
/// `PlainScreen` for terminals without ANSI support.
pub trait Screen: Send + Sync {
    /// Set foreground (text) color.
    fn fg(&self, color: Color) -> String;

    /// Reset all text attributes to default.
    fn reset(&self) -> String;

    /// Clear the entire screen and move the cursor home.
    fn clear_screen(&self) -> String;

    /// Format text with a foreground color.
    fn color_text(&self, text: &str, color: Color) -> String {
        format!("{}{}{}", self.fg(color), text, self.reset())
    }

    /// Check if ANSI escape sequences are enabled.
    fn is_ansi_enabled(&self) -> bool;
}

/// Create a screen instance based on ANSI support.
///
/// # Example
///
/// ```
/// use huddle::screen::{create_screen, Color};
///
/// let screen = create_screen(true);
/// assert!(screen.is_ansi_enabled());
/// assert_eq!(screen.fg(Color::Red), "\x1b[91m");
///
/// let plain = create_screen(false);
/// assert!(plain.fg(Color::Red).is_empty());
/// ```
pub fn create_screen(ansi_enabled: bool) -> Box<dyn Screen> {
    if ansi_enabled {
        Box::new(AnsiScreen)
    } else {
        Box::new(PlainScreen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_fg_code() {
        assert_eq!(Color::Red.fg_code(), 91);
        assert_eq!(Color::Green.fg_code(), 92);
        assert_eq!(Color::Yellow.fg_code(), 93);
        assert_eq!(Color::Blue.fg_code(), 94);
        assert_eq!(Color::Magenta.fg_code(), 95);
        assert_eq!(Color::Cyan.fg_code(), 96);
        assert_eq!(Color::White.fg_code(), 97);
    }

    #[test]
    fn test_from_index_wraps() {
        assert_eq!(Color::from_index(0), Color::Red);
        assert_eq!(Color::from_index(6), Color::White);
        assert_eq!(Color::from_index(7), Color::Red);
        assert_eq!(Color::from_index(15), Color::Green);
    }

    #[test]
    fn test_palette_order_matches_indices() {
        for (i, color) in PALETTE.iter().enumerate() {
            assert_eq!(*color as usize, i);
        }
    }

    #[test]
    fn test_css_names() {
        let names: Vec<_> = PALETTE.iter().map(|c| c.css_name()).collect();
        assert_eq!(
            names,
            ["red", "green", "yellow", "blue", "magenta", "cyan", "white"]
        );
    }

    #[test]
    fn test_create_screen_ansi() {
        let screen = create_screen(true);
        assert!(screen.is_ansi_enabled());
    }

    #[test]
    fn test_create_screen_plain() {
        let screen = create_screen(false);
        assert!(!screen.is_ansi_enabled());
    }
}
