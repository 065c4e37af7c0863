//! Shared terminal display for the interactive peer.
//!
//! The receive path and the input thread both write here. Everything they share (the
//! latched colour and the output stream) sits behind one mutex, so a message render and
//! a prompt redraw never interleave.

use std::io::{self, Write};

use crate::chat::{Frame, WireCodec};
use crate::screen::{Color, Screen};

/// Render one inbound frame as a terminal line (without newline).
pub fn render_frame(frame: &Frame, codec: WireCodec, screen: &dyn Screen) -> String {
    match frame {
        Frame::Envelope(envelope) => {
            let bar = screen.color_text("|", Color::from_index(envelope.color_index));
            if envelope.is_presence() {
                bar
            } else {
                format!("{bar} {}", codec.decode_payload(&envelope.payload))
            }
        }
        Frame::Opaque(text) => text.clone(),
    }
}

/// Render the input prompt, coloured once the participant's colour is known.
pub fn render_prompt(color: Option<usize>, screen: &dyn Screen) -> String {
    match color {
        Some(index) => format!("{} ", screen.color_text(">", Color::from_index(index))),
        None => "> ".to_string(),
    }
}

/// Terminal state shared by the receive path and the input thread.
pub struct Display<W> {
    out: W,
    screen: Box<dyn Screen>,
    codec: WireCodec,
    my_color: Option<usize>,
}

impl<W: Write> Display<W> {
    /// Create a display writing to `out`.
    pub fn new(out: W, screen: Box<dyn Screen>, codec: WireCodec) -> Self {
        Self {
            out,
            screen,
            codec,
            my_color: None,
        }
    }

    /// Colour latched from the first inbound envelope.
    pub fn my_color(&self) -> Option<usize> {
        self.my_color
    }

    /// Render an inbound frame and redraw the prompt.
    ///
    /// The first envelope ever seen is this participant's own join announcement, so its
    /// colour index is latched as ours.
    pub fn show_inbound(&mut self, text: &str) -> io::Result<()> {
        let frame = Frame::parse(text);
        if self.my_color.is_none() {
            self.my_color = frame.color_index();
        }

        let line = render_frame(&frame, self.codec, self.screen.as_ref());
        write!(self.out, "\r{line}\n")?;
        self.show_prompt()
    }

    /// Draw the input prompt.
    pub fn show_prompt(&mut self) -> io::Result<()> {
        let prompt = render_prompt(self.my_color, self.screen.as_ref());
        self.out.write_all(prompt.as_bytes())?;
        self.out.flush()
    }

    /// Write a status line.
    pub fn show_status(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }
}
