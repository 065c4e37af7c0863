//! Interactive terminal peer.
//!
//! Two paths run side by side once connected:
//! - the receive path reads frames from the hub and renders them, redrawing the prompt;
//! - the input path blocks on operator input on its own OS thread and hands each line to
//!   a forwarder that writes it to the socket.
//!
//! Whichever path finishes first ends the session. The input thread may still be parked
//! in a blocking read at that point; it is left behind rather than interrupted.

use std::io::{BufRead, Write};
use std::sync::Arc;
use std::thread;

use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info};

use super::display::Display;
use crate::chat::WireCodec;
use crate::screen::Screen;
use crate::{HuddleError, Result};

/// How a terminal session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The hub closed the connection.
    ServerClosed,
    /// The operator's input ran out.
    InputExhausted,
}

/// Websocket URL of a hub.
pub fn hub_url(host: &str, port: u16) -> String {
    format!("ws://{host}:{port}/ws")
}

/// A terminal peer bound to one hub address.
pub struct TerminalClient {
    url: String,
    codec: WireCodec,
    screen: Box<dyn Screen>,
}

impl TerminalClient {
    /// Create a client for the hub at `host:port`.
    pub fn new(host: &str, port: u16, codec: WireCodec, screen: Box<dyn Screen>) -> Self {
        Self {
            url: hub_url(host, port),
            codec,
            screen,
        }
    }

    /// Hub URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Connect and run the session until the hub closes or `input` is exhausted.
    pub async fn run<I, W>(self, input: I, output: W) -> Result<SessionEnd>
    where
        I: BufRead + Send + 'static,
        W: Write + Send + 'static,
    {
        let display = Arc::new(Mutex::new(Display::new(output, self.screen, self.codec)));
        display
            .lock()
            .show_status(&format!("Connecting to server at {} ...", self.url))?;

        let (ws_stream, _) = connect_async(self.url.as_str()).await?;
        info!(url = %self.url, "connected to hub");
        display
            .lock()
            .show_status("Connected! Type messages, Ctrl+C to quit.")?;

        let (mut ws_sender, mut ws_receiver) = ws_stream.split();
        let (line_tx, mut line_rx) = mpsc::unbounded_channel::<String>();

        spawn_input_thread(input, line_tx, Arc::clone(&display));

        let receive_display = Arc::clone(&display);
        let mut receive = tokio::spawn(async move {
            while let Some(msg) = ws_receiver.next().await {
                match msg {
                    Ok(Message::Text(text)) => {
                        receive_display.lock().show_inbound(&text)?;
                    }
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        debug!(error = %e, "hub read error");
                        break;
                    }
                }
            }
            Ok::<_, HuddleError>(())
        });

        let mut send = tokio::spawn(async move {
            while let Some(line) = line_rx.recv().await {
                ws_sender.send(Message::Text(line)).await?;
            }
            let _ = ws_sender.close().await;
            Ok::<_, HuddleError>(())
        });

        let end = tokio::select! {
            joined = &mut receive => {
                send.abort();
                flatten(joined)?;
                display.lock().show_status("\nDisconnected from server.")?;
                SessionEnd::ServerClosed
            }
            joined = &mut send => {
                receive.abort();
                flatten(joined)?;
                SessionEnd::InputExhausted
            }
        };

        info!(?end, "terminal session ended");
        Ok(end)
    }
}

fn flatten(joined: std::result::Result<Result<()>, tokio::task::JoinError>) -> Result<()> {
    joined.map_err(|e| HuddleError::Transport(format!("session task failed: {e}")))?
}

/// Read operator lines on a dedicated thread so a blocking read never stalls reception.
fn spawn_input_thread<I, W>(
    mut input: I,
    lines: mpsc::UnboundedSender<String>,
    display: Arc<Mutex<Display<W>>>,
) where
    I: BufRead + Send + 'static,
    W: Write + Send + 'static,
{
    thread::spawn(move || {
        let mut line = String::new();
        loop {
            if display.lock().show_prompt().is_err() {
                break;
            }

            line.clear();
            match input.read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }

            let text = line.trim_end_matches(['\r', '\n']);
            if text.trim().is_empty() {
                continue;
            }
            if lines.send(text.to_string()).is_err() {
                break;
            }
        }
        debug!("operator input closed");
    });
}
