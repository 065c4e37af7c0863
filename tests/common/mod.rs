//! Test helpers for end-to-end tests.
//!
//! Provides a hub running on a random port plus websocket and terminal-client helpers.

#![allow(dead_code)]

use std::io::{self, Read, Write};
use std::net::SocketAddr;
use std::sync::mpsc as std_mpsc;
use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use huddle::config::ServerConfig;
use huddle::{ChatServer, ChatState, ConnectionRegistry, WireCodec};

/// Default timeout for test operations.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// How long to wait before deciding nothing more is coming.
pub const QUIET_PERIOD: Duration = Duration::from_millis(200);

/// A hub running in the background.
pub struct TestHub {
    pub addr: SocketAddr,
    pub registry: Arc<ConnectionRegistry>,
}

impl TestHub {
    /// Start a hub on 127.0.0.1 with a random port.
    pub async fn start(codec: WireCodec) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            ..ServerConfig::default()
        };
        let state = ChatState::new(Arc::clone(&registry), codec);
        let server = ChatServer::bind(&config, state).await.unwrap();
        let addr = server.spawn().unwrap();
        Self { addr, registry }
    }

    /// Websocket URL of the hub.
    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Wait until the registry holds exactly `n` connections.
    pub async fn wait_for_members(&self, n: usize) {
        timeout(DEFAULT_TIMEOUT, async {
            while self.registry.len() != n {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("registry did not reach expected size");
    }
}

/// A raw websocket participant.
pub struct TestPeer {
    ws: WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
}

impl TestPeer {
    /// Connect to the hub.
    pub async fn connect(hub: &TestHub) -> Self {
        let (ws, _) = connect_async(hub.ws_url()).await.unwrap();
        Self { ws }
    }

    /// Send a text message.
    pub async fn send(&mut self, text: &str) {
        self.ws.send(Message::Text(text.to_string())).await.unwrap();
    }

    /// Receive the next text frame.
    pub async fn recv(&mut self) -> String {
        loop {
            let msg = timeout(DEFAULT_TIMEOUT, self.ws.next())
                .await
                .expect("timed out waiting for a frame")
                .expect("stream ended")
                .expect("websocket error");
            if let Message::Text(text) = msg {
                return text;
            }
        }
    }

    /// Expect no text frame within the quiet period.
    pub async fn expect_silence(&mut self) {
        if let Ok(Some(Ok(Message::Text(text)))) = timeout(QUIET_PERIOD, self.ws.next()).await {
            panic!("unexpected frame: {text}");
        }
    }

    /// Close the connection.
    pub async fn close(mut self) {
        let _ = self.ws.close(None).await;
    }
}

/// Output sink shared between a terminal client and the test.
#[derive(Clone, Default)]
pub struct SharedOutput(Arc<parking_lot::Mutex<Vec<u8>>>);

impl SharedOutput {
    /// Everything written so far.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }

    /// Wait until the output contains `needle`.
    pub async fn wait_for(&self, needle: &str) {
        let found = timeout(DEFAULT_TIMEOUT, async {
            while !self.contents().contains(needle) {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;
        assert!(
            found.is_ok(),
            "output never contained {needle:?}: {:?}",
            self.contents()
        );
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Operator input fed line by line from the test. Dropping the sender ends the input.
pub struct ScriptedInput {
    lines: std_mpsc::Receiver<String>,
    pending: Vec<u8>,
}

impl ScriptedInput {
    /// Create an input and the handle that feeds it.
    pub fn new() -> (io::BufReader<Self>, std_mpsc::Sender<String>) {
        let (tx, rx) = std_mpsc::channel();
        let input = Self {
            lines: rx,
            pending: Vec::new(),
        };
        (io::BufReader::new(input), tx)
    }
}

impl Read for ScriptedInput {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pending.is_empty() {
            match self.lines.recv() {
                Ok(line) => self.pending = format!("{line}\n").into_bytes(),
                Err(_) => return Ok(0),
            }
        }
        let n = buf.len().min(self.pending.len());
        buf[..n].copy_from_slice(&self.pending[..n]);
        self.pending.drain(..n);
        Ok(n)
    }
}
