//! Live connection registry.
//!
//! Identities start at 1, strictly increase and are never reused, even after the
//! connection that held one has gone. Allocating an identity and inserting the
//! connection happen under one write lock, so concurrent joins can never share an
//! identity.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, Notify, RwLock};
use tracing::debug;

use crate::screen::PALETTE_SIZE;

/// Default per-connection outbound queue length.
pub const DEFAULT_OUTBOUND_BUFFER: usize = 256;

/// Colour index for an identity: `(identity - 1) mod K`.
pub fn color_index_for(identity: u64) -> usize {
    (identity.saturating_sub(1) % PALETTE_SIZE as u64) as usize
}

/// Why an enqueue to a connection failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendFailure {
    /// The session's writer is gone.
    Closed,
    /// The outbound queue is full.
    Full,
}

/// One live participant.
#[derive(Debug)]
pub struct Connection {
    identity: u64,
    color_index: usize,
    joined_at: DateTime<Utc>,
    outbound: mpsc::Sender<Arc<str>>,
    closed: Notify,
}

impl Connection {
    /// Unique identity, assigned once.
    pub fn identity(&self) -> u64 {
        self.identity
    }

    /// Palette colour index.
    pub fn color_index(&self) -> usize {
        self.color_index
    }

    /// Registration timestamp.
    pub fn joined_at(&self) -> DateTime<Utc> {
        self.joined_at
    }

    /// Queue a frame for this connection without waiting.
    pub fn send(&self, frame: Arc<str>) -> Result<(), SendFailure> {
        self.outbound.try_send(frame).map_err(|e| match e {
            mpsc::error::TrySendError::Closed(_) => SendFailure::Closed,
            mpsc::error::TrySendError::Full(_) => SendFailure::Full,
        })
    }

    /// Ask the owning session to close its transport.
    pub fn close(&self) {
        self.closed.notify_one();
    }

    /// Resolves once `close` has been called.
    pub async fn closed(&self) {
        self.closed.notified().await;
    }
}

/// A fresh registration: the shared connection plus the receiving end of its queue.
#[derive(Debug)]
pub struct Registration {
    /// The registered connection.
    pub connection: Arc<Connection>,
    /// Frames queued for this connection by broadcasts.
    pub outbound: mpsc::Receiver<Arc<str>>,
}

struct Members {
    next_identity: u64,
    connections: HashMap<u64, Arc<Connection>>,
}

/// Process-wide set of live connections.
pub struct ConnectionRegistry {
    members: RwLock<Members>,
    /// Tracks the map size so counting needs no lock.
    active_count: AtomicUsize,
    outbound_buffer: usize,
}

impl ConnectionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::with_outbound_buffer(DEFAULT_OUTBOUND_BUFFER)
    }

    /// Create an empty registry with a custom per-connection queue length.
    pub fn with_outbound_buffer(outbound_buffer: usize) -> Self {
        Self {
            members: RwLock::new(Members {
                next_identity: 1,
                connections: HashMap::new(),
            }),
            active_count: AtomicUsize::new(0),
            outbound_buffer: outbound_buffer.max(1),
        }
    }

    /// Register a new connection under the next identity.
    pub async fn register(&self) -> Registration {
        let (tx, rx) = mpsc::channel(self.outbound_buffer);

        let mut members = self.members.write().await;
        let identity = members.next_identity;
        members.next_identity += 1;

        let connection = Arc::new(Connection {
            identity,
            color_index: color_index_for(identity),
            joined_at: Utc::now(),
            outbound: tx,
            closed: Notify::new(),
        });
        members.connections.insert(identity, Arc::clone(&connection));
        let _ = self.active_count.fetch_add(1, Ordering::Relaxed);
        drop(members);

        debug!(identity, color = connection.color_index, "connection registered");
        Registration {
            connection,
            outbound: rx,
        }
    }

    /// Remove a connection. Removing an absent identity is a no-op.
    ///
    /// Returns the removed connection, if it was present.
    pub async fn deregister(&self, identity: u64) -> Option<Arc<Connection>> {
        let removed = self.members.write().await.connections.remove(&identity);
        if removed.is_some() {
            let _ = self.active_count.fetch_sub(1, Ordering::Relaxed);
            debug!(identity, "connection deregistered");
        }
        removed
    }

    /// Current members, ordered by identity.
    ///
    /// The list is a copy: joins and leaves after this call are not reflected in it.
    pub async fn snapshot(&self) -> Vec<Arc<Connection>> {
        let members = self.members.read().await;
        let mut connections: Vec<_> = members.connections.values().cloned().collect();
        drop(members);
        connections.sort_by_key(|c| c.identity);
        connections
    }

    /// Check whether an identity is still registered.
    pub async fn is_registered(&self, identity: u64) -> bool {
        self.members.read().await.connections.contains_key(&identity)
    }

    /// Number of live connections.
    pub fn len(&self) -> usize {
        self.active_count.load(Ordering::Relaxed)
    }

    /// Whether no connection is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deregister every connection and ask each session to close.
    ///
    /// Returns the number of connections released. Identities stay consumed.
    pub async fn shutdown(&self) -> usize {
        let drained: Vec<_> = {
            let mut members = self.members.write().await;
            members.connections.drain().map(|(_, c)| c).collect()
        };
        self.active_count.store(0, Ordering::Relaxed);
        for connection in &drained {
            connection.close();
        }
        drained.len()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
