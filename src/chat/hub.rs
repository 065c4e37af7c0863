//! Broadcast fan-out.
//!
//! A broadcast runs in two phases. The first takes a registry snapshot and enqueues the
//! frame on every recipient without holding the registry lock, so one slow or dead
//! recipient never delays the others. The second deregisters every recipient whose
//! enqueue failed and asks its session to close.

use std::sync::Arc;

use tracing::{debug, warn};

use super::envelope::Envelope;
use super::registry::{ConnectionRegistry, SendFailure};

/// Outcome of one broadcast pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Identities the frame was queued for.
    pub delivered: Vec<u64>,
    /// Identities removed because delivery failed.
    pub pruned: Vec<u64>,
}

/// Fans envelopes out to every registered connection.
pub struct BroadcastHub {
    registry: Arc<ConnectionRegistry>,
}

impl BroadcastHub {
    /// Create a hub over a registry.
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this hub delivers to.
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Broadcast an envelope to everyone except `exclude`.
    pub async fn broadcast(&self, envelope: &Envelope, exclude: Option<u64>) -> BroadcastReport {
        self.broadcast_frame(Arc::from(envelope.encode()), exclude)
            .await
    }

    /// Broadcast an already encoded frame to everyone except `exclude`.
    pub async fn broadcast_frame(&self, frame: Arc<str>, exclude: Option<u64>) -> BroadcastReport {
        let recipients = self.registry.snapshot().await;

        let mut report = BroadcastReport::default();
        let mut failed = Vec::new();
        for connection in recipients
            .iter()
            .filter(|c| Some(c.identity()) != exclude)
        {
            match connection.send(Arc::clone(&frame)) {
                Ok(()) => report.delivered.push(connection.identity()),
                Err(failure) => {
                    match failure {
                        SendFailure::Closed => {
                            debug!(identity = connection.identity(), "recipient gone")
                        }
                        SendFailure::Full => {
                            warn!(identity = connection.identity(), "recipient queue full")
                        }
                    }
                    failed.push(connection.identity());
                }
            }
        }

        for identity in failed {
            if let Some(connection) = self.registry.deregister(identity).await {
                connection.close();
                report.pruned.push(identity);
            }
        }

        debug!(
            delivered = report.delivered.len(),
            pruned = report.pruned.len(),
            "broadcast"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::registry::Registration;

    fn hub() -> BroadcastHub {
        BroadcastHub::new(Arc::new(ConnectionRegistry::new()))
    }

    #[tokio::test]
    async fn test_broadcast_excludes_sender() {
        let hub = hub();
        let mut s = hub.registry().register().await;
        let mut a = hub.registry().register().await;
        let mut b = hub.registry().register().await;

        let envelope = Envelope::new(s.connection.color_index(), "hello");
        let report = hub
            .broadcast(&envelope, Some(s.connection.identity()))
            .await;

        assert_eq!(report.delivered, vec![2, 3]);
        assert!(report.pruned.is_empty());
        assert_eq!(&*a.outbound.recv().await.unwrap(), "0:hello");
        assert_eq!(&*b.outbound.recv().await.unwrap(), "0:hello");
        assert!(s.outbound.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_broadcast_without_exclusion_reaches_all() {
        let hub = hub();
        let mut a = hub.registry().register().await;
        let mut b = hub.registry().register().await;

        let report = hub.broadcast(&Envelope::presence(1), None).await;

        assert_eq!(report.delivered, vec![1, 2]);
        assert_eq!(&*a.outbound.recv().await.unwrap(), "1:");
        assert_eq!(&*b.outbound.recv().await.unwrap(), "1:");
    }

    #[tokio::test]
    async fn test_failed_recipient_is_pruned_others_still_receive() {
        let hub = hub();
        let s = hub.registry().register().await;
        let mut a = hub.registry().register().await;
        let Registration {
            connection: b,
            outbound: b_rx,
        } = hub.registry().register().await;
        drop(b_rx);

        let report = hub
            .broadcast(&Envelope::new(0, "hi"), Some(s.connection.identity()))
            .await;

        assert_eq!(report.delivered, vec![2]);
        assert_eq!(report.pruned, vec![3]);
        assert_eq!(&*a.outbound.recv().await.unwrap(), "0:hi");
        assert!(!hub.registry().is_registered(b.identity()).await);
        assert_eq!(hub.registry().len(), 2);

        // The pruned session was told to close.
        b.closed().await;
    }

    #[tokio::test]
    async fn test_full_queue_is_pruned() {
        let hub = BroadcastHub::new(Arc::new(ConnectionRegistry::with_outbound_buffer(1)));
        let slow = hub.registry().register().await;
        let mut fast = hub.registry().register().await;

        hub.broadcast(&Envelope::new(0, "one"), None).await;
        let _ = fast.outbound.recv().await;
        let report = hub.broadcast(&Envelope::new(0, "two"), None).await;

        assert_eq!(report.pruned, vec![slow.connection.identity()]);
        assert_eq!(report.delivered, vec![fast.connection.identity()]);
        assert_eq!(&*fast.outbound.recv().await.unwrap(), "0:two");
    }

    #[tokio::test]
    async fn test_broadcast_to_empty_registry() {
        let hub = hub();
        let report = hub.broadcast(&Envelope::presence(0), None).await;
        assert_eq!(report, BroadcastReport::default());
    }

    #[tokio::test]
    async fn test_pruned_once_across_concurrent_broadcasts() {
        let hub = Arc::new(hub());
        let Registration { outbound, .. } = hub.registry().register().await;
        drop(outbound);
        let _keep = hub.registry().register().await;

        let h1 = {
            let hub = Arc::clone(&hub);
            tokio::spawn(async move { hub.broadcast(&Envelope::new(1, "x"), None).await })
        };
        let h2 = {
            let hub = Arc::clone(&hub);
            tokio::spawn(async move { hub.broadcast(&Envelope::new(1, "y"), None).await })
        };
        let (r1, r2) = tokio::join!(h1, h2);

        let pruned: Vec<u64> = r1
            .unwrap()
            .pruned
            .into_iter()
            .chain(r2.unwrap().pruned)
            .collect();
        assert_eq!(pruned, vec![1]);
        assert_eq!(hub.registry().len(), 1);
    }
}
