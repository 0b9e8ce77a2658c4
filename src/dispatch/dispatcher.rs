//! # Non-blocking broadcast over a bounded worker pool.
//!
//! Provides [`Dispatcher`] — delivers a payload to every receiver on a channel
//! without blocking the broadcaster.
//!
//! ## Architecture
//! ```text
//! broadcast(channel, data)
//!     │  lookup(channel) snapshot
//!     ▼
//! [bounded queue of batches] ──► worker 1 ──► R1.receive() ─► R2.receive() ─► ...
//!                            ├─► worker 2 ──► ...
//!                            └─► worker N ──► ...
//! ```
//!
//! ## Rules
//! - **Non-blocking**: `broadcast()` returns immediately (uses `try_send`)
//! - **Per-batch order**: receivers on a channel run sequentially, in registration order
//! - **No cross-batch ordering**: with several workers, two broadcasts on the same
//!   channel may interleave
//! - **Overflow**: when the queue is full the batch is dropped and logged
//! - **Isolation**: a panicking receiver is logged; the rest of the batch still runs
//!
//! ## Panic handling
//! Each `receive` call is wrapped in `catch_unwind` with `AssertUnwindSafe`, which can
//! leave shared state inconsistent if a receiver panics while holding a lock.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::FutureExt;
use parking_lot::Mutex;
use tokio::{
    sync::{Mutex as AsyncMutex, mpsc},
    task::JoinHandle,
};
use tracing::{debug, error, warn};

use crate::config::Config;
use crate::dispatch::{Channel, IntoChannel, Payload};
use crate::error::BroadcastError;
use crate::receivers::{ReceiverRef, ReceiverRegistry};

/// One broadcast: the receivers found at dispatch time and the shared payload.
struct Batch {
    channel: Channel,
    receivers: Vec<ReceiverRef>,
    data: Arc<Payload>,
}

/// Counters describing what the dispatcher has done so far.
#[derive(Debug, Default)]
pub struct DispatchStats {
    queued: AtomicU64,
    dropped: AtomicU64,
    delivered: AtomicU64,
    panicked: AtomicU64,
}

/// Point-in-time copy of [`DispatchStats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchSnapshot {
    /// Batches accepted into the queue.
    pub queued: u64,
    /// Batches dropped because the queue was full or closed.
    pub dropped: u64,
    /// `receive` calls that returned normally.
    pub delivered: u64,
    /// `receive` calls that panicked.
    pub panicked: u64,
}

impl DispatchStats {
    /// Reads all counters.
    pub fn snapshot(&self) -> DispatchSnapshot {
        DispatchSnapshot {
            queued: self.queued.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            panicked: self.panicked.load(Ordering::Relaxed),
        }
    }
}

/// Fire-and-forget fan-out of payloads to channel receivers.
///
/// Must be created inside a Tokio runtime: workers are spawned immediately.
pub struct Dispatcher {
    registry: Arc<ReceiverRegistry>,
    sender: Mutex<Option<mpsc::Sender<Batch>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    stats: Arc<DispatchStats>,
}

impl Dispatcher {
    /// Creates a dispatcher over `registry` and spawns its workers.
    ///
    /// Worker count and queue capacity come from [`Config::worker_count`] and
    /// [`Config::queue_capacity_clamped`].
    #[must_use]
    pub fn new(registry: Arc<ReceiverRegistry>, cfg: &Config) -> Self {
        let (tx, rx) = mpsc::channel::<Batch>(cfg.queue_capacity_clamped());
        let rx = Arc::new(AsyncMutex::new(rx));
        let stats = Arc::new(DispatchStats::default());

        let workers = (0..cfg.worker_count())
            .map(|id| {
                let rx = Arc::clone(&rx);
                let stats = Arc::clone(&stats);
                tokio::spawn(async move {
                    loop {
                        let next = { rx.lock().await.recv().await };
                        let Some(batch) = next else { break };
                        run_batch(batch, &stats).await;
                    }
                    debug!(worker = id, "dispatch worker stopped");
                })
            })
            .collect();

        Self {
            registry,
            sender: Mutex::new(Some(tx)),
            workers: Mutex::new(workers),
            stats,
        }
    }

    /// Broadcasts `data` to every receiver currently registered on `channel`.
    ///
    /// Returns before any receiver has necessarily run. Broadcasting to a
    /// channel without receivers is a no-op.
    ///
    /// # Errors
    /// [`BroadcastError::InvalidChannelType`] if `channel` is not a string; no
    /// receiver is invoked in that case.
    pub fn broadcast<C: IntoChannel>(
        &self,
        channel: C,
        data: Payload,
    ) -> Result<(), BroadcastError> {
        let channel = channel.into_channel()?;
        let receivers = self.registry.lookup(channel.as_str());
        if receivers.is_empty() {
            debug!(%channel, "broadcast to channel without receivers");
            return Ok(());
        }

        let batch = Batch {
            channel,
            receivers,
            data: Arc::new(data),
        };

        let guard = self.sender.lock();
        let Some(sender) = guard.as_ref() else {
            self.stats.dropped.fetch_add(1, Ordering::Relaxed);
            warn!(channel = %batch.channel, "dispatcher is shut down; broadcast dropped");
            return Ok(());
        };

        match sender.try_send(batch) {
            Ok(()) => {
                self.stats.queued.fetch_add(1, Ordering::Relaxed);
            }
            Err(mpsc::error::TrySendError::Full(batch)) => {
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(channel = %batch.channel, "broadcast queue full; batch dropped");
            }
            Err(mpsc::error::TrySendError::Closed(batch)) => {
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(channel = %batch.channel, "broadcast queue closed; batch dropped");
            }
        }
        Ok(())
    }

    /// Dispatch counters.
    pub fn stats(&self) -> DispatchSnapshot {
        self.stats.snapshot()
    }

    /// Graceful shutdown: close the queue and await the workers.
    ///
    /// Batches already queued are still delivered. Later broadcasts are dropped.
    pub async fn shutdown(&self) {
        drop(self.sender.lock().take());
        let workers = std::mem::take(&mut *self.workers.lock());
        for h in workers {
            let _ = h.await;
        }
    }
}

async fn run_batch(batch: Batch, stats: &DispatchStats) {
    let Batch {
        channel,
        receivers,
        data,
    } = batch;

    for receiver in receivers {
        let fut = receiver.receive(data.as_ref());
        match std::panic::AssertUnwindSafe(fut).catch_unwind().await {
            Ok(()) => {
                stats.delivered.fetch_add(1, Ordering::Relaxed);
            }
            Err(panic_err) => {
                stats.panicked.fetch_add(1, Ordering::Relaxed);
                error!(
                    receiver = receiver.name(),
                    %channel,
                    info = %panic_message(panic_err.as_ref()),
                    "receiver panicked"
                );
            }
        }
    }
}

fn panic_message(any: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::json;
    use tokio::sync::mpsc::UnboundedSender;

    use super::*;
    use crate::receivers::Receiver;

    struct Recorder {
        tag: &'static str,
        tx: UnboundedSender<(&'static str, Payload)>,
    }

    #[async_trait]
    impl Receiver for Recorder {
        fn channel(&self) -> Option<&str> {
            Some("ping")
        }
        async fn receive(&self, data: &Payload) {
            let _ = self.tx.send((self.tag, data.clone()));
        }
    }

    struct Boom;

    #[async_trait]
    impl Receiver for Boom {
        fn channel(&self) -> Option<&str> {
            Some("ping")
        }
        async fn receive(&self, _data: &Payload) {
            panic!("boom");
        }
        fn name(&self) -> &'static str {
            "boom"
        }
    }

    struct Stall(Arc<tokio::sync::Notify>);

    #[async_trait]
    impl Receiver for Stall {
        fn channel(&self) -> Option<&str> {
            Some("slow")
        }
        async fn receive(&self, _data: &Payload) {
            self.0.notified().await;
        }
    }

    fn single_worker(capacity: usize) -> Config {
        Config {
            workers: 1,
            queue_capacity: capacity,
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_receivers_run_in_registration_order() {
        let registry = Arc::new(ReceiverRegistry::new());
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        registry.register_instance(Arc::new(Recorder { tag: "r1", tx: tx.clone() }));
        registry.register_instance(Arc::new(Recorder { tag: "r2", tx }));

        let dispatcher = Dispatcher::new(Arc::clone(&registry), &single_worker(8));
        dispatcher.broadcast("ping", json!("hello")).unwrap();
        dispatcher.shutdown().await;

        assert_eq!(rx.recv().await, Some(("r1", json!("hello"))));
        assert_eq!(rx.recv().await, Some(("r2", json!("hello"))));
        assert_eq!(dispatcher.stats().delivered, 2);
    }

    #[tokio::test]
    async fn test_panicking_receiver_does_not_stop_batch() {
        let registry = Arc::new(ReceiverRegistry::new());
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        registry.register_instance(Arc::new(Boom));
        registry.register_instance(Arc::new(Recorder { tag: "after", tx }));

        let dispatcher = Dispatcher::new(Arc::clone(&registry), &single_worker(8));
        dispatcher.broadcast("ping", json!(1)).unwrap();

        let got = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap();
        assert_eq!(got, Some(("after", json!(1))));
        dispatcher.shutdown().await;

        let stats = dispatcher.stats();
        assert_eq!(stats.panicked, 1);
        assert_eq!(stats.delivered, 1);
    }

    #[tokio::test]
    async fn test_full_queue_drops_batch() {
        let registry = Arc::new(ReceiverRegistry::new());
        let gate = Arc::new(tokio::sync::Notify::new());
        registry.register_instance(Arc::new(Stall(Arc::clone(&gate))));

        let dispatcher = Dispatcher::new(Arc::clone(&registry), &single_worker(1));

        // First batch occupies the worker, second fills the queue.
        dispatcher.broadcast("slow", json!(1)).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        dispatcher.broadcast("slow", json!(2)).unwrap();
        dispatcher.broadcast("slow", json!(3)).unwrap();

        let stats = dispatcher.stats();
        assert_eq!(stats.queued, 2);
        assert_eq!(stats.dropped, 1);

        gate.notify_one();
        gate.notify_one();
        dispatcher.shutdown().await;
        assert_eq!(dispatcher.stats().delivered, 2);
    }

    #[tokio::test]
    async fn test_broadcast_after_shutdown_is_dropped() {
        let registry = Arc::new(ReceiverRegistry::new());
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        registry.register_instance(Arc::new(Recorder { tag: "r", tx }));

        let dispatcher = Dispatcher::new(Arc::clone(&registry), &single_worker(4));
        dispatcher.shutdown().await;

        assert!(dispatcher.broadcast("ping", json!(null)).is_ok());
        assert_eq!(dispatcher.stats().dropped, 1);
    }
}
