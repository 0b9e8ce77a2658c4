//! # Receiver registry - channel-indexed subscribers.
//!
//! [`ReceiverRegistry`] maps each [`Channel`] to the receivers registered on it,
//! in registration order.
//!
//! ## Rules
//! - A channel absent from the map is an empty sequence, never an error.
//! - No deduplication: registering the same type twice yields two instances.
//! - A receiver without a channel is skipped with a warning.
//! - [`lookup`](ReceiverRegistry::lookup) returns a snapshot; registration that
//!   happens afterwards does not affect a batch already taken.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::dispatch::Channel;
use crate::receivers::Receiver;

/// Shared handle to a registered receiver.
pub type ReceiverRef = Arc<dyn Receiver>;

/// Channel → ordered receivers.
#[derive(Default)]
pub struct ReceiverRegistry {
    channels: RwLock<HashMap<Channel, Vec<ReceiverRef>>>,
}

impl ReceiverRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Instantiates `R` with no arguments and registers it.
    ///
    /// Returns `false` when `R` declares no channel.
    pub fn register<R: Receiver + Default>(&self) -> bool {
        self.register_instance(Arc::new(R::default()))
    }

    /// Registers an existing receiver on the channel it declares.
    ///
    /// Returns `false` (and logs a warning) when the receiver declares no channel.
    pub fn register_instance(&self, receiver: ReceiverRef) -> bool {
        let Some(name) = receiver.channel() else {
            warn!(
                receiver = receiver.name(),
                "receiver failed to define a channel; skipping"
            );
            return false;
        };
        let channel = Channel::from(name);
        debug!(receiver = receiver.name(), %channel, "registering receiver");

        self.channels
            .write()
            .entry(channel)
            .or_default()
            .push(receiver);
        true
    }

    /// Returns the receivers on `channel`, in registration order.
    pub fn lookup(&self, channel: &str) -> Vec<ReceiverRef> {
        self.channels
            .read()
            .get(channel)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns sorted list of channels with at least one receiver.
    pub fn channels(&self) -> Vec<Channel> {
        let mut names: Vec<Channel> = self.channels.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Total number of registered receivers across all channels.
    pub fn len(&self) -> usize {
        self.channels.read().values().map(Vec::len).sum()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.channels.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::dispatch::Payload;

    #[derive(Default)]
    struct Ping;

    #[async_trait]
    impl Receiver for Ping {
        fn channel(&self) -> Option<&str> {
            Some("ping")
        }
        async fn receive(&self, _data: &Payload) {}
        fn name(&self) -> &'static str {
            "ping"
        }
    }

    #[derive(Default)]
    struct Nameless;

    #[async_trait]
    impl Receiver for Nameless {
        fn channel(&self) -> Option<&str> {
            None
        }
        async fn receive(&self, _data: &Payload) {}
    }

    #[test]
    fn test_unknown_channel_is_empty() {
        let reg = ReceiverRegistry::new();
        assert!(reg.lookup("nobody-home").is_empty());
        assert!(reg.is_empty());
    }

    #[test]
    fn test_same_type_twice_gives_two_instances() {
        let reg = ReceiverRegistry::new();
        assert!(reg.register::<Ping>());
        assert!(reg.register::<Ping>());

        let got = reg.lookup("ping");
        assert_eq!(got.len(), 2);
        assert!(!Arc::ptr_eq(&got[0], &got[1]));
        assert_eq!(reg.channels(), vec![Channel::from("ping")]);
    }

    #[test]
    fn test_missing_channel_is_skipped() {
        let reg = ReceiverRegistry::new();
        assert!(!reg.register::<Nameless>());
        assert!(reg.register::<Ping>());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_lookup_is_a_snapshot() {
        let reg = ReceiverRegistry::new();
        reg.register::<Ping>();
        let snapshot = reg.lookup("ping");
        reg.register::<Ping>();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(reg.lookup("ping").len(), 2);
    }
}
