//! # Receiver catalog - explicit self-registration.
//!
//! Plugins add receiver factories to a [`ReceiverCatalog`] while they load.
//! Once loading is over the host calls [`discover`](ReceiverCatalog::discover)
//! exactly once, which instantiates every factory and registers the result.
//!
//! ## Rules
//! - `discover` is one-shot: later calls register nothing and return 0.
//! - Factories added after the scan are never discovered; they are logged and
//!   dropped. Register such receivers directly on the registry instead.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::receivers::{Receiver, ReceiverRef, ReceiverRegistry};

type ReceiverFactory = Box<dyn Fn() -> ReceiverRef + Send + Sync>;

/// Known receiver implementations, waiting for the discovery scan.
#[derive(Default)]
pub struct ReceiverCatalog {
    factories: Mutex<Vec<ReceiverFactory>>,
    scanned: AtomicBool,
}

impl ReceiverCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a receiver type constructed with `R::default()`.
    pub fn add<R: Receiver + Default>(&self) {
        self.add_with(|| Arc::new(R::default()));
    }

    /// Adds a receiver factory.
    pub fn add_with<F>(&self, factory: F)
    where
        F: Fn() -> ReceiverRef + Send + Sync + 'static,
    {
        let mut factories = self.factories.lock();
        if self.is_scanned() {
            warn!("receiver added after discovery; it will not be registered");
            return;
        }
        factories.push(Box::new(factory));
    }

    /// Number of factories waiting for discovery.
    pub fn len(&self) -> usize {
        self.factories.lock().len()
    }

    /// True if no factory is waiting.
    pub fn is_empty(&self) -> bool {
        self.factories.lock().is_empty()
    }

    /// True once [`discover`](Self::discover) has run.
    pub fn is_scanned(&self) -> bool {
        self.scanned.load(Ordering::Acquire)
    }

    /// Instantiates every factory and registers the receivers.
    ///
    /// Returns how many receivers were registered; receivers without a
    /// channel are skipped and not counted.
    pub fn discover(&self, registry: &ReceiverRegistry) -> usize {
        // `scanned` flips under the factories lock so `add_with` sees either
        // the flag or an untaken list.
        let factories = {
            let mut pending = self.factories.lock();
            if self.scanned.swap(true, Ordering::AcqRel) {
                debug!("receiver discovery already ran");
                return 0;
            }
            std::mem::take(&mut *pending)
        };
        let registered = factories
            .iter()
            .filter(|make| registry.register_instance(make()))
            .count();

        debug!(
            found = factories.len(),
            registered, "receiver discovery finished"
        );
        registered
    }
}
