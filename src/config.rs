//! # Global runtime configuration.
//!
//! Provides [`Config`] centralized settings for a [`PackageMeta`](crate::PackageMeta) context.
//!
//! ## Sentinel values
//! - `workers = 0` → one worker per available CPU
//! - `discovery_grace = 0s` → deferred discovery runs immediately

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use crate::deps::ExistencePolicy;

/// Global configuration for a packagemeta context.
///
/// Defines:
/// - **Dispatch**: worker pool size and queue capacity
/// - **Discovery**: grace period before the deferred receiver scan
/// - **Dependencies**: how `requires` gates a wrapped function, and where packages live
///
/// ## Field semantics
/// - `workers`: Dispatch worker tasks (`0` = available parallelism)
/// - `queue_capacity`: Pending broadcast batches before new ones are dropped (min 1)
/// - `discovery_grace`: Delay used by
///   [`PackageMeta::spawn_discovery`](crate::PackageMeta::spawn_discovery)
/// - `existence_policy`: Which declared names the gate checks
/// - `packages_path`: Packages directory for the default
///   [`DirectoryOracle`](crate::DirectoryOracle)
#[derive(Clone, Debug)]
pub struct Config {
    /// Number of dispatch workers sharing the broadcast queue.
    ///
    /// With a single worker, batches run in the order `broadcast` was called.
    /// With more, batches for the same channel may interleave.
    pub workers: usize,

    /// Capacity of the broadcast queue.
    ///
    /// When full, new batches are dropped and logged. Minimum value is 1.
    pub queue_capacity: usize,

    /// How long the deferred discovery waits before scanning the catalog.
    ///
    /// Plugins registering factories after the scan are never discovered.
    pub discovery_grace: Duration,

    /// Existence check used by [`Requirement::wrap`](crate::Requirement::wrap).
    pub existence_policy: ExistencePolicy,

    /// Packages directory; when set and no oracle is supplied, the builder
    /// installs a [`DirectoryOracle`](crate::DirectoryOracle) rooted here.
    pub packages_path: Option<PathBuf>,
}

impl Config {
    /// Returns the effective worker count (never zero).
    #[inline]
    pub fn worker_count(&self) -> usize {
        if self.workers == 0 {
            std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        } else {
            self.workers
        }
    }

    /// Returns a queue capacity clamped to a minimum of 1.
    #[inline]
    pub fn queue_capacity_clamped(&self) -> usize {
        self.queue_capacity.max(1)
    }

    /// Returns the discovery delay as an `Option`.
    ///
    /// - `None` → scan immediately
    /// - `Some(d)` → wait `d` first
    #[inline]
    pub fn discovery_delay(&self) -> Option<Duration> {
        if self.discovery_grace == Duration::ZERO {
            None
        } else {
            Some(self.discovery_grace)
        }
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `workers = 0` (available parallelism)
    /// - `queue_capacity = 1024`
    /// - `discovery_grace = 3s` (plugin host load window)
    /// - `existence_policy = ExistencePolicy::All`
    /// - `packages_path = None`
    fn default() -> Self {
        Self {
            workers: 0,
            queue_capacity: 1024,
            discovery_grace: Duration::from_millis(3000),
            existence_policy: ExistencePolicy::default(),
            packages_path: None,
        }
    }
}
