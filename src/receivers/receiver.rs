//! # Receiver trait
//!
//! `Receiver` is the extension point for handling broadcast data. A receiver
//! declares the one channel it listens on and is invoked from a dispatch
//! worker, never in the broadcaster's context.
//!
//! ## Contract
//! - `channel()` returning `None` means the receiver is skipped at
//!   registration (a warning is logged).
//! - All receivers on a channel see a broadcast, in registration order.
//! - Panics are caught per call; later receivers on the channel still run.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use packagemeta::{Payload, Receiver};
//!
//! #[derive(Default)]
//! struct LintJava;
//!
//! #[async_trait]
//! impl Receiver for LintJava {
//!     fn channel(&self) -> Option<&str> { Some("lint_java") }
//!
//!     async fn receive(&self, data: &Payload) {
//!         let _ = data; // handle data
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::dispatch::Payload;

/// Subscriber bound to exactly one channel.
#[async_trait]
pub trait Receiver: Send + Sync + 'static {
    /// Channel this receiver listens on.
    fn channel(&self) -> Option<&str>;

    /// Handles one payload.
    ///
    /// Called from a dispatch worker. Receivers on the same channel run
    /// sequentially, so a slow receiver delays the ones registered after it.
    async fn receive(&self, data: &Payload);

    /// Name used in logs.
    ///
    /// The default uses `type_name::<Self>()`.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
