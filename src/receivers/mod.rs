//! # Receivers: the subscriber side of a broadcast.
//!
//! ## Architecture
//! ```text
//! plugin load ──► ReceiverCatalog::add::<R>()
//!                        │
//!                 discover() (once)
//!                        ▼
//!                 ReceiverRegistry ◄── register::<R>() (eager)
//!                  channel → [R1, R2, ...]
//!                        │
//!                 lookup(channel) ──► Dispatcher batch
//! ```

mod catalog;
#[cfg(feature = "logging")]
mod log;
mod receiver;
mod registry;

pub use catalog::ReceiverCatalog;
#[cfg(feature = "logging")]
pub use log::LogReceiver;
pub use receiver::Receiver;
pub use registry::{ReceiverRef, ReceiverRegistry};
