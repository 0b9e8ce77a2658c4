//! Broadcast dispatch: channel names, payloads, and the worker pool.
//!
//! ## Contents
//! - [`Channel`], [`IntoChannel`], [`Payload`] what a broadcast carries
//! - [`Dispatcher`] fire-and-forget fan-out over a bounded queue

mod channel;
mod dispatcher;

pub use channel::{Channel, IntoChannel, Payload};
pub use dispatcher::{DispatchSnapshot, DispatchStats, Dispatcher};
