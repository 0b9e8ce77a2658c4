//! # LogReceiver — simple payload printer
//!
//! A minimal receiver that logs every payload it gets on one channel through
//! `tracing`. Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! INFO packagemeta::receivers::log: received channel=lint_java payload={"file":"Main.java"}
//! ```

use async_trait::async_trait;
use tracing::info;

use crate::dispatch::{Channel, Payload};
use crate::receivers::Receiver;

/// Payload logging receiver.
pub struct LogReceiver {
    channel: Channel,
}

impl LogReceiver {
    /// Construct a [`LogReceiver`] listening on `channel`.
    #[must_use]
    pub fn new(channel: impl Into<Channel>) -> Self {
        Self {
            channel: channel.into(),
        }
    }
}

#[async_trait]
impl Receiver for LogReceiver {
    fn channel(&self) -> Option<&str> {
        Some(self.channel.as_str())
    }

    async fn receive(&self, data: &Payload) {
        info!(channel = %self.channel, payload = %data, "received");
    }

    fn name(&self) -> &'static str {
        "LogReceiver"
    }
}
