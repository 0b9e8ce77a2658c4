//! # Host command surface.
//!
//! Lets callers without a handle to the Rust API trigger a broadcast or
//! declare dependencies by sending a JSON command, e.g. from a host's
//! command palette or an IPC bridge.
//!
//! ```text
//! {"command": "broadcast", "args": {"channel": "lint_java", "data": {...}}}
//! {"command": "declare",   "args": {"module": "my_plugin", "packages": ["Foo"]}}
//! ```
//!
//! The channel is kept as a raw JSON value so that a non-string channel is
//! reported as [`BroadcastError::InvalidChannelType`](crate::BroadcastError)
//! rather than as a decoding error.

use serde::Deserialize;
use serde_json::Value;

use crate::error::CommandError;

/// A decoded host command.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "command", content = "args", rename_all = "snake_case")]
pub enum Command {
    /// Broadcast `data` on `channel`.
    Broadcast {
        /// Channel name; must be a JSON string.
        channel: Value,
        /// Payload; `null` when omitted.
        #[serde(default)]
        data: Value,
    },
    /// Declare `packages` for `module`.
    Declare {
        /// Declaring module.
        module: String,
        /// Required packages.
        #[serde(default)]
        packages: Vec<String>,
    },
}

impl Command {
    /// Decodes a command from JSON text.
    pub fn parse(raw: &str) -> Result<Self, CommandError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Decodes a command from an already parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self, CommandError> {
        Ok(serde_json::from_value(value)?)
    }
}
