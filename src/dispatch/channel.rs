//! # Channel names and payloads.
//!
//! A [`Channel`] is any string. Typed callers pass `&str`/`String` directly;
//! untyped input (JSON arriving through the command surface) goes through
//! [`IntoChannel`], which rejects non-string values with
//! [`BroadcastError::InvalidChannelType`].

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::BroadcastError;

/// Broadcast payload. Shape is decided by the broadcaster.
///
/// Payloads are JSON values: anything a broadcaster sends must be
/// representable as `serde_json::Value` (serialize typed data with
/// `serde_json::to_value`). Receivers share one immutable copy per broadcast.
pub type Payload = Value;

/// Named topic on which payloads are broadcast and received.
///
/// Not validated beyond type: unused names simply have zero receivers.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Channel(Arc<str>);

impl Channel {
    /// Creates a channel from any string.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// Channel name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Channel {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Channel {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Channel {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Conversion into a [`Channel`] that may fail on non-string input.
pub trait IntoChannel {
    /// Performs the conversion.
    fn into_channel(self) -> Result<Channel, BroadcastError>;
}

impl IntoChannel for Channel {
    fn into_channel(self) -> Result<Channel, BroadcastError> {
        Ok(self)
    }
}

impl IntoChannel for &Channel {
    fn into_channel(self) -> Result<Channel, BroadcastError> {
        Ok(self.clone())
    }
}

impl IntoChannel for &str {
    fn into_channel(self) -> Result<Channel, BroadcastError> {
        Ok(Channel::from(self))
    }
}

impl IntoChannel for String {
    fn into_channel(self) -> Result<Channel, BroadcastError> {
        Ok(Channel::from(self))
    }
}

impl IntoChannel for &Value {
    fn into_channel(self) -> Result<Channel, BroadcastError> {
        match self {
            Value::String(s) => Ok(Channel::from(s.as_str())),
            other => Err(BroadcastError::InvalidChannelType {
                found: value_kind(other),
            }),
        }
    }
}

impl IntoChannel for Value {
    fn into_channel(self) -> Result<Channel, BroadcastError> {
        match self {
            Value::String(s) => Ok(Channel::from(s)),
            other => (&other).into_channel(),
        }
    }
}

fn value_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
