//! Error types used by the packagemeta registry and its collaborators.
//!
//! This module defines three error enums:
//!
//! - [`BroadcastError`] — errors raised synchronously by [`broadcast`](crate::Dispatcher::broadcast).
//! - [`InstallError`] — errors reported by an [`Installer`](crate::Installer).
//! - [`CommandError`] — errors raised by the host command surface.
//!
//! All of them provide helper methods (`as_label`, `as_message`) for logging/metrics.

use thiserror::Error;

/// # Errors produced by broadcasting.
///
/// Broadcasting to a channel with no receivers is **not** an error.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BroadcastError {
    /// The channel value was not a string.
    #[error("channel must be a string, found {found}")]
    InvalidChannelType {
        /// Kind of value that was supplied instead (e.g. `number`).
        found: &'static str,
    },
}

impl BroadcastError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use packagemeta::BroadcastError;
    ///
    /// let err = BroadcastError::InvalidChannelType { found: "number" };
    /// assert_eq!(err.as_label(), "broadcast_invalid_channel_type");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            BroadcastError::InvalidChannelType { .. } => "broadcast_invalid_channel_type",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            BroadcastError::InvalidChannelType { found } => {
                format!("invalid channel type: {found}")
            }
        }
    }
}

/// # Errors produced by package installation.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum InstallError {
    /// The installer process could not be started.
    #[error("failed to start installer for '{name}': {source}")]
    Spawn {
        /// Package being installed.
        name: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The installer ran but reported failure.
    #[error("installing '{name}' failed: {reason}")]
    Failed {
        /// Package being installed.
        name: String,
        /// Reason reported by the installer.
        reason: String,
    },

    /// The installer does not know the package.
    #[error("package '{name}' not found")]
    NotFound {
        /// Package that was requested.
        name: String,
    },
}

impl InstallError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            InstallError::Spawn { .. } => "install_spawn",
            InstallError::Failed { .. } => "install_failed",
            InstallError::NotFound { .. } => "install_not_found",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            InstallError::Spawn { name, source } => format!("spawn {name}: {source}"),
            InstallError::Failed { name, reason } => format!("failed {name}: {reason}"),
            InstallError::NotFound { name } => format!("not found: {name}"),
        }
    }

    /// Name of the package the error refers to.
    pub fn package(&self) -> &str {
        match self {
            InstallError::Spawn { name, .. }
            | InstallError::Failed { name, .. }
            | InstallError::NotFound { name } => name,
        }
    }
}

/// # Errors produced by the host command surface.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CommandError {
    /// The command payload could not be decoded.
    #[error("malformed command: {0}")]
    Parse(#[from] serde_json::Error),

    /// The broadcast command was rejected.
    #[error(transparent)]
    Broadcast(#[from] BroadcastError),
}

impl CommandError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use packagemeta::{BroadcastError, CommandError};
    ///
    /// let err = CommandError::from(BroadcastError::InvalidChannelType { found: "bool" });
    /// assert_eq!(err.as_label(), "broadcast_invalid_channel_type");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            CommandError::Parse(_) => "command_parse",
            CommandError::Broadcast(e) => e.as_label(),
        }
    }
}
