//! Logging setup for hosts that don't install their own `tracing` subscriber.
//!
//! The crate only emits `tracing` events; nothing is printed unless a
//! subscriber is installed. [`init`] installs a `fmt` subscriber writing to
//! stderr, filtered by `RUST_LOG` when set and by `packagemeta=<level>`
//! otherwise.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Error returned when a global subscriber is already installed.
pub type InitError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Installs a global `fmt` subscriber for this crate at `level`.
///
/// # Errors
/// Fails if a global subscriber was already set.
pub fn init(level: Level) -> Result<(), InitError> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(level))
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
}

fn filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{}={}",
            env!("CARGO_CRATE_NAME"),
            level.as_str().to_ascii_lowercase()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        let _ = init(Level::DEBUG);
        assert!(init(Level::DEBUG).is_err());
    }
}
