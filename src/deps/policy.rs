//! # Existence policies for gated functions.
//!
//! [`ExistencePolicy`] decides which of a requirement's package names must be
//! present before a wrapped function runs.
//!
//! ```text
//! requires(M, ["Foo", "Bar"])   Foo missing, Bar present
//!   ExistencePolicy::All       → gate closed (Foo missing)
//!   ExistencePolicy::LastOnly  → gate open   (only Bar checked)
//! ```
//!
//! `LastOnly` reproduces hosts that only ever checked the last name given;
//! keep it only where existing plugins depend on that.

use crate::packages::PackageOracle;

/// Which declared packages the gate checks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExistencePolicy {
    /// Every declared package must exist (default).
    #[default]
    All,
    /// Only the last declared package is checked.
    LastOnly,
}

impl ExistencePolicy {
    /// Returns `true` when the gate is open for `packages`.
    ///
    /// An empty list always passes.
    pub fn admits(&self, packages: &[String], oracle: &dyn PackageOracle) -> bool {
        match self {
            ExistencePolicy::All => packages.iter().all(|p| oracle.exists(p)),
            ExistencePolicy::LastOnly => packages.last().is_none_or(|p| oracle.exists(p)),
        }
    }
}
