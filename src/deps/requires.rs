//! # Package-gated functions.
//!
//! [`Requirement`] is what [`PackageMeta::requires`](crate::PackageMeta::requires)
//! returns: the module's declaration has already been recorded, and
//! [`Requirement::wrap`] turns any function into a [`Guarded`] one that only
//! runs while the required packages exist.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use packagemeta::{ExistencePolicy, Requirement, StaticOracle};
//!
//! let oracle = Arc::new(StaticOracle::new(["SublimeLinter"]));
//! let req = Requirement::new(
//!     packagemeta::module_id!(),
//!     ["SublimeLinter"],
//!     oracle,
//!     ExistencePolicy::All,
//! );
//!
//! let lint = req.wrap(|file: &str| format!("linting {file}"));
//! assert_eq!(lint.call("Main.java").as_deref(), Some("linting Main.java"));
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::deps::{ExistencePolicy, ModuleId};
use crate::packages::PackageOracle;

/// Packages a module's functions depend on, plus how to check them.
#[derive(Clone)]
pub struct Requirement {
    module: ModuleId,
    packages: Vec<String>,
    oracle: Arc<dyn PackageOracle>,
    policy: ExistencePolicy,
}

impl fmt::Debug for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Requirement")
            .field("module", &self.module)
            .field("packages", &self.packages)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Requirement {
    /// Creates a requirement. Package order is kept; it matters for
    /// [`ExistencePolicy::LastOnly`].
    pub fn new<I, S>(
        module: impl Into<ModuleId>,
        packages: I,
        oracle: Arc<dyn PackageOracle>,
        policy: ExistencePolicy,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            module: module.into(),
            packages: packages.into_iter().map(Into::into).collect(),
            oracle,
            policy,
        }
    }

    /// Declaring module.
    pub fn module(&self) -> &ModuleId {
        &self.module
    }

    /// Required packages in the order given.
    pub fn packages(&self) -> &[String] {
        &self.packages
    }

    /// True when the gate is currently open.
    pub fn is_satisfied(&self) -> bool {
        self.policy.admits(&self.packages, self.oracle.as_ref())
    }

    /// Wraps `f` so it only runs while this requirement is satisfied.
    pub fn wrap<F>(&self, f: F) -> Guarded<F> {
        Guarded {
            requirement: self.clone(),
            f,
        }
    }
}

/// A function gated on package existence.
///
/// The check runs on every call, so installing a package opens the gate
/// without rewrapping.
#[derive(Clone, Debug)]
pub struct Guarded<F> {
    requirement: Requirement,
    f: F,
}

impl<F> Guarded<F> {
    /// The requirement guarding this function.
    pub fn requirement(&self) -> &Requirement {
        &self.requirement
    }

    /// Calls the wrapped function with `args`, or returns `None` without
    /// calling it when the requirement is not satisfied.
    pub fn call<A, R>(&self, args: A) -> Option<R>
    where
        F: Fn(A) -> R,
    {
        if self.open() { Some((self.f)(args)) } else { None }
    }

    /// Same as [`call`](Self::call) for functions without arguments.
    pub fn run<R>(&self) -> Option<R>
    where
        F: Fn() -> R,
    {
        if self.open() { Some((self.f)()) } else { None }
    }

    fn open(&self) -> bool {
        let ok = self.requirement.is_satisfied();
        if !ok {
            debug!(
                module = %self.requirement.module,
                packages = ?self.requirement.packages,
                "required packages missing; skipping call"
            );
        }
        ok
    }
}
