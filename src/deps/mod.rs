//! Package dependency declarations.
//!
//! ## Contents
//! - [`DependencyTable`], [`ModuleId`] who needs which packages
//! - [`Requirement`], [`Guarded`] functions gated on package existence
//! - [`ExistencePolicy`] which names the gate checks
//!
//! ## Quick wiring
//! ```text
//! PackageMeta::requires(M, pkgs)
//!      ├─► DependencyTable::declare(M, pkgs)
//!      └─► Requirement ──wrap(f)──► Guarded<F>
//!                                     └─► call(args): policy.admits(pkgs, oracle) ? Some(f(args)) : None
//! ```

mod policy;
mod requires;
mod table;

pub use policy::ExistencePolicy;
pub use requires::{Guarded, Requirement};
pub use table::{DependencyTable, ModuleId};
