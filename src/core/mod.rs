//! Runtime core: the process-scoped context and its builder.
//!
//! The only public API from this module is [`PackageMeta`] (and its
//! [`PackageMetaBuilder`]), which ties together receivers, dispatch and
//! dependency declarations.
//!
//! Internal modules:
//! - [`context`]: the context object and its operations;
//! - [`builder`]: wires oracle, catalog, registry and dispatcher.

mod builder;
mod context;

pub use builder::PackageMetaBuilder;
pub use context::PackageMeta;
