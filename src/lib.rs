//! # packagemeta
//!
//! **packagemeta** is a lightweight in-process broadcast registry for plugin
//! hosts, with a companion table of package dependencies.
//!
//! Plugins register receivers on named channels; anyone holding the context
//! can broadcast a payload to a channel without waiting for the receivers.
//! Independently, plugins declare which external packages they need, gate
//! functions on those packages being present, and let the host offer to
//! install whatever is missing.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   Receiver   │   │   Receiver   │   │   Receiver   │
//!     │ ch="lint"    │   │ ch="lint"    │   │ ch="build"   │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  PackageMeta (process-scoped context)                             │
//! │  - ReceiverCatalog (factories waiting for discovery)              │
//! │  - ReceiverRegistry (channel → ordered receivers)                 │
//! │  - Dispatcher (bounded queue + worker pool)                       │
//! │  - DependencyTable (module → required packages)                   │
//! │  - PackageOracle (is a package installed?)                        │
//! └──────┬──────────────────────────────────────────────────┬─────────┘
//!        │ broadcast(channel, data)                         │ requires / missing
//!        ▼                                                  ▼
//! ┌──────────────────────────────┐               ┌─────────────────────────┐
//! │ [queue] ─► worker 1..N       │               │ Guarded::call()         │
//! │   R1.receive(&data)          │               │ install_options()       │
//! │   R2.receive(&data)  (order) │               │ install(choice, inst.)  │
//! └──────────────────────────────┘               └─────────────────────────┘
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                          |
//! |-------------------|---------------------------------------------------------------|---------------------------------------------|
//! | **Receivers**     | Channel-bound subscribers, eager or discovered registration.  | [`Receiver`], [`ReceiverCatalog`]           |
//! | **Broadcast**     | Fire-and-forget fan-out on a bounded worker pool.             | [`Dispatcher`], [`Channel`], [`Payload`]    |
//! | **Dependencies**  | Declare, gate on and query required packages.                 | [`DependencyTable`], [`Requirement`]        |
//! | **Packages**      | Existence oracle and installer bridge supplied by the host.   | [`PackageOracle`], [`Installer`]            |
//! | **Commands**      | JSON command surface for callers without the Rust API.        | [`Command`]                                 |
//! | **Errors**        | Typed errors for broadcast, install and commands.             | [`BroadcastError`], [`InstallError`]        |
//! | **Configuration** | Worker pool, queue, discovery grace, existence policy.        | [`Config`]                                  |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogReceiver`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use packagemeta::{Config, PackageMeta, Payload, Receiver, StaticOracle};
//!
//! #[derive(Default)]
//! struct Echo;
//!
//! #[async_trait]
//! impl Receiver for Echo {
//!     fn channel(&self) -> Option<&str> { Some("ping") }
//!     async fn receive(&self, data: &Payload) { println!("echo: {data}"); }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let meta = PackageMeta::builder(Config::default())
//!         .with_oracle(Arc::new(StaticOracle::new(["Foo"])))
//!         .build();
//!
//!     meta.register::<Echo>();
//!     meta.broadcast("ping", serde_json::json!("hello"))?;
//!
//!     let greet = meta
//!         .requires(packagemeta::module_id!(), ["Foo"])
//!         .wrap(|who: &str| format!("hello {who}"));
//!     assert_eq!(greet.call("world").as_deref(), Some("hello world"));
//!
//!     meta.shutdown().await;
//!     Ok(())
//! }
//! ```
mod commands;
mod config;
mod core;
mod deps;
mod dispatch;
mod error;
mod packages;
mod receivers;
pub mod telemetry;

// ---- Public re-exports ----

pub use commands::Command;
pub use config::Config;
pub use crate::core::{PackageMeta, PackageMetaBuilder};
pub use deps::{DependencyTable, ExistencePolicy, Guarded, ModuleId, Requirement};
pub use dispatch::{Channel, DispatchSnapshot, DispatchStats, Dispatcher, IntoChannel, Payload};
pub use error::{BroadcastError, CommandError, InstallError};
pub use packages::{
    CommandInstaller, DirectoryOracle, InstallChoice, InstallOption, InstallReport, Installer,
    PackageOracle, StaticOracle, install_each, install_options,
};
pub use receivers::{Receiver, ReceiverCatalog, ReceiverRef, ReceiverRegistry};

// Optional: expose a simple built-in logging receiver (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use receivers::LogReceiver;
