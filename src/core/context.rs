//! # PackageMeta: the process-scoped registry context.
//!
//! [`PackageMeta`] owns the receiver registry, the dispatcher, the dependency
//! table and the package oracle. The host builds one at startup and passes it
//! to whatever needs to register, broadcast or declare.
//!
//! ## High-level architecture
//! ```text
//! Registration:
//!   plugin load ──► catalog().add::<R>() ──► discover() (once) ──┐
//!   register::<R>() ─────────────────────────────────────────────┴─► ReceiverRegistry
//!
//! Broadcast:
//!   broadcast(channel, data) ──► lookup(channel) ──► Dispatcher queue ──► workers
//!                                                                           └─► R.receive(&data)
//!
//! Dependencies:
//!   requires(M, pkgs) ──► DependencyTable::declare(M, pkgs)
//!                    └──► Requirement::wrap(f) ──► Guarded::call() checks PackageOracle
//!   missing(M) / install_options(M) ──► host prompt ──► install(M, choice, installer)
//!
//! Shutdown:
//!   shutdown() ──► cancel pending deferred discovery
//!             └──► Dispatcher::shutdown() (drain queued batches)
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use packagemeta::{Config, PackageMeta, Payload, Receiver, StaticOracle};
//!
//! #[derive(Default)]
//! struct LintJava;
//!
//! #[async_trait]
//! impl Receiver for LintJava {
//!     fn channel(&self) -> Option<&str> { Some("lint_java") }
//!     async fn receive(&self, data: &Payload) { let _ = data; }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let meta = PackageMeta::builder(Config::default())
//!         .with_oracle(Arc::new(StaticOracle::new(["SublimeLinter"])))
//!         .build();
//!
//!     meta.catalog().add::<LintJava>();
//!     meta.discover();
//!
//!     meta.broadcast("lint_java", serde_json::json!({"file": "Main.java"}))?;
//!     meta.shutdown().await;
//!     Ok(())
//! }
//! ```

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::commands::Command;
use crate::config::Config;
use crate::deps::{DependencyTable, ModuleId, Requirement};
use crate::dispatch::{DispatchSnapshot, Dispatcher, IntoChannel, Payload};
use crate::error::{BroadcastError, CommandError};
use crate::packages::{
    InstallChoice, InstallOption, InstallReport, Installer, PackageOracle, install_each,
    install_options,
};
use crate::receivers::{Receiver, ReceiverCatalog, ReceiverRef, ReceiverRegistry};

use super::builder::PackageMetaBuilder;

/// Broadcast registry and dependency table for one host process.
pub struct PackageMeta {
    cfg: Config,
    registry: Arc<ReceiverRegistry>,
    catalog: Arc<ReceiverCatalog>,
    dispatcher: Dispatcher,
    deps: DependencyTable,
    oracle: Arc<dyn PackageOracle>,
    runtime_token: CancellationToken,
}

impl PackageMeta {
    /// Starts building a context with the given configuration.
    pub fn builder(cfg: Config) -> PackageMetaBuilder {
        PackageMetaBuilder::new(cfg)
    }

    pub(super) fn new_internal(
        cfg: Config,
        registry: Arc<ReceiverRegistry>,
        catalog: Arc<ReceiverCatalog>,
        dispatcher: Dispatcher,
        oracle: Arc<dyn PackageOracle>,
    ) -> Self {
        Self {
            cfg,
            registry,
            catalog,
            dispatcher,
            deps: DependencyTable::new(),
            oracle,
            runtime_token: CancellationToken::new(),
        }
    }

    /// Runtime configuration.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Package oracle used for gating and missing-package queries.
    pub fn oracle(&self) -> &Arc<dyn PackageOracle> {
        &self.oracle
    }

    // ---------------------------
    // Receivers
    // ---------------------------

    /// Instantiates `R` and registers it on its channel.
    ///
    /// Returns `false` (with a warning) when `R` declares no channel.
    pub fn register<R: Receiver + Default>(&self) -> bool {
        self.registry.register::<R>()
    }

    /// Registers an existing receiver instance.
    pub fn register_instance(&self, receiver: ReceiverRef) -> bool {
        self.registry.register_instance(receiver)
    }

    /// Catalog plugins add their receiver types to before discovery.
    pub fn catalog(&self) -> &ReceiverCatalog {
        &self.catalog
    }

    /// Runs the one-shot discovery scan now. Returns receivers registered.
    pub fn discover(&self) -> usize {
        self.catalog.discover(&self.registry)
    }

    /// Runs discovery after [`Config::discovery_grace`] on a spawned task.
    ///
    /// Resolves to the number of receivers registered, or 0 if the context
    /// was shut down before the grace period elapsed.
    pub fn spawn_discovery(&self) -> JoinHandle<usize> {
        let delay = self.cfg.discovery_delay();
        let token = self.runtime_token.clone();
        let catalog = Arc::clone(&self.catalog);
        let registry = Arc::clone(&self.registry);

        tokio::spawn(async move {
            if let Some(delay) = delay {
                debug!(?delay, "receiver discovery scheduled");
                tokio::select! {
                    _ = token.cancelled() => {
                        debug!("receiver discovery cancelled");
                        return 0;
                    }
                    _ = tokio::time::sleep(delay) => {}
                }
            }
            if token.is_cancelled() {
                debug!("receiver discovery skipped after shutdown");
                return 0;
            }
            catalog.discover(&registry)
        })
    }

    /// Receivers currently registered on `channel`.
    pub fn lookup(&self, channel: &str) -> Vec<ReceiverRef> {
        self.registry.lookup(channel)
    }

    /// The receiver registry.
    pub fn receivers(&self) -> &ReceiverRegistry {
        &self.registry
    }

    // ---------------------------
    // Broadcast
    // ---------------------------

    /// Broadcasts `data` on `channel`; see [`Dispatcher::broadcast`].
    ///
    /// # Errors
    /// [`BroadcastError::InvalidChannelType`] for non-string channels.
    pub fn broadcast<C: IntoChannel>(
        &self,
        channel: C,
        data: Payload,
    ) -> Result<(), BroadcastError> {
        self.dispatcher.broadcast(channel, data)
    }

    /// Dispatch counters.
    pub fn stats(&self) -> DispatchSnapshot {
        self.dispatcher.stats()
    }

    // ---------------------------
    // Dependencies
    // ---------------------------

    /// Adds `packages` to `module`'s declared set.
    pub fn declare<I, S>(&self, module: impl Into<ModuleId>, packages: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deps.declare(module, packages);
    }

    /// Declares `packages` for `module` and returns a [`Requirement`] whose
    /// [`wrap`](Requirement::wrap) gates functions on them, using
    /// [`Config::existence_policy`].
    pub fn requires<I, S>(&self, module: impl Into<ModuleId>, packages: I) -> Requirement
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let module = module.into();
        let packages: Vec<String> = packages.into_iter().map(Into::into).collect();
        self.deps.declare(module.clone(), packages.iter().cloned());
        Requirement::new(
            module,
            packages,
            Arc::clone(&self.oracle),
            self.cfg.existence_policy,
        )
    }

    /// Packages declared by `module`.
    pub fn packages(&self, module: &str) -> BTreeSet<String> {
        self.deps.packages(module)
    }

    /// Declared packages of `module` not in `installed`.
    pub fn missing(&self, module: &str, installed: &BTreeSet<String>) -> BTreeSet<String> {
        self.deps.missing(module, installed)
    }

    /// Declared packages of `module` the oracle reports absent.
    pub fn missing_now(&self, module: &str) -> BTreeSet<String> {
        self.deps.missing_with(module, self.oracle.as_ref())
    }

    /// The dependency table.
    pub fn dependencies(&self) -> &DependencyTable {
        &self.deps
    }

    /// True when `module` has declared packages that are not installed.
    pub fn needs_install(&self, module: &str) -> bool {
        !self.missing_now(module).is_empty()
    }

    /// Prompt entries for `module`'s missing packages.
    pub fn install_options(&self, module: &str) -> Vec<InstallOption> {
        install_options(&self.missing_now(module))
    }

    /// Installs what `choice` selects among `module`'s missing packages.
    pub async fn install(
        &self,
        module: &str,
        choice: &InstallChoice,
        installer: &dyn Installer,
    ) -> InstallReport {
        let names = choice.resolve(&self.missing_now(module));
        if names.is_empty() {
            debug!(module, ?choice, "nothing to install");
        }
        install_each(installer, names).await
    }

    // ---------------------------
    // Host commands
    // ---------------------------

    /// Executes a host command.
    pub fn execute(&self, command: Command) -> Result<(), CommandError> {
        match command {
            Command::Broadcast { channel, data } => {
                self.broadcast(channel, data)?;
            }
            Command::Declare { module, packages } => {
                self.declare(module, packages);
            }
        }
        Ok(())
    }

    /// Decodes and executes a JSON host command.
    pub fn execute_json(&self, raw: &str) -> Result<(), CommandError> {
        self.execute(Command::parse(raw)?)
    }

    // ---------------------------
    // Lifecycle
    // ---------------------------

    /// Cancels pending deferred discovery and drains the dispatcher.
    pub async fn shutdown(&self) {
        info!("packagemeta shutting down");
        self.runtime_token.cancel();
        self.dispatcher.shutdown().await;
    }
}
