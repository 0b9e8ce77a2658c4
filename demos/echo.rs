//! # Example: echo
//!
//! Demonstrates receivers, broadcast and package-gated functions on one context.
//!
//! Shows how to:
//! - Implement the [`Receiver`] trait and add it to the [`ReceiverCatalog`].
//! - Run the one-shot discovery and broadcast to a channel.
//! - Declare dependencies with `requires` and list what is missing.
//!
//! ## Flow
//! ```text
//! catalog().add::<Echo>() ──► discover() ──► ReceiverRegistry
//! broadcast("ping", data) ──► Dispatcher ──► Echo::receive()
//! requires(M, ["Foo", "Bar"]) ──► wrap(f) ──► call() gated by StaticOracle
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example echo
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use packagemeta::{
    Config, InstallChoice, InstallError, Installer, PackageMeta, Payload, Receiver, StaticOracle,
};
use serde_json::json;

#[derive(Default)]
struct Echo;

#[async_trait]
impl Receiver for Echo {
    fn channel(&self) -> Option<&str> {
        Some("ping")
    }

    async fn receive(&self, data: &Payload) {
        println!("[echo] {data}");
    }

    fn name(&self) -> &'static str {
        "echo"
    }
}

/// Pretends to install by marking the package present.
struct Pretend(Arc<StaticOracle>);

#[async_trait]
impl Installer for Pretend {
    async fn install(&self, name: &str) -> Result<(), InstallError> {
        println!("[install] {name}");
        self.0.insert(name);
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    packagemeta::telemetry::init(tracing::Level::DEBUG).ok();

    let oracle = Arc::new(StaticOracle::new(["Bar"]));
    let meta = PackageMeta::builder(Config::default())
        .with_oracle(oracle.clone())
        .build();

    meta.catalog().add::<Echo>();
    println!("discovered {} receiver(s)", meta.discover());

    meta.broadcast("ping", json!("hello"))?;
    meta.broadcast("ping", json!({"file": "Main.java", "line": 42}))?;

    let module = packagemeta::module_id!();
    let lint = meta
        .requires(module.clone(), ["Foo", "Bar"])
        .wrap(|file: &str| format!("linted {file}"));

    println!("before install: {:?}", lint.call("Main.java"));
    println!("missing: {:?}", meta.missing_now(module.as_str()));

    let report = meta
        .install(module.as_str(), &InstallChoice::All, &Pretend(oracle))
        .await;
    println!("installed: {:?}", report.installed);
    println!("after install: {:?}", lint.call("Main.java"));

    meta.shutdown().await;
    Ok(())
}
