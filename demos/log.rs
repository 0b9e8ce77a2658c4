//! # Example: log
//!
//! Attaches the built-in [`LogReceiver`] to a channel and broadcasts to it.
//!
//! ## Flow
//! ```text
//! register_instance(LogReceiver::new("lint_java"))
//! broadcast("lint_java", data) ──► Dispatcher ──► tracing INFO "received"
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example log --features logging
//! ```

use std::sync::Arc;

use packagemeta::{Config, LogReceiver, PackageMeta};
use serde_json::json;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    packagemeta::telemetry::init(tracing::Level::INFO).ok();

    let meta = PackageMeta::builder(Config::default()).build();
    meta.register_instance(Arc::new(LogReceiver::new("lint_java")));

    meta.broadcast("lint_java", json!({"file": "Main.java", "line": 42}))?;
    meta.broadcast("lint_java", json!(["Foo", "Bar"]))?;

    meta.shutdown().await;
    println!("{:?}", meta.stats());
    Ok(())
}
