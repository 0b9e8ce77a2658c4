//! Dependency declarations, gating and the install flow.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use packagemeta::{
    Config, ExistencePolicy, InstallChoice, InstallError, InstallOption, Installer, PackageMeta,
    PackageOracle, StaticOracle,
};

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Installer that "installs" into a shared `StaticOracle`.
struct IntoOracle(Arc<StaticOracle>);

#[async_trait]
impl Installer for IntoOracle {
    async fn install(&self, name: &str) -> Result<(), InstallError> {
        self.0.insert(name);
        Ok(())
    }
}

fn context(policy: ExistencePolicy, oracle: &Arc<StaticOracle>) -> Arc<PackageMeta> {
    let cfg = Config {
        existence_policy: policy,
        ..Config::default()
    };
    PackageMeta::builder(cfg)
        .with_oracle(Arc::clone(oracle) as _)
        .build()
}

#[tokio::test]
async fn declare_twice_is_idempotent() {
    let meta = context(ExistencePolicy::All, &Arc::default());
    meta.declare("M", ["A"]);
    meta.declare("M", ["A"]);
    assert_eq!(meta.packages("M"), set(&["A"]));
}

#[tokio::test]
async fn missing_is_set_difference() {
    let meta = context(ExistencePolicy::All, &Arc::default());
    meta.declare("M", ["A", "B"]);
    assert_eq!(meta.missing("M", &set(&["A"])), set(&["B"]));
    assert!(meta.missing("undeclared", &set(&[])).is_empty());
}

#[tokio::test]
async fn requires_checks_all_names_by_default() {
    let oracle = Arc::new(StaticOracle::new(["Bar"]));
    let meta = context(ExistencePolicy::All, &oracle);
    let calls = AtomicUsize::new(0);

    let guarded = meta.requires("M", ["Foo", "Bar"]).wrap(|| {
        calls.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(meta.packages("M"), set(&["Foo", "Bar"]));

    assert!(guarded.run().is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn requires_last_only_policy_checks_last_name() {
    let oracle = Arc::new(StaticOracle::new(["Bar"]));
    let meta = context(ExistencePolicy::LastOnly, &oracle);
    let calls = AtomicUsize::new(0);

    let guarded = meta.requires("M", ["Foo", "Bar"]).wrap(|| {
        calls.fetch_add(1, Ordering::SeqCst);
    });

    assert!(guarded.run().is_some());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn install_flow_installs_missing_packages() {
    let oracle = Arc::new(StaticOracle::new(["Bar"]));
    let meta = context(ExistencePolicy::All, &oracle);
    let installer = IntoOracle(Arc::clone(&oracle));
    let greet = meta.requires("M", ["Foo", "Bar", "Baz"]).wrap(|| "hi");

    assert!(meta.needs_install("M"));
    assert_eq!(
        meta.install_options("M"),
        vec![
            InstallOption::All,
            InstallOption::Package("Baz".into()),
            InstallOption::Package("Foo".into()),
        ]
    );
    assert_eq!(greet.run(), None);

    let report = meta
        .install("M", &InstallChoice::One("Foo".into()), &installer)
        .await;
    assert_eq!(report.installed, vec!["Foo"]);
    assert_eq!(meta.install_options("M"), vec![InstallOption::Package("Baz".into())]);

    let report = meta.install("M", &InstallChoice::All, &installer).await;
    assert!(report.is_success());
    assert_eq!(report.installed, vec!["Baz"]);

    assert!(!meta.needs_install("M"));
    assert!(meta.install_options("M").is_empty());
    assert_eq!(greet.run(), Some("hi"));
}

#[tokio::test]
async fn packages_path_gives_directory_oracle() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("Foo")).unwrap();

    let cfg = Config {
        packages_path: Some(dir.path().to_path_buf()),
        ..Config::default()
    };
    let meta = PackageMeta::builder(cfg).build();
    meta.declare("M", ["Foo", "Bar"]);

    assert!(meta.oracle().exists("Foo"));
    assert_eq!(meta.missing_now("M"), set(&["Bar"]));
}

#[tokio::test]
async fn declare_command_adds_dependencies() {
    let meta = context(ExistencePolicy::All, &Arc::default());
    let raw = r#"{"command":"declare","args":{"module":"plugin","packages":["A","B","A"]}}"#;
    meta.execute_json(raw).unwrap();
    assert_eq!(meta.packages("plugin"), set(&["A", "B"]));
}
