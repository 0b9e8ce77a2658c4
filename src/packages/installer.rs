//! # Installer bridge.
//!
//! [`Installer`] installs one package by name. The core never calls it on its
//! own; the host picks what to install from [`install_options`] and hands the
//! [`InstallChoice`] to [`PackageMeta::install`](crate::PackageMeta::install).
//!
//! ## Flow
//! ```text
//! missing(M) ──► install_options() ──► [All, "Foo", "Bar"] (shown by the host)
//!                                          │ pick
//!                                          ▼
//!                 InstallChoice::resolve(missing) ──► install_each()
//!                                                       ├─► "installing package Foo"
//!                                                       ├─► Installer::install("Foo")
//!                                                       └─► "package Foo successfully installed"
//! ```

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{info, warn};

use crate::error::InstallError;

/// Installs packages by name.
#[async_trait]
pub trait Installer: Send + Sync + 'static {
    /// Installs `name`, completing once the package is usable.
    async fn install(&self, name: &str) -> Result<(), InstallError>;
}

/// Installer that runs an external program per package.
///
/// Every argument equal to or containing `{name}` gets the package name
/// substituted.
///
/// ```
/// use packagemeta::CommandInstaller;
///
/// let installer = CommandInstaller::new("pkgctl").arg("install").arg("{name}");
/// assert_eq!(installer.args_for("Foo"), vec!["install", "Foo"]);
/// ```
#[derive(Clone, Debug)]
pub struct CommandInstaller {
    program: OsString,
    args: Vec<String>,
}

impl CommandInstaller {
    /// Creates an installer running `program`.
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends an argument template.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Arguments with `{name}` replaced by `name`.
    pub fn args_for(&self, name: &str) -> Vec<String> {
        self.args.iter().map(|a| a.replace("{name}", name)).collect()
    }
}

#[async_trait]
impl Installer for CommandInstaller {
    async fn install(&self, name: &str) -> Result<(), InstallError> {
        let output = Command::new(&self.program)
            .args(self.args_for(name))
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| InstallError::Spawn {
                name: name.to_string(),
                source,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = match stderr.trim() {
                "" => output.status.to_string(),
                msg => msg.to_string(),
            };
            Err(InstallError::Failed {
                name: name.to_string(),
                reason,
            })
        }
    }
}

/// One entry of the install prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InstallOption {
    /// Install everything that is missing.
    All,
    /// Install a single package.
    Package(String),
}

impl InstallOption {
    /// Label shown to the user.
    pub fn label(&self) -> &str {
        match self {
            InstallOption::All => "All Packages",
            InstallOption::Package(name) => name,
        }
    }

    /// Choice corresponding to this option.
    pub fn choice(&self) -> InstallChoice {
        match self {
            InstallOption::All => InstallChoice::All,
            InstallOption::Package(name) => InstallChoice::One(name.clone()),
        }
    }
}

/// Prompt entries for `missing`: each package, preceded by
/// [`InstallOption::All`] when more than one is missing.
pub fn install_options(missing: &BTreeSet<String>) -> Vec<InstallOption> {
    let mut options: Vec<InstallOption> =
        missing.iter().cloned().map(InstallOption::Package).collect();
    if options.len() > 1 {
        options.insert(0, InstallOption::All);
    }
    options
}

/// What the user asked to install.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InstallChoice {
    /// Every missing package.
    All,
    /// A single package.
    One(String),
}

impl InstallChoice {
    /// Package names to install given the currently `missing` set.
    ///
    /// A single package that is no longer missing resolves to nothing.
    pub fn resolve(&self, missing: &BTreeSet<String>) -> Vec<String> {
        match self {
            InstallChoice::All => missing.iter().cloned().collect(),
            InstallChoice::One(name) if missing.contains(name) => vec![name.clone()],
            InstallChoice::One(_) => Vec::new(),
        }
    }
}

/// Outcome of an install run.
#[derive(Debug, Default)]
pub struct InstallReport {
    /// Packages installed successfully, in install order.
    pub installed: Vec<String>,
    /// Packages that failed.
    pub failed: Vec<InstallError>,
}

impl InstallReport {
    /// True if nothing failed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Installs `names` one after another, reporting progress through `tracing`.
pub async fn install_each(installer: &dyn Installer, names: Vec<String>) -> InstallReport {
    let mut report = InstallReport::default();
    for name in names {
        info!(package = %name, "installing package {name}");
        match installer.install(&name).await {
            Ok(()) => {
                info!(package = %name, "package {name} successfully installed");
                report.installed.push(name);
            }
            Err(e) => {
                warn!(package = %name, error = %e, label = e.as_label(), "package install failed");
                report.failed.push(e);
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[derive(Default)]
    struct Scripted {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Installer for Scripted {
        async fn install(&self, name: &str) -> Result<(), InstallError> {
            self.seen.lock().push(name.to_string());
            if name == "Broken" {
                return Err(InstallError::NotFound {
                    name: name.to_string(),
                });
            }
            Ok(())
        }
    }

    #[test]
    fn test_options_add_all_when_several() {
        assert_eq!(
            install_options(&set(&["Foo"])),
            vec![InstallOption::Package("Foo".into())]
        );

        let opts = install_options(&set(&["Foo", "Bar"]));
        assert_eq!(opts[0], InstallOption::All);
        assert_eq!(opts[0].label(), "All Packages");
        assert_eq!(opts.len(), 3);
        assert!(install_options(&BTreeSet::new()).is_empty());
    }

    #[test]
    fn test_choice_resolves_against_missing() {
        let missing = set(&["Bar", "Foo"]);
        assert_eq!(InstallChoice::All.resolve(&missing), vec!["Bar", "Foo"]);
        assert_eq!(InstallChoice::One("Foo".into()).resolve(&missing), vec!["Foo"]);
        assert!(InstallChoice::One("Baz".into()).resolve(&missing).is_empty());
    }

    #[tokio::test]
    async fn test_install_each_collects_failures() {
        let installer = Scripted::default();
        let report = install_each(&installer, vec!["Foo".into(), "Broken".into()]).await;

        assert_eq!(report.installed, vec!["Foo"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].package(), "Broken");
        assert!(!report.is_success());
        assert_eq!(*installer.seen.lock(), vec!["Foo", "Broken"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_installer_reports_exit_status() {
        let ok = CommandInstaller::new("true").arg("{name}");
        assert!(ok.install("Foo").await.is_ok());

        let bad = CommandInstaller::new("false").arg("{name}");
        let err = bad.install("Foo").await.unwrap_err();
        assert_eq!(err.as_label(), "install_failed");

        let missing = CommandInstaller::new("/definitely/not/a/program");
        let err = missing.install("Foo").await.unwrap_err();
        assert_eq!(err.as_label(), "install_spawn");
    }
}
