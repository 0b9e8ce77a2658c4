//! Host collaborators: checking for and installing packages.
//!
//! ## Contents
//! - [`PackageOracle`] existence check ([`DirectoryOracle`], [`StaticOracle`])
//! - [`Installer`] installation bridge ([`CommandInstaller`])
//! - [`install_options`], [`InstallChoice`], [`InstallReport`] install prompt data

mod installer;
mod oracle;

pub use installer::{
    CommandInstaller, InstallChoice, InstallOption, InstallReport, Installer, install_each,
    install_options,
};
pub use oracle::{DirectoryOracle, PackageOracle, StaticOracle};
