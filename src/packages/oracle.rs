//! # Package existence oracles.
//!
//! [`PackageOracle`] answers one question: is this package present?
//!
//! - [`DirectoryOracle`] looks for `root/<name>` in the host packages directory.
//! - [`StaticOracle`] keeps an in-memory set, for hosts that track packages
//!   themselves and for tests.

use std::collections::BTreeSet;
use std::io;
use std::path::{Component, Path, PathBuf};

use parking_lot::RwLock;

/// Answers whether a named package is installed.
pub trait PackageOracle: Send + Sync + 'static {
    /// Returns `true` if `name` is present.
    fn exists(&self, name: &str) -> bool;
}

/// Oracle backed by a packages directory: one entry per installed package.
#[derive(Clone, Debug)]
pub struct DirectoryOracle {
    root: PathBuf,
}

impl DirectoryOracle {
    /// Creates an oracle over `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Packages directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Names of every entry in the packages directory.
    pub fn installed(&self) -> io::Result<BTreeSet<String>> {
        let mut names = BTreeSet::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            if let Some(name) = entry.file_name().to_str() {
                names.insert(name.to_string());
            }
        }
        Ok(names)
    }
}

impl PackageOracle for DirectoryOracle {
    /// Only a single plain path segment names a package; `""`, `..`,
    /// absolute paths and nested paths are never present.
    fn exists(&self, name: &str) -> bool {
        let mut parts = Path::new(name).components();
        match (parts.next(), parts.next()) {
            (Some(Component::Normal(_)), None) => self.root.join(name).exists(),
            _ => false,
        }
    }
}

/// In-memory set of installed packages.
#[derive(Debug, Default)]
pub struct StaticOracle {
    names: RwLock<BTreeSet<String>>,
}

impl StaticOracle {
    /// Creates an oracle that reports `names` as installed.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: RwLock::new(names.into_iter().map(Into::into).collect()),
        }
    }

    /// Marks `name` as installed.
    pub fn insert(&self, name: impl Into<String>) {
        self.names.write().insert(name.into());
    }

    /// Marks `name` as not installed.
    pub fn remove(&self, name: &str) -> bool {
        self.names.write().remove(name)
    }

    /// Current installed set.
    pub fn installed(&self) -> BTreeSet<String> {
        self.names.read().clone()
    }
}

impl PackageOracle for StaticOracle {
    fn exists(&self, name: &str) -> bool {
        self.names.read().contains(name)
    }
}
