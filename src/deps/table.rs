//! # Dependency table - module → required packages.
//!
//! [`DependencyTable`] records which external packages each module needs.
//!
//! ## Rules
//! - Declarations are additive and idempotent per name (set semantics).
//! - There is no removal; entries live as long as the table.
//! - Querying a module that never declared anything yields an empty set.

use std::borrow::Borrow;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::packages::PackageOracle;

/// Opaque identifier grouping declared packages.
///
/// Conventionally the declaring module's path; see [`module_id!`](crate::module_id).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(Arc<str>);

impl ModuleId {
    /// Creates an identifier from any string.
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Identifier as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ModuleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ModuleId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ModuleId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&ModuleId> for ModuleId {
    fn from(m: &ModuleId) -> Self {
        m.clone()
    }
}

/// Builds a [`ModuleId`] from the calling module's path.
///
/// ```
/// let id = packagemeta::module_id!();
/// assert_eq!(id.as_str(), module_path!());
/// ```
#[macro_export]
macro_rules! module_id {
    () => {
        $crate::ModuleId::from(::core::module_path!())
    };
}

/// Module → set of required package names.
#[derive(Default)]
pub struct DependencyTable {
    modules: RwLock<HashMap<ModuleId, BTreeSet<String>>>,
}

impl DependencyTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `packages` to the set declared by `module`.
    ///
    /// Creates the module entry even when `packages` is empty.
    pub fn declare<I, S>(&self, module: impl Into<ModuleId>, packages: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let module = module.into();
        let mut modules = self.modules.write();
        let set = modules.entry(module.clone()).or_default();
        for pkg in packages {
            set.insert(pkg.into());
        }
        debug!(%module, packages = ?set, "dependencies declared");
    }

    /// Packages declared by `module`.
    pub fn packages(&self, module: &str) -> BTreeSet<String> {
        self.modules.read().get(module).cloned().unwrap_or_default()
    }

    /// Declared packages of `module` that are not in `installed`.
    pub fn missing(&self, module: &str, installed: &BTreeSet<String>) -> BTreeSet<String> {
        self.modules
            .read()
            .get(module)
            .map(|set| set.difference(installed).cloned().collect())
            .unwrap_or_default()
    }

    /// Declared packages of `module` the oracle reports as absent.
    pub fn missing_with(&self, module: &str, oracle: &dyn PackageOracle) -> BTreeSet<String> {
        self.packages(module)
            .into_iter()
            .filter(|pkg| !oracle.exists(pkg))
            .collect()
    }

    /// Returns sorted list of modules that declared anything.
    pub fn modules(&self) -> Vec<ModuleId> {
        let mut ids: Vec<ModuleId> = self.modules.read().keys().cloned().collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packages::StaticOracle;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_declare_is_idempotent() {
        let table = DependencyTable::new();
        table.declare("M", ["A"]);
        table.declare("M", ["A"]);
        assert_eq!(table.packages("M"), set(&["A"]));
    }

    #[test]
    fn test_declarations_merge() {
        let table = DependencyTable::new();
        table.declare("M", ["A"]);
        table.declare("M", vec!["B".to_string(), "A".to_string()]);
        assert_eq!(table.packages("M"), set(&["A", "B"]));
        assert_eq!(table.modules(), vec![ModuleId::from("M")]);
    }

    #[test]
    fn test_missing_is_set_difference() {
        let table = DependencyTable::new();
        table.declare("M", ["A", "B"]);
        assert_eq!(table.missing("M", &set(&["A"])), set(&["B"]));
        assert!(table.missing("M", &set(&["A", "B", "C"])).is_empty());
    }

    #[test]
    fn test_unknown_module_is_empty() {
        let table = DependencyTable::new();
        assert!(table.packages("ghost").is_empty());
        assert!(table.missing("ghost", &BTreeSet::new()).is_empty());
    }

    #[test]
    fn test_missing_with_oracle() {
        let table = DependencyTable::new();
        table.declare("M", ["Foo", "Bar"]);
        let oracle = StaticOracle::new(["Bar"]);
        assert_eq!(table.missing_with("M", &oracle), set(&["Foo"]));
    }

    #[test]
    fn test_module_id_macro_uses_module_path() {
        let id = crate::module_id!();
        assert_eq!(id.as_str(), module_path!());
    }
}
