use std::sync::Arc;

use crate::{
    config::Config,
    dispatch::Dispatcher,
    packages::{DirectoryOracle, PackageOracle, StaticOracle},
    receivers::{ReceiverCatalog, ReceiverRegistry},
};
use super::context::PackageMeta;

/// Builder for constructing a [`PackageMeta`] context.
pub struct PackageMetaBuilder {
    cfg: Config,
    oracle: Option<Arc<dyn PackageOracle>>,
    catalog: Option<Arc<ReceiverCatalog>>,
}

impl PackageMetaBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            oracle: None,
            catalog: None,
        }
    }

    /// Sets the package existence oracle.
    ///
    /// Without one, a [`DirectoryOracle`] over [`Config::packages_path`] is
    /// used, or an empty [`StaticOracle`] if no path is configured.
    pub fn with_oracle(mut self, oracle: Arc<dyn PackageOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Uses a catalog plugins have already been filling.
    pub fn with_catalog(mut self, catalog: Arc<ReceiverCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Builds the context and spawns the dispatch workers.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn build(self) -> Arc<PackageMeta> {
        let oracle: Arc<dyn PackageOracle> = match (self.oracle, &self.cfg.packages_path) {
            (Some(oracle), _) => oracle,
            (None, Some(path)) => Arc::new(DirectoryOracle::new(path.clone())),
            (None, None) => Arc::new(StaticOracle::default()),
        };
        let catalog = self.catalog.unwrap_or_default();
        let registry = Arc::new(ReceiverRegistry::new());
        let dispatcher = Dispatcher::new(Arc::clone(&registry), &self.cfg);

        Arc::new(PackageMeta::new_internal(
            self.cfg, registry, catalog, dispatcher, oracle,
        ))
    }
}
