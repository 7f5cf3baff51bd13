//! Driver factory table.
//!
//! Backends are registered on an explicit [`DriverRegistry`] value built at
//! startup and handed to whatever needs to resolve driver names. There is
//! no process-wide table; two registries never see each other's entries.

use std::collections::BTreeMap;
use std::path::PathBuf;

use netvol_shared::constants::drivers;
use netvol_shared::errors::{NetvolError, NetvolResult};

use super::{DriverContext, VolumeDriver, mock, nfs};

/// Type alias for driver factory functions.
pub type DriverFactoryFn = fn(DriverContext) -> NetvolResult<Box<dyn VolumeDriver>>;

/// Name-keyed table of driver factories.
#[derive(Clone, Debug, Default)]
pub struct DriverRegistry {
    factories: BTreeMap<String, DriverFactoryFn>,
}

impl DriverRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the drivers shipped in this crate: `nfs` and `mock`.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry
            .register(drivers::NFS, nfs::factory)
            .register(drivers::MOCK, mock::factory);
        registry
    }

    /// Register `factory` under `name`. A later registration for the same
    /// name replaces the earlier one.
    pub fn register(&mut self, name: impl Into<String>, factory: DriverFactoryFn) -> &mut Self {
        let name = name.into();
        if self.factories.insert(name.clone(), factory).is_some() {
            tracing::debug!(driver = %name, "Replaced driver factory");
        }
        self
    }

    /// Look up the factory for `name`.
    ///
    /// # Errors
    /// `UnknownDriver` listing the registered names if `name` is missing.
    pub fn resolve(&self, name: &str) -> NetvolResult<DriverFactoryFn> {
        self.factories.get(name).copied().ok_or_else(|| {
            NetvolError::UnknownDriver(format!(
                "driver {} is not registered. Available drivers: {:?}",
                name,
                self.available()
            ))
        })
    }

    /// Resolve `name` and build a driver for `root` with `options`.
    pub fn create(
        &self,
        name: &str,
        root: impl Into<PathBuf>,
        options: &str,
    ) -> NetvolResult<Box<dyn VolumeDriver>> {
        let factory = self.resolve(name)?;
        let ctx = DriverContext::new(name, root, options);
        tracing::debug!(driver = %name, root = %ctx.root.display(), "Creating driver instance");
        factory(ctx)
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered driver names, sorted.
    pub fn available(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn failing_factory(_ctx: DriverContext) -> NetvolResult<Box<dyn VolumeDriver>> {
        Err(NetvolError::Config("always fails".into()))
    }

    #[test]
    fn test_builtin_drivers_registered() {
        let registry = DriverRegistry::builtin();
        assert!(registry.is_registered("nfs"));
        assert!(registry.is_registered("mock"));
        assert_eq!(registry.available(), vec!["mock", "nfs"]);
    }

    #[test]
    fn test_unknown_driver() {
        let registry = DriverRegistry::builtin();
        let err = registry
            .create("invalid-driver", "/tmp/netvol-unused", "")
            .err()
            .unwrap();
        assert!(matches!(err, NetvolError::UnknownDriver(_)));
        assert!(err.to_string().contains("invalid-driver"));
        assert!(err.to_string().contains("mock"));
    }

    #[test]
    fn test_empty_registry_resolves_nothing() {
        let registry = DriverRegistry::new();
        assert!(registry.available().is_empty());
        assert!(matches!(
            registry.resolve("nfs"),
            Err(NetvolError::UnknownDriver(_))
        ));
    }

    #[test]
    fn test_last_registration_wins() {
        let temp_dir = TempDir::new().unwrap();
        let mut registry = DriverRegistry::builtin();
        registry.register("mock", failing_factory);

        let err = registry.create("mock", temp_dir.path(), "").err().unwrap();
        assert!(matches!(err, NetvolError::Config(_)));

        registry.register("mock", mock::factory);
        let driver = registry.create("mock", temp_dir.path(), "").unwrap();
        assert_eq!(driver.kind(), "mock");
    }

    #[test]
    fn test_create_mock_driver() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("mock-mountpoint");
        let driver = DriverRegistry::builtin()
            .create("mock", &root, "")
            .unwrap();

        assert_eq!(driver.root(), root);
        assert!(root.is_dir());
        driver.destroy().unwrap();
    }
}
