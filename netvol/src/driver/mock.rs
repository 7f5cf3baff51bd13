//! In-memory driver for tests and local experiments.
//!
//! Same policy as the nfs driver (exclusive mounts, purge on delete,
//! reserved names), but records live only as long as the driver.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use netvol_shared::constants::drivers;
use netvol_shared::errors::{NetvolError, NetvolResult};

use super::{DriverContext, OpGate, VolumeDriver, create_data_dir, purge_dir};
use crate::layout::{StorageLayout, validate_volume_name};
use crate::volumes::{VolumeMetadata, VolumeSpec};

/// Factory registered as `"mock"`. Options are ignored.
pub fn factory(ctx: DriverContext) -> NetvolResult<Box<dyn VolumeDriver>> {
    Ok(Box::new(MockDriver::new(ctx)?))
}

pub struct MockDriver {
    span: tracing::Span,
    layout: StorageLayout,
    volumes: OpGate<BTreeMap<String, VolumeMetadata>>,
}

impl MockDriver {
    pub fn new(ctx: DriverContext) -> NetvolResult<Self> {
        let layout = StorageLayout::new(ctx.root);
        layout.prepare()?;

        Ok(Self {
            span: ctx.span,
            layout,
            volumes: OpGate::new(BTreeMap::new()),
        })
    }
}

fn not_found(name: &str) -> NetvolError {
    NetvolError::NotFound(format!("volume {}", name))
}

impl VolumeDriver for MockDriver {
    fn kind(&self) -> &str {
        drivers::MOCK
    }

    fn root(&self) -> &Path {
        self.layout.root()
    }

    fn create(&self, name: &str, options: &HashMap<String, String>) -> NetvolResult<()> {
        let _enter = self.span.enter();
        let mut volumes = self.volumes.enter()?;

        validate_volume_name(name)?;
        let spec = VolumeSpec::from_options(VolumeSpec::default(), options)?;

        if volumes.contains_key(name) {
            return Err(NetvolError::AlreadyExists(format!("volume {}", name)));
        }

        let metadata = VolumeMetadata::new(name, spec);
        create_data_dir(&self.layout.resolve(&metadata.mountpoint))?;

        tracing::info!(volume = %name, ?spec, "Created volume");
        volumes.insert(name.to_string(), metadata);
        Ok(())
    }

    fn list(&self) -> NetvolResult<BTreeMap<String, VolumeMetadata>> {
        let _enter = self.span.enter();
        let volumes = self.volumes.enter()?;
        Ok(volumes.clone())
    }

    fn get(&self, name: &str) -> NetvolResult<VolumeMetadata> {
        let _enter = self.span.enter();
        let volumes = self.volumes.enter()?;
        volumes.get(name).cloned().ok_or_else(|| not_found(name))
    }

    fn remove(&self, name: &str) -> NetvolResult<()> {
        let _enter = self.span.enter();
        let mut volumes = self.volumes.enter()?;

        let metadata = volumes.get(name).ok_or_else(|| not_found(name))?;
        metadata.ensure_removable(name)?;
        if metadata.spec.purge_after_delete {
            purge_dir(&self.layout.volume_dir(name))?;
        }

        volumes.remove(name);
        tracing::info!(volume = %name, "Removed volume");
        Ok(())
    }

    fn path(&self, name: &str) -> NetvolResult<PathBuf> {
        let _enter = self.span.enter();
        let volumes = self.volumes.enter()?;
        volumes
            .get(name)
            .map(|m| m.mountpoint.clone())
            .ok_or_else(|| not_found(name))
    }

    fn mount(&self, name: &str, id: &str) -> NetvolResult<PathBuf> {
        let _enter = self.span.enter();
        let mut volumes = self.volumes.enter()?;

        let metadata = volumes.get_mut(name).ok_or_else(|| not_found(name))?;
        metadata.mount(name, id)?;
        tracing::info!(volume = %name, mounter = %id, "Mounted volume");
        Ok(metadata.mountpoint.clone())
    }

    fn unmount(&self, name: &str, id: &str) -> NetvolResult<()> {
        let _enter = self.span.enter();
        let mut volumes = self.volumes.enter()?;

        let metadata = volumes.get_mut(name).ok_or_else(|| not_found(name))?;
        if metadata.unmount(id) {
            tracing::info!(volume = %name, mounter = %id, "Unmounted volume");
        }
        Ok(())
    }

    fn destroy(&self) -> NetvolResult<()> {
        let _enter = self.span.enter();
        if let Some(mut volumes) = self.volumes.shutdown() {
            tracing::debug!(count = volumes.len(), "Dropping in-memory volumes");
            volumes.clear();
        }
        Ok(())
    }
}
