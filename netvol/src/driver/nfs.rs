//! Registry-backed driver for volumes on a shared NFS export.
//!
//! The export is mounted at the storage root when the driver is built.
//! Each volume lives in `<root>/<name>/_data` and its record is kept in
//! the root's registry database, so any host mounting the same export
//! sees the same volumes.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use netvol_shared::constants::drivers;
use netvol_shared::errors::{NetvolError, NetvolResult};

use super::options::NfsOptions;
use super::{DriverContext, OpGate, VolumeDriver, create_data_dir, purge_dir};
use crate::layout::{StorageLayout, validate_volume_name};
use crate::mount::{MountBootstrap, NfsMounter, NoopMounter};
use crate::store::RegistryStore;
use crate::volumes::{VolumeMetadata, VolumeSpec};

/// Factory registered as `"nfs"`.
pub fn factory(ctx: DriverContext) -> NetvolResult<Box<dyn VolumeDriver>> {
    Ok(Box::new(NfsDriver::new(ctx)?))
}

pub struct NfsDriver {
    span: tracing::Span,
    opts: NfsOptions,
    layout: StorageLayout,
    store: RegistryStore,
    mounter: Box<dyn MountBootstrap>,
    owns_mount: bool,
    gate: OpGate<()>,
}

impl NfsDriver {
    /// Build the driver from its context, choosing the real or the no-op
    /// mounter from the options.
    pub fn new(ctx: DriverContext) -> NetvolResult<Self> {
        let opts = NfsOptions::parse(&ctx.options)?;
        let mounter: Box<dyn MountBootstrap> = if opts.is_mock() {
            Box::new(NoopMounter)
        } else {
            Box::new(NfsMounter)
        };
        Self::with_mounter(ctx, opts, mounter)
    }

    /// Build the driver with an explicit mount bootstrap.
    ///
    /// If anything fails after the share was mounted, the mount is undone
    /// before the error is returned.
    pub fn with_mounter(
        ctx: DriverContext,
        opts: NfsOptions,
        mounter: Box<dyn MountBootstrap>,
    ) -> NetvolResult<Self> {
        let span = ctx.span.clone();
        let _enter = span.enter();

        let layout = StorageLayout::new(ctx.root);
        layout.prepare()?;

        let outcome = mounter.mount(
            &opts.address,
            &opts.remote_path,
            layout.root(),
            &opts.mount_options,
        )?;
        let owns_mount = outcome.owns_mount();

        let store = match RegistryStore::open(&layout, opts.lock_timeout()) {
            Ok(store) => store,
            Err(e) => {
                if owns_mount && let Err(unmount_err) = mounter.unmount(layout.root()) {
                    tracing::warn!(
                        error = %unmount_err,
                        "Failed to undo share mount after startup failure"
                    );
                }
                return Err(e);
            }
        };

        tracing::info!(
            root = %layout.root().display(),
            mount = ?outcome,
            "nfs driver ready"
        );

        drop(_enter);
        Ok(Self {
            span,
            opts,
            layout,
            store,
            mounter,
            owns_mount,
            gate: OpGate::new(()),
        })
    }

    pub fn options(&self) -> &NfsOptions {
        &self.opts
    }

    fn defaults(&self) -> VolumeSpec {
        self.opts.volume_defaults()
    }
}

impl VolumeDriver for NfsDriver {
    fn kind(&self) -> &str {
        drivers::NFS
    }

    fn root(&self) -> &Path {
        self.layout.root()
    }

    fn create(&self, name: &str, options: &HashMap<String, String>) -> NetvolResult<()> {
        let _enter = self.span.enter();
        let _gate = self.gate.enter()?;

        validate_volume_name(name)?;
        let spec = VolumeSpec::from_options(self.defaults(), options)?;

        tracing::info!(volume = %name, ?spec, "Creating volume");

        // Directory made by the initializer, undone if the record never lands.
        let mut created_dir = None;
        let result = self.store.create_record(name, || {
            let metadata = VolumeMetadata::new(StorageLayout::data_mountpoint(name), spec);
            let data_dir = self.layout.resolve(&metadata.mountpoint);
            let new_dir = first_missing(&self.layout.volume_dir(name), &data_dir);
            create_data_dir(&data_dir)?;
            created_dir = new_dir;
            Ok(metadata)
        });

        if result.is_err()
            && let Some(dir) = created_dir
        {
            if let Err(e) = purge_dir(&dir) {
                tracing::warn!(
                    volume = %name,
                    dir = %dir.display(),
                    error = %e,
                    "Failed to clean up volume directory after failed create"
                );
            }
        }
        result
    }

    fn list(&self) -> NetvolResult<BTreeMap<String, VolumeMetadata>> {
        let _enter = self.span.enter();
        let _gate = self.gate.enter()?;

        let volumes = self.store.list_records()?;
        tracing::debug!(count = volumes.len(), "Listed volumes");
        Ok(volumes)
    }

    fn get(&self, name: &str) -> NetvolResult<VolumeMetadata> {
        let _enter = self.span.enter();
        let _gate = self.gate.enter()?;

        tracing::debug!(volume = %name, "Getting volume");
        self.store.get_record(name)
    }

    fn remove(&self, name: &str) -> NetvolResult<()> {
        let _enter = self.span.enter();
        let _gate = self.gate.enter()?;

        tracing::info!(volume = %name, "Removing volume");

        self.store.delete_record(name, |metadata| {
            metadata.ensure_removable(name)?;
            if metadata.spec.purge_after_delete {
                let dir = self.layout.volume_dir(name);
                tracing::info!(volume = %name, dir = %dir.display(), "Purging volume data");
                purge_dir(&dir)?;
            }
            Ok(())
        })?;
        Ok(())
    }

    fn path(&self, name: &str) -> NetvolResult<PathBuf> {
        let _enter = self.span.enter();
        let _gate = self.gate.enter()?;

        tracing::debug!(volume = %name, "Resolving volume path");
        Ok(self.store.get_record(name)?.mountpoint)
    }

    fn mount(&self, name: &str, id: &str) -> NetvolResult<PathBuf> {
        let _enter = self.span.enter();
        let _gate = self.gate.enter()?;

        tracing::info!(volume = %name, mounter = %id, "Mounting volume");

        self.store.mutate_record(name, |metadata| {
            metadata.mount(name, id)?;
            Ok(metadata.mountpoint.clone())
        })
    }

    fn unmount(&self, name: &str, id: &str) -> NetvolResult<()> {
        let _enter = self.span.enter();
        let _gate = self.gate.enter()?;

        tracing::info!(volume = %name, mounter = %id, "Unmounting volume");

        self.store.mutate_record(name, |metadata| {
            if !metadata.unmount(id) {
                tracing::debug!(
                    volume = %name,
                    mounter = %id,
                    "Mounter does not hold the volume, nothing to unmount"
                );
            }
            Ok(())
        })
    }

    fn destroy(&self) -> NetvolResult<()> {
        let _enter = self.span.enter();
        let Some(_gate) = self.gate.shutdown() else {
            tracing::debug!("nfs driver already destroyed");
            return Ok(());
        };

        if let Err(e) = self.store.close() {
            tracing::warn!(error = %e, "Failed to close registry store");
        }

        if self.owns_mount {
            self.mounter.unmount(self.layout.root()).map_err(|e| {
                NetvolError::Mount(format!(
                    "failed to unmount storage root {}: {}",
                    self.layout.root().display(),
                    e
                ))
            })?;
        }

        tracing::info!("nfs driver destroyed");
        Ok(())
    }
}

/// Outermost of `volume_dir` and `data_dir` that does not exist yet.
fn first_missing(volume_dir: &Path, data_dir: &Path) -> Option<PathBuf> {
    if !volume_dir.exists() {
        Some(volume_dir.to_path_buf())
    } else if !data_dir.exists() {
        Some(data_dir.to_path_buf())
    } else {
        None
    }
}
