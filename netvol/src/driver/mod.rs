//! Volume drivers: the lifecycle state machine over the registry.
//!
//! Per volume:
//! ```text
//! absent → created (unmounted) ⇄ created (mounted by 1..N) → removed
//! ```
//! `removed` ends a record; the same name may be created again afterwards.
//!
//! Backends implement [`VolumeDriver`] and are constructed through the
//! [`DriverRegistry`](registry::DriverRegistry).

pub mod mock;
pub mod nfs;
pub mod options;
pub mod registry;

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use netvol_shared::errors::{NetvolError, NetvolResult};
use parking_lot::{Mutex, MutexGuard};

use crate::volumes::VolumeMetadata;

/// Lifecycle operations every backend provides.
///
/// All operations are blocking and serialized per driver instance. Mount
/// and path results are relative to the driver's storage root.
pub trait VolumeDriver: Send + Sync {
    /// Registered driver kind (e.g. "nfs").
    fn kind(&self) -> &str;

    /// Storage root that relative mountpoints are resolved against.
    fn root(&self) -> &Path;

    /// Create a volume. Not idempotent: a live name is `AlreadyExists`.
    fn create(&self, name: &str, options: &HashMap<String, String>) -> NetvolResult<()>;

    /// All live volumes by name. Lock contention yields an empty map.
    fn list(&self) -> NetvolResult<BTreeMap<String, VolumeMetadata>>;

    fn get(&self, name: &str) -> NetvolResult<VolumeMetadata>;

    /// Remove a volume that nobody holds mounted.
    fn remove(&self, name: &str) -> NetvolResult<()>;

    /// Mountpoint of a volume, mounted or not.
    fn path(&self, name: &str) -> NetvolResult<PathBuf>;

    /// Register `id` as a mounter and return the mountpoint.
    fn mount(&self, name: &str, id: &str) -> NetvolResult<PathBuf>;

    /// Drop `id` as a mounter. Unknown IDs are ignored.
    fn unmount(&self, name: &str, id: &str) -> NetvolResult<()>;

    /// Release driver resources. Later operations fail with `ShuttingDown`.
    fn destroy(&self) -> NetvolResult<()>;
}

/// Everything a driver factory receives.
#[derive(Debug, Clone)]
pub struct DriverContext {
    /// Driver kind the factory was resolved under.
    pub service: String,
    /// Storage root the driver manages.
    pub root: PathBuf,
    /// Opaque backend options (JSON for the nfs backend).
    pub options: String,
    /// Span the driver logs under.
    pub span: tracing::Span,
}

impl DriverContext {
    pub fn new(service: &str, root: impl Into<PathBuf>, options: impl Into<String>) -> Self {
        let root = root.into();
        let span = tracing::info_span!("driver", service = %service, root = %root.display());
        Self {
            service: service.to_string(),
            root,
            options: options.into(),
            span,
        }
    }
}

/// Exclusive gate around driver state.
///
/// Every operation runs with the gate held, start to finish. Once shutdown
/// has begun the gate refuses entry.
#[derive(Debug, Default)]
pub(crate) struct OpGate<T> {
    state: Mutex<T>,
    shutting_down: AtomicBool,
}

impl<T> OpGate<T> {
    pub(crate) fn new(state: T) -> Self {
        Self {
            state: Mutex::new(state),
            shutting_down: AtomicBool::new(false),
        }
    }

    pub(crate) fn enter(&self) -> NetvolResult<MutexGuard<'_, T>> {
        let guard = self.state.lock();
        if self.shutting_down.load(Ordering::Acquire) {
            return Err(NetvolError::ShuttingDown);
        }
        Ok(guard)
    }

    /// Flip into shutdown. Returns the gate only to the first caller.
    pub(crate) fn shutdown(&self) -> Option<MutexGuard<'_, T>> {
        let guard = self.state.lock();
        if self.shutting_down.swap(true, Ordering::AcqRel) {
            return None;
        }
        Some(guard)
    }
}

/// Remove a volume directory, treating an already missing one as done.
pub(crate) fn purge_dir(dir: &Path) -> NetvolResult<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(NetvolError::Io(format!(
            "failed to remove volume data {}: {}",
            dir.display(),
            e
        ))),
    }
}

/// Create a volume data directory.
pub(crate) fn create_data_dir(dir: &Path) -> NetvolResult<()> {
    std::fs::create_dir_all(dir).map_err(|e| {
        NetvolError::Io(format!(
            "failed to create volume directory {}: {}",
            dir.display(),
            e
        ))
    })
}
