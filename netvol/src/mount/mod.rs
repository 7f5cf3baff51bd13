//! Bootstrap mount of the remote share onto the storage root.
//!
//! The driver mounts the share once when it is constructed and unmounts it
//! once when it is destroyed; volumes are plain sub-directories of the root.

mod mountinfo;
mod nfs;

use std::path::Path;

use netvol_shared::errors::NetvolResult;

pub use mountinfo::is_mounted;
pub use nfs::NfsMounter;

/// Result of a bootstrap mount.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MountOutcome {
    /// The share was mounted by this call; the caller owns the mount.
    Mounted,
    /// The root was already a mount point and was left as is.
    AlreadyMounted,
    /// Mounting is disabled (mock configuration).
    Skipped,
}

impl MountOutcome {
    /// Whether the caller must unmount the root on teardown.
    pub fn owns_mount(&self) -> bool {
        matches!(self, MountOutcome::Mounted)
    }
}

/// Mounts and unmounts a remote share at a local root.
pub trait MountBootstrap: Send + Sync {
    fn mount(
        &self,
        address: &str,
        remote_path: &str,
        local_root: &Path,
        options: &[String],
    ) -> NetvolResult<MountOutcome>;

    fn unmount(&self, local_root: &Path) -> NetvolResult<()>;
}

/// Bootstrap that never touches the filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMounter;

impl MountBootstrap for NoopMounter {
    fn mount(
        &self,
        address: &str,
        remote_path: &str,
        local_root: &Path,
        _options: &[String],
    ) -> NetvolResult<MountOutcome> {
        tracing::debug!(
            %address,
            %remote_path,
            local_root = %local_root.display(),
            "Skipping share mount"
        );
        Ok(MountOutcome::Skipped)
    }

    fn unmount(&self, _local_root: &Path) -> NetvolResult<()> {
        Ok(())
    }
}
