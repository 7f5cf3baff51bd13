use chrono::{DateTime, Utc};
use netvol_shared::errors::{NetvolError, NetvolResult};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

use super::{VolumeSpec, VolumeStatus};

/// Persisted state of one volume.
///
/// Stored as JSON, keyed by volume name. `mountpoint` and `created_at` are
/// set once by create and never change afterwards; only `status` is mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeMetadata {
    /// Volume data location, relative to the storage root.
    pub mountpoint: PathBuf,

    // Older records were written with "createAt".
    #[serde(alias = "createAt")]
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub spec: VolumeSpec,

    #[serde(default)]
    pub status: VolumeStatus,
}

impl VolumeMetadata {
    /// Fresh, unmounted record created now.
    pub fn new(mountpoint: impl Into<PathBuf>, spec: VolumeSpec) -> Self {
        Self {
            mountpoint: mountpoint.into(),
            created_at: Utc::now(),
            spec,
            status: VolumeStatus::default(),
        }
    }

    /// Check the record is usable: the mountpoint must be a non-empty
    /// relative path that stays under the storage root.
    pub fn validate(&self) -> NetvolResult<()> {
        if self.mountpoint.as_os_str().is_empty() {
            return Err(NetvolError::Corrupted("mountpoint is empty".into()));
        }
        let escapes = self
            .mountpoint
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if escapes {
            return Err(NetvolError::Corrupted(format!(
                "mountpoint {} is not relative to the storage root",
                self.mountpoint.display()
            )));
        }
        Ok(())
    }

    /// Validate and serialize for storage.
    pub fn encode(&self) -> NetvolResult<Vec<u8>> {
        self.validate()?;
        serde_json::to_vec(self).map_err(|e| {
            NetvolError::Internal(format!("failed to marshal volume metadata: {}", e))
        })
    }

    /// Deserialize and validate a stored value.
    pub fn decode(data: &[u8]) -> NetvolResult<Self> {
        let metadata: Self = serde_json::from_slice(data).map_err(|e| {
            NetvolError::Corrupted(format!("failed to unmarshal volume metadata: {}", e))
        })?;
        metadata.validate()?;
        Ok(metadata)
    }

    pub fn mountpoint(&self) -> &Path {
        &self.mountpoint
    }

    /// Add `id` as a mounter, enforcing the mount exclusivity policy.
    ///
    /// Fails with `AlreadyMounted` if `id` already holds the volume, or if
    /// someone else does and multiple mounts are not allowed.
    pub fn mount(&mut self, name: &str, id: &str) -> NetvolResult<()> {
        if self.status.is_mounted_by(id) {
            return Err(NetvolError::AlreadyMounted(format!(
                "volume {} is already mounted by {}",
                name, id
            )));
        }
        if self.status.is_mounted() && !self.spec.allow_multiple_mount {
            return Err(NetvolError::AlreadyMounted(format!(
                "volume {} is already mounted by {}",
                name,
                self.status.mounters().join(", ")
            )));
        }
        self.status.add_mount(id);
        Ok(())
    }

    /// Drop `id` as a mounter. Returns whether it was mounted.
    ///
    /// Unmounting an ID that does not hold the volume is not an error.
    pub fn unmount(&mut self, id: &str) -> bool {
        self.status.remove_mount(id)
    }

    /// Refuse removal while any mounter holds the volume.
    pub fn ensure_removable(&self, name: &str) -> NetvolResult<()> {
        if self.status.is_mounted() {
            return Err(NetvolError::InUse(format!(
                "volume {} is mounted by {}, unmount it before removing",
                name,
                self.status.mounters().join(", ")
            )));
        }
        Ok(())
    }
}
