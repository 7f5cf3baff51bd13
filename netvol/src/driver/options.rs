//! Backend options for the nfs driver.

use std::time::Duration;

use netvol_shared::constants::{DEFAULT_LOCK_TIMEOUT_MS, MOCK_NFS_ADDRESS};
use netvol_shared::errors::{NetvolError, NetvolResult};
use serde::{Deserialize, Serialize};

use crate::volumes::VolumeSpec;

/// nfs driver configuration, passed as a JSON string.
///
/// ```json
/// {
///   "address": "10.0.0.5",
///   "remotePath": "/exports/volumes",
///   "mountOptions": ["nfsvers=4", "rw"],
///   "purgeAfterDelete": false,
///   "allowMultipleMount": false
/// }
/// ```
///
/// Unknown keys are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NfsOptions {
    /// NFS server address.
    #[serde(default)]
    pub address: String,

    /// Exported path on the server.
    #[serde(default)]
    pub remote_path: String,

    /// Options for `mount -o`. An empty list mounts with `defaults`.
    #[serde(default = "default_mount_options")]
    pub mount_options: Vec<String>,

    /// Default for volumes created without `purgeAfterDelete`.
    #[serde(default)]
    pub purge_after_delete: bool,

    /// Default for volumes created without `allowMultipleMount`.
    #[serde(default)]
    pub allow_multiple_mount: bool,

    /// Skip mounting the share; the storage root is used as is.
    #[serde(default)]
    pub mock: bool,

    /// How long a registry call waits for the cross-process lock.
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

fn default_mount_options() -> Vec<String> {
    [
        "nfsvers=4",
        "rw",
        "noatime",
        "rsize=8192",
        "wsize=8192",
        "tcp",
        "timeo=14",
        "sync",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MS
}

impl Default for NfsOptions {
    fn default() -> Self {
        Self {
            address: String::new(),
            remote_path: String::new(),
            mount_options: default_mount_options(),
            purge_after_delete: false,
            allow_multiple_mount: false,
            mock: false,
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

impl NfsOptions {
    /// Parse and validate driver options. An empty string means `{}`.
    pub fn parse(raw: &str) -> NetvolResult<Self> {
        let raw = raw.trim();
        let opts: Self = if raw.is_empty() {
            Self::default()
        } else {
            serde_json::from_str(raw)
                .map_err(|e| NetvolError::Config(format!("failed to parse driver options: {}", e)))?
        };
        opts.validate()?;
        Ok(opts)
    }

    fn validate(&self) -> NetvolResult<()> {
        if self.is_mock() {
            return Ok(());
        }
        if self.address.is_empty() {
            return Err(NetvolError::Config("nfs driver requires an address".into()));
        }
        if self.remote_path.is_empty() {
            return Err(NetvolError::Config(
                "nfs driver requires a remotePath".into(),
            ));
        }
        Ok(())
    }

    /// Whether the share mount should be skipped.
    pub fn is_mock(&self) -> bool {
        self.mock || self.address == MOCK_NFS_ADDRESS
    }

    /// Policy applied to volumes whose create options leave it unset.
    pub fn volume_defaults(&self) -> VolumeSpec {
        VolumeSpec {
            purge_after_delete: self.purge_after_delete,
            allow_multiple_mount: self.allow_multiple_mount,
        }
    }

    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }
}
