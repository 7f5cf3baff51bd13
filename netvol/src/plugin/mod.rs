//! Volume plugin adapter.
//!
//! Maps plugin protocol requests onto [`VolumeDriver`] calls. Driver errors
//! become the protocol's `Err` string and relative mountpoints are joined
//! with the plugin's mountpoint base to give absolute host paths.

pub mod types;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, SecondsFormat, Utc};
use netvol_shared::errors::{NetvolError, NetvolResult};

use crate::driver::VolumeDriver;
use crate::volumes::VolumeMetadata;
use types::*;

pub struct VolumePlugin {
    driver: Box<dyn VolumeDriver>,
    mountpoint_base: PathBuf,
    scope: Scope,
}

impl VolumePlugin {
    /// Wrap `driver`, reporting mountpoints under the driver's own root.
    pub fn new(driver: Box<dyn VolumeDriver>) -> Self {
        let mountpoint_base = driver.root().to_path_buf();
        Self {
            driver,
            mountpoint_base,
            scope: Scope::Local,
        }
    }

    /// Report mountpoints under `base` instead of the driver root.
    pub fn with_mountpoint_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.mountpoint_base = base.into();
        self
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn driver(&self) -> &dyn VolumeDriver {
        self.driver.as_ref()
    }

    /// Create a volume. The orchestrator re-sends create for volumes it
    /// already knows, so an existing name is reported as success.
    pub fn create(&self, req: &CreateRequest) -> ErrorResponse {
        let opts = req.opts.clone().unwrap_or_default();
        match self.driver.create(&req.name, &opts) {
            Ok(()) => ErrorResponse::default(),
            Err(NetvolError::AlreadyExists(_)) => {
                tracing::info!(volume = %req.name, "Volume already exists, skipping creation");
                ErrorResponse::default()
            }
            Err(e) => self.error("create", &req.name, e),
        }
    }

    pub fn list(&self) -> ListResponse {
        match self.driver.list() {
            Ok(volumes) => {
                let volumes: Vec<Volume> = volumes
                    .iter()
                    .map(|(name, metadata)| self.to_volume(name, metadata))
                    .collect();
                tracing::info!(count = volumes.len(), "Found volumes");
                ListResponse {
                    volumes,
                    err: String::new(),
                }
            }
            Err(e) => ListResponse {
                volumes: Vec::new(),
                err: self.error("list", "*", e).err,
            },
        }
    }

    pub fn get(&self, req: &NameRequest) -> GetResponse {
        match self.driver.get(&req.name) {
            Ok(metadata) => GetResponse {
                volume: Some(self.to_volume(&req.name, &metadata)),
                err: String::new(),
            },
            Err(e) => GetResponse {
                volume: None,
                err: self.error("get", &req.name, e).err,
            },
        }
    }

    pub fn remove(&self, req: &NameRequest) -> ErrorResponse {
        match self.driver.remove(&req.name) {
            Ok(()) => ErrorResponse::default(),
            Err(e) => self.error("remove", &req.name, e),
        }
    }

    pub fn path(&self, req: &NameRequest) -> MountResponse {
        self.mount_response("path", &req.name, self.driver.path(&req.name))
    }

    pub fn mount(&self, req: &MountRequest) -> MountResponse {
        self.mount_response("mount", &req.name, self.driver.mount(&req.name, &req.id))
    }

    pub fn unmount(&self, req: &MountRequest) -> ErrorResponse {
        match self.driver.unmount(&req.name, &req.id) {
            Ok(()) => ErrorResponse::default(),
            Err(e) => self.error("unmount", &req.name, e),
        }
    }

    pub fn capabilities(&self) -> CapabilitiesResponse {
        CapabilitiesResponse {
            capabilities: Capability { scope: self.scope },
        }
    }

    /// Tear down the wrapped driver.
    pub fn destroy(&self) -> NetvolResult<()> {
        self.driver.destroy()
    }

    /// Absolute host path for a driver-relative mountpoint.
    pub fn absolute(&self, mountpoint: &Path) -> PathBuf {
        self.mountpoint_base.join(mountpoint)
    }

    fn mount_response(
        &self,
        op: &str,
        name: &str,
        result: NetvolResult<PathBuf>,
    ) -> MountResponse {
        match result {
            Ok(mountpoint) => MountResponse {
                mountpoint: self.absolute(&mountpoint).to_string_lossy().into_owned(),
                err: String::new(),
            },
            Err(e) => MountResponse {
                mountpoint: String::new(),
                err: self.error(op, name, e).err,
            },
        }
    }

    fn to_volume(&self, name: &str, metadata: &VolumeMetadata) -> Volume {
        let mut status = serde_json::Map::new();
        status.insert(
            "mountBy".to_string(),
            serde_json::Value::from(metadata.status.mounters()),
        );

        Volume {
            name: name.to_string(),
            mountpoint: self
                .absolute(&metadata.mountpoint)
                .to_string_lossy()
                .into_owned(),
            created_at: format_created_at(metadata.created_at),
            status,
        }
    }

    fn error(&self, op: &str, name: &str, err: NetvolError) -> ErrorResponse {
        tracing::error!(volume = %name, error = %err, "Failed to {} volume", op);
        ErrorResponse {
            err: err.to_string(),
        }
    }
}

fn format_created_at(created_at: DateTime<Utc>) -> String {
    created_at
        .with_timezone(&Local)
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Options map for a create request, for callers building requests by hand.
pub fn create_request(name: &str, opts: &[(&str, &str)]) -> CreateRequest {
    let opts: HashMap<String, String> = opts
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    CreateRequest {
        name: name.to_string(),
        opts: Some(opts),
    }
}
