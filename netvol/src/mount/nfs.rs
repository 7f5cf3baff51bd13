use std::path::Path;
use std::process::Command;

use netvol_shared::errors::{NetvolError, NetvolResult};

use super::{MountBootstrap, MountOutcome, is_mounted};

/// Mounts an NFS export with the system `mount`/`umount` utilities.
#[derive(Debug, Default, Clone, Copy)]
pub struct NfsMounter;

impl NfsMounter {
    /// Arguments for `mount`, without the program name.
    fn mount_args(
        address: &str,
        remote_path: &str,
        local_root: &Path,
        options: &[String],
    ) -> Vec<String> {
        let options = if options.is_empty() {
            "defaults".to_string()
        } else {
            options.join(",")
        };

        vec![
            "-t".to_string(),
            "nfs".to_string(),
            "-o".to_string(),
            options,
            format!("{}:{}", address, remote_path),
            local_root.to_string_lossy().to_string(),
        ]
    }
}

impl MountBootstrap for NfsMounter {
    fn mount(
        &self,
        address: &str,
        remote_path: &str,
        local_root: &Path,
        options: &[String],
    ) -> NetvolResult<MountOutcome> {
        if is_mounted(local_root)? {
            tracing::info!(
                local_root = %local_root.display(),
                "Storage root is already a mount point, leaving it in place"
            );
            return Ok(MountOutcome::AlreadyMounted);
        }

        let args = Self::mount_args(address, remote_path, local_root, options);
        tracing::debug!("Mounting NFS share: mount {}", args.join(" "));

        let output = Command::new("mount")
            .args(&args)
            .output()
            .map_err(|e| NetvolError::Mount(format!("failed to execute mount command: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(NetvolError::Mount(format!(
                "failed to mount {}:{} at {}: {}",
                address,
                remote_path,
                local_root.display(),
                stderr.trim()
            )));
        }

        tracing::info!(
            %address,
            %remote_path,
            local_root = %local_root.display(),
            "NFS share mounted"
        );
        Ok(MountOutcome::Mounted)
    }

    fn unmount(&self, local_root: &Path) -> NetvolResult<()> {
        let output = Command::new("umount")
            .arg(local_root)
            .output()
            .map_err(|e| {
                NetvolError::Mount(format!(
                    "failed to execute umount for {}: {}",
                    local_root.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(NetvolError::Mount(format!(
                "failed to unmount {}: {}",
                local_root.display(),
                stderr.trim()
            )));
        }

        tracing::info!(local_root = %local_root.display(), "NFS share unmounted");
        Ok(())
    }
}
