#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

pub const MOCK_NFS_OPTIONS: &str = r#"{"mock":true,"lockTimeoutMs":2000}"#;

pub struct TestContext {
    pub cmd: Command,
    pub root: TempDir,
}

impl TestContext {
    /// Command against the same storage root.
    pub fn new_cmd(&self) -> Command {
        command_for(self.root.path())
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn data_dir(&self, name: &str) -> PathBuf {
        self.root.path().join(name).join("_data")
    }
}

/// Command with no configuration flags and a clean environment.
pub fn bare_cmd() -> Command {
    let bin_path = env!("CARGO_BIN_EXE_netvol");
    let mut cmd = Command::new(bin_path);
    cmd.timeout(Duration::from_secs(30));
    for var in ["NETVOL_ROOT", "DRIVER", "DRIVER_OPTIONS", "LOG_LEVEL", "RUST_LOG"] {
        cmd.env_remove(var);
    }
    cmd
}

fn command_for(root: &Path) -> Command {
    let mut cmd = bare_cmd();
    cmd.arg("--root")
        .arg(root)
        .args(["--driver", "nfs", "--driver-options", MOCK_NFS_OPTIONS]);
    cmd
}

/// Fresh storage root with a command pointed at it.
pub fn netvol() -> TestContext {
    let root = TempDir::new().expect("Failed to create temp dir");
    TestContext {
        cmd: command_for(root.path()),
        root,
    }
}
