//! Shared fixtures for netvol integration tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use netvol::{DriverRegistry, NetvolResult, VolumeDriver};
use tempfile::TempDir;

/// Lock timeout used by test drivers so contention tests fail fast.
pub const TEST_LOCK_TIMEOUT_MS: u64 = 200;

/// Backend options for an `nfs` driver that never touches a real server.
pub fn mock_nfs_options() -> String {
    mock_nfs_options_with(serde_json::Map::new())
}

/// Mock-mode `nfs` options with extra keys merged in.
pub fn mock_nfs_options_with(extra: serde_json::Map<String, serde_json::Value>) -> String {
    let mut opts = serde_json::Map::new();
    opts.insert("mock".into(), true.into());
    opts.insert("lockTimeoutMs".into(), TEST_LOCK_TIMEOUT_MS.into());
    opts.extend(extra);
    serde_json::Value::Object(opts).to_string()
}

/// Options map for `VolumeDriver::create`.
pub fn volume_options(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// A temporary storage root. Removed when dropped.
pub struct TestRoot {
    pub temp_dir: TempDir,
}

impl TestRoot {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Data directory of `name` under the nfs layout.
    pub fn data_dir(&self, name: &str) -> PathBuf {
        self.path().join(name).join("_data")
    }

    /// Build a driver of `kind` over this root. `nfs` runs in mock mode.
    pub fn driver(&self, kind: &str) -> Box<dyn VolumeDriver> {
        self.try_driver(kind, &default_options(kind))
            .expect("Failed to create driver")
    }

    pub fn try_driver(&self, kind: &str, options: &str) -> NetvolResult<Box<dyn VolumeDriver>> {
        DriverRegistry::builtin().create(kind, self.path(), options)
    }
}

impl Default for TestRoot {
    fn default() -> Self {
        Self::new()
    }
}

fn default_options(kind: &str) -> String {
    match kind {
        "nfs" => mock_nfs_options(),
        _ => String::new(),
    }
}
