use netvol_shared::constants::files;
use netvol_shared::errors::{NetvolError, NetvolResult};
use std::path::{Path, PathBuf};

// ============================================================================
// STORAGE LAYOUT (storage root)
// ============================================================================

/// On-disk layout of a storage root.
///
/// ```text
/// <root>/
///   metadata.db          registry database
///   metadata.db.lock     advisory lock file
///   <volume>/_data/      volume data (nfs backend)
/// ```
#[derive(Clone, Debug)]
pub struct StorageLayout {
    root: PathBuf,
}

impl StorageLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn registry_db_path(&self) -> PathBuf {
        self.root.join(files::REGISTRY_DB)
    }

    pub fn registry_lock_path(&self) -> PathBuf {
        self.root.join(files::REGISTRY_LOCK)
    }

    /// Directory owning everything that belongs to a volume: `<root>/<name>`.
    ///
    /// This is what gets purged on removal.
    pub fn volume_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Mountpoint of a volume relative to the root: `<name>/_data`.
    pub fn data_mountpoint(name: &str) -> PathBuf {
        Path::new(name).join(files::VOLUME_DATA_DIR)
    }

    /// Resolve a relative mountpoint against the root.
    pub fn resolve(&self, mountpoint: &Path) -> PathBuf {
        self.root.join(mountpoint)
    }

    /// Create the root directory if missing.
    pub fn prepare(&self) -> NetvolResult<()> {
        std::fs::create_dir_all(&self.root).map_err(|e| {
            NetvolError::Io(format!(
                "failed to create storage root {}: {}",
                self.root.display(),
                e
            ))
        })
    }
}

/// Whether `name` collides with a file the registry keeps in the root.
pub fn is_reserved(name: &str) -> bool {
    files::RESERVED.contains(&name)
}

/// Check that `name` can be used as a volume name.
///
/// A name must be a single path component so that `<root>/<name>` never
/// escapes the storage root, and must not shadow a registry file.
pub fn validate_volume_name(name: &str) -> NetvolResult<()> {
    if name.is_empty() {
        return Err(NetvolError::InvalidArgument(
            "volume name must not be empty".into(),
        ));
    }
    if name == "." || name == ".." || name.contains('/') || name.contains('\0') {
        return Err(NetvolError::InvalidArgument(format!(
            "volume name {:?} is not a valid path component",
            name
        )));
    }
    if is_reserved(name) {
        return Err(NetvolError::InvalidArgument(format!(
            "volume name {} is reserved, please choose a different name",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths() {
        let layout = StorageLayout::new("/srv/volumes");
        assert_eq!(
            layout.registry_db_path(),
            PathBuf::from("/srv/volumes/metadata.db")
        );
        assert_eq!(
            layout.registry_lock_path(),
            PathBuf::from("/srv/volumes/metadata.db.lock")
        );
        assert_eq!(layout.volume_dir("data"), PathBuf::from("/srv/volumes/data"));
        assert_eq!(
            StorageLayout::data_mountpoint("data"),
            PathBuf::from("data/_data")
        );
        assert_eq!(
            layout.resolve(Path::new("data/_data")),
            PathBuf::from("/srv/volumes/data/_data")
        );
    }

    #[test]
    fn test_reserved_names_rejected() {
        for name in files::RESERVED {
            let err = validate_volume_name(name).unwrap_err();
            assert!(matches!(err, NetvolError::InvalidArgument(_)));
            assert!(err.to_string().contains("reserved"));
        }
    }

    #[test]
    fn test_unsafe_names_rejected() {
        for name in ["", ".", "..", "a/b", "../escape", "nul\0byte"] {
            assert!(
                matches!(
                    validate_volume_name(name),
                    Err(NetvolError::InvalidArgument(_))
                ),
                "{:?} should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_ordinary_names_accepted() {
        for name in ["data", "pg-15", "cache_v2", "metadata", "metadata.db.bak"] {
            validate_volume_name(name).unwrap();
        }
    }
}
