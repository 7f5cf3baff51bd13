//! On-disk names and defaults shared between the registry and its callers.

/// File names inside a storage root.
pub mod files {
    /// Embedded registry database.
    pub const REGISTRY_DB: &str = "metadata.db";

    /// Advisory lock guarding the registry database across processes.
    pub const REGISTRY_LOCK: &str = "metadata.db.lock";

    /// Companion files SQLite may create next to the registry database.
    pub const REGISTRY_JOURNAL: &str = "metadata.db-journal";
    pub const REGISTRY_WAL: &str = "metadata.db-wal";
    pub const REGISTRY_SHM: &str = "metadata.db-shm";

    /// Names a volume may not take because the registry owns them.
    pub const RESERVED: &[&str] = &[
        REGISTRY_DB,
        REGISTRY_LOCK,
        REGISTRY_JOURNAL,
        REGISTRY_WAL,
        REGISTRY_SHM,
    ];

    /// Subdirectory of a volume directory holding the volume's data.
    pub const VOLUME_DATA_DIR: &str = "_data";
}

/// Volume option keys accepted on create.
pub mod options {
    pub const PURGE_AFTER_DELETE: &str = "purgeAfterDelete";
    pub const ALLOW_MULTIPLE_MOUNT: &str = "allowMultipleMount";
}

/// Driver names registered by default.
pub mod drivers {
    pub const NFS: &str = "nfs";
    pub const MOCK: &str = "mock";
}

/// Environment variables read by the CLI.
pub mod envs {
    pub const NETVOL_ROOT: &str = "NETVOL_ROOT";
    pub const DRIVER: &str = "DRIVER";
    pub const DRIVER_OPTIONS: &str = "DRIVER_OPTIONS";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
}

/// Default storage root, matching the volume-plugin convention.
pub const DEFAULT_ROOT: &str = "/var/lib/docker-volumes";

/// Address that marks an nfs configuration as mock (no real mount).
pub const MOCK_NFS_ADDRESS: &str = "nfs-server.mock";

/// Default advisory lock timeout in milliseconds.
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 5_000;
