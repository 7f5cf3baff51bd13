use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use netvol_shared::errors::{NetvolError, NetvolResult};
use rusqlite::{Connection, ErrorCode, OpenFlags, OptionalExtension, TransactionBehavior, params};

use super::lock::{AdvisoryLock, AdvisoryLockGuard};
use crate::layout::StorageLayout;
use crate::volumes::VolumeMetadata;

const SCHEMA: &str = r#"
-- One row per live volume; name is the raw volume name bytes.
CREATE TABLE IF NOT EXISTS volumes (
    name BLOB PRIMARY KEY NOT NULL,
    metadata BLOB NOT NULL
) WITHOUT ROWID;
"#;

/// How long SQLite itself waits on its file lock; the advisory lock
/// normally makes this contention impossible.
const SQLITE_BUSY_TIMEOUT: Duration = Duration::from_millis(500);

/// Transactional registry of volume records.
///
/// No connection is kept between calls. Each operation takes the advisory
/// lock, opens the database, runs exactly one transaction and closes the
/// database again before the lock is released. A crash at any point leaves
/// either the old or the new record on disk, never a partial one.
#[derive(Debug)]
pub struct RegistryStore {
    db_path: PathBuf,
    lock: AdvisoryLock,
}

impl RegistryStore {
    /// Open the registry for the given storage root.
    ///
    /// Only the lock file is opened here; the database is opened per call.
    pub fn open(layout: &StorageLayout, lock_timeout: Duration) -> NetvolResult<Self> {
        layout.prepare()?;
        let lock = AdvisoryLock::open(&layout.registry_lock_path(), lock_timeout)?;

        tracing::debug!(
            db_path = %layout.registry_db_path().display(),
            "Opened registry store"
        );

        Ok(Self {
            db_path: layout.registry_db_path(),
            lock,
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Insert a new record built by `initializer`.
    ///
    /// The existence check and the insert run in one write transaction, so
    /// two creators racing on the same name cannot both succeed. If
    /// `initializer` fails nothing is written.
    pub fn create_record<F>(&self, name: &str, initializer: F) -> NetvolResult<()>
    where
        F: FnOnce() -> NetvolResult<VolumeMetadata>,
    {
        self.transact(|conn| {
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(|e| sql_error("begin create", name, e))?;

            if read_record(&tx, name)?.is_some() {
                return Err(NetvolError::AlreadyExists(format!("volume {}", name)));
            }

            let metadata = initializer()?;
            let value = metadata.encode()?;
            tx.execute(
                "INSERT INTO volumes (name, metadata) VALUES (?1, ?2)",
                params![name.as_bytes(), value],
            )
            .map_err(|e| sql_error("insert", name, e))?;

            tx.commit().map_err(|e| sql_error("commit create", name, e))
        })
    }

    /// Read one record.
    pub fn get_record(&self, name: &str) -> NetvolResult<VolumeMetadata> {
        self.transact(|conn| {
            read_record(conn, name)?
                .ok_or_else(|| NetvolError::NotFound(format!("volume {}", name)))
        })
    }

    /// Snapshot of every record, ordered by name.
    ///
    /// Advisory lock contention is not an error here: a caller enumerating
    /// volumes gets an empty map instead of waiting on another process.
    /// Failing to open or read the database still is.
    pub fn list_records(&self) -> NetvolResult<BTreeMap<String, VolumeMetadata>> {
        let Some(guard) = self.lock.try_acquire()? else {
            tracing::warn!(
                lock_path = %self.lock.path().display(),
                "Registry lock busy, listing no volumes"
            );
            return Ok(BTreeMap::new());
        };

        self.transact_locked(guard, |conn| {
            let mut stmt = conn
                .prepare("SELECT name, metadata FROM volumes ORDER BY name")
                .map_err(|e| sql_error("list", "*", e))?;
            let rows = stmt
                .query_map([], |row| {
                    Ok((row.get::<_, Vec<u8>>(0)?, row.get::<_, Vec<u8>>(1)?))
                })
                .map_err(|e| sql_error("list", "*", e))?;

            let mut records = BTreeMap::new();
            for row in rows {
                let (key, value) = row.map_err(|e| sql_error("list", "*", e))?;
                let name = String::from_utf8(key).map_err(|e| {
                    NetvolError::Corrupted(format!("volume name is not utf-8: {}", e))
                })?;
                let metadata = VolumeMetadata::decode(&value)?;
                records.insert(name, metadata);
            }
            Ok(records)
        })
    }

    /// Read-modify-write one record.
    ///
    /// `mutator` sees the current record; if it fails the transaction is
    /// rolled back and the stored record is unchanged. The mountpoint and
    /// creation time are immutable and may not be touched by `mutator`.
    pub fn mutate_record<F, R>(&self, name: &str, mutator: F) -> NetvolResult<R>
    where
        F: FnOnce(&mut VolumeMetadata) -> NetvolResult<R>,
    {
        self.transact(|conn| {
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(|e| sql_error("begin update", name, e))?;

            let mut metadata = read_record(&tx, name)?
                .ok_or_else(|| NetvolError::NotFound(format!("volume {}", name)))?;
            let mountpoint = metadata.mountpoint.clone();
            let created_at = metadata.created_at;

            let output = mutator(&mut metadata)?;

            if metadata.mountpoint != mountpoint || metadata.created_at != created_at {
                return Err(NetvolError::Internal(format!(
                    "refusing to change immutable fields of volume {}",
                    name
                )));
            }

            let value = metadata.encode()?;
            tx.execute(
                "UPDATE volumes SET metadata = ?2 WHERE name = ?1",
                params![name.as_bytes(), value],
            )
            .map_err(|e| sql_error("update", name, e))?;

            tx.commit().map_err(|e| sql_error("commit update", name, e))?;
            Ok(output)
        })
    }

    /// Delete one record, then run `finalizer` with the deleted record.
    ///
    /// The delete and the finalizer share a transaction: if `finalizer`
    /// fails the delete is rolled back and the record survives. Returns the
    /// deleted record.
    pub fn delete_record<F>(&self, name: &str, finalizer: F) -> NetvolResult<VolumeMetadata>
    where
        F: FnOnce(&VolumeMetadata) -> NetvolResult<()>,
    {
        self.transact(|conn| {
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(|e| sql_error("begin delete", name, e))?;

            let metadata = read_record(&tx, name)?
                .ok_or_else(|| NetvolError::NotFound(format!("volume {}", name)))?;

            tx.execute(
                "DELETE FROM volumes WHERE name = ?1",
                params![name.as_bytes()],
            )
            .map_err(|e| sql_error("delete", name, e))?;

            finalizer(&metadata)?;

            tx.commit().map_err(|e| sql_error("commit delete", name, e))?;
            Ok(metadata)
        })
    }

    /// Release the advisory lock file. Idempotent; later calls on this
    /// store fail with `StorageUnavailable`.
    pub fn close(&self) -> NetvolResult<()> {
        self.lock.close()
    }

    /// One lock/open/transact/close/unlock cycle.
    fn transact<T>(&self, f: impl FnOnce(&mut Connection) -> NetvolResult<T>) -> NetvolResult<T> {
        let guard = self.lock.acquire()?;
        self.transact_locked(guard, f)
    }

    /// Open/transact/close with the advisory lock already held by `_guard`.
    fn transact_locked<T>(
        &self,
        _guard: AdvisoryLockGuard<'_>,
        f: impl FnOnce(&mut Connection) -> NetvolResult<T>,
    ) -> NetvolResult<T> {
        let mut conn = self.connect()?;

        let result = f(&mut conn);

        // Close before the guard drops so no other process opens the
        // database while this connection still holds it.
        if let Err((_, e)) = conn.close() {
            tracing::warn!(
                db_path = %self.db_path.display(),
                error = %e,
                "Failed to close registry database"
            );
        }

        result
    }

    fn connect(&self) -> NetvolResult<Connection> {
        let conn = Connection::open_with_flags(
            &self.db_path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| {
            NetvolError::StorageUnavailable(format!(
                "failed to open registry database {}: {}",
                self.db_path.display(),
                e
            ))
        })?;

        conn.busy_timeout(SQLITE_BUSY_TIMEOUT)
            .and_then(|_| conn.execute_batch(SCHEMA))
            .map_err(|e| {
                NetvolError::StorageUnavailable(format!(
                    "failed to initialize registry database {}: {}",
                    self.db_path.display(),
                    e
                ))
            })?;

        Ok(conn)
    }
}

fn read_record(conn: &Connection, name: &str) -> NetvolResult<Option<VolumeMetadata>> {
    let value: Option<Vec<u8>> = conn
        .query_row(
            "SELECT metadata FROM volumes WHERE name = ?1",
            params![name.as_bytes()],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| sql_error("read", name, e))?;

    value.map(|v| VolumeMetadata::decode(&v)).transpose()
}

/// Wrap an engine error with the operation and volume it hit.
fn sql_error(op: &str, name: &str, err: rusqlite::Error) -> NetvolError {
    let message = format!("{} volume {}: {}", op, name, err);
    match err.sqlite_error_code() {
        Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked) => {
            NetvolError::StorageUnavailable(message)
        }
        _ => NetvolError::Internal(message),
    }
}
