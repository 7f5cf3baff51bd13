//! Advisory file lock guarding the registry database across processes.
//!
//! Uses flock(2) on a lock file next to the database. Every registry
//! transaction holds the lock from before the database is opened until
//! after it is closed, so two daemons pointed at the same storage root
//! never interleave transactions.

use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use netvol_shared::errors::{NetvolError, NetvolResult};
use parking_lot::{Mutex, MutexGuard};

#[cfg(not(unix))]
compile_error!("registry advisory locking requires flock(2) on a unix platform");

const INITIAL_BACKOFF: Duration = Duration::from_millis(5);
const MAX_BACKOFF: Duration = Duration::from_millis(100);

/// Handle on the registry lock file.
///
/// The file stays open for the lifetime of the handle (until [`close`]),
/// the flock itself is only held while an [`AdvisoryLockGuard`] is alive.
///
/// [`close`]: AdvisoryLock::close
#[derive(Debug)]
pub struct AdvisoryLock {
    file: Mutex<Option<File>>,
    path: PathBuf,
    timeout: Duration,
}

impl AdvisoryLock {
    /// Open (creating if needed) the lock file at `path`.
    ///
    /// `timeout` bounds how long [`acquire`](Self::acquire) waits for a
    /// competing holder before reporting the storage as unavailable.
    pub fn open(path: &Path, timeout: Duration) -> NetvolResult<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .map_err(|e| {
                NetvolError::StorageUnavailable(format!(
                    "failed to open lock file {}: {}",
                    path.display(),
                    e
                ))
            })?;

        Ok(Self {
            file: Mutex::new(Some(file)),
            path: path.to_path_buf(),
            timeout,
        })
    }

    /// Take the exclusive lock, polling until the timeout expires.
    pub fn acquire(&self) -> NetvolResult<AdvisoryLockGuard<'_>> {
        self.try_acquire()?.ok_or_else(|| {
            NetvolError::StorageUnavailable(format!(
                "timed out after {:?} waiting for registry lock {}",
                self.timeout,
                self.path.display()
            ))
        })
    }

    /// Like [`acquire`](Self::acquire), but a competing holder that outlasts
    /// the timeout yields `Ok(None)` instead of an error. A closed handle or
    /// a failing flock call is still an error.
    pub fn try_acquire(&self) -> NetvolResult<Option<AdvisoryLockGuard<'_>>> {
        let file = self.file.lock();
        let fd = match file.as_ref() {
            Some(f) => f.as_raw_fd(),
            None => {
                return Err(NetvolError::StorageUnavailable(format!(
                    "registry lock {} is closed",
                    self.path.display()
                )));
            }
        };

        let deadline = Instant::now() + self.timeout;
        let mut backoff = INITIAL_BACKOFF;
        loop {
            let result = unsafe { libc::flock(fd, libc::LOCK_EX | libc::LOCK_NB) };
            if result == 0 {
                break;
            }

            let err = io::Error::last_os_error();
            match err.kind() {
                io::ErrorKind::Interrupted => continue,
                io::ErrorKind::WouldBlock => {
                    if Instant::now() >= deadline {
                        return Ok(None);
                    }
                    std::thread::sleep(backoff);
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                }
                _ => {
                    return Err(NetvolError::StorageUnavailable(format!(
                        "failed to acquire registry lock {}: {}",
                        self.path.display(),
                        err
                    )));
                }
            }
        }

        tracing::trace!(lock_path = %self.path.display(), "Acquired registry lock");

        Ok(Some(AdvisoryLockGuard {
            file,
            path: &self.path,
        }))
    }

    /// Release the lock file. Safe to call more than once.
    pub fn close(&self) -> NetvolResult<()> {
        if self.file.lock().take().is_some() {
            tracing::debug!(lock_path = %self.path.display(), "Closed registry lock file");
        }
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.file.lock().is_none()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Held flock; released on drop, on every return path.
#[derive(Debug)]
pub struct AdvisoryLockGuard<'a> {
    file: MutexGuard<'a, Option<File>>,
    path: &'a Path,
}

impl Drop for AdvisoryLockGuard<'_> {
    fn drop(&mut self) {
        if let Some(file) = self.file.as_ref() {
            unsafe {
                libc::flock(file.as_raw_fd(), libc::LOCK_UN);
            }
        }
        tracing::trace!(lock_path = %self.path.display(), "Released registry lock");
    }
}
