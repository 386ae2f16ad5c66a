use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::LockError;
use crate::marker::{file_age, LockMarker};

/// Timing knobs for a `FileLock`
#[derive(Debug, Clone, Copy)]
pub struct LockOptions {
    /// Upper bound on how long `acquire` waits before failing with `Timeout`
    pub timeout: Duration,
    /// Markers older than this are considered abandoned and reclaimed
    pub stale_after: Duration,
    /// Pause between attempts while another process holds the marker
    pub retry_interval: Duration,
}

impl Default for LockOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            stale_after: Duration::from_secs(10),
            retry_interval: Duration::from_millis(100),
        }
    }
}

/// Exclusive access to one record file, shared by cloning.
///
/// Clones share the in-process mutex; separate `FileLock::new` calls for the
/// same path only exclude each other through the marker file, the same way
/// two processes do.
#[derive(Clone)]
pub struct FileLock {
    path: PathBuf,
    options: LockOptions,
    local: Arc<Mutex<()>>,
}

impl FileLock {
    pub fn new(path: impl Into<PathBuf>, options: LockOptions) -> Self {
        Self {
            path: path.into(),
            options,
            local: Arc::new(Mutex::new(())),
        }
    }

    /// Lock file guarding `record_file`, i.e. `<record_file>.lock`.
    pub fn for_file(record_file: &Path, options: LockOptions) -> Self {
        let mut name = record_file.as_os_str().to_owned();
        name.push(".lock");
        Self::new(PathBuf::from(name), options)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> &LockOptions {
        &self.options
    }

    /// Wait for exclusive access, at most `options.timeout`.
    ///
    /// The returned guard releases the lock when dropped; `release` does the
    /// same but reports errors.
    pub async fn acquire(&self) -> Result<FileLockGuard, LockError> {
        let started = Instant::now();

        let local = tokio::time::timeout(self.options.timeout, self.local.clone().lock_owned())
            .await
            .map_err(|_| LockError::Timeout {
                path: self.path.clone(),
                waited: started.elapsed(),
            })?;

        let marker = LockMarker::new(Uuid::new_v4().to_string());

        loop {
            match create_marker(&self.path, &marker).await {
                Ok(()) => {
                    debug!(
                        path = %self.path.display(),
                        waited_ms = started.elapsed().as_millis() as u64,
                        "Lock acquired"
                    );
                    return Ok(FileLockGuard {
                        path: self.path.clone(),
                        token: marker.token,
                        released: false,
                        _local: local,
                    });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    if self.reclaim_if_stale().await? {
                        continue;
                    }

                    let elapsed = started.elapsed();
                    if elapsed >= self.options.timeout {
                        warn!(
                            path = %self.path.display(),
                            waited_ms = elapsed.as_millis() as u64,
                            "Timed out waiting for lock"
                        );
                        return Err(LockError::Timeout {
                            path: self.path.clone(),
                            waited: elapsed,
                        });
                    }

                    let remaining = self.options.timeout - elapsed;
                    tokio::time::sleep(self.options.retry_interval.min(remaining)).await;
                }
                Err(e) => return Err(LockError::io(&self.path, e)),
            }
        }
    }

    /// Remove the marker if its holder looks dead. Returns true when the caller
    /// should retry creation right away.
    async fn reclaim_if_stale(&self) -> Result<bool, LockError> {
        let observed = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(true),
            Err(e) => return Err(LockError::io(&self.path, e)),
        };
        let age = match LockMarker::from_bytes(&observed) {
            Some(marker) => marker.age(),
            // Holder may still be writing its payload; fall back to mtime.
            None => match file_age(&self.path).await {
                Ok(age) => age,
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(true),
                Err(e) => return Err(LockError::io(&self.path, e)),
            },
        };

        if age <= self.options.stale_after {
            return Ok(false);
        }

        warn!(
            path = %self.path.display(),
            age_ms = age.as_millis() as u64,
            stale_after_ms = self.options.stale_after.as_millis() as u64,
            "Reclaiming stale lock file"
        );

        remove_if_unchanged(&self.path, &observed)
            .await
            .map_err(|e| LockError::io(&self.path, e))?;
        Ok(true)
    }
}

/// Remove the marker at `path` only if it still holds `observed`.
///
/// The marker is first renamed to a private name so a concurrent reclaimer
/// cannot delete a fresh marker created after `observed` was read. A marker
/// that changed in between is linked back into place. Returns true when the
/// observed marker was removed.
async fn remove_if_unchanged(path: &Path, observed: &[u8]) -> std::io::Result<bool> {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".{}.stale", Uuid::new_v4()));
    let parked = PathBuf::from(name);

    match tokio::fs::rename(path, &parked).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    }

    let unchanged = tokio::fs::read(&parked).await? == observed;
    if !unchanged {
        debug!(path = %path.display(), "Lock changed hands during reclaim; restoring it");
        if let Err(e) = tokio::fs::hard_link(&parked, path).await {
            warn!(path = %path.display(), error = %e, "Could not restore lock file");
        }
    }
    tokio::fs::remove_file(&parked).await?;
    Ok(unchanged)
}

async fn create_marker(path: &Path, marker: &LockMarker) -> std::io::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;

    let written = async {
        file.write_all(&marker.to_bytes()).await?;
        file.flush().await?;
        file.sync_all().await
    }
    .await;

    if let Err(e) = written {
        drop(file);
        let _ = tokio::fs::remove_file(path).await;
        return Err(e);
    }
    Ok(())
}

fn owned_by(bytes: &[u8], token: &str) -> bool {
    LockMarker::from_bytes(bytes)
        .map(|marker| marker.token == token)
        .unwrap_or(false)
}

/// Held lock. Dropping it removes the marker and frees the in-process mutex.
pub struct FileLockGuard {
    path: PathBuf,
    token: String,
    released: bool,
    // Dropped after `Drop::drop` runs, so the marker is gone before local waiters wake.
    _local: OwnedMutexGuard<()>,
}

impl FileLockGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Release explicitly. A marker that was reclaimed and re-created by
    /// another holder is left in place.
    pub async fn release(mut self) -> Result<(), LockError> {
        self.released = true;

        match tokio::fs::read(&self.path).await {
            Ok(bytes) if owned_by(&bytes, &self.token) => {}
            Ok(_) => {
                warn!(path = %self.path.display(), "Lock was reclaimed by another holder");
                return Ok(());
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %self.path.display(), "Lock file vanished before release");
                return Ok(());
            }
            Err(e) => return Err(LockError::io(&self.path, e)),
        }

        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "Lock released");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LockError::io(&self.path, e)),
        }
    }
}

impl Drop for FileLockGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        match std::fs::read(&self.path) {
            Ok(bytes) if owned_by(&bytes, &self.token) => {
                if let Err(e) = std::fs::remove_file(&self.path) {
                    if e.kind() != ErrorKind::NotFound {
                        warn!(path = %self.path.display(), error = %e, "Failed to remove lock file");
                    }
                }
            }
            Ok(_) => warn!(path = %self.path.display(), "Lock was reclaimed by another holder"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to read lock file"),
        }
    }
}
