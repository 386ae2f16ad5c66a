/// Advisory lock files for JSON record sets shared between processes
///
/// A `FileLock` serializes writers of one record file. Exclusion is two-level:
/// - **In-process**: a tokio mutex, so tasks of the same instance queue up
///   without touching the filesystem.
/// - **Cross-process**: a `<file>.lock` marker created with `create_new`
///   (O_EXCL) and carrying a `{ pid, acquiredAtMs, token }` payload.
///
/// A marker older than `stale_after` is assumed to belong to a crashed holder
/// and is reclaimed. Reclaiming trades strict exclusion for liveness: two
/// holders may briefly overlap if the original holder was only slow.
///
/// # Example
///
/// ```rust,no_run
/// use file_lock::{FileLock, LockOptions};
///
/// # async fn run() -> Result<(), file_lock::LockError> {
/// let lock = FileLock::new("data/posts.json.lock", LockOptions::default());
/// let guard = lock.acquire().await?;
/// // reload, mutate, persist
/// guard.release().await?;
/// # Ok(())
/// # }
/// ```
mod error;
mod lock;
mod marker;

pub use error::LockError;
pub use lock::{FileLock, FileLockGuard, LockOptions};
pub use marker::LockMarker;
