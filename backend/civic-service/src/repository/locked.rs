use super::store::{JsonFileStore, RecordStore, StoreError};
use file_lock::{FileLock, LockError, LockOptions};
use serde::{de::DeserializeOwned, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

/// Whether an `update` closure changed anything worth persisting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    Write,
    Skip,
}

/// A record store whose mutations run under a `FileLock`.
///
/// Every update reloads the collection after the lock is taken, so the
/// closure always sees what the previous holder wrote.
pub struct LockedStore<T> {
    store: Arc<dyn RecordStore<T>>,
    lock: FileLock,
}

impl<T> Clone for LockedStore<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            lock: self.lock.clone(),
        }
    }
}

impl<T> LockedStore<T>
where
    T: Send + Sync + 'static,
{
    /// Lock file is `<location>.lock`.
    pub fn new(store: Arc<dyn RecordStore<T>>, options: LockOptions) -> Self {
        let lock = FileLock::for_file(store.location(), options);
        Self { store, lock }
    }

    pub fn json_file(path: impl Into<PathBuf>, options: LockOptions) -> Self
    where
        T: Serialize + DeserializeOwned,
    {
        Self::new(Arc::new(JsonFileStore::new(path)), options)
    }

    pub fn lock(&self) -> &FileLock {
        &self.lock
    }

    /// Unlocked read; may observe a state that is about to change.
    pub async fn read(&self) -> Result<Vec<T>, StoreError> {
        self.store.load_all().await
    }

    /// Acquire, reload, mutate, persist on `Commit::Write`, release.
    ///
    /// If `mutate` fails nothing is written. The lock is released on every
    /// path, by the guard's `Drop` when an error returns early.
    pub async fn update<R, E, F>(&self, mutate: F) -> Result<R, E>
    where
        F: FnOnce(&mut Vec<T>) -> Result<(R, Commit), E> + Send,
        R: Send,
        E: From<StoreError> + From<LockError> + Send,
    {
        let guard = self.lock.acquire().await?;

        let mut records = self.store.load_all().await?;
        let (result, commit) = mutate(&mut records)?;
        if commit == Commit::Write {
            self.store.replace_all(&records).await?;
        }

        if let Err(e) = guard.release().await {
            // The write already landed; a leftover marker ages out as stale.
            warn!(error = %e, "Failed to release record lock");
        }

        Ok(result)
    }

    /// Append one record under the lock.
    pub async fn append<E>(&self, record: T) -> Result<(), E>
    where
        E: From<StoreError> + From<LockError> + Send,
    {
        self.update(move |records| {
            records.push(record);
            Ok(((), Commit::Write))
        })
        .await
    }

    /// Insert one record at the front under the lock.
    pub async fn prepend<E>(&self, record: T) -> Result<(), E>
    where
        E: From<StoreError> + From<LockError> + Send,
    {
        self.update(move |records| {
            records.insert(0, record);
            Ok(((), Commit::Write))
        })
        .await
    }
}
