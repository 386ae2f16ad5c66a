use crate::domain::{LikeOutcome, LikeStatus, Likeable};
use crate::repository::{Commit, LockedStore, StoreError, UserDirectory};
use file_lock::LockError;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum LikeError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("unregistered user id: {0}")]
    Forbidden(String),

    #[error("like lock not acquired: {0}")]
    Timeout(#[source] LockError),

    #[error(transparent)]
    Lock(LockError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<LockError> for LikeError {
    fn from(err: LockError) -> Self {
        if err.is_timeout() {
            LikeError::Timeout(err)
        } else {
            LikeError::Lock(err)
        }
    }
}

/// Like/unlike toggling for one kind of content.
///
/// Toggles are serialized by the store's file lock, within this process and
/// across processes sharing the data directory. Status reads take no lock.
pub struct LikeCounter<T> {
    items: LockedStore<T>,
    users: Arc<dyn UserDirectory>,
}

impl<T> Clone for LikeCounter<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            users: self.users.clone(),
        }
    }
}

impl<T> LikeCounter<T>
where
    T: Likeable + Send + Sync + 'static,
{
    pub fn new(items: LockedStore<T>, users: Arc<dyn UserDirectory>) -> Self {
        Self { items, users }
    }

    /// Flip `user_id`'s like on `item_id` and return the new count.
    ///
    /// Unregistered users are rejected before the lock is requested.
    pub async fn toggle_like(&self, item_id: &str, user_id: &str) -> Result<LikeOutcome, LikeError> {
        if !self.users.is_registered(user_id).await? {
            warn!(kind = T::KIND, item_id, user_id, "Like rejected for unregistered user");
            return Err(LikeError::Forbidden(user_id.to_string()));
        }

        let outcome = self
            .items
            .update::<_, LikeError, _>(|items| {
                let item = items
                    .iter_mut()
                    .find(|item| item.item_id() == item_id)
                    .ok_or_else(|| LikeError::NotFound {
                        kind: T::KIND,
                        id: item_id.to_string(),
                    })?;

                let record = item.like_record_mut();
                let liked = record.toggle(user_id);
                Ok((
                    LikeOutcome {
                        likes: record.likes,
                        liked,
                    },
                    Commit::Write,
                ))
            })
            .await?;

        info!(
            kind = T::KIND,
            item_id,
            user_id,
            likes = outcome.likes,
            liked = outcome.liked,
            "Like toggled"
        );
        Ok(outcome)
    }

    /// Current count and whether `user_id` is among the likers.
    pub async fn get_like_status(
        &self,
        item_id: &str,
        user_id: Option<&str>,
    ) -> Result<LikeStatus, LikeError> {
        let items = self.items.read().await?;
        let item = items
            .iter()
            .find(|item| item.item_id() == item_id)
            .ok_or_else(|| LikeError::NotFound {
                kind: T::KIND,
                id: item_id.to_string(),
            })?;

        let record = item.like_record();
        Ok(LikeStatus {
            likes: record.likes,
            liked: user_id.map(|u| record.is_liked_by(u)).unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LikeRecord, Post};
    use crate::repository::{JsonFileStore, RecordStore};
    use async_trait::async_trait;
    use file_lock::LockOptions;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct Everyone;

    #[async_trait]
    impl UserDirectory for Everyone {
        async fn is_registered(&self, _user_id: &str) -> Result<bool, StoreError> {
            Ok(true)
        }
    }

    /// Wraps a store and counts writes
    struct CountingStore {
        inner: JsonFileStore<Post>,
        writes: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl RecordStore<Post> for CountingStore {
        async fn load_all(&self) -> Result<Vec<Post>, StoreError> {
            self.inner.load_all().await
        }

        async fn replace_all(&self, records: &[Post]) -> Result<(), StoreError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.replace_all(records).await
        }

        fn location(&self) -> &Path {
            self.inner.location()
        }
    }

    fn post(id: &str) -> Post {
        Post {
            id: id.to_string(),
            title: "Streetlight out".into(),
            excerpt: "Corner of 5th".into(),
            author: "carol".into(),
            date: "2024-05-01".into(),
            image_url: None,
            like_record: LikeRecord::default(),
        }
    }

    fn counter_at(path: PathBuf, writes: Arc<AtomicUsize>) -> LikeCounter<Post> {
        let store = CountingStore {
            inner: JsonFileStore::new(path),
            writes,
        };
        let items = LockedStore::new(
            Arc::new(store),
            LockOptions {
                timeout: Duration::from_millis(300),
                stale_after: Duration::from_secs(10),
                retry_interval: Duration::from_millis(10),
            },
        );
        LikeCounter::new(items, Arc::new(Everyone))
    }

    #[tokio::test]
    async fn status_for_anonymous_caller_is_not_liked() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("posts.json");
        let mut p = post("p1");
        p.like_record.toggle("alice");
        std::fs::write(&path, serde_json::to_vec(&vec![p]).unwrap()).unwrap();

        let counter = counter_at(path, Arc::new(AtomicUsize::new(0)));
        let status = counter.get_like_status("p1", None).await.unwrap();
        assert_eq!(status, LikeStatus { likes: 1, liked: false });
        let status = counter.get_like_status("p1", Some("alice")).await.unwrap();
        assert!(status.liked);
    }

    #[tokio::test]
    async fn unknown_item_writes_nothing() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("posts.json");
        std::fs::write(&path, serde_json::to_vec(&vec![post("p1")]).unwrap()).unwrap();
        let writes = Arc::new(AtomicUsize::new(0));

        let counter = counter_at(path.clone(), writes.clone());
        let err = counter.toggle_like("pX", "alice").await.unwrap_err();

        assert!(matches!(err, LikeError::NotFound { kind: "Post", .. }));
        assert_eq!(writes.load(Ordering::SeqCst), 0);
        assert!(!dir.path().join("posts.json.lock").exists());

        let err = counter.get_like_status("pX", Some("alice")).await.unwrap_err();
        assert!(matches!(err, LikeError::NotFound { .. }));
    }

    #[tokio::test]
    async fn each_toggle_rewrites_once() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("posts.json");
        std::fs::write(&path, serde_json::to_vec(&vec![post("p1")]).unwrap()).unwrap();
        let writes = Arc::new(AtomicUsize::new(0));

        let counter = counter_at(path, writes.clone());
        counter.toggle_like("p1", "alice").await.unwrap();
        counter.toggle_like("p1", "alice").await.unwrap();

        assert_eq!(writes.load(Ordering::SeqCst), 2);
    }
}
