use super::store::{RecordStore, StoreError};
use crate::domain::User;
use async_trait::async_trait;
use std::sync::Arc;

/// Answers whether an identity belongs to a registered user
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn is_registered(&self, user_id: &str) -> Result<bool, StoreError>;
}

/// Registry backed by the users record file
pub struct UserRegistry {
    store: Arc<dyn RecordStore<User>>,
}

impl UserRegistry {
    pub fn new(store: Arc<dyn RecordStore<User>>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserDirectory for UserRegistry {
    async fn is_registered(&self, user_id: &str) -> Result<bool, StoreError> {
        if user_id.is_empty() {
            return Ok(false);
        }
        let users = self.store.load_all().await?;
        Ok(users.iter().any(|u| u.matches(user_id)))
    }
}
