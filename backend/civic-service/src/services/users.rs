use crate::domain::{SubmitFormRequest, User};
use crate::error::{AppError, Result};
use crate::repository::LockedStore;
use chrono::Utc;
use tracing::info;

/// Form intake: every submission registers a user
#[derive(Clone)]
pub struct UserService {
    users: LockedStore<User>,
}

impl UserService {
    pub fn new(users: LockedStore<User>) -> Self {
        Self { users }
    }

    pub async fn submit(&self, req: SubmitFormRequest) -> Result<User> {
        let user = User {
            name: req.name,
            email: req.email,
            pincode: req.pincode,
            phone: req.phone,
            gender: req.gender,
            submitted_at: Utc::now(),
        };

        self.users.append::<AppError>(user.clone()).await?;
        info!(email = %user.email, "User registered");
        Ok(user)
    }
}
