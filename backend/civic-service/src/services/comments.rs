use crate::domain::{Comment, CreateCommentRequest};
use crate::error::{AppError, Result};
use crate::repository::{Commit, LockedStore};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

#[derive(Clone)]
pub struct CommentService {
    comments: LockedStore<Comment>,
}

impl CommentService {
    pub fn new(comments: LockedStore<Comment>) -> Self {
        Self { comments }
    }

    /// Comments on one content item, oldest first
    pub async fn list_for(&self, content_type: &str, content_id: &str) -> Result<Vec<Comment>> {
        let comments = self.comments.read().await?;
        Ok(comments
            .into_iter()
            .filter(|c| c.belongs_to(content_type, content_id))
            .collect())
    }

    pub async fn add(&self, req: CreateCommentRequest) -> Result<Comment> {
        let comment = Comment {
            id: Uuid::new_v4().to_string(),
            content: req.content,
            author: req.author,
            content_type: req.content_type,
            content_id: req.content_id,
            likes: 0,
            timestamp: Utc::now(),
        };

        self.comments.append::<AppError>(comment.clone()).await?;
        info!(
            comment_id = %comment.id,
            content_type = %comment.content_type,
            content_id = %comment.content_id,
            "Comment added"
        );
        Ok(comment)
    }

    /// Comment likes are a plain counter; returns the new count.
    pub async fn like(&self, comment_id: &str) -> Result<u64> {
        self.comments
            .update(|comments| {
                let comment = comments
                    .iter_mut()
                    .find(|c| c.id == comment_id)
                    .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;
                comment.likes += 1;
                Ok((comment.likes, Commit::Write))
            })
            .await
    }
}
