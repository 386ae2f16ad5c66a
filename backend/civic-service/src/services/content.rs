/// Posts and reels feeds
use crate::domain::{CreatePostRequest, CreateReelRequest, LikeRecord, Post, Reel};
use crate::error::{AppError, Result};
use crate::repository::LockedStore;
use tracing::info;
use uuid::Uuid;

#[derive(Clone)]
pub struct PostService {
    posts: LockedStore<Post>,
}

impl PostService {
    pub fn new(posts: LockedStore<Post>) -> Self {
        Self { posts }
    }

    pub async fn list(&self) -> Result<Vec<Post>> {
        Ok(self.posts.read().await?)
    }

    pub async fn create(&self, req: CreatePostRequest) -> Result<Post> {
        let post = Post {
            id: Post::generate_id(),
            title: req.title,
            excerpt: req.excerpt,
            author: req.author,
            date: req.date,
            image_url: req.image_url.filter(|url| !url.is_empty()),
            like_record: LikeRecord::default(),
        };

        self.posts.append::<AppError>(post.clone()).await?;
        info!(post_id = %post.id, author = %post.author, "Post created");
        Ok(post)
    }
}

#[derive(Clone)]
pub struct ReelService {
    reels: LockedStore<Reel>,
}

impl ReelService {
    pub fn new(reels: LockedStore<Reel>) -> Self {
        Self { reels }
    }

    pub async fn list(&self) -> Result<Vec<Reel>> {
        Ok(self.reels.read().await?)
    }

    pub async fn create(&self, req: CreateReelRequest) -> Result<Reel> {
        let reel = Reel {
            id: Uuid::new_v4().to_string(),
            title: req.title,
            author: req.author,
            date: req.date,
            description: req.description,
            video_url: req.video_url.filter(|url| !url.is_empty()),
            like_record: LikeRecord::default(),
        };

        self.reels.append::<AppError>(reel.clone()).await?;
        info!(reel_id = %reel.id, author = %reel.author, "Reel created");
        Ok(reel)
    }
}
