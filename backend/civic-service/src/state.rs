use crate::config::Config;
use crate::domain::{Comment, NewsArticle, Post, Reel, Report, Share, User};
use crate::error::Result;
use crate::repository::{JsonFileStore, LockedStore, RecordStore, StoreError, UserRegistry};
use crate::services::{
    CommentService, LikeCounter, NewsService, PostService, ReelService, ReportService,
    ShareService, UserService,
};
use std::sync::Arc;

/// Services shared by every worker
pub struct AppState {
    pub users: UserService,
    pub posts: PostService,
    pub reels: ReelService,
    pub post_likes: LikeCounter<Post>,
    pub reel_likes: LikeCounter<Reel>,
    pub reports: ReportService,
    pub comments: CommentService,
    pub shares: ShareService,
    pub news: NewsService,
}

impl AppState {
    /// Wire every record file under `config.storage.data_dir`, creating the
    /// directory if needed.
    pub fn from_config(config: &Config) -> Result<Self> {
        let data_dir = &config.storage.data_dir;
        std::fs::create_dir_all(data_dir).map_err(|source| StoreError::Io {
            path: data_dir.clone(),
            source,
        })?;

        let options = config.lock.options();
        let user_file: Arc<dyn RecordStore<User>> =
            Arc::new(JsonFileStore::new(data_dir.join("users.json")));
        let users = LockedStore::new(user_file.clone(), options);
        let registry = Arc::new(UserRegistry::new(user_file));

        let posts = LockedStore::json_file(data_dir.join("posts.json"), options);
        let reels = LockedStore::json_file(data_dir.join("reels.json"), options);
        let reports = LockedStore::<Report>::json_file(data_dir.join("reports.json"), options);
        let comments =
            LockedStore::<Comment>::json_file(data_dir.join("comments.json"), options);
        let shares = LockedStore::<Share>::json_file(data_dir.join("shares.json"), options);
        let news = LockedStore::<NewsArticle>::json_file(data_dir.join("news.json"), options);

        Ok(Self {
            users: UserService::new(users),
            post_likes: LikeCounter::new(posts.clone(), registry.clone()),
            reel_likes: LikeCounter::new(reels.clone(), registry),
            posts: PostService::new(posts),
            reels: ReelService::new(reels),
            reports: ReportService::new(reports),
            comments: CommentService::new(comments),
            shares: ShareService::new(shares),
            news: NewsService::new(news, config.news.clone())?,
        })
    }
}
