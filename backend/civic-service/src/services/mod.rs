/// Business logic layer
pub mod comments;
pub mod content;
pub mod like_counter;
pub mod news;
pub mod reports;
pub mod shares;
pub mod users;

pub use comments::CommentService;
pub use content::{PostService, ReelService};
pub use like_counter::{LikeCounter, LikeError};
pub use news::{NewsError, NewsService};
pub use reports::ReportService;
pub use shares::ShareService;
pub use users::UserService;
