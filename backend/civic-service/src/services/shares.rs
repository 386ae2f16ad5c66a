use crate::domain::{RecordShareRequest, Share, ShareSummary};
use crate::error::{AppError, Result};
use crate::repository::LockedStore;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

#[derive(Clone)]
pub struct ShareService {
    shares: LockedStore<Share>,
}

impl ShareService {
    pub fn new(shares: LockedStore<Share>) -> Self {
        Self { shares }
    }

    pub async fn summary_for(&self, content_type: &str, content_id: &str) -> Result<ShareSummary> {
        let shares: Vec<Share> = self
            .shares
            .read()
            .await?
            .into_iter()
            .filter(|s| s.content_type == content_type && s.content_id == content_id)
            .collect();

        Ok(ShareSummary {
            count: shares.len(),
            shares,
        })
    }

    pub async fn record(&self, req: RecordShareRequest) -> Result<Share> {
        let share = Share {
            id: Uuid::new_v4().to_string(),
            user_id: req.user_id,
            content_type: req.content_type,
            content_id: req.content_id,
            platform: req.platform,
            timestamp: Utc::now(),
        };

        self.shares.append::<AppError>(share.clone()).await?;
        info!(
            content_type = %share.content_type,
            content_id = %share.content_id,
            platform = %share.platform,
            "Share recorded"
        );
        Ok(share)
    }
}
