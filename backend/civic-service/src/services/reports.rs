use crate::domain::{CreateReportRequest, Report};
use crate::error::{AppError, Result};
use crate::repository::LockedStore;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

#[derive(Clone)]
pub struct ReportService {
    reports: LockedStore<Report>,
}

impl ReportService {
    pub fn new(reports: LockedStore<Report>) -> Self {
        Self { reports }
    }

    pub async fn list(&self) -> Result<Vec<Report>> {
        Ok(self.reports.read().await?)
    }

    pub async fn submit(&self, req: CreateReportRequest) -> Result<Report> {
        let report = Report {
            id: Uuid::new_v4().to_string(),
            title: req.title,
            description: req.description,
            contact_name: req.contact_name,
            contact_email: req.contact_email,
            photos: req.photos,
            submitted_at: Utc::now(),
        };

        self.reports.append::<AppError>(report.clone()).await?;
        info!(report_id = %report.id, photos = report.photos.len(), "Report submitted");
        Ok(report)
    }
}
