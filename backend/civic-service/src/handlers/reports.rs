use super::validate_body;
use crate::domain::CreateReportRequest;
use crate::error::Result;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

pub async fn list_reports(state: web::Data<AppState>) -> Result<HttpResponse> {
    let reports = state.reports.list().await?;
    Ok(HttpResponse::Ok().json(reports))
}

pub async fn submit_report(
    state: web::Data<AppState>,
    req: web::Json<CreateReportRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    validate_body(&req, "All report fields are required")?;

    let report = state.reports.submit(req).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Report submitted successfully",
        "report": report,
    })))
}
