use super::{bind_caller, validate_body};
use crate::domain::RecordShareRequest;
use crate::error::Result;
use crate::state::AppState;
use actix_middleware::UserId;
use actix_web::{web, HttpResponse};

pub async fn share_summary(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
    let (content_type, content_id) = path.into_inner();
    let summary = state.shares.summary_for(&content_type, &content_id).await?;
    Ok(HttpResponse::Ok().json(summary))
}

pub async fn record_share(
    state: web::Data<AppState>,
    user: UserId,
    req: web::Json<RecordShareRequest>,
) -> Result<HttpResponse> {
    let mut req = req.into_inner();
    validate_body(&req, "All share fields are required")?;
    bind_caller(&mut req.user_id, &user, "userId")?;

    let share = state.shares.record(req).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Share recorded successfully",
        "share": share,
    })))
}
