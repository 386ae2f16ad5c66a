use super::validate_body;
use crate::domain::CreateReelRequest;
use crate::error::Result;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

pub async fn list_reels(state: web::Data<AppState>) -> Result<HttpResponse> {
    let reels = state.reels.list().await?;
    Ok(HttpResponse::Ok().json(reels))
}

pub async fn create_reel(
    state: web::Data<AppState>,
    req: web::Json<CreateReelRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    validate_body(&req, "All reel fields are required")?;

    let reel = state.reels.create(req).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Reel added successfully",
        "reel": reel,
    })))
}
