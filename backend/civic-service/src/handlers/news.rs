/// News handlers
use super::validate_body;
use crate::domain::CreateNewsRequest;
use crate::error::Result;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

/// Remote headlines; always answers, with a placeholder article on upstream failure
pub async fn headlines(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.news.headlines().await)
}

pub async fn list_local(state: web::Data<AppState>) -> Result<HttpResponse> {
    let articles = state.news.local().await?;
    Ok(HttpResponse::Ok().json(articles))
}

pub async fn add_local(
    state: web::Data<AppState>,
    req: web::Json<CreateNewsRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    validate_body(&req, "Title and description are required")?;

    let article = state.news.add_local(req).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "News added successfully",
        "article": article,
    })))
}
