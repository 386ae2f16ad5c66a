/// Post handlers - feed listing and creation
use super::validate_body;
use crate::domain::CreatePostRequest;
use crate::error::Result;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

pub async fn list_posts(state: web::Data<AppState>) -> Result<HttpResponse> {
    let posts = state.posts.list().await?;
    Ok(HttpResponse::Ok().json(posts))
}

pub async fn create_post(
    state: web::Data<AppState>,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    validate_body(&req, "All post fields are required")?;

    let post = state.posts.create(req).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Post added successfully",
        "post": post,
    })))
}
