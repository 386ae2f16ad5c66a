/// Comment handlers
use super::{bind_caller, validate_body};
use crate::domain::CreateCommentRequest;
use crate::error::Result;
use crate::state::AppState;
use actix_middleware::UserId;
use actix_web::{web, HttpResponse};

pub async fn list_comments(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
    let (content_type, content_id) = path.into_inner();
    let comments = state.comments.list_for(&content_type, &content_id).await?;
    Ok(HttpResponse::Ok().json(comments))
}

pub async fn add_comment(
    state: web::Data<AppState>,
    user: UserId,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    let mut req = req.into_inner();
    validate_body(&req, "All comment fields are required")?;
    bind_caller(&mut req.author, &user, "author")?;

    let comment = state.comments.add(req).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Comment added successfully",
        "comment": comment,
    })))
}

pub async fn like_comment(
    state: web::Data<AppState>,
    path: web::Path<String>,
    user: UserId,
) -> Result<HttpResponse> {
    let likes = state.comments.like(&path).await?;
    tracing::info!(comment_id = %path, caller = %user.0, likes, "Comment liked");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Comment liked",
        "likes": likes,
    })))
}
