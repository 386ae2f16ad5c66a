/// Like handlers - toggles act for the authenticated caller
use crate::domain::{LikeStatusQuery, Likeable};
use crate::error::Result;
use crate::services::LikeCounter;
use crate::state::AppState;
use actix_middleware::UserId;
use actix_web::{web, HttpResponse};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub message: String,
    pub likes: u64,
    pub liked: bool,
}

async fn toggle<T>(counter: &LikeCounter<T>, item_id: &str, user: &UserId) -> Result<HttpResponse>
where
    T: Likeable + Send + Sync + 'static,
{
    let outcome = counter.toggle_like(item_id, &user.0).await?;
    let verb = if outcome.liked { "liked" } else { "unliked" };

    Ok(HttpResponse::Ok().json(LikeResponse {
        message: format!("{} {}", T::KIND, verb),
        likes: outcome.likes,
        liked: outcome.liked,
    }))
}

async fn status<T>(
    counter: &LikeCounter<T>,
    item_id: &str,
    query: &LikeStatusQuery,
) -> Result<HttpResponse>
where
    T: Likeable + Send + Sync + 'static,
{
    let status = counter
        .get_like_status(item_id, query.user_id.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(status))
}

pub async fn toggle_post_like(
    state: web::Data<AppState>,
    path: web::Path<String>,
    user: UserId,
) -> Result<HttpResponse> {
    toggle(&state.post_likes, &path, &user).await
}

pub async fn post_like_status(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<LikeStatusQuery>,
) -> Result<HttpResponse> {
    status(&state.post_likes, &path, &query).await
}

pub async fn toggle_reel_like(
    state: web::Data<AppState>,
    path: web::Path<String>,
    user: UserId,
) -> Result<HttpResponse> {
    toggle(&state.reel_likes, &path, &user).await
}

pub async fn reel_like_status(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<LikeStatusQuery>,
) -> Result<HttpResponse> {
    status(&state.reel_likes, &path, &query).await
}
