/// HTTP handlers for Civic Service
///
/// - users: form intake
/// - posts / reels: feeds and creation
/// - likes: like toggles and status for posts and reels
/// - reports, comments, shares, news
pub mod comments;
pub mod likes;
pub mod news;
pub mod posts;
pub mod reels;
pub mod reports;
pub mod shares;
pub mod users;

use crate::domain::validation_message;
use crate::error::{AppError, Result};
use actix_middleware::{JwtAuthMiddleware, UserId};
use actix_web::{guard, web, HttpResponse};
use validator::Validate;

/// Register every route. Mutations that act for a user sit behind
/// `JwtAuthMiddleware`.
pub fn configure(cfg: &mut web::ServiceConfig, jwt_secret: &str) {
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        AppError::Validation(format!("Invalid request body: {}", err)).into()
    });

    cfg.app_data(json_config)
        .route("/health", web::get().to(health))
        .route("/submit-form", web::post().to(users::submit_form))
        .service(
            web::resource("/posts")
                .route(web::get().to(posts::list_posts))
                .route(web::post().to(posts::create_post)),
        )
        .service(
            web::resource("/posts/{id}/like")
                .wrap(JwtAuthMiddleware::new(jwt_secret))
                .route(web::put().to(likes::toggle_post_like)),
        )
        .route(
            "/posts/{id}/like-status",
            web::get().to(likes::post_like_status),
        )
        .service(
            web::resource("/reels")
                .route(web::get().to(reels::list_reels))
                .route(web::post().to(reels::create_reel)),
        )
        .service(
            web::resource("/reels/{id}/like")
                .wrap(JwtAuthMiddleware::new(jwt_secret))
                .route(web::put().to(likes::toggle_reel_like)),
        )
        .route(
            "/reels/{id}/like-status",
            web::get().to(likes::reel_like_status),
        )
        .service(
            web::resource("/reports")
                .route(web::get().to(reports::list_reports))
                .route(web::post().to(reports::submit_report)),
        )
        .service(
            web::resource("/comments")
                .wrap(JwtAuthMiddleware::new(jwt_secret))
                .route(web::post().to(comments::add_comment)),
        )
        // Same shape as the listing path; the guard lets GETs fall through.
        .service(
            web::resource("/comments/{id}/like")
                .guard(guard::Put())
                .wrap(JwtAuthMiddleware::new(jwt_secret))
                .route(web::put().to(comments::like_comment)),
        )
        .route(
            "/comments/{content_type}/{content_id}",
            web::get().to(comments::list_comments),
        )
        .service(
            web::resource("/shares")
                .wrap(JwtAuthMiddleware::new(jwt_secret))
                .route(web::post().to(shares::record_share)),
        )
        .route(
            "/shares/{content_type}/{content_id}",
            web::get().to(shares::share_summary),
        )
        .route("/api/news", web::get().to(news::headlines))
        .service(
            web::resource("/api/news/local")
                .route(web::get().to(news::list_local))
                .route(web::post().to(news::add_local)),
        );
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().body("OK")
}

/// Bind a body identity field to the token's caller: empty takes the caller,
/// anything else must equal it.
pub(crate) fn bind_caller(field: &mut String, caller: &UserId, name: &str) -> Result<()> {
    if field.is_empty() {
        *field = caller.0.clone();
    } else if *field != caller.0 {
        return Err(AppError::Forbidden(format!(
            "{} does not match the authenticated user",
            name
        )));
    }
    Ok(())
}

/// Validate a request body, reporting missing fields as `required_message`.
pub(crate) fn validate_body<T: Validate>(body: &T, required_message: &str) -> Result<()> {
    body.validate()
        .map_err(|errors| AppError::Validation(validation_message(&errors, required_message)))
}
