/// Error types for Civic Service
///
/// Errors are converted to `{ "error": <message>, "status": <code> }` responses.
/// Server-side failures are logged with their cause and answered with a
/// generic message so file paths never reach clients.
use crate::repository::StoreError;
use crate::services::LikeError;
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use file_lock::LockError;

/// Result type for civic-service operations
pub type Result<T> = std::result::Result<T, AppError>;

const RETRY_MESSAGE: &str = "Could not process request. Try again.";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Unauthorized(String),

    /// Exclusive access to a record file was not obtained in time
    #[error("Timed out waiting for {0}")]
    Timeout(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Lock error: {0}")]
    Lock(LockError),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<LockError> for AppError {
    fn from(err: LockError) -> Self {
        if err.is_timeout() {
            AppError::Timeout(err.to_string())
        } else {
            AppError::Lock(err)
        }
    }
}

impl From<LikeError> for AppError {
    fn from(err: LikeError) -> Self {
        match err {
            LikeError::NotFound { kind, .. } => AppError::NotFound(format!("{} not found", kind)),
            LikeError::Forbidden(_) => {
                AppError::Forbidden("Invalid or unauthorized userId".to_string())
            }
            LikeError::Timeout(e) => AppError::Timeout(e.to_string()),
            LikeError::Lock(e) => AppError::Lock(e),
            LikeError::Store(e) => AppError::Storage(e),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Timeout(_)
            | AppError::Storage(_)
            | AppError::Lock(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_msg = if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
            RETRY_MESSAGE.to_string()
        } else {
            self.to_string()
        };

        HttpResponse::build(status).json(serde_json::json!({
            "error": error_msg,
            "status": status.as_u16(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn status_codes() {
        assert_eq!(
            AppError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::Upstream("x".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn lock_timeout_maps_to_timeout() {
        let err: AppError = LockError::Timeout {
            path: PathBuf::from("posts.json.lock"),
            waited: Duration::from_millis(5),
        }
        .into();
        assert!(matches!(err, AppError::Timeout(_)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn server_errors_hide_details() {
        let err = AppError::Internal("/srv/data/posts.json: permission denied".into());
        let resp = err.error_response();
        let body = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], RETRY_MESSAGE);
        assert_eq!(json["status"], 500);
    }

    #[actix_web::test]
    async fn client_errors_keep_their_message() {
        let resp = AppError::NotFound("Post not found".into()).error_response();
        let body = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Post not found");
        assert_eq!(json["status"], 404);
    }
}
