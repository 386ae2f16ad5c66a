/// Request bodies accepted by the HTTP layer
///
/// Missing fields deserialize as empty strings so that every incomplete body
/// is reported with the same 400 message instead of a serde error.
use serde::Deserialize;
use validator::{Validate, ValidationErrors};

/// Message attached to every "field must be present" rule
pub const REQUIRED: &str = "required";

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct SubmitFormRequest {
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    #[validate(
        length(min = 1, message = "required"),
        email(message = "Invalid email address")
    )]
    pub email: String,
    #[validate(length(min = 1, message = "required"))]
    pub pincode: String,
    #[validate(length(min = 1, message = "required"))]
    pub phone: String,
    #[validate(length(min = 1, message = "required"))]
    pub gender: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[validate(length(min = 1, message = "required"))]
    pub title: String,
    #[validate(length(min = 1, message = "required"))]
    pub excerpt: String,
    #[validate(length(min = 1, message = "required"))]
    pub author: String,
    #[validate(length(min = 1, message = "required"))]
    pub date: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateReelRequest {
    #[validate(length(min = 1, message = "required"))]
    pub title: String,
    #[validate(length(min = 1, message = "required"))]
    pub author: String,
    #[validate(length(min = 1, message = "required"))]
    pub date: String,
    #[validate(length(min = 1, message = "required"))]
    pub description: String,
    pub video_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateReportRequest {
    #[validate(length(min = 1, message = "required"))]
    pub title: String,
    #[validate(length(min = 1, message = "required"))]
    pub description: String,
    #[validate(length(min = 1, message = "required"))]
    pub contact_name: String,
    #[validate(
        length(min = 1, message = "required"),
        email(message = "Invalid email address")
    )]
    pub contact_email: String,
    #[validate(length(max = 10, message = "At most 10 photos per report"))]
    pub photos: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, message = "required"))]
    pub content: String,
    /// Defaults to the authenticated caller
    pub author: String,
    #[validate(length(min = 1, message = "required"))]
    pub content_type: String,
    #[validate(length(min = 1, message = "required"))]
    pub content_id: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct RecordShareRequest {
    /// Defaults to the authenticated caller
    pub user_id: String,
    #[validate(length(min = 1, message = "required"))]
    pub content_type: String,
    #[validate(length(min = 1, message = "required"))]
    pub content_id: String,
    #[validate(length(min = 1, message = "required"))]
    pub platform: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateNewsRequest {
    #[validate(length(min = 1, message = "required"))]
    pub title: String,
    #[validate(length(min = 1, message = "required"))]
    pub description: String,
    pub url: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeStatusQuery {
    pub user_id: Option<String>,
}

/// Collapse validation errors into one client-facing message.
///
/// A missing required field wins and is reported as `required_message`;
/// otherwise the first rule's own message is used.
pub fn validation_message(errors: &ValidationErrors, required_message: &str) -> String {
    let mut field_errors: Vec<_> = errors.field_errors().into_iter().collect();
    field_errors.sort_by(|a, b| a.0.cmp(&b.0));

    let all = field_errors.iter().flat_map(|(_, errs)| errs.iter());
    if all
        .clone()
        .any(|e| e.message.as_deref() == Some(REQUIRED))
    {
        return required_message.to_string();
    }

    all.filter_map(|e| e.message.as_deref())
        .next()
        .map(str::to_string)
        .unwrap_or_else(|| required_message.to_string())
}
