/// Form intake handler
use super::validate_body;
use crate::domain::SubmitFormRequest;
use crate::error::Result;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

pub async fn submit_form(
    state: web::Data<AppState>,
    req: web::Json<SubmitFormRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    validate_body(&req, "All fields are required")?;

    let user = state.users.submit(req).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Form submitted successfully",
        "user": user,
    })))
}
