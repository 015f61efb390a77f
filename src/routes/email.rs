use axum::{
    extract::State,
    response::{IntoResponse, Json, Response},
};
use axum_extra::extract::WithRejection;

use crate::dto::email_dto::{SendEmailRequest, SendEmailResponse};
use crate::error::{Error, Result};
use crate::services::email_service::EmailService;
use crate::AppState;

/// Renders the status template for a candidate and relays it over SMTP.
#[axum::debug_handler]
pub async fn send_email(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<SendEmailRequest>, Error>,
) -> Result<Response> {
    let email = EmailService::prepare(&req)?;
    let message_id = state.email_service.send(email).await?;
    Ok(Json(SendEmailResponse {
        ok: true,
        message_id,
    })
    .into_response())
}
