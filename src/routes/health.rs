use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::dto::email_dto::HealthResponse;
use crate::utils::time::{now, to_rfc3339};

#[axum::debug_handler]
pub async fn health() -> impl IntoResponse {
    let body = HealthResponse {
        ok: true,
        time: to_rfc3339(now()),
    };
    (StatusCode::OK, Json(body))
}
