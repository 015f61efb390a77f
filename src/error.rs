use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Operation invoked out of sequence (no quiz, review before submit, ...).
    #[error("Invalid state: {0}")]
    State(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The message is what the caller sees; the underlying cause is logged where it happens.
    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Body could not be read as JSON (bad syntax, wrong content type, shape mismatch).
    #[error("Invalid request body: {0}")]
    JsonBody(#[from] JsonRejection),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message) = match self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::State(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            Error::ExternalService(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            Error::Json(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::JsonBody(rejection) => {
                tracing::debug!(error = %rejection, "Rejected request body");
                (StatusCode::BAD_REQUEST, "Invalid JSON body".to_string())
            }
            Error::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_string(),
                )
            }
            Error::Config(msg) => {
                tracing::error!(error = %msg, "Configuration error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_string(),
                )
            }
            Error::Io(err) => {
                tracing::error!(error = %err, "IO error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "File operation failed".to_string(),
                )
            }
            Error::Multipart(err) => (StatusCode::BAD_REQUEST, err.to_string()),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
