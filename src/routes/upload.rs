use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    response::{IntoResponse, Json, Response},
    Extension,
};
use bytes::Bytes;

use crate::dto::quiz_dto::{DetectResponse, UploadResponse};
use crate::error::{Error, Result};
use crate::middleware::session::CurrentSession;
use crate::services::language_detector;
use crate::services::resume_service::{ResumeFormat, ResumeService};
use crate::services::upload_service::UploadService;
use crate::AppState;

const FILE_FIELD: &str = "resume";
const SNIPPET_CHARS: usize = 1000;

struct UploadedFile {
    filename: String,
    content_type: String,
    data: Bytes,
}

fn no_file() -> Error {
    Error::BadRequest("No file uploaded".to_string())
}

/// A body that is not multipart carries no file.
fn require_multipart(
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Multipart> {
    multipart.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Upload body is not multipart");
        no_file()
    })
}

async fn read_resume_field(multipart: &mut Multipart) -> Result<Option<UploadedFile>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or("resume").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = field.bytes().await?;
        return Ok(Some(UploadedFile {
            filename,
            content_type,
            data,
        }));
    }
    Ok(None)
}

/// Accepts a resume from a candidate who passed the assessment.
#[axum::debug_handler]
pub async fn upload_resume(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Response> {
    let data = session.lock().await;
    UploadService::ensure_allowed(data.quiz.as_ref()).map_err(|e| {
        tracing::warn!("Upload attempted before passing the assessment");
        e
    })?;

    let mut multipart = require_multipart(multipart)?;
    let file = read_resume_field(&mut multipart)
        .await?
        .ok_or_else(no_file)?;
    state
        .upload_service
        .validate(&file.content_type, file.data.len())?;
    let filename = state
        .upload_service
        .store(None, &file.filename, &file.data)
        .await?;

    Ok(Json(UploadResponse { ok: true, filename }).into_response())
}

/// Extracts resume text and records which bank languages it mentions.
#[axum::debug_handler]
pub async fn detect_languages(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Response> {
    let mut multipart = require_multipart(multipart)?;
    let file = read_resume_field(&mut multipart)
        .await?
        .ok_or_else(no_file)?;
    let stored = state
        .upload_service
        .store(Some("detect"), &file.filename, &file.data)
        .await?;

    let format = ResumeFormat::detect(&file.content_type, &file.filename);
    let text = ResumeService::extract_text_blocking(format, file.data).await?;
    let detected = language_detector::detect(&text, &state.quiz_service.bank().languages());
    tracing::info!(file = %stored, ?format, detected = ?detected, "Resume languages detected");

    session.lock().await.detected_languages = detected.clone();
    Ok(Json(DetectResponse {
        detected,
        text_snippet: text.chars().take(SNIPPET_CHARS).collect(),
    })
    .into_response())
}
