use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::models::quiz_session::QuizSession;
use crate::services::resume_service::{MIME_DOC, MIME_DOCX, MIME_PDF};
use crate::utils::{time::now_millis, token::upload_suffix};

pub const ALLOWED_MIME_TYPES: [&str; 3] = [MIME_PDF, MIME_DOC, MIME_DOCX];

#[derive(Clone, Debug)]
pub struct UploadService {
    dir: PathBuf,
    max_bytes: usize,
}

impl UploadService {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
        }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Uploads after the assessment are only for candidates who submitted and passed.
    pub fn ensure_allowed(quiz: Option<&QuizSession>) -> Result<()> {
        match quiz {
            Some(q) if q.has_passed() => Ok(()),
            _ => Err(Error::Forbidden(
                "Upload not allowed. Minimum score not met.".to_string(),
            )),
        }
    }

    pub fn validate(&self, mime: &str, size: usize) -> Result<()> {
        if !ALLOWED_MIME_TYPES.contains(&mime) {
            return Err(Error::BadRequest(
                "Only PDF, DOC, DOCX files are allowed.".to_string(),
            ));
        }
        if size > self.max_bytes {
            return Err(Error::BadRequest(format!(
                "File too large. Maximum size is {} bytes.",
                self.max_bytes
            )));
        }
        Ok(())
    }

    /// Writes `data` under a collision-resistant name and returns that name.
    pub async fn store(&self, prefix: Option<&str>, original: &str, data: &[u8]) -> Result<String> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let name = stored_name(prefix, original);
        tokio::fs::write(self.dir.join(&name), data).await?;
        tracing::info!(filename = %name, bytes = data.len(), "Upload stored");
        Ok(name)
    }
}

fn stored_name(prefix: Option<&str>, original: &str) -> String {
    let base = original
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    let base = if base.is_empty() { "upload".to_string() } else { base };
    let unique = format!("{}-{}", now_millis(), upload_suffix());
    match prefix {
        Some(p) => format!("{}-{}-{}", p, unique, base),
        None => format!("{}-{}", unique, base),
    }
}
