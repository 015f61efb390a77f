use std::io::{Cursor, Read};
use std::sync::OnceLock;

use bytes::Bytes;
use regex::Regex;

use crate::error::{Error, Result};

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOC: &str = "application/msword";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const PARSE_FAILED: &str = "Failed to parse resume";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    Docx,
    /// Legacy binary Word files and anything unrecognised; decoded as best-effort text.
    PlainText,
}

impl ResumeFormat {
    /// Chooses by MIME type first, then by file extension.
    pub fn detect(mime: &str, filename: &str) -> Self {
        let name = filename.to_lowercase();
        if mime == MIME_PDF || name.ends_with(".pdf") {
            ResumeFormat::Pdf
        } else if mime == MIME_DOCX || name.ends_with(".docx") {
            ResumeFormat::Docx
        } else {
            ResumeFormat::PlainText
        }
    }
}

pub struct ResumeService;

impl ResumeService {
    pub fn extract_text(format: ResumeFormat, data: &[u8]) -> Result<String> {
        match format {
            // pdf-extract panics on some malformed inputs instead of returning an error.
            ResumeFormat::Pdf => {
                match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(data)) {
                    Ok(Ok(text)) => Ok(text),
                    Ok(Err(e)) => {
                        tracing::error!(error = %e, "PDF text extraction failed");
                        Err(Error::ExternalService(PARSE_FAILED.to_string()))
                    }
                    Err(_) => {
                        tracing::error!("PDF text extraction panicked");
                        Err(Error::ExternalService(PARSE_FAILED.to_string()))
                    }
                }
            }
            ResumeFormat::Docx => extract_docx(data).map_err(|e| {
                tracing::error!(error = %e, "DOCX text extraction failed");
                Error::ExternalService(PARSE_FAILED.to_string())
            }),
            ResumeFormat::PlainText => Ok(String::from_utf8_lossy(data).into_owned()),
        }
    }

    /// Runs extraction on the blocking pool so large documents don't stall other sessions.
    pub async fn extract_text_blocking(format: ResumeFormat, data: Bytes) -> Result<String> {
        tokio::task::spawn_blocking(move || Self::extract_text(format, &data))
            .await
            .map_err(|e| Error::Internal(format!("Extraction task failed: {}", e)))?
    }
}

fn extract_docx(data: &[u8]) -> anyhow::Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))?;
    let mut document = archive.by_name("word/document.xml")?;
    let mut xml = String::new();
    document.read_to_string(&mut xml)?;
    Ok(docx_xml_to_text(&xml))
}

fn docx_xml_to_text(xml: &str) -> String {
    static TAGS: OnceLock<Regex> = OnceLock::new();
    let tags = TAGS.get_or_init(|| Regex::new(r"<[^>]+>").expect("valid tag pattern"));

    let spaced = xml
        .replace("</w:p>", "\n")
        .replace("<w:tab/>", "\t")
        .replace("<w:br/>", "\n");
    tags.replace_all(&spaced, "")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
