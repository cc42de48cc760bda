//! Raw-text extraction from uploaded files.
//!
//! Only PDF and plain text are understood. Any other type extracts to an
//! empty string, which chunks to nothing.

use docchat_core::ExtractionError;
use std::path::Path;
use tracing::{debug, warn};

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_TEXT: &str = "text/plain";
pub const MIME_OCTET_STREAM: &str = "application/octet-stream";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    PlainText,
    Unsupported,
}

impl DocumentKind {
    /// Parameters such as `; charset=utf-8` are ignored.
    pub fn from_mime(mime: &str) -> Self {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        if essence.eq_ignore_ascii_case(MIME_PDF) {
            DocumentKind::Pdf
        } else if essence.eq_ignore_ascii_case(MIME_TEXT) {
            DocumentKind::PlainText
        } else {
            DocumentKind::Unsupported
        }
    }

    /// Guess the kind from a file extension.
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match extension.as_deref() {
            Some("pdf") => DocumentKind::Pdf,
            Some("txt" | "text" | "md") => DocumentKind::PlainText,
            _ => DocumentKind::Unsupported,
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            DocumentKind::Pdf => MIME_PDF,
            DocumentKind::PlainText => MIME_TEXT,
            DocumentKind::Unsupported => MIME_OCTET_STREAM,
        }
    }
}

/// An uploaded file as handed over by the display surface.
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Read a file from disk, deriving its MIME type from the extension.
    pub fn from_path(path: &Path) -> Result<Self, ExtractionError> {
        let bytes = std::fs::read(path).map_err(|e| ExtractionError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, DocumentKind::from_path(path).mime(), bytes))
    }

    pub fn kind(&self) -> DocumentKind {
        DocumentKind::from_mime(&self.mime)
    }

    /// Extract the upload's raw text.
    pub fn extract_text(&self) -> Result<String, ExtractionError> {
        extract_text(&self.bytes, &self.mime)
    }
}

/// Extract raw text from file bytes of the given MIME type.
pub fn extract_text(bytes: &[u8], mime: &str) -> Result<String, ExtractionError> {
    let text = match DocumentKind::from_mime(mime) {
        DocumentKind::Pdf => {
            let raw = pdf_extract::extract_text_from_mem(bytes)
                .map_err(|e| ExtractionError::Pdf(e.to_string()))?;
            join_pages(&raw)
        }
        DocumentKind::PlainText => String::from_utf8(bytes.to_vec())?,
        DocumentKind::Unsupported => {
            warn!(mime, "Unsupported document type, treating as empty");
            String::new()
        }
    };

    debug!(mime, bytes = bytes.len(), chars = text.chars().count(), "Extracted document text");
    Ok(text)
}

/// pdf-extract separates pages with form feeds; pages without text are dropped.
fn join_pages(raw: &str) -> String {
    raw.split('\x0C')
        .filter(|page| !page.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
