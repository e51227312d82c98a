//! Resume ingestion: turns an uploaded document into raw text for the extractor.

use bytes::Bytes;
use tracing::{debug, warn};

use crate::errors::AppError;

/// Document kinds accepted by the upload endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    /// Read as plain text, the same way the browser upload form always did.
    Docx,
    PlainText,
}

impl DocumentKind {
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, extension) = file_name.rsplit_once('.')?;
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            "txt" | "md" => Some(DocumentKind::PlainText),
            _ => None,
        }
    }
}

/// A file received from a client, not yet decoded.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub data: Bytes,
}

/// Reads an uploaded resume and returns its text content.
pub fn read_upload(upload: &Upload, max_bytes: usize) -> Result<String, AppError> {
    let kind = DocumentKind::from_file_name(&upload.file_name).ok_or_else(|| {
        AppError::UnsupportedMedia("Please upload a PDF or DOCX file".to_string())
    })?;

    if upload.data.is_empty() {
        return Err(AppError::Validation(format!(
            "{} is empty",
            upload.file_name
        )));
    }
    if upload.data.len() > max_bytes {
        return Err(AppError::Validation(format!(
            "{} exceeds the {max_bytes}-byte upload limit",
            upload.file_name
        )));
    }

    let text = match kind {
        DocumentKind::Pdf => pdf_extract::extract_text_from_mem(&upload.data).map_err(|e| {
            warn!("PDF extraction failed for {}: {e}", upload.file_name);
            AppError::UnprocessableEntity(format!("Failed to process file: {e}"))
        })?,
        DocumentKind::Docx | DocumentKind::PlainText => {
            String::from_utf8_lossy(&upload.data).into_owned()
        }
    };

    debug!(
        "Read {} characters from {} ({kind:?})",
        text.len(),
        upload.file_name
    );
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str, data: &'static [u8]) -> Upload {
        Upload {
            file_name: name.to_string(),
            data: Bytes::from_static(data),
        }
    }

    #[test]
    fn test_kind_from_extension_is_case_insensitive() {
        assert_eq!(DocumentKind::from_file_name("cv.PDF"), Some(DocumentKind::Pdf));
        assert_eq!(
            DocumentKind::from_file_name("cv.final.Docx"),
            Some(DocumentKind::Docx)
        );
        assert_eq!(
            DocumentKind::from_file_name("notes.md"),
            Some(DocumentKind::PlainText)
        );
        assert_eq!(DocumentKind::from_file_name("resume"), None);
        assert_eq!(DocumentKind::from_file_name("resume.png"), None);
    }

    #[test]
    fn test_plain_text_upload_is_returned_verbatim() {
        let text = read_upload(&upload("cv.txt", b"Data Scientist\nPython"), 1024).unwrap();
        assert_eq!(text, "Data Scientist\nPython");
    }

    #[test]
    fn test_unsupported_extension_is_rejected() {
        let err = read_upload(&upload("cv.png", b"\x89PNG"), 1024).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedMedia(_)));
    }

    #[test]
    fn test_empty_upload_is_rejected() {
        let err = read_upload(&upload("cv.txt", b""), 1024).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_oversized_upload_is_rejected() {
        let err = read_upload(&upload("cv.txt", b"0123456789"), 4).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("4-byte")));
    }

    #[test]
    fn test_corrupt_pdf_is_unprocessable() {
        let err = read_upload(&upload("cv.pdf", b"not really a pdf"), 1024).unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }
}
