//! Text extraction from résumé files.
//!
//! Extraction failures never propagate: they are logged and yield an empty
//! string, so normalization proceeds with default output.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use tracing::warn;

/// Turns a document on disk into plain text.
pub trait TextExtractor: Send + Sync {
    /// Returns the extracted text, or `""` when extraction fails.
    fn extract(&self, path: &Path) -> String;
}

/// `pdf-extract` backed extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, path: &Path) -> String {
        match std::fs::read(path) {
            Ok(bytes) => extract_pdf_text_from_mem(&bytes, &path.display().to_string()),
            Err(e) => {
                warn!("Error reading PDF {}: {e}", path.display());
                String::new()
            }
        }
    }
}

/// Extracts text from in-memory PDF bytes. `label` only appears in logs.
pub fn extract_pdf_text_from_mem(bytes: &[u8], label: &str) -> String {
    // pdf-extract panics on some malformed documents.
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(bytes)
    }));
    match result {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!("Error reading PDF {label}: {e}");
            String::new()
        }
        Err(_) => {
            warn!("PDF extractor panicked on {label}");
            String::new()
        }
    }
}

/// Decodes bytes as UTF-8, dropping sequences that are not valid.
pub fn decode_utf8_ignoring_errors(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => String::from_utf8_lossy(bytes)
            .chars()
            .filter(|&c| c != char::REPLACEMENT_CHARACTER)
            .collect(),
    }
}

/// True when the file name ends in `.pdf`, ignoring case.
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_is_pdf_case_insensitive() {
        assert!(is_pdf(Path::new("resume.pdf")));
        assert!(is_pdf(Path::new("/tmp/CV.PDF")));
        assert!(!is_pdf(Path::new("resume.txt")));
        assert!(!is_pdf(Path::new("pdf")));
    }

    #[test]
    fn test_decode_drops_invalid_bytes() {
        let bytes = b"python\xff\xfe developer";
        assert_eq!(decode_utf8_ignoring_errors(bytes), "python developer");
        assert_eq!(decode_utf8_ignoring_errors("résumé".as_bytes()), "résumé");
    }

    #[test]
    fn test_garbage_pdf_degrades_to_empty_text() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"this is not a pdf at all").unwrap();
        assert_eq!(PdfTextExtractor.extract(file.path()), "");
    }

    #[test]
    fn test_unreadable_pdf_path_degrades_to_empty_text() {
        assert_eq!(
            PdfTextExtractor.extract(Path::new("/definitely/not/here.pdf")),
            ""
        );
    }
}
