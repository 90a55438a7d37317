// PDF parsing and text extraction

use log::debug;
use std::path::Path;
use thiserror::Error;

/// Errors from PDF text extraction
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Input file not found: {0}")]
    NotFound(String),

    #[error("PDF is password-protected: {0}")]
    Encrypted(String),

    #[error("Failed to parse PDF: {0}")]
    Parse(String),

    #[error("No extractable text in PDF (scanned or image-only document?)")]
    NoText,
}

/// Text content extracted from a PDF
#[derive(Debug)]
pub struct Document {
    /// Page texts in reading order, one entry per page
    pub pages: Vec<String>,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// True if at least one page carries non-whitespace text
    pub fn has_text(&self) -> bool {
        self.pages.iter().any(|p| !p.trim().is_empty())
    }

    /// All page texts joined in reading order
    pub fn full_text(&self) -> String {
        self.pages.join("\n\n")
    }

    /// Total word count across all pages (approximate)
    pub fn total_words(&self) -> usize {
        self.pages
            .iter()
            .map(|p| p.split_whitespace().count())
            .sum()
    }
}

/// Extract text from a PDF file, page by page.
///
/// Empty pages stay in the result so the page count matches the document;
/// dropping blank text is the normalizer's job.
pub fn extract_document(path: &Path) -> Result<Document, ExtractError> {
    if !path.exists() {
        return Err(ExtractError::NotFound(path.display().to_string()));
    }

    let pages = pdf_extract::extract_text_by_pages(path).map_err(classify_parse_error)?;
    debug!(
        "extracted {} pages ({} chars) from {}",
        pages.len(),
        pages.iter().map(|p| p.chars().count()).sum::<usize>(),
        path.display()
    );

    Ok(Document { pages })
}

/// Distinguish encrypted documents from plain parse failures
fn classify_parse_error(e: pdf_extract::OutputError) -> ExtractError {
    let message = e.to_string();
    let lowered = message.to_lowercase();
    if lowered.contains("encrypt") || lowered.contains("decrypt") || lowered.contains("password") {
        ExtractError::Encrypted(message)
    } else {
        ExtractError::Parse(message)
    }
}
