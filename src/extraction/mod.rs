//! Text extraction dispatch for uploaded documents.
//!
//! A stored upload enters the pipeline as either an image or a PDF. Images are
//! decoded with the `image` crate before the OCR capability is invoked; PDFs
//! are parsed with `lopdf` and drained page by page. Both paths normalize into
//! one plain-text stream for the cleaner.

mod pdf;

use crate::ocr::{OcrClient, OcrClientError, OcrRequest};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use std::path::Path;
use thiserror::Error;

/// Errors raised while turning an uploaded file into raw text.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// File extension does not map to a supported document kind.
    #[error("Unsupported document type: .{extension}")]
    UnsupportedType {
        /// Extension that failed to resolve.
        extension: String,
    },
    /// Upload carried an image extension but its bytes do not decode.
    #[error("File is not a readable image: {0}")]
    UnreadableImage(String),
    /// PDF could not be parsed.
    #[error("Failed to parse PDF document: {0}")]
    Pdf(#[from] lopdf::Error),
    /// Reading the stored file failed.
    #[error("Failed to read document from disk: {0}")]
    Io(#[from] std::io::Error),
    /// OCR capability failed to transcribe the image.
    #[error("OCR capability failed: {0}")]
    Ocr(#[from] OcrClientError),
}

/// Supported document kinds, resolved from the upload's file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Raster image transcribed through the OCR capability.
    Image,
    /// PDF document extracted page by page.
    Pdf,
}

impl DocumentKind {
    /// Resolve a document kind from a file extension, case-insensitively.
    ///
    /// Returns `None` for anything that is neither a supported image type nor
    /// a PDF, which keeps unsupported uploads out of the pipeline entirely.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "jpg" | "jpeg" | "png" => Some(Self::Image),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }
}

/// Raw text pulled out of a document, before any cleaning.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    /// Extracted text as produced by OCR or the PDF parser.
    pub raw_text: String,
    /// Kind of document the text came from.
    pub source: DocumentKind,
    /// Pages visited during extraction; always 1 for images.
    pub page_count: usize,
}

/// Extract the raw text of the document stored at `path`.
///
/// Empty extracted text is legal here; the pipeline decides downstream whether
/// the document is worth summarizing.
pub async fn extract_document(
    path: &Path,
    kind: DocumentKind,
    ocr_client: &dyn OcrClient,
    ocr_model: &str,
) -> Result<ExtractedDocument, ExtractionError> {
    match kind {
        DocumentKind::Image => extract_image(path, ocr_client, ocr_model).await,
        DocumentKind::Pdf => {
            let bytes = tokio::fs::read(path).await?;
            let (raw_text, page_count) = pdf::extract(&bytes)?;
            Ok(ExtractedDocument {
                raw_text,
                source: DocumentKind::Pdf,
                page_count,
            })
        }
    }
}

async fn extract_image(
    path: &Path,
    ocr_client: &dyn OcrClient,
    ocr_model: &str,
) -> Result<ExtractedDocument, ExtractionError> {
    let bytes = tokio::fs::read(path).await?;
    // Prove the bytes decode before spending an OCR round-trip on them.
    image::load_from_memory(&bytes)
        .map_err(|error| ExtractionError::UnreadableImage(error.to_string()))?;

    let request = OcrRequest {
        model: ocr_model.to_string(),
        image_base64: STANDARD.encode(&bytes),
    };
    let raw_text = ocr_client.recognize(request).await?;

    Ok(ExtractedDocument {
        raw_text,
        source: DocumentKind::Image,
        page_count: 1,
    })
}
