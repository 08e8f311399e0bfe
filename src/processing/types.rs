//! Core data types and error definitions for the processing pipeline.

use crate::extraction::{DocumentKind, ExtractionError};
use thiserror::Error;

/// Errors produced while splitting cleaned text into word windows.
#[derive(Debug, Error)]
pub enum ChunkingError {
    /// A zero-word window can never hold a chunk.
    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,
}

/// Errors emitted by the document processing pipeline.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// Extraction failed before any text reached the pipeline.
    #[error("Failed to extract text: {0}")]
    Extraction(#[from] ExtractionError),
    /// Extraction succeeded but the document yielded no usable text.
    #[error("Document contains no extractable text")]
    EmptyDocument,
    /// Cleaned text is too short to form a single viable chunk.
    #[error("Extracted text is too short to summarize: {word_count} words, need at least {min_words}")]
    InsufficientText {
        /// Words present in the cleaned text.
        word_count: usize,
        /// Minimum words a chunk must carry.
        min_words: usize,
    },
    /// Chunking step failed to segment the document.
    #[error("Failed to chunk document: {0}")]
    Chunking(#[from] ChunkingError),
}

/// One bounded window of consecutive words from the cleaned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Zero-based position of this chunk within the document.
    pub index: usize,
    /// Space-joined words carried by the chunk.
    pub text: String,
    /// Number of words in `text`.
    pub word_count: usize,
}

/// Outcome of summarizing a single chunk.
#[derive(Debug, Clone)]
pub enum SummaryResult {
    /// The capability produced a summary for the chunk.
    Success {
        /// Index of the summarized chunk.
        chunk_index: usize,
        /// Summary text returned by the capability.
        summary_text: String,
    },
    /// The capability call failed; the original text is preserved for the caller.
    Failure {
        /// Index of the failed chunk.
        chunk_index: usize,
        /// Original chunk text, so nothing is silently lost.
        chunk_text: String,
        /// Human-readable description of the failure.
        error_message: String,
    },
}

/// A chunk whose summarization failed, reported verbatim to API consumers.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ChunkFailure {
    /// Index of the failed chunk.
    pub chunk_index: usize,
    /// Original chunk text.
    pub chunk_text: String,
    /// Description of what went wrong.
    pub error: String,
}

/// Result of a completed pipeline run, handed to the HTTP layer and the batch binary.
#[derive(Debug, Clone)]
pub struct ProcessingOutcome {
    /// Cleaned text extracted from the document.
    pub extracted_text: String,
    /// Pages the extractor visited; always 1 for images.
    pub page_count: usize,
    /// Kind of document that was processed.
    pub source: DocumentKind,
    /// Final summary joined from per-chunk successes, or the sentinel when none succeeded.
    pub summary: String,
    /// Chunks whose summarization failed, in chunk order.
    pub failed_chunks: Vec<ChunkFailure>,
    /// Ranked key phrases for the whole document.
    pub keywords: Vec<String>,
    /// Total chunks submitted for summarization.
    pub chunk_count: usize,
}

impl ProcessingOutcome {
    /// Number of chunks that were summarized successfully.
    pub fn summarized_count(&self) -> usize {
        self.chunk_count - self.failed_chunks.len()
    }
}
