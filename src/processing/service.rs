//! Processing service coordinating extraction, cleaning, chunking,
//! summarization and keyword ranking.

use crate::{
    config::get_config,
    extraction::{self, DocumentKind, ExtractionError},
    keywords::{self, PhraseRanker, get_phrase_ranker},
    metrics::{MetricsSnapshot, ProcessingMetrics},
    ocr::{OcrClient, get_ocr_client},
    processing::{
        chunking::{chunk_words, determine_chunk_size, determine_min_chunk_words},
        sanitize,
        summarize::{failed_chunks, join_summaries, summarize_chunks},
        types::{ProcessingError, ProcessingOutcome},
    },
    summarization::{SummarizationClient, get_summarization_client},
};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// Coordinates the full document pipeline: extraction, cleaning, chunking,
/// per-chunk summarization and keyword ranking.
///
/// The service owns long-lived capability clients and the metrics registry so
/// that the HTTP surface and the batch binary reuse the same components.
/// Construct it once near process start and share it through an `Arc`.
pub struct ProcessingService {
    ocr_client: Box<dyn OcrClient + Send + Sync>,
    summarization_client: Box<dyn SummarizationClient + Send + Sync>,
    phrase_ranker: Box<dyn PhraseRanker + Send + Sync>,
    metrics: Arc<ProcessingMetrics>,
}

/// Abstraction over the processing pipeline used by external surfaces.
#[async_trait]
pub trait ProcessingApi: Send + Sync {
    /// Run the full pipeline over the stored document at `path`.
    async fn process_document(
        &self,
        path: &Path,
        extension: &str,
    ) -> Result<ProcessingOutcome, ProcessingError>;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl ProcessingService {
    /// Build the processing service from the configured capability adapters.
    pub fn new() -> Self {
        tracing::info!("Initializing capability clients");
        Self::with_capabilities(
            get_ocr_client(),
            get_summarization_client(),
            get_phrase_ranker(),
        )
    }

    /// Build a service with explicit capability implementations.
    ///
    /// This is the seam tests use to substitute scripted fakes for the model
    /// adapters.
    pub fn with_capabilities(
        ocr_client: Box<dyn OcrClient + Send + Sync>,
        summarization_client: Box<dyn SummarizationClient + Send + Sync>,
        phrase_ranker: Box<dyn PhraseRanker + Send + Sync>,
    ) -> Self {
        Self {
            ocr_client,
            summarization_client,
            phrase_ranker,
            metrics: Arc::new(ProcessingMetrics::new()),
        }
    }

    /// Extract, clean, chunk, summarize and keyword the document at `path`.
    ///
    /// The extension decides how text is extracted; everything after that is
    /// uniform. Per-chunk summarization failures are folded into the outcome
    /// rather than failing the call.
    pub async fn process_document(
        &self,
        path: &Path,
        extension: &str,
    ) -> Result<ProcessingOutcome, ProcessingError> {
        let config = get_config();
        let kind =
            DocumentKind::from_extension(extension).ok_or_else(|| ExtractionError::UnsupportedType {
                extension: extension.to_lowercase(),
            })?;
        tracing::info!(document = %path.display(), kind = ?kind, "Processing document");

        let document =
            extraction::extract_document(path, kind, self.ocr_client.as_ref(), &config.ocr_model)
                .await?;
        let cleaned = sanitize::clean(&document.raw_text);
        if cleaned.is_empty() {
            return Err(ProcessingError::EmptyDocument);
        }

        let chunk_size = determine_chunk_size(config.chunk_size_words);
        let min_chunk_words = determine_min_chunk_words(config.chunk_min_words);
        let chunks = chunk_words(&cleaned, chunk_size, min_chunk_words)?;
        if chunks.is_empty() {
            return Err(ProcessingError::InsufficientText {
                word_count: cleaned.split_whitespace().count(),
                min_words: min_chunk_words,
            });
        }
        tracing::debug!(
            chunks = chunks.len(),
            chunk_size,
            min_chunk_words,
            "Chunked document"
        );

        let results = summarize_chunks(
            self.summarization_client.as_ref(),
            &config.summarization_model,
            config.summary_length_mode,
            &chunks,
        )
        .await;
        let summary = join_summaries(&results);
        let failed = failed_chunks(&results);

        let keyword_list = keywords::top_keywords(self.phrase_ranker.as_ref(), &cleaned).await;

        let chunk_count = chunks.len();
        self.metrics.record_document(
            (chunk_count - failed.len()) as u64,
            failed.len() as u64,
        );
        tracing::info!(
            document = %path.display(),
            pages = document.page_count,
            chunks = chunk_count,
            failed = failed.len(),
            keywords = keyword_list.len(),
            "Document processed"
        );

        Ok(ProcessingOutcome {
            extracted_text: cleaned,
            page_count: document.page_count,
            source: document.source,
            summary,
            failed_chunks: failed,
            keywords: keyword_list,
            chunk_count,
        })
    }

    /// Return the current processing metrics snapshot.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[async_trait]
impl ProcessingApi for ProcessingService {
    async fn process_document(
        &self,
        path: &Path,
        extension: &str,
    ) -> Result<ProcessingOutcome, ProcessingError> {
        ProcessingService::process_document(self, path, extension).await
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        ProcessingService::metrics_snapshot(self)
    }
}
