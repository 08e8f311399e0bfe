//! Lightweight in-process counters for the processing pipeline.
//!
//! Counters are plain atomics; the HTTP layer exposes them via `GET /metrics`.

use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing document processing activity.
#[derive(Default)]
pub struct ProcessingMetrics {
    documents_processed: AtomicU64,
    chunks_summarized: AtomicU64,
    chunks_failed: AtomicU64,
}

impl ProcessingMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a processed document along with its summarized and failed chunk counts.
    pub fn record_document(&self, summarized: u64, failed: u64) {
        self.documents_processed.fetch_add(1, Ordering::Relaxed);
        self.chunks_summarized.fetch_add(summarized, Ordering::Relaxed);
        self.chunks_failed.fetch_add(failed, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            documents_processed: self.documents_processed.load(Ordering::Relaxed),
            chunks_summarized: self.chunks_summarized.load(Ordering::Relaxed),
            chunks_failed: self.chunks_failed.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of processing counters used for reporting.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Number of documents processed since startup.
    pub documents_processed: u64,
    /// Total chunks summarized successfully across all documents.
    pub chunks_summarized: u64,
    /// Total chunks whose summarization failed across all documents.
    pub chunks_failed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_documents_and_chunks() {
        let metrics = ProcessingMetrics::new();
        metrics.record_document(2, 1);
        metrics.record_document(3, 0);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.documents_processed, 2);
        assert_eq!(snapshot.chunks_summarized, 5);
        assert_eq!(snapshot.chunks_failed, 1);
    }

    #[test]
    fn snapshot_starts_at_zero() {
        let metrics = ProcessingMetrics::new();
        assert_eq!(metrics.snapshot().documents_processed, 0);
        assert_eq!(metrics.snapshot().chunks_summarized, 0);
        assert_eq!(metrics.snapshot().chunks_failed, 0);
    }
}
