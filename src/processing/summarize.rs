//! Per-chunk summarization orchestration.
//!
//! Chunks are summarized strictly in order, one capability call at a time; a
//! failing chunk is recorded and the fold moves on, so one bad model response
//! never costs the caller the rest of the document. The final summary joins
//! the successes in chunk order, with a fixed sentinel when nothing succeeded.

use crate::config::SummaryLengthMode;
use crate::processing::types::{Chunk, ChunkFailure, SummaryResult};
use crate::summarization::{SummarizationClient, SummarizationRequest};

const ADAPTIVE_MAX_WORDS: usize = 150;
const ADAPTIVE_MIN_FLOOR: usize = 20;
const ADAPTIVE_MIN_RATIO: f64 = 0.3;
const FIXED_MAX_WORDS: usize = 130;
const FIXED_MIN_WORDS: usize = 30;

/// Summary returned when no chunk could be summarized.
pub(crate) const NO_SUMMARY_SENTINEL: &str = "no summary available";

/// Word bounds requested from the summarization capability for one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LengthBounds {
    pub(crate) max_words: usize,
    pub(crate) min_words: usize,
}

/// Derive the summary word bounds for a chunk of `word_count` words.
///
/// Adaptive mode caps the maximum at the chunk's own length so a short chunk
/// is never asked for a summary longer than itself; the minimum scales with
/// the maximum but never drops below the floor.
pub(crate) fn length_bounds(mode: SummaryLengthMode, word_count: usize) -> LengthBounds {
    match mode {
        SummaryLengthMode::Adaptive => {
            let max_words = ADAPTIVE_MAX_WORDS.min(word_count);
            let scaled = (max_words as f64 * ADAPTIVE_MIN_RATIO).round() as usize;
            LengthBounds {
                max_words,
                min_words: ADAPTIVE_MIN_FLOOR.max(scaled),
            }
        }
        SummaryLengthMode::Fixed => LengthBounds {
            max_words: FIXED_MAX_WORDS,
            min_words: FIXED_MIN_WORDS,
        },
    }
}

/// Summarize every chunk in order, tolerating per-chunk failures.
///
/// Returns one [`SummaryResult`] per chunk, in chunk order.
pub(crate) async fn summarize_chunks(
    client: &dyn SummarizationClient,
    model: &str,
    mode: SummaryLengthMode,
    chunks: &[Chunk],
) -> Vec<SummaryResult> {
    let mut results = Vec::with_capacity(chunks.len());

    for chunk in chunks {
        let bounds = length_bounds(mode, chunk.word_count);
        let request = SummarizationRequest {
            model: model.to_string(),
            text: chunk.text.clone(),
            max_words: bounds.max_words,
            min_words: bounds.min_words,
        };

        match client.summarize(request).await {
            Ok(summary_text) => {
                results.push(SummaryResult::Success {
                    chunk_index: chunk.index,
                    summary_text,
                });
            }
            Err(error) => {
                tracing::warn!(
                    chunk_index = chunk.index,
                    error = %error,
                    "Chunk summarization failed; continuing with remaining chunks"
                );
                results.push(SummaryResult::Failure {
                    chunk_index: chunk.index,
                    chunk_text: chunk.text.clone(),
                    error_message: error.to_string(),
                });
            }
        }
    }

    results
}

/// Join per-chunk successes into the final summary, in chunk order.
pub(crate) fn join_summaries(results: &[SummaryResult]) -> String {
    let summaries: Vec<&str> = results
        .iter()
        .filter_map(|result| match result {
            SummaryResult::Success { summary_text, .. } => Some(summary_text.as_str()),
            SummaryResult::Failure { .. } => None,
        })
        .collect();

    if summaries.is_empty() {
        NO_SUMMARY_SENTINEL.to_string()
    } else {
        summaries.join(" ")
    }
}

/// Collect the failed chunks, in chunk order, for the response body.
pub(crate) fn failed_chunks(results: &[SummaryResult]) -> Vec<ChunkFailure> {
    results
        .iter()
        .filter_map(|result| match result {
            SummaryResult::Failure {
                chunk_index,
                chunk_text,
                error_message,
            } => Some(ChunkFailure {
                chunk_index: *chunk_index,
                chunk_text: chunk_text.clone(),
                error: error_message.clone(),
            }),
            SummaryResult::Success { .. } => None,
        })
        .collect()
}
