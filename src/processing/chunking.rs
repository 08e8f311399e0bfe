//! Word-window chunking for the summarization pipeline.
//!
//! Cleaned text is split on whitespace and grouped into consecutive windows of
//! a fixed word count. Windows are never merged or overlapped, so chunk order
//! mirrors document order and every chunk can be summarized independently. A
//! final window shorter than the configured minimum is dropped rather than
//! padded; the minimum exists because very short fragments produce noisy,
//! low-value summaries.

use super::types::{Chunk, ChunkingError};

pub(crate) const DEFAULT_CHUNK_SIZE_WORDS: usize = 512;
pub(crate) const DEFAULT_MIN_CHUNK_WORDS: usize = 50;

/// Determine the chunk window size, respecting the configured override.
///
/// Explicit overrides are clamped to at least one word.
pub(crate) fn determine_chunk_size(override_size: Option<usize>) -> usize {
    override_size.map_or(DEFAULT_CHUNK_SIZE_WORDS, |explicit| explicit.max(1))
}

/// Determine the minimum word count a window must carry to become a chunk.
pub(crate) fn determine_min_chunk_words(override_min: Option<usize>) -> usize {
    override_min.unwrap_or(DEFAULT_MIN_CHUNK_WORDS)
}

/// Split `text` into ordered word windows of `chunk_size_words` words.
///
/// Every window with at least `min_chunk_words` words becomes a [`Chunk`];
/// a shorter trailing window is dropped. Returns an empty vector for
/// whitespace-only input.
pub(crate) fn chunk_words(
    text: &str,
    chunk_size_words: usize,
    min_chunk_words: usize,
) -> Result<Vec<Chunk>, ChunkingError> {
    if chunk_size_words == 0 {
        return Err(ChunkingError::InvalidChunkSize);
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    let mut chunks = Vec::with_capacity(words.len() / chunk_size_words + 1);

    for (index, window) in words.chunks(chunk_size_words).enumerate() {
        if window.len() < min_chunk_words {
            tracing::debug!(
                index,
                word_count = window.len(),
                min_chunk_words,
                "Dropping window below minimum word count"
            );
            continue;
        }
        chunks.push(Chunk {
            index,
            text: window.join(" "),
            word_count: window.len(),
        });
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word_sequence(count: usize) -> String {
        (0..count)
            .map(|i| format!("w{i}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn splits_600_words_into_full_window_and_tail() {
        let text = word_sequence(600);
        let chunks = chunk_words(&text, 512, 50).expect("chunking succeeded");

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].index, 0);
        assert_eq!(chunks[0].word_count, 512);
        assert_eq!(chunks[1].index, 1);
        assert_eq!(chunks[1].word_count, 88);
    }

    #[test]
    fn drops_tail_below_minimum() {
        let text = word_sequence(530);
        let chunks = chunk_words(&text, 512, 50).expect("chunking succeeded");

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].word_count, 512);
    }

    #[test]
    fn exact_multiple_produces_only_full_windows() {
        let text = word_sequence(1024);
        let chunks = chunk_words(&text, 512, 50).expect("chunking succeeded");

        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|chunk| chunk.word_count == 512));
    }

    #[test]
    fn preserves_word_order_across_chunks() {
        let text = word_sequence(600);
        let chunks = chunk_words(&text, 512, 50).expect("chunking succeeded");

        let rejoined: Vec<String> = chunks
            .iter()
            .flat_map(|chunk| chunk.text.split_whitespace().map(str::to_string))
            .collect();
        let original: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        assert_eq!(rejoined, original);
    }

    #[test]
    fn rejects_zero_chunk_size() {
        let error = chunk_words("hello there", 0, 1).unwrap_err();
        assert!(matches!(error, ChunkingError::InvalidChunkSize));
    }

    #[test]
    fn short_text_yields_no_chunks() {
        let chunks = chunk_words("just a few words", 512, 50).expect("chunking succeeded");
        assert!(chunks.is_empty());
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        let chunks = chunk_words("   ", 512, 50).expect("chunking succeeded");
        assert!(chunks.is_empty());
    }

    #[test]
    fn determine_chunk_size_prefers_override_and_clamps() {
        assert_eq!(determine_chunk_size(Some(64)), 64);
        assert_eq!(determine_chunk_size(Some(0)), 1);
        assert_eq!(determine_chunk_size(None), DEFAULT_CHUNK_SIZE_WORDS);
    }

    #[test]
    fn determine_min_chunk_words_defaults() {
        assert_eq!(determine_min_chunk_words(Some(10)), 10);
        assert_eq!(determine_min_chunk_words(None), DEFAULT_MIN_CHUNK_WORDS);
    }
}
