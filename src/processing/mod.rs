//! Document processing pipeline: extraction dispatch, text cleaning,
//! word-window chunking, and chunk-by-chunk summarization.

pub mod chunking;
pub mod sanitize;
mod service;
mod summarize;
pub mod types;

pub use service::{ProcessingApi, ProcessingService};
pub use types::{
    Chunk, ChunkFailure, ChunkingError, ProcessingError, ProcessingOutcome, SummaryResult,
};
