#![deny(missing_docs)]

//! Core library for the docsum document processing service.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Text extraction from uploaded images and PDFs.
pub mod extraction;
/// Keyword extraction over cleaned document text.
pub mod keywords;
/// Structured logging and tracing setup.
pub mod logging;
/// Processing metrics helpers.
pub mod metrics;
/// OCR client abstraction and adapters.
pub mod ocr;
/// Document processing pipeline utilities.
pub mod processing;
/// Upload persistence and naming.
pub mod storage;
/// Summarization client abstraction and adapters.
pub mod summarization;
