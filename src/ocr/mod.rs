//! OCR capability backed by a local vision model.
//!
//! Image uploads are transcribed by posting the base64-encoded bytes to
//! Ollama's `/api/generate` endpoint with a vision-capable model. The client
//! surface mirrors the summarization capability: one request, one text
//! result, the same three-way error taxonomy.

use crate::config::get_config;
use crate::summarization::DEFAULT_OLLAMA_URL;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

const TRANSCRIPTION_PROMPT: &str = "Transcribe all text visible in this image, preserving the \
reading order. Respond with the transcribed text only. If the image contains no text, respond \
with an empty string.";

/// Errors surfaced while transcribing an image.
#[derive(Debug, Error)]
pub enum OcrClientError {
    /// Provider was unreachable or the endpoint is missing.
    #[error("OCR provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Provider returned an error response.
    #[error("Failed to transcribe image: {0}")]
    RecognitionFailed(String),
    /// Provider response could not be parsed.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

/// Request payload passed to the OCR provider.
#[derive(Debug, Clone)]
pub struct OcrRequest {
    /// Vision model identifier understood by the provider.
    pub model: String,
    /// Base64-encoded bytes of the image to transcribe.
    pub image_base64: String,
}

/// Interface implemented by OCR providers.
#[async_trait]
pub trait OcrClient: Send + Sync {
    /// Transcribe the text visible in the request image.
    async fn recognize(&self, request: OcrRequest) -> Result<String, OcrClientError>;
}

/// Build the OCR client described by configuration.
pub fn get_ocr_client() -> Box<dyn OcrClient + Send + Sync> {
    let config = get_config();
    let base_url = config
        .ollama_url
        .clone()
        .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());
    Box::new(OllamaOcrClient::new(base_url))
}

struct OllamaOcrClient {
    http: Client,
    base_url: String,
}

impl OllamaOcrClient {
    fn new(base_url: String) -> Self {
        let http = Client::builder()
            .user_agent("docsum/ocr")
            .build()
            .expect("Failed to construct reqwest::Client for OCR");
        Self { http, base_url }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
    done: bool,
}

#[async_trait]
impl OcrClient for OllamaOcrClient {
    async fn recognize(&self, request: OcrRequest) -> Result<String, OcrClientError> {
        let payload = json!({
            "model": request.model,
            "prompt": TRANSCRIPTION_PROMPT,
            "images": [request.image_base64],
            "stream": false,
            "options": {
                // Transcription wants verbatim output, not creativity.
                "temperature": 0.0,
            }
        });

        let response = self
            .http
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                OcrClientError::ProviderUnavailable(format!(
                    "failed to reach Ollama at {}: {error}",
                    self.base_url
                ))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(OcrClientError::ProviderUnavailable(format!(
                "Ollama endpoint {} returned 404",
                self.endpoint()
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OcrClientError::RecognitionFailed(format!(
                "Ollama returned {status}: {body}"
            )));
        }

        let body: OllamaResponse = response.json().await.map_err(|error| {
            OcrClientError::InvalidResponse(format!("failed to decode Ollama response: {error}"))
        })?;

        if !body.done {
            return Err(OcrClientError::InvalidResponse(
                "Ollama response incomplete (streaming not supported)".into(),
            ));
        }

        Ok(body.response.trim().to_string())
    }
}
