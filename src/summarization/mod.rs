//! Abstractions for summarizing text chunks via local model providers.
//!
//! The pipeline calls the capability once per chunk and tolerates individual
//! failures, so the client surface stays small: one request, one summary
//! string, one error taxonomy. The Ollama-backed adapter issues HTTP requests
//! directly to the runtime's `/api/generate` endpoint.

use crate::config::get_config;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

pub(crate) const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Errors surfaced while attempting chunk summarization.
#[derive(Debug, Error)]
pub enum SummarizationClientError {
    /// Provider was unreachable or the endpoint is missing.
    #[error("Summarization provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Provider returned an error response.
    #[error("Failed to generate summary: {0}")]
    GenerationFailed(String),
    /// Provider response could not be parsed.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

/// Request payload passed to the summarization provider.
#[derive(Debug, Clone)]
pub struct SummarizationRequest {
    /// Fully qualified model identifier understood by the provider.
    pub model: String,
    /// Chunk text to summarize.
    pub text: String,
    /// Upper word bound requested for the summary.
    pub max_words: usize,
    /// Lower word bound requested for the summary.
    pub min_words: usize,
}

/// Interface implemented by summarization providers.
#[async_trait]
pub trait SummarizationClient: Send + Sync {
    /// Generate a summary of the request text within the requested word bounds.
    async fn summarize(
        &self,
        request: SummarizationRequest,
    ) -> Result<String, SummarizationClientError>;
}

/// Build the summarization client described by configuration.
pub fn get_summarization_client() -> Box<dyn SummarizationClient + Send + Sync> {
    let config = get_config();
    let base_url = config
        .ollama_url
        .clone()
        .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());
    Box::new(OllamaSummarizationClient::new(base_url))
}

struct OllamaSummarizationClient {
    http: Client,
    base_url: String,
}

impl OllamaSummarizationClient {
    fn new(base_url: String) -> Self {
        let http = Client::builder()
            .user_agent("docsum/summary")
            .build()
            .expect("Failed to construct reqwest::Client for summarization");
        Self { http, base_url }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }
}

fn build_prompt(text: &str, max_words: usize, min_words: usize) -> String {
    format!(
        "Write a concise summary of the following text in {min_words} to {max_words} words. \
         Respond with the summary only, no preamble.\n\n{text}"
    )
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
    done: bool,
}

#[async_trait]
impl SummarizationClient for OllamaSummarizationClient {
    async fn summarize(
        &self,
        request: SummarizationRequest,
    ) -> Result<String, SummarizationClientError> {
        let payload = json!({
            "model": request.model,
            "prompt": build_prompt(&request.text, request.max_words, request.min_words),
            "stream": false,
            "options": {
                // Lower temperature for stable summaries.
                "temperature": 0.1,
            }
        });

        let response = self
            .http
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                SummarizationClientError::ProviderUnavailable(format!(
                    "failed to reach Ollama at {}: {error}",
                    self.base_url
                ))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(SummarizationClientError::ProviderUnavailable(format!(
                "Ollama endpoint {} returned 404",
                self.endpoint()
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizationClientError::GenerationFailed(format!(
                "Ollama returned {status}: {body}"
            )));
        }

        let body: OllamaResponse = response.json().await.map_err(|error| {
            SummarizationClientError::InvalidResponse(format!(
                "failed to decode Ollama response: {error}"
            ))
        })?;

        if !body.done {
            return Err(SummarizationClientError::InvalidResponse(
                "Ollama response incomplete (streaming not supported)".into(),
            ));
        }

        Ok(body.response.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};

    fn test_client(base_url: String) -> OllamaSummarizationClient {
        OllamaSummarizationClient {
            http: Client::builder()
                .user_agent("docsum-test")
                .build()
                .expect("client"),
            base_url,
        }
    }

    fn request() -> SummarizationRequest {
        SummarizationRequest {
            model: "llama".into(),
            text: "A long passage about rivers.".into(),
            max_words: 120,
            min_words: 36,
        }
    }

    #[tokio::test]
    async fn returns_trimmed_summary_and_embeds_word_bounds() {
        let server = MockServer::start_async().await;
        let client = test_client(server.base_url());

        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/generate")
                    .body_contains("36 to 120 words")
                    .body_contains("rivers");
                then.status(200).json_body(json!({
                    "response": "  Summary text  ",
                    "done": true
                }));
            })
            .await;

        let summary = client.summarize(request()).await.expect("summary");

        mock.assert();
        assert_eq!(summary, "Summary text");
    }

    #[tokio::test]
    async fn maps_error_status_to_generation_failed() {
        let server = MockServer::start_async().await;
        let client = test_client(server.base_url());

        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(500).body("boom");
            })
            .await;

        let error = client.summarize(request()).await.expect_err("error response");
        assert!(
            matches!(error, SummarizationClientError::GenerationFailed(message) if message.contains("500"))
        );
    }

    #[tokio::test]
    async fn incomplete_response_is_invalid() {
        let server = MockServer::start_async().await;
        let client = test_client(server.base_url());

        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(200).json_body(json!({
                    "response": "partial",
                    "done": false
                }));
            })
            .await;

        let error = client.summarize(request()).await.expect_err("incomplete");
        assert!(matches!(error, SummarizationClientError::InvalidResponse(_)));
    }
}
