use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the docsum server.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Directory where uploaded documents are persisted.
    pub upload_dir: PathBuf,
    /// URL prefix under which stored uploads are reported back to clients.
    pub public_upload_base: String,
    /// Lowercased file extensions accepted by the upload endpoint.
    pub allowed_extensions: Vec<String>,
    /// Vision model identifier passed to the OCR capability.
    pub ocr_model: String,
    /// Model identifier passed to the summarization capability.
    pub summarization_model: String,
    /// Optional base URL of the Ollama runtime hosting both models.
    pub ollama_url: Option<String>,
    /// Optional override for the chunk window size in words.
    pub chunk_size_words: Option<usize>,
    /// Optional override for the minimum word count a chunk must carry.
    pub chunk_min_words: Option<usize>,
    /// Strategy for deriving per-chunk summary length bounds.
    pub summary_length_mode: SummaryLengthMode,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
}

/// Supported strategies for sizing the summaries requested from the model.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLengthMode {
    /// Scale the word bounds with each chunk's length.
    Adaptive,
    /// Apply the same fixed word bounds to every chunk.
    Fixed,
}

const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["pdf", "jpg", "jpeg", "png"];

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            upload_dir: load_env_optional("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("uploads")),
            public_upload_base: load_env_optional("PUBLIC_UPLOAD_BASE")
                .unwrap_or_else(|| "/uploads".to_string()),
            allowed_extensions: load_env_optional("ALLOWED_EXTENSIONS")
                .map(|value| parse_extensions(&value))
                .unwrap_or_else(default_extensions),
            ocr_model: load_env("OCR_MODEL")?,
            summarization_model: load_env("SUMMARIZATION_MODEL")?,
            ollama_url: load_env_optional("OLLAMA_URL"),
            chunk_size_words: load_env_optional("CHUNK_SIZE_WORDS")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("CHUNK_SIZE_WORDS".to_string()))
                })
                .transpose()?,
            chunk_min_words: load_env_optional("CHUNK_MIN_WORDS")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("CHUNK_MIN_WORDS".to_string()))
                })
                .transpose()?,
            summary_length_mode: load_env_optional("SUMMARY_LENGTH_MODE")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|()| ConfigError::InvalidValue("SUMMARY_LENGTH_MODE".to_string()))
                })
                .transpose()?
                .unwrap_or(SummaryLengthMode::Adaptive),
            server_port: load_env_optional("SERVER_PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?,
        })
    }
}

fn load_env(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingVariable(key.to_string()))
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_extensions(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}

fn default_extensions() -> Vec<String> {
    DEFAULT_ALLOWED_EXTENSIONS
        .iter()
        .map(|ext| (*ext).to_string())
        .collect()
}

impl std::str::FromStr for SummaryLengthMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "adaptive" => Ok(Self::Adaptive),
            "fixed" => Ok(Self::Fixed),
            _ => Err(()),
        }
    }
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    tracing::debug!(
        upload_dir = %config.upload_dir.display(),
        ocr_model = %config.ocr_model,
        summarization_model = %config.summarization_model,
        summary_length_mode = ?config.summary_length_mode,
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    CONFIG.set(config).expect("Failed to set config");
}
