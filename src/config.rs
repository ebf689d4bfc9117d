use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;
use thiserror::Error;

const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable {var}: {reason}")]
    InvalidValue {
        /// Name of the offending variable.
        var: String,
        /// Parser message describing the problem.
        reason: String,
    },
}

/// Runtime configuration shared by the HTTP server and the batch driver.
#[derive(Debug, Clone)]
pub struct Config {
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
    /// Origins allowed to call the API from a browser.
    pub cors_allowed_origins: Vec<String>,
    /// Base URL of the Ollama runtime used for embeddings and generation.
    pub ollama_url: String,
    /// Backend used to embed keyphrase candidates.
    pub embedding_provider: EmbeddingProvider,
    /// Embedding model identifier passed to the provider.
    pub embedding_model: String,
    /// Vector width produced by the hashed embedding provider.
    pub embedding_dimension: usize,
    /// Backend used to summarize reviews.
    pub summarization_provider: SummarizationProvider,
    /// Generation model identifier passed to the provider.
    pub summarization_model: String,
    /// Optional VADER-format lexicon replacing the bundled VADER scorer.
    pub sentiment_lexicon_path: Option<PathBuf>,
    /// Per-request timeout for provider HTTP calls.
    pub http_timeout_secs: u64,
}

/// Supported embedding backends for keyphrase ranking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmbeddingProvider {
    /// Local Ollama runtime.
    Ollama,
    /// Deterministic in-process token hashing; needs no network.
    Hashed,
}

/// Supported summarization backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SummarizationProvider {
    /// No model; reviews receive an extractive lead summary.
    None,
    /// Local Ollama runtime.
    Ollama,
}

impl std::str::FromStr for EmbeddingProvider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "hashed" => Ok(Self::Hashed),
            _ => Err(()),
        }
    }
}

impl std::str::FromStr for SummarizationProvider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "" => Ok(Self::None),
            "ollama" => Ok(Self::Ollama),
            _ => Err(()),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated as absent so an empty line in `.env` falls back to the default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let or_default =
            |key: &str, default: &str| optional(key).unwrap_or_else(|| default.to_string());
        let invalid = |key: &str, reason: String| ConfigError::InvalidValue {
            var: key.to_string(),
            reason,
        };

        let server_port = optional("SERVER_PORT")
            .map(|value| {
                value
                    .trim()
                    .parse::<u16>()
                    .map_err(|e| invalid("SERVER_PORT", e.to_string()))
            })
            .transpose()?;

        let cors_allowed_origins = or_default("CORS_ALLOWED_ORIGINS", DEFAULT_CORS_ORIGINS)
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        let embedding_provider = or_default("EMBEDDING_PROVIDER", "ollama")
            .parse()
            .map_err(|()| invalid("EMBEDDING_PROVIDER", "expected ollama or hashed".into()))?;

        let embedding_dimension = or_default("EMBEDDING_DIMENSION", "256")
            .trim()
            .parse::<usize>()
            .map_err(|e| invalid("EMBEDDING_DIMENSION", e.to_string()))?;
        if embedding_dimension == 0 {
            return Err(invalid(
                "EMBEDDING_DIMENSION",
                "must be greater than zero".into(),
            ));
        }

        let summarization_provider = or_default("SUMMARIZATION_PROVIDER", "ollama")
            .parse()
            .map_err(|()| invalid("SUMMARIZATION_PROVIDER", "expected ollama or none".into()))?;

        let http_timeout_secs = or_default("HTTP_TIMEOUT_SECS", "60")
            .trim()
            .parse::<u64>()
            .map_err(|e| invalid("HTTP_TIMEOUT_SECS", e.to_string()))?;

        Ok(Self {
            server_port,
            cors_allowed_origins,
            ollama_url: or_default("OLLAMA_URL", DEFAULT_OLLAMA_URL),
            embedding_provider,
            embedding_model: or_default("EMBEDDING_MODEL", "all-minilm"),
            embedding_dimension,
            summarization_provider,
            summarization_model: or_default("SUMMARIZATION_MODEL", "llama3.2:1b"),
            sentiment_lexicon_path: optional("SENTIMENT_LEXICON_PATH").map(PathBuf::from),
            http_timeout_secs,
        })
    }
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() -> Result<&'static Config, ConfigError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    tracing::debug!(
        server_port = ?config.server_port,
        ollama_url = %config.ollama_url,
        embedding_provider = ?config.embedding_provider,
        embedding_model = %config.embedding_model,
        summarization_provider = ?config.summarization_provider,
        summarization_model = %config.summarization_model,
        "Loaded configuration"
    );
    Ok(CONFIG.get_or_init(|| config))
}
