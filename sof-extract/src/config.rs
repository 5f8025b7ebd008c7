use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use crate::error::{Result, SofError};

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn parse_env_opt<T: std::str::FromStr>(var: &str) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Ignoring.", val, var, e);
                None
            }
        },
        Err(_) => None,
    }
}

/// First non-empty value among the given variables.
fn first_non_empty(vars: &[&str]) -> Option<String> {
    vars.iter()
        .filter_map(|var| env::var(var).ok())
        .map(|val| val.trim().to_string())
        .find(|val| !val.is_empty())
}

pub const DEFAULT_LLM_MODEL: &str = "gemini/gemini-1.5-flash";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub uploads: UploadsConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

/// LLM configuration for the structured extraction model
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub api_key: String,
    pub base_url: Option<String>,
    /// Request timeout. `None` leaves the transport default in place.
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadsConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Maximum number of browser sessions whose events are kept in memory.
    pub capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8081,
            max_upload_bytes: 16 * 1024 * 1024,
        }
    }
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("uploads"),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { capacity: 1024 }
    }
}

impl LlmConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            model: DEFAULT_LLM_MODEL.to_string(),
            api_key: api_key.into(),
            base_url: None,
            timeout_secs: None,
        }
    }
}

impl Config {
    /// Build the configuration from the process environment.
    ///
    /// Fails when neither `LLM_API_KEY` nor `GEMINI_API_KEY` is set; every
    /// other setting falls back to a default.
    pub fn from_env() -> Result<Self> {
        let api_key = first_non_empty(&["LLM_API_KEY", "GEMINI_API_KEY"]).ok_or_else(|| {
            SofError::Config("GEMINI_API_KEY environment variable not set.".to_string())
        })?;

        let server_defaults = ServerConfig::default();
        let uploads_defaults = UploadsConfig::default();
        let session_defaults = SessionConfig::default();

        Ok(Self {
            server: ServerConfig {
                host: env::var("SOF_HOST").unwrap_or(server_defaults.host),
                port: parse_env_or("SOF_PORT", server_defaults.port),
                max_upload_bytes: parse_env_or(
                    "SOF_MAX_UPLOAD_BYTES",
                    server_defaults.max_upload_bytes,
                ),
            },
            llm: LlmConfig {
                model: env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string()),
                api_key,
                base_url: env::var("LLM_BASE_URL").ok().filter(|url| !url.is_empty()),
                timeout_secs: parse_env_opt("LLM_TIMEOUT"),
            },
            uploads: UploadsConfig {
                dir: env::var("SOF_UPLOADS_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(uploads_defaults.dir),
            },
            session: SessionConfig {
                capacity: parse_env_or("SOF_SESSION_CAPACITY", session_defaults.capacity),
            },
        })
    }
}

/// Known LLM providers that expose OpenAI-compatible APIs
pub const KNOWN_LLM_PROVIDERS: &[&str] = &["gemini", "openai", "openrouter", "ollama"];

/// Parse an LLM model name into (provider, model) tuple.
///
/// A model without a known provider prefix is treated as a Gemini model.
pub fn parse_llm_provider_model(model: &str) -> (&str, &str) {
    if let Some((prefix, rest)) = model.split_once('/') {
        let prefix_lower = prefix.to_lowercase();
        if KNOWN_LLM_PROVIDERS.contains(&prefix_lower.as_str()) {
            return (prefix, rest);
        }
    }
    ("gemini", model)
}
