use async_trait::async_trait;

use crate::config::{parse_llm_provider_model, LlmConfig};
use crate::error::Result;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";

/// A hosted model that answers a prompt with a JSON document.
///
/// Implementations return the raw response text; callers own parsing and
/// validation.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete_json(&self, system_prompt: &str, prompt: &str) -> Result<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmBackend {
    Gemini,
    OpenAI,
    OpenRouter,
    Ollama,
    OpenAICompatible { base_url: String },
}

impl LlmBackend {
    pub fn from_config(config: &LlmConfig) -> Self {
        if let Some(base_url) = config.base_url.as_ref().filter(|url| !url.is_empty()) {
            return LlmBackend::OpenAICompatible {
                base_url: base_url.clone(),
            };
        }

        let (provider, _model) = parse_llm_provider_model(&config.model);
        match provider.to_lowercase().as_str() {
            "openai" => LlmBackend::OpenAI,
            "openrouter" => LlmBackend::OpenRouter,
            "ollama" => LlmBackend::Ollama,
            _ => LlmBackend::Gemini,
        }
    }

    pub fn base_url(&self) -> &str {
        match self {
            LlmBackend::Gemini => GEMINI_BASE_URL,
            LlmBackend::OpenAI => OPENAI_BASE_URL,
            LlmBackend::OpenRouter => OPENROUTER_BASE_URL,
            LlmBackend::Ollama => OLLAMA_BASE_URL,
            LlmBackend::OpenAICompatible { base_url } => base_url,
        }
    }

    pub fn requires_api_key(&self) -> bool {
        !matches!(self, LlmBackend::Ollama)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(model: &str, base_url: Option<&str>) -> LlmConfig {
        LlmConfig {
            model: model.to_string(),
            api_key: "test-key".to_string(),
            base_url: base_url.map(String::from),
            timeout_secs: None,
        }
    }

    #[test]
    fn test_backend_detection() {
        assert_eq!(
            LlmBackend::from_config(&config("gemini/gemini-1.5-flash", None)),
            LlmBackend::Gemini
        );
        assert_eq!(
            LlmBackend::from_config(&config("gemini-1.5-flash", None)),
            LlmBackend::Gemini
        );
        assert_eq!(
            LlmBackend::from_config(&config("openai/gpt-4o-mini", None)),
            LlmBackend::OpenAI
        );
        assert_eq!(
            LlmBackend::from_config(&config("OpenRouter/google/gemini-flash-1.5", None)),
            LlmBackend::OpenRouter
        );
        assert_eq!(
            LlmBackend::from_config(&config("ollama/llama3.2", None)),
            LlmBackend::Ollama
        );
    }

    #[test]
    fn test_base_url_override_wins() {
        let backend = LlmBackend::from_config(&config("openai/gpt-4o", Some("http://127.0.0.1:9/v1")));
        assert_eq!(backend.base_url(), "http://127.0.0.1:9/v1");
    }

    #[test]
    fn test_gemini_default_base_url() {
        let backend = LlmBackend::from_config(&config("gemini/gemini-1.5-flash", None));
        assert_eq!(backend.base_url(), GEMINI_BASE_URL);
        assert!(backend.requires_api_key());
        assert!(!LlmBackend::Ollama.requires_api_key());
    }
}
