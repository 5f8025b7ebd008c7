use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::{ApiError, OpenAIError},
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
        ResponseFormat,
    },
    Client,
};
use async_trait::async_trait;

use crate::{
    config::{parse_llm_provider_model, LlmConfig},
    error::{Result, SofError},
    llm::provider::{CompletionModel, LlmBackend},
};

/// Chat-completions client for any OpenAI-compatible endpoint.
///
/// Every call is a single attempt: failures are returned to the caller
/// immediately.
#[derive(Clone)]
pub struct LlmApiClient {
    client: Client<OpenAIConfig>,
    backend: LlmBackend,
    model: String,
}

impl LlmApiClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let backend = LlmBackend::from_config(config);

        if backend.requires_api_key() && config.api_key.trim().is_empty() {
            return Err(SofError::LlmUnavailable(
                "API key required for this provider".to_string(),
            ));
        }

        let (_, model) = parse_llm_provider_model(&config.model);

        let openai_config = OpenAIConfig::new()
            .with_api_base(backend.base_url())
            .with_api_key(config.api_key.clone());

        let mut http_client = reqwest::Client::builder();
        if let Some(timeout_secs) = config.timeout_secs {
            http_client = http_client.timeout(Duration::from_secs(timeout_secs));
        }
        let http_client = http_client.build().map_err(|error| {
            SofError::Llm(format!("Failed to create LLM HTTP client: {error}"))
        })?;

        // async-openai retries rate-limited requests on its own; a zero elapsed-time cap
        // turns that off so each extraction makes exactly one call.
        let backoff = backoff::ExponentialBackoff {
            max_elapsed_time: Some(Duration::ZERO),
            ..Default::default()
        };

        let client = Client::with_config(openai_config)
            .with_http_client(http_client)
            .with_backoff(backoff);

        Ok(Self {
            client,
            backend,
            model: model.to_string(),
        })
    }

    pub fn backend(&self) -> &LlmBackend {
        &self.backend
    }

    pub fn base_url(&self) -> &str {
        self.backend.base_url()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_json_request(
        &self,
        system_prompt: &str,
        prompt: &str,
    ) -> Result<CreateChatCompletionRequest> {
        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::with_capacity(2);

        if !system_prompt.trim().is_empty() {
            messages.push(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system_prompt)
                    .build()
                    .map_err(|error| {
                        SofError::Validation(format!("Invalid system prompt: {error}"))
                    })?
                    .into(),
            );
        }

        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|error| SofError::Validation(format!("Invalid user prompt: {error}")))?
                .into(),
        );

        CreateChatCompletionRequestArgs::default()
            .model(self.model.clone())
            .messages(messages)
            .response_format(ResponseFormat::JsonObject)
            .build()
            .map_err(|error| SofError::Validation(format!("Invalid LLM JSON request: {error}")))
    }

    fn extract_content(response: CreateChatCompletionResponse) -> Result<String> {
        let message = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| SofError::Llm("LLM response contained no choices".to_string()))?
            .message
            .content
            .unwrap_or_default();

        if message.trim().is_empty() {
            return Err(SofError::Llm(
                "LLM response contained empty content".to_string(),
            ));
        }

        Ok(message)
    }

    fn rate_limit_error(error: &OpenAIError) -> Option<SofError> {
        match error {
            OpenAIError::Reqwest(reqwest_error)
                if reqwest_error.status() == Some(reqwest::StatusCode::TOO_MANY_REQUESTS) =>
            {
                Some(SofError::LlmRateLimit { retry_after: None })
            }
            OpenAIError::ApiError(api_error) if Self::is_rate_limit_api_error(api_error) => {
                Some(SofError::LlmRateLimit { retry_after: None })
            }
            _ => None,
        }
    }

    fn auth_error(error: &OpenAIError) -> Option<SofError> {
        match error {
            OpenAIError::Reqwest(reqwest_error)
                if reqwest_error.status() == Some(reqwest::StatusCode::UNAUTHORIZED)
                    || reqwest_error.status() == Some(reqwest::StatusCode::FORBIDDEN) =>
            {
                Some(SofError::Llm(format!(
                    "LLM authentication failed: {reqwest_error}"
                )))
            }
            OpenAIError::ApiError(api_error) if Self::is_auth_api_error(api_error) => Some(
                SofError::Llm(format!("LLM authentication failed: {api_error}")),
            ),
            _ => None,
        }
    }

    fn is_rate_limit_api_error(api_error: &ApiError) -> bool {
        let message = api_error.message.to_lowercase();
        let error_type = api_error.r#type.clone().unwrap_or_default().to_lowercase();
        let code = api_error.code.clone().unwrap_or_default().to_lowercase();

        message.contains("rate limit")
            || message.contains("too many requests")
            || message.contains("resource has been exhausted")
            || error_type.contains("rate_limit")
            || code.contains("rate_limit")
            || code == "insufficient_quota"
    }

    fn is_auth_api_error(api_error: &ApiError) -> bool {
        let message = api_error.message.to_lowercase();
        let error_type = api_error.r#type.clone().unwrap_or_default().to_lowercase();
        let code = api_error.code.clone().unwrap_or_default().to_lowercase();

        message.contains("unauthorized")
            || message.contains("forbidden")
            || message.contains("authentication")
            || message.contains("api key not valid")
            || message.contains("invalid api key")
            || code.contains("invalid_api_key")
            || code.contains("authentication")
            || error_type.contains("authentication")
    }

    fn map_openai_error(error: OpenAIError) -> SofError {
        match error {
            OpenAIError::Reqwest(reqwest_error) => {
                SofError::Llm(format!("LLM request failed: {reqwest_error}"))
            }
            OpenAIError::ApiError(api_error) => {
                SofError::Llm(format!("LLM API error: {api_error}"))
            }
            OpenAIError::JSONDeserialize(err) => {
                SofError::Llm(format!("Failed to parse LLM response: {err}"))
            }
            OpenAIError::InvalidArgument(message) => SofError::Validation(message),
            other => SofError::Llm(other.to_string()),
        }
    }
}

#[async_trait]
impl CompletionModel for LlmApiClient {
    async fn complete_json(&self, system_prompt: &str, prompt: &str) -> Result<String> {
        if prompt.trim().is_empty() {
            return Err(SofError::Validation("Prompt cannot be empty".to_string()));
        }

        let request = self.build_json_request(system_prompt, prompt)?;

        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "Sending LLM JSON request");

        match self.client.chat().create(request).await {
            Ok(response) => {
                let content = Self::extract_content(response)?;
                tracing::debug!(response_len = content.len(), "LLM JSON response received");
                Ok(content)
            }
            Err(error) => {
                if let Some(rate_limit_error) = Self::rate_limit_error(&error) {
                    return Err(rate_limit_error);
                }

                if let Some(auth_error) = Self::auth_error(&error) {
                    return Err(auth_error);
                }

                Err(Self::map_openai_error(error))
            }
        }
    }
}
