use std::time::Duration;

use serde_json::Value;

use async_openai::{
    config::OpenAIConfig,
    error::{ApiError, OpenAIError},
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
    },
    Client,
};

use crate::{
    config::{parse_llm_provider_model, LlmConfig},
    error::{DocentError, Result},
    llm::provider::{ChatMessage, CompletionOptions},
    models::TokenUsage,
};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";

/// A successful chat completion with its provider metadata.
#[derive(Debug, Clone)]
pub struct Completion {
    pub content: String,
    pub model: String,
    pub usage: TokenUsage,
}

/// A completion whose content parsed as JSON.
#[derive(Debug, Clone)]
pub struct JsonCompletion {
    pub value: Value,
    pub model: String,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone)]
struct ApiConfig {
    base_url: String,
    api_key: Option<String>,
    model: String,
    timeout_secs: u64,
    max_output_tokens: u32,
}

#[derive(Clone)]
pub struct LlmApiClient {
    client: Client<OpenAIConfig>,
    config: ApiConfig,
}

impl LlmApiClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_config = ApiConfig::from_llm_config(config);

        let (provider, _) = parse_llm_provider_model(&config.model);
        let needs_api_key = !matches!(
            provider.to_lowercase().as_str(),
            "ollama" | "local" | "lmstudio"
        );

        if needs_api_key && api_config.api_key.is_none() {
            return Err(DocentError::Llm(
                "API key required for this provider".to_string(),
            ));
        }

        let openai_config = OpenAIConfig::new()
            .with_api_base(api_config.base_url.clone())
            .with_api_key(api_config.api_key.clone().unwrap_or_default());

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(api_config.timeout_secs))
            .build()
            .map_err(|error| {
                DocentError::Llm(format!("Failed to create LLM HTTP client: {error}"))
            })?;

        // async-openai retries server errors with exponential backoff for up
        // to 15 minutes by default. A zero elapsed-time budget makes the first
        // failure final; callers degrade to fallbacks instead of retrying.
        let backoff = backoff::ExponentialBackoff {
            max_elapsed_time: Some(Duration::ZERO),
            ..Default::default()
        };

        let client = Client::with_config(openai_config)
            .with_http_client(http_client)
            .with_backoff(backoff);

        Ok(Self {
            client,
            config: api_config,
        })
    }

    /// Run a single-attempt completion with an optional system prompt.
    ///
    /// Upstream failures surface immediately; there is no retry loop here, so
    /// every caller decides for itself whether to degrade or propagate.
    pub async fn complete(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        options: Option<&CompletionOptions>,
    ) -> Result<Completion> {
        if prompt.trim().is_empty() {
            return Err(DocentError::Validation("Prompt cannot be empty".to_string()));
        }

        let request = self.build_request(prompt, system_prompt, options)?;
        self.execute(request).await
    }

    /// Run a single-attempt completion and parse the content as JSON.
    pub async fn complete_json(
        &self,
        prompt: &str,
        options: Option<&CompletionOptions>,
    ) -> Result<JsonCompletion> {
        if prompt.trim().is_empty() {
            return Err(DocentError::Validation("Prompt cannot be empty".to_string()));
        }

        let request = self.build_json_request(prompt, options)?;
        let completion = self.execute(request).await?;

        let content = strip_code_fences(&completion.content);
        tracing::debug!(response_len = content.len(), "LLM JSON response received");
        let value = serde_json::from_str(content).map_err(|e| {
            tracing::warn!(
                response_len = content.len(),
                response_preview = %content.chars().take(100).collect::<String>(),
                error = %e,
                "Failed to parse JSON response"
            );
            DocentError::Llm(format!("Failed to parse JSON response: {e}"))
        })?;

        Ok(JsonCompletion {
            value,
            model: completion.model,
            usage: completion.usage,
        })
    }

    /// Run a single-attempt completion over a caller-supplied message list.
    pub async fn complete_chat(
        &self,
        messages: &[ChatMessage],
        options: Option<&CompletionOptions>,
    ) -> Result<Completion> {
        if messages.is_empty() {
            return Err(DocentError::Validation(
                "At least one message is required".to_string(),
            ));
        }

        let request = self.build_chat_request(messages, options)?;
        self.execute(request).await
    }

    async fn execute(&self, request: CreateChatCompletionRequest) -> Result<Completion> {
        match self.client.chat().create(request).await {
            Ok(response) => Self::into_completion(response),
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

    fn build_request(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        options: Option<&CompletionOptions>,
    ) -> Result<CreateChatCompletionRequest> {
        let mut messages = Vec::new();

        if let Some(system_prompt) = system_prompt.filter(|value| !value.trim().is_empty()) {
            messages.push(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system_prompt)
                    .build()
                    .map_err(|error| {
                        DocentError::Validation(format!("Invalid system prompt: {error}"))
                    })?
                    .into(),
            );
        }

        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|error| DocentError::Validation(format!("Invalid user prompt: {error}")))?
                .into(),
        );

        let mut request = CreateChatCompletionRequestArgs::default();
        request.model(self.resolve_model(options)).messages(messages);
        self.apply_completion_options(&mut request, options);

        request.build().map_err(|error| {
            DocentError::Validation(format!("Invalid LLM completion request: {error}"))
        })
    }

    fn build_json_request(
        &self,
        prompt: &str,
        options: Option<&CompletionOptions>,
    ) -> Result<CreateChatCompletionRequest> {
        let messages = vec![ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|error| DocentError::Validation(format!("Invalid user prompt: {error}")))?
            .into()];

        let mut request = CreateChatCompletionRequestArgs::default();
        request.model(self.resolve_model(options)).messages(messages);
        self.apply_completion_options(&mut request, options);

        request
            .build()
            .map_err(|error| DocentError::Validation(format!("Invalid LLM JSON request: {error}")))
    }

    fn build_chat_request(
        &self,
        messages: &[ChatMessage],
        options: Option<&CompletionOptions>,
    ) -> Result<CreateChatCompletionRequest> {
        let mut built: Vec<ChatCompletionRequestMessage> = Vec::with_capacity(messages.len());

        for message in messages {
            let item = match message.role.to_lowercase().as_str() {
                "system" => ChatCompletionRequestSystemMessageArgs::default()
                    .content(message.content.as_str())
                    .build()
                    .map_err(|error| {
                        DocentError::Validation(format!("Invalid system message: {error}"))
                    })?
                    .into(),
                "assistant" => ChatCompletionRequestAssistantMessageArgs::default()
                    .content(message.content.as_str())
                    .build()
                    .map_err(|error| {
                        DocentError::Validation(format!("Invalid assistant message: {error}"))
                    })?
                    .into(),
                "user" => ChatCompletionRequestUserMessageArgs::default()
                    .content(message.content.as_str())
                    .build()
                    .map_err(|error| {
                        DocentError::Validation(format!("Invalid user message: {error}"))
                    })?
                    .into(),
                other => {
                    return Err(DocentError::Validation(format!(
                        "Unsupported message role: {other}"
                    )));
                }
            };
            built.push(item);
        }

        let mut request = CreateChatCompletionRequestArgs::default();
        request.model(self.resolve_model(options)).messages(built);
        self.apply_completion_options(&mut request, options);

        request
            .build()
            .map_err(|error| DocentError::Validation(format!("Invalid LLM chat request: {error}")))
    }

    fn apply_completion_options(
        &self,
        request: &mut CreateChatCompletionRequestArgs,
        options: Option<&CompletionOptions>,
    ) {
        if let Some(temperature) = options.and_then(|o| o.temperature) {
            request.temperature(temperature);
        }

        // The configured output cap applies unless the request overrides it.
        request.max_tokens(
            options
                .and_then(|o| o.max_tokens)
                .unwrap_or(self.config.max_output_tokens),
        );
    }

    fn resolve_model(&self, options: Option<&CompletionOptions>) -> String {
        match options.and_then(|o| o.model.as_deref()) {
            Some(requested) => normalize_model(requested),
            None => self.config.model.clone(),
        }
    }

    fn into_completion(response: CreateChatCompletionResponse) -> Result<Completion> {
        let model = response.model.clone();
        let usage = response.usage.map(Into::into).unwrap_or_default();

        let content = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| DocentError::Llm("LLM response contained no choices".to_string()))?
            .message
            .content
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(DocentError::Llm(
                "LLM response contained empty content".to_string(),
            ));
        }

        Ok(Completion {
            content,
            model,
            usage,
        })
    }

    fn rate_limit_error(error: &OpenAIError) -> Option<DocentError> {
        match error {
            OpenAIError::Reqwest(reqwest_error)
                if reqwest_error.status() == Some(reqwest::StatusCode::TOO_MANY_REQUESTS) =>
            {
                Some(DocentError::LlmRateLimit { retry_after: None })
            }
            OpenAIError::ApiError(api_error) if Self::is_rate_limit_api_error(api_error) => {
                Some(DocentError::LlmRateLimit { retry_after: None })
            }
            _ => None,
        }
    }

    fn auth_error(error: &OpenAIError) -> Option<DocentError> {
        match error {
            OpenAIError::Reqwest(reqwest_error)
                if reqwest_error.status() == Some(reqwest::StatusCode::UNAUTHORIZED)
                    || reqwest_error.status() == Some(reqwest::StatusCode::FORBIDDEN) =>
            {
                Some(DocentError::Llm(format!(
                    "LLM authentication failed: {reqwest_error}"
                )))
            }
            OpenAIError::ApiError(api_error) if Self::is_auth_api_error(api_error) => Some(
                DocentError::Llm(format!("LLM authentication failed: {api_error}")),
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
            || message.contains("invalid api key")
            || code.contains("invalid_api_key")
            || code.contains("authentication")
            || error_type.contains("authentication")
    }

    fn map_openai_error(error: OpenAIError) -> DocentError {
        match error {
            OpenAIError::Reqwest(reqwest_error) => match reqwest_error.status() {
                // The provider answered with an error status; pass it along.
                Some(status) => DocentError::LlmUpstream {
                    status: status.as_u16(),
                    message: format!("LLM request failed: {reqwest_error}"),
                },
                None => DocentError::Llm(format!("LLM request failed: {reqwest_error}")),
            },
            OpenAIError::ApiError(api_error) => {
                DocentError::Llm(format!("LLM API error: {api_error}"))
            }
            OpenAIError::JSONDeserialize(err) => {
                DocentError::Llm(format!("Failed to parse LLM response: {err}"))
            }
            OpenAIError::InvalidArgument(message) => DocentError::Validation(message),
            other => DocentError::Llm(other.to_string()),
        }
    }
}

impl ApiConfig {
    fn from_llm_config(config: &LlmConfig) -> Self {
        let (provider, _) = parse_llm_provider_model(&config.model);

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| default_base_url(provider).to_string());

        Self {
            base_url,
            api_key: config.api_key.clone(),
            model: normalize_model(&config.model),
            timeout_secs: config.timeout_secs,
            max_output_tokens: config.max_output_tokens,
        }
    }
}

/// Strip the provider prefix from a `provider/model` identifier.
///
/// Unknown prefixes are kept whole so locally hosted model names with slashes
/// survive untouched.
fn normalize_model(model: &str) -> String {
    let (provider, stripped) = parse_llm_provider_model(model);
    if provider.eq_ignore_ascii_case("local") {
        model.to_string()
    } else {
        stripped.to_string()
    }
}

/// Remove a surrounding markdown code fence, if present.
///
/// Some models wrap JSON output in ```json fences despite instructions not to.
pub(crate) fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let body = match rest.split_once('\n') {
        Some((_lang, body)) => body,
        None => rest,
    };

    body.strip_suffix("```").unwrap_or(body).trim()
}

fn default_base_url(provider: &str) -> &'static str {
    match provider.to_lowercase().as_str() {
        "openai" => OPENAI_BASE_URL,
        "openrouter" => OPENROUTER_BASE_URL,
        "ollama" => OLLAMA_BASE_URL,
        "lmstudio" => "http://localhost:1234/v1",
        _ => OPENAI_BASE_URL,
    }
}
