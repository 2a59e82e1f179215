use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::{
    error::LlmError,
    groq::types::{
        GroqChatCompletionRequest, GroqChatCompletionResponse, GroqErrorResponse, GroqMessage,
        GroqRole,
    },
    models,
    types::{CompletionRequest, CompletionResponse, Role, Usage},
};

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Groq LLM client (OpenAI-compatible chat completions API)
pub struct GroqClient {
    api_key: String,
    base_url: String,
    http_client: reqwest::Client,
}

impl GroqClient {
    /// Create a new Groq client with the given API key.
    ///
    /// An empty key is a configuration error and fails here, at startup,
    /// rather than on the first query.
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_timeout(api_key, std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(
        api_key: impl Into<String>,
        timeout: std::time::Duration,
    ) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(LlmError::authentication("API key cannot be empty"));
        }

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Network { source: e })?;

        Ok(Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http_client,
        })
    }

    /// Set a custom base URL for the API
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Create a chat completion using the Groq API
    pub async fn create_chat_completion(
        &self,
        request: GroqChatCompletionRequest,
    ) -> Result<GroqChatCompletionResponse, LlmError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|_| LlmError::authentication("Invalid API key format"))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let response = self
            .http_client
            .post(&url)
            .headers(headers)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::Network { source: e }
                }
            })?;

        let status = response.status();

        if status.is_success() {
            let completion: GroqChatCompletionResponse = response
                .json()
                .await
                .map_err(|e| LlmError::internal(format!("Failed to parse response: {}", e)))?;
            return Ok(completion);
        }

        // Get retry-after before consuming the response body.
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.parse().ok());

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        let message = serde_json::from_str::<GroqErrorResponse>(&error_text)
            .map(|e| e.error.message)
            .unwrap_or(error_text);

        match status {
            reqwest::StatusCode::BAD_REQUEST => Err(LlmError::invalid_request(message)),
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                Err(LlmError::authentication(message))
            }
            reqwest::StatusCode::TOO_MANY_REQUESTS => {
                Err(LlmError::rate_limit(message, retry_after))
            }
            _ => Err(LlmError::api_error(status.as_u16(), message)),
        }
    }
}

#[async_trait]
impl crate::client::LlmClient for GroqClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let messages = request
            .messages
            .into_iter()
            .map(|msg| {
                let role = match msg.role {
                    Role::System => GroqRole::System,
                    Role::User => GroqRole::User,
                    Role::Assistant => GroqRole::Assistant,
                };
                GroqMessage::new(role, msg.content)
            })
            .collect();

        let groq_request = GroqChatCompletionRequest {
            model: request.model,
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            top_p: None,
            stop: request.stop,
        };

        let groq_response = self.create_chat_completion(groq_request).await?;

        let choice = groq_response
            .choices
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyResponse)?;

        Ok(CompletionResponse {
            content: choice.message.content,
            finish_reason: choice.finish_reason,
            usage: groq_response.usage.map(|u| Usage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
        })
    }

    fn provider_name(&self) -> &str {
        "groq"
    }

    fn model_name(&self) -> &str {
        models::groq::DEFAULT_MODEL
    }
}
