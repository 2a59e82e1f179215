//! Wire types for Groq's OpenAI-compatible chat completions endpoint.
//!
//! Only the slice of the protocol this client exercises is modeled: the
//! request carries what the translator sets, and the response keeps the
//! fields we read back. Groq returns a larger envelope (`id`, `object`,
//! timestamps, per-token logprobs); serde ignores what we never consume.

use serde::{Deserialize, Serialize};

/// Request body for `POST /v1/chat/completions`.
///
/// Optional sampling knobs are left off the wire when unset so Groq
/// applies its own defaults.
#[derive(Debug, Clone, Serialize)]
pub struct GroqChatCompletionRequest {
    pub model: String,
    pub messages: Vec<GroqMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
}

/// One turn of the conversation, in both request and response position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroqMessage {
    pub role: GroqRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroqRole {
    System,
    User,
    Assistant,
}

impl GroqMessage {
    pub fn new<S: Into<String>>(role: GroqRole, content: S) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system<S: Into<String>>(content: S) -> Self {
        Self::new(GroqRole::System, content)
    }

    pub fn user<S: Into<String>>(content: S) -> Self {
        Self::new(GroqRole::User, content)
    }

    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Self::new(GroqRole::Assistant, content)
    }
}

/// The part of a chat completion response the translator consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct GroqChatCompletionResponse {
    /// Model that actually served the request.
    pub model: String,
    pub choices: Vec<GroqChoice>,
    /// Token accounting; Groq omits it on some error-adjacent responses.
    #[serde(default)]
    pub usage: Option<GroqUsage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroqChoice {
    pub message: GroqMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroqUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Error envelope on non-2xx responses. Only the human-readable message
/// is surfaced; the `type`/`code` fields add nothing over the HTTP status.
#[derive(Debug, Deserialize)]
pub struct GroqErrorResponse {
    pub error: GroqError,
}

#[derive(Debug, Deserialize)]
pub struct GroqError {
    pub message: String,
}
