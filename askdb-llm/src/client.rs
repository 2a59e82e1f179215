use crate::{
    error::LlmError,
    types::{CompletionRequest, CompletionResponse},
};
use async_trait::async_trait;

/// Core trait for LLM clients.
///
/// Modeled as a pure function boundary: request struct in, response struct
/// out, errors as values. The caller routes every SQL-bearing response
/// through validation; nothing here executes anything.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Complete a request (non-streaming)
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Get provider name (e.g., "groq")
    fn provider_name(&self) -> &str;

    /// Get the default model name for this client
    fn model_name(&self) -> &str;
}
