use crate::{
    error::LlmError,
    groq::{
        client::GroqClient,
        types::{GroqChatCompletionRequest, GroqChatCompletionResponse, GroqMessage},
    },
};

/// Builder for creating Groq chat completion requests
pub struct ChatCompletionBuilder<'a> {
    client: &'a GroqClient,
    model: Option<String>,
    max_tokens: Option<u32>,
    messages: Vec<GroqMessage>,
    temperature: Option<f32>,
    top_p: Option<f32>,
    stop: Option<Vec<String>>,
}

impl<'a> ChatCompletionBuilder<'a> {
    /// Create a new chat completion builder
    pub fn new(client: &'a GroqClient) -> Self {
        Self {
            client,
            model: None,
            max_tokens: None,
            messages: Vec::new(),
            temperature: None,
            top_p: None,
            stop: None,
        }
    }

    /// Set the model to use
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the maximum number of tokens to generate
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Add a system message
    pub fn system_message(mut self, content: impl Into<String>) -> Self {
        self.messages.push(GroqMessage::system(content));
        self
    }

    /// Add a user message
    pub fn user_message(mut self, content: impl Into<String>) -> Self {
        self.messages.push(GroqMessage::user(content));
        self
    }

    /// Add an assistant message
    pub fn assistant_message(mut self, content: impl Into<String>) -> Self {
        self.messages.push(GroqMessage::assistant(content));
        self
    }

    /// Set the temperature for randomness
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the top-p sampling parameter
    pub fn top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Set custom stop sequences
    pub fn stop(mut self, stop: Vec<String>) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Send the request and get the response
    pub async fn send(self) -> Result<GroqChatCompletionResponse, LlmError> {
        let request = GroqChatCompletionRequest {
            model: self
                .model
                .ok_or_else(|| LlmError::invalid_request("Model must be specified"))?,
            messages: self.messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
            stop: self.stop,
        };

        self.client.create_chat_completion(request).await
    }
}

impl GroqClient {
    /// Start building a chat completion request
    pub fn chat_builder(&self) -> ChatCompletionBuilder<'_> {
        ChatCompletionBuilder::new(self)
    }
}
