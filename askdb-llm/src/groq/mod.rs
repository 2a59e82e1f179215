//! Groq provider: OpenAI-compatible chat completions client.

pub mod builder;
pub mod client;
pub mod types;

pub use builder::ChatCompletionBuilder;
pub use client::GroqClient;
