//! # askdb LLM client
//!
//! Groq-backed LLM access plus the natural-language-to-SQL translator.
//!
//! ## Example
//!
//! ```rust,no_run
//! use askdb_llm::groq::GroqClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GroqClient::new("your-groq-api-key")?;
//!     let response = client
//!         .chat_builder()
//!         .model("llama-3.3-70b-versatile")
//!         .max_tokens(1024)
//!         .user_message("Hello!")
//!         .send()
//!         .await?;
//!
//!     println!("Response: {}", response.choices[0].message.content);
//!     Ok(())
//! }
//! ```
//!
//! ## Translation Example
//!
//! ```rust,no_run
//! use askdb_llm::groq::GroqClient;
//! use askdb_llm::translate::{translate, TranslationRequest, TranslatorOutput};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GroqClient::new("your-groq-api-key")?;
//!     let request = TranslationRequest {
//!         question: "How many customers are in Lahore?".to_string(),
//!         schema_context: "Table: customers\n- id (INTEGER)\n- city (TEXT)".to_string(),
//!         retrieved_snippets: Vec::new(),
//!     };
//!     let output = translate(&client, "llama-3.3-70b-versatile", 1024, &request).await?;
//!     if let TranslatorOutput::Sql(t) = output {
//!         println!("SQL: {}", t.sql);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod groq;
pub mod models;
pub mod translate;
pub mod types;

pub use client::LlmClient;
pub use error::LlmError;
pub use types::{ChatMessage, CompletionRequest, CompletionResponse, Role, Usage};
