use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use actix_web::web;
use rusqlite::Connection;
use tempfile::NamedTempFile;

use askdb_api::AppState;
use askdb_core::demo::seed_demo_db;
use askdb_llm::client::LlmClient;
use askdb_llm::error::LlmError;
use askdb_llm::types::{CompletionRequest, CompletionResponse, Usage};

/// LLM client returning queued responses, for exercising the ask chain
/// without a network.
pub struct MockLlmClient {
    pub responses: Arc<Mutex<Vec<CompletionResponse>>>,
    pub call_count: Arc<Mutex<usize>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        MockLlmClient {
            responses: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_responses(responses: Vec<CompletionResponse>) -> Self {
        MockLlmClient {
            responses: Arc::new(Mutex::new(responses)),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let mut call_count = self.call_count.lock().unwrap();
        *call_count += 1;
        drop(call_count);

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(text_response("SELECT 1;"))
        } else {
            Ok(responses.remove(0))
        }
    }

    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

pub fn text_response(content: &str) -> CompletionResponse {
    CompletionResponse {
        content: content.to_string(),
        finish_reason: Some("stop".to_string()),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 20,
            total_tokens: 30,
        }),
    }
}

/// Create a temp database file seeded with the demo dataset.
pub fn seeded_demo_db() -> anyhow::Result<NamedTempFile> {
    let temp_file = NamedTempFile::new()?;
    let conn = Connection::open(temp_file.path())?;
    seed_demo_db(&conn)?;
    Ok(temp_file)
}

/// Shared state over the given database and mock client.
pub fn test_state(db_path: PathBuf, client: Arc<MockLlmClient>) -> web::Data<AppState> {
    web::Data::new(AppState::new(
        db_path.clone(),
        db_path,
        client,
        "mock-model".to_string(),
        256,
        100,
    ))
}
