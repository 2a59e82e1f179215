use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use askdb_core::{KeywordContextStore, SchemaCache};
use askdb_llm::client::LlmClient;

use crate::models::QueryLogEntry;

pub mod config;
pub mod handlers;
pub mod models;

/// Number of query log entries kept in memory.
const QUERY_LOG_CAP: usize = 100;

/// Shared application state.
///
/// Mutex guards are never held across an await point; handlers clone what
/// they need out of a guard before calling into async code.
pub struct AppState {
    /// The currently selected database file.
    pub db_path: Mutex<PathBuf>,
    /// Where the bundled demo database lives.
    pub demo_path: PathBuf,
    pub schema_cache: Mutex<SchemaCache>,
    pub context_store: Mutex<KeywordContextStore>,
    /// Identity of the schema last indexed into the context store.
    pub indexed: Mutex<Option<(PathBuf, SystemTime)>>,
    pub llm_client: Arc<dyn LlmClient>,
    pub llm_model: String,
    pub llm_max_tokens: u32,
    pub max_rows: usize,
    /// Recent queries, newest first.
    pub query_log: Mutex<Vec<QueryLogEntry>>,
}

impl AppState {
    pub fn new(
        db_path: PathBuf,
        demo_path: PathBuf,
        llm_client: Arc<dyn LlmClient>,
        llm_model: String,
        llm_max_tokens: u32,
        max_rows: usize,
    ) -> Self {
        Self {
            db_path: Mutex::new(db_path),
            demo_path,
            schema_cache: Mutex::new(SchemaCache::new()),
            context_store: Mutex::new(KeywordContextStore::new()),
            indexed: Mutex::new(None),
            llm_client,
            llm_model,
            llm_max_tokens,
            max_rows,
            query_log: Mutex::new(Vec::new()),
        }
    }

    /// Record a query log entry, newest first, dropping the oldest past the
    /// cap.
    pub fn record(&self, entry: QueryLogEntry) {
        let mut log = self.query_log.lock().unwrap();
        log.insert(0, entry);
        log.truncate(QUERY_LOG_CAP);
    }
}
