use askdb_core::{QueryResult, SchemaDescription, ValidationResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// Outcome of one full ask chain. Every stage that can fail reports into
/// this response; the HTTP status stays 200 for domain-level failures.
#[derive(Debug, Serialize)]
pub struct AskResponse {
    /// The SQL extracted from the model reply, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
    /// Free-form reasoning the model produced before the SQL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    /// Safety verdict for the generated SQL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationResult>,
    /// Query result, present only when validation allowed execution and
    /// the query ran cleanly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<QueryResult>,
    /// Translation or execution failure, reported per-request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// True when the model declined to answer from the available schema.
    pub cannot_answer: bool,
}

#[derive(Debug, Deserialize)]
pub struct ExecuteRequest {
    pub sql: String,
}

#[derive(Debug, Serialize)]
pub struct ExecuteResponse {
    pub validation: ValidationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<QueryResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SchemaResponse {
    /// Rendered text form, as shown in the DB browser.
    pub rendered: String,
    /// Structured form for programmatic consumers.
    pub schema: SchemaDescription,
}

#[derive(Debug, Deserialize)]
pub struct SelectDatabaseRequest {
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct SelectDatabaseResponse {
    pub path: String,
    pub tables: usize,
}

/// One entry in the in-memory query log, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct QueryLogEntry {
    pub timestamp: DateTime<Utc>,
    /// The natural-language question, absent for manual SQL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
    /// One of: ok, rejected, error, cannot_answer.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
    pub duration_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct LogsResponse {
    pub entries: Vec<QueryLogEntry>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
