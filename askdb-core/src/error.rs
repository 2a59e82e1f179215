use thiserror::Error;

/// Errors raised while opening or inspecting a database file.
///
/// These are fatal to the current file, never to the process: the caller
/// surfaces them to the user, who can re-upload or pick another file.
#[derive(Error, Debug)]
pub enum IntrospectionError {
    #[error("database file not found: {0}")]
    FileNotFound(String),

    #[error("failed to open database: {0}")]
    Open(#[source] rusqlite::Error),

    #[error("not a valid SQLite database: {0}")]
    NotADatabase(String),

    #[error("schema query failed: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("failed to read database file metadata: {0}")]
    Io(#[from] std::io::Error),
}

/// An engine-level failure on an already validated query.
///
/// Carries the raw SQLite message so the user can correct the statement.
/// Never retried automatically.
#[derive(Error, Debug)]
#[error("query execution failed: {message}")]
pub struct ExecutionError {
    pub message: String,
}

impl From<rusqlite::Error> for ExecutionError {
    fn from(e: rusqlite::Error) -> Self {
        Self {
            message: e.to_string(),
        }
    }
}
