//! Natural language to SQL translation.
//!
//! Wraps a single [`LlmClient`] round trip: build a prompt from the
//! question plus schema and retrieved context, call the model, and parse
//! the reply into SQL. The translator never executes anything and never
//! judges safety; callers validate the returned SQL themselves.

use crate::{
    client::LlmClient,
    error::LlmError,
    types::{ChatMessage, CompletionRequest},
};

/// Separator the model is instructed to emit between its reasoning and
/// the SQL statement.
pub const SQL_SEPARATOR: &str = "### SQL START ###";

/// Sentinel the model emits when the question cannot be answered from
/// the available schema.
pub const CANNOT_ANSWER: &str = "CANNOT_ANSWER";

/// Inputs for one translation round trip.
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    /// The user's question, verbatim.
    pub question: String,
    /// Rendered schema of the active database.
    pub schema_context: String,
    /// Retrieved guidance snippets, most relevant first.
    pub retrieved_snippets: Vec<String>,
}

/// A successfully extracted SQL statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    /// The cleaned SQL text. Not validated; callers must validate before
    /// execution.
    pub sql: String,
    /// Free-form reasoning the model produced before the SQL, if any.
    pub reasoning: Option<String>,
}

/// Outcome of parsing a model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslatorOutput {
    /// The model produced SQL.
    Sql(Translation),
    /// The model declined with the `CANNOT_ANSWER` sentinel.
    CannotAnswer,
}

/// Errors from the translation round trip.
#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    #[error("LLM request failed: {0}")]
    Llm(#[from] LlmError),

    #[error("model returned an empty response")]
    EmptyResponse,

    #[error("no SQL statement could be extracted from the model response")]
    NoSql,
}

/// Build the deterministic prompt for a translation request.
pub fn build_prompt(request: &TranslationRequest) -> String {
    let mut prompt = String::new();
    prompt.push_str(
        "You are an expert SQLite analyst. Translate the user's question into a \
         single read-only SELECT statement for the schema below.\n\n\
         Rules:\n\
         - Produce exactly one SELECT statement (CTEs with WITH are allowed).\n\
         - Never produce INSERT, UPDATE, DELETE, DROP, ALTER, CREATE, PRAGMA \
         or any other statement that modifies the database.\n\
         - Use only tables and columns that appear in the schema.\n\
         - You may explain your reasoning first. When you do, end the \
         reasoning with the line `### SQL START ###` and put only SQL after it.\n\
         - If the question cannot be answered from this schema, reply with \
         exactly `CANNOT_ANSWER` and nothing else.\n\n",
    );

    prompt.push_str("Database schema:\n");
    prompt.push_str(&request.schema_context);
    prompt.push_str("\n\n");

    if !request.retrieved_snippets.is_empty() {
        prompt.push_str("Relevant context:\n");
        for snippet in &request.retrieved_snippets {
            prompt.push_str(snippet);
            prompt.push('\n');
        }
        prompt.push('\n');
    }

    prompt.push_str("Question: ");
    prompt.push_str(&request.question);
    prompt.push('\n');

    prompt
}

/// Parse a raw model reply into SQL and optional reasoning.
///
/// The cleaning pipeline mirrors how models actually misbehave: markdown
/// fences, a `sql` language tag, prose before the statement, trailing
/// commentary, and extra statements after the first semicolon.
pub fn parse_response(raw: &str) -> Result<TranslatorOutput, TranslationError> {
    let mut text = raw.trim().to_string();

    if text.is_empty() {
        return Err(TranslationError::EmptyResponse);
    }

    // Strip markdown code fences.
    if text.starts_with("```") {
        let inner: Vec<&str> = text.split("```").collect();
        if inner.len() > 1 {
            text = inner[1].trim().to_string();
        }
    }
    // A `sql` language tag only counts as a whole token; words like
    // "sqlite" at the start of prose must survive intact.
    let bytes = text.as_bytes();
    if bytes.len() >= 3
        && bytes[..3].eq_ignore_ascii_case(b"sql")
        && bytes.get(3).map_or(true, |b| b.is_ascii_whitespace())
    {
        text = text[3..].trim().to_string();
    }

    if text == CANNOT_ANSWER {
        return Ok(TranslatorOutput::CannotAnswer);
    }

    let mut reasoning = String::new();

    if let Some(idx) = text.find(SQL_SEPARATOR) {
        reasoning = text[..idx].trim().to_string();
        text = text[idx + SQL_SEPARATOR.len()..].trim().to_string();
    } else {
        // Fallback: find where the statement itself starts. Text before
        // it, if substantial, is treated as reasoning. `WITH` is only
        // recognized at the start of a line, since the word occurs
        // freely in prose.
        let upper = text.to_uppercase();
        let select_idx = upper.find("SELECT");
        let with_idx = find_line_starting_with(&text, "WITH ");
        let start = match (select_idx, with_idx) {
            (Some(s), Some(w)) => Some(s.min(w)),
            (Some(s), None) => Some(s),
            (None, Some(w)) => Some(w),
            (None, None) => None,
        };
        match start {
            Some(idx) => {
                let pre = text[..idx].trim();
                if pre.len() > 5 {
                    reasoning = pre.to_string();
                }
                text = text[idx..].to_string();
            }
            None => return Err(TranslationError::NoSql),
        }
    }

    if text == CANNOT_ANSWER {
        return Ok(TranslatorOutput::CannotAnswer);
    }

    // Drop trailing commentary and comment-only lines.
    let mut cleaned_lines = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("Note:") || trimmed.starts_with("Explanation:") {
            break;
        }
        if trimmed.starts_with("--") || trimmed.starts_with("/*") {
            continue;
        }
        cleaned_lines.push(line);
    }
    let mut sql = cleaned_lines.join("\n").trim().to_string();

    // Keep only the first statement.
    if let Some(idx) = sql.find(';') {
        sql = format!("{};", &sql[..idx]);
    }

    if sql.is_empty() {
        return Err(TranslationError::NoSql);
    }

    let reasoning = reasoning
        .replace("/*", "")
        .replace("*/", "")
        .trim()
        .to_string();

    Ok(TranslatorOutput::Sql(Translation {
        sql,
        reasoning: if reasoning.is_empty() {
            None
        } else {
            Some(reasoning)
        },
    }))
}

/// Byte offset of the first line whose content starts with `prefix`
/// (case-insensitive).
fn find_line_starting_with(text: &str, prefix: &str) -> Option<usize> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if let Some(head) = trimmed.get(..prefix.len()) {
            if head.eq_ignore_ascii_case(prefix) {
                return Some(offset + (line.len() - trimmed.len()));
            }
        }
        offset += line.len();
    }
    None
}

/// Run one translation round trip through the given client.
///
/// Temperature is pinned to zero; SQL generation wants determinism, not
/// creativity.
pub async fn translate(
    client: &dyn LlmClient,
    model: &str,
    max_tokens: u32,
    request: &TranslationRequest,
) -> Result<TranslatorOutput, TranslationError> {
    let prompt = build_prompt(request);

    tracing::debug!(
        provider = client.provider_name(),
        model,
        question = %request.question,
        "translating question to SQL"
    );

    let completion = CompletionRequest {
        model: model.to_string(),
        messages: vec![ChatMessage::user(prompt)],
        max_tokens: Some(max_tokens),
        temperature: Some(0.0),
        stop: None,
    };

    let response = client.complete(completion).await?;

    parse_response(&response.content)
}
