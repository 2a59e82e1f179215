use std::path::Path;
use std::time::Instant;

use actix_web::{post, web, HttpResponse, Responder};
use tracing::{error, info, warn};

use askdb_core::{run_query, schema::open_read_only, validate_sql, ContextStore};
use askdb_llm::translate::{translate, TranslationRequest, TranslatorOutput};

use crate::models::{AskRequest, AskResponse, ErrorResponse, QueryLogEntry};
use crate::AppState;

/// Number of context snippets retrieved per question.
const SNIPPET_BUDGET: usize = 5;

/// Full natural-language-to-result chain: schema context, snippet
/// retrieval, translation, validation, execution.
///
/// Validation runs on every piece of generated SQL without exception; the
/// model's output is treated exactly like manual user input.
#[post("/api/ask")]
pub async fn ask(req: web::Json<AskRequest>, state: web::Data<AppState>) -> impl Responder {
    let question = req.question.trim().to_string();
    if question.is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "question must not be empty".to_string(),
        });
    }

    let started = Instant::now();
    let db_path = state.db_path.lock().unwrap().clone();

    // Schema context via the cache; a swapped or modified file re-indexes
    // the context store before retrieval.
    let cached = {
        let mut cache = state.schema_cache.lock().unwrap();
        match cache.get_or_introspect(&db_path) {
            Ok(cached) => cached,
            Err(e) => {
                error!(error = %e, path = %db_path.display(), "schema introspection failed");
                return HttpResponse::InternalServerError().json(ErrorResponse {
                    error: format!("Failed to read database schema: {}", e),
                });
            }
        }
    };
    reindex_if_changed(&state, &db_path, &cached);

    let snippets = {
        let store = state.context_store.lock().unwrap();
        store.relevant_snippets(&question, SNIPPET_BUDGET)
    };

    let request = TranslationRequest {
        question: question.clone(),
        schema_context: cached.enriched.to_string(),
        retrieved_snippets: snippets,
    };

    let output = match translate(
        state.llm_client.as_ref(),
        &state.llm_model,
        state.llm_max_tokens,
        &request,
    )
    .await
    {
        Ok(output) => output,
        Err(e) => {
            warn!(error = %e, "translation failed");
            let detail = format!("Translation failed: {}", e);
            state.record(log_entry(
                Some(question),
                None,
                "error",
                Some(detail.clone()),
                None,
                started,
            ));
            return HttpResponse::Ok().json(AskResponse {
                sql: None,
                reasoning: None,
                validation: None,
                result: None,
                error: Some(detail),
                cannot_answer: false,
            });
        }
    };

    let translation = match output {
        TranslatorOutput::Sql(t) => t,
        TranslatorOutput::CannotAnswer => {
            info!(question = %question, "model declined to answer");
            state.record(log_entry(
                Some(question),
                None,
                "cannot_answer",
                None,
                None,
                started,
            ));
            return HttpResponse::Ok().json(AskResponse {
                sql: None,
                reasoning: None,
                validation: None,
                result: None,
                error: None,
                cannot_answer: true,
            });
        }
    };

    let validation = validate_sql(&translation.sql);
    if !validation.is_allowed() {
        let reason = validation.reason().unwrap_or_default().to_string();
        warn!(sql = %translation.sql, reason = %reason, "generated SQL rejected");
        state.record(log_entry(
            Some(question),
            Some(translation.sql.clone()),
            "rejected",
            Some(reason),
            None,
            started,
        ));
        return HttpResponse::Ok().json(AskResponse {
            sql: Some(translation.sql),
            reasoning: translation.reasoning,
            validation: Some(validation),
            result: None,
            error: None,
            cannot_answer: false,
        });
    }

    let (result, exec_error, status, detail, rows) =
        match execute_allowed(&db_path, &translation.sql, state.max_rows) {
            Ok(result) => {
                let rows = result.rows.len();
                (Some(result), None, "ok", None, Some(rows))
            }
            Err(message) => (
                None,
                Some(message.clone()),
                "error",
                Some(message),
                None,
            ),
        };

    state.record(log_entry(
        Some(question),
        Some(translation.sql.clone()),
        status,
        detail,
        rows,
        started,
    ));

    HttpResponse::Ok().json(AskResponse {
        sql: Some(translation.sql),
        reasoning: translation.reasoning,
        validation: Some(validation),
        result,
        error: exec_error,
        cannot_answer: false,
    })
}

/// Re-index the context store when the active database file or its
/// modification time changed since the last indexing.
fn reindex_if_changed(state: &AppState, db_path: &Path, cached: &askdb_core::CachedSchema) {
    let mut indexed = state.indexed.lock().unwrap();
    let fingerprint = (db_path.to_path_buf(), cached.modified);
    if indexed.as_ref() != Some(&fingerprint) {
        info!(path = %db_path.display(), "indexing schema into context store");
        let mut store = state.context_store.lock().unwrap();
        store.index_schema(&cached.enriched);
        *indexed = Some(fingerprint);
    }
}

fn execute_allowed(db_path: &Path, sql: &str, max_rows: usize) -> Result<askdb_core::QueryResult, String> {
    let conn = open_read_only(db_path).map_err(|e| format!("Failed to open database: {}", e))?;
    run_query(&conn, sql, Some(max_rows)).map_err(|e| e.message)
}

fn log_entry(
    question: Option<String>,
    sql: Option<String>,
    status: &str,
    detail: Option<String>,
    rows: Option<usize>,
    started: Instant,
) -> QueryLogEntry {
    QueryLogEntry {
        timestamp: chrono::Utc::now(),
        question,
        sql,
        status: status.to_string(),
        detail,
        rows,
        duration_ms: started.elapsed().as_millis() as u64,
    }
}
