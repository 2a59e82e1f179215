use std::time::Instant;

use actix_web::{post, web, HttpResponse, Responder};
use tracing::{info, warn};

use askdb_core::{run_query, schema::open_read_only, validate_sql};

use crate::models::{ErrorResponse, ExecuteRequest, ExecuteResponse, QueryLogEntry};
use crate::AppState;

/// Manual SQL entry point. The same validator gates every statement; a
/// rejection returns the reason, an engine error returns the raw message.
#[post("/api/execute")]
pub async fn execute(req: web::Json<ExecuteRequest>, state: web::Data<AppState>) -> impl Responder {
    let sql = req.sql.clone();
    let started = Instant::now();

    let validation = validate_sql(&sql);
    if !validation.is_allowed() {
        let reason = validation.reason().unwrap_or_default().to_string();
        warn!(sql = %sql, reason = %reason, "manual SQL rejected");
        state.record(entry(&sql, "rejected", Some(reason), None, started));
        return HttpResponse::Ok().json(ExecuteResponse {
            validation,
            result: None,
            error: None,
        });
    }

    let db_path = state.db_path.lock().unwrap().clone();
    let conn = match open_read_only(&db_path) {
        Ok(conn) => conn,
        Err(e) => {
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: format!("Failed to open database: {}", e),
            });
        }
    };

    match run_query(&conn, &sql, Some(state.max_rows)) {
        Ok(result) => {
            info!(sql = %sql, rows = result.rows.len(), "manual SQL executed");
            state.record(entry(&sql, "ok", None, Some(result.rows.len()), started));
            HttpResponse::Ok().json(ExecuteResponse {
                validation,
                result: Some(result),
                error: None,
            })
        }
        Err(e) => {
            warn!(sql = %sql, error = %e.message, "manual SQL failed");
            state.record(entry(&sql, "error", Some(e.message.clone()), None, started));
            HttpResponse::Ok().json(ExecuteResponse {
                validation,
                result: None,
                error: Some(e.message),
            })
        }
    }
}

fn entry(
    sql: &str,
    status: &str,
    detail: Option<String>,
    rows: Option<usize>,
    started: Instant,
) -> QueryLogEntry {
    QueryLogEntry {
        timestamp: chrono::Utc::now(),
        question: None,
        sql: Some(sql.to_string()),
        status: status.to_string(),
        detail,
        rows,
        duration_ms: started.elapsed().as_millis() as u64,
    }
}
