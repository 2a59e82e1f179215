use actix_web::{get, web, HttpResponse, Responder};

use crate::models::LogsResponse;
use crate::AppState;

/// Recent query log entries, newest first.
#[get("/api/logs")]
pub async fn logs(state: web::Data<AppState>) -> impl Responder {
    let entries = state.query_log.lock().unwrap().clone();
    HttpResponse::Ok().json(LogsResponse { entries })
}
