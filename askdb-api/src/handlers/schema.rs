use actix_web::{get, web, HttpResponse, Responder};
use tracing::error;

use crate::models::{ErrorResponse, SchemaResponse};
use crate::AppState;

/// Rendered and structured schema of the active database.
#[get("/api/schema")]
pub async fn schema(state: web::Data<AppState>) -> impl Responder {
    let db_path = state.db_path.lock().unwrap().clone();

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

    HttpResponse::Ok().json(SchemaResponse {
        rendered: cached.rendered.to_string(),
        schema: (*cached.schema).clone(),
    })
}
