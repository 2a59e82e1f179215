use std::path::PathBuf;

use actix_web::{post, web, HttpResponse, Responder};
use rusqlite::Connection;
use tracing::{error, info, warn};

use askdb_core::{demo::seed_demo_db, IntrospectionError};

use crate::models::{ErrorResponse, SelectDatabaseRequest, SelectDatabaseResponse};
use crate::AppState;

/// Select a database file by path. The file is introspected eagerly so an
/// unreadable or non-SQLite file is rejected before it becomes the active
/// database.
#[post("/api/database")]
pub async fn select_database(
    req: web::Json<SelectDatabaseRequest>,
    state: web::Data<AppState>,
) -> impl Responder {
    let path = PathBuf::from(&req.path);

    let cached = {
        let mut cache = state.schema_cache.lock().unwrap();
        cache.get_or_introspect(&path)
    };

    match cached {
        Ok(cached) => {
            info!(path = %path.display(), tables = cached.schema.tables.len(), "database selected");
            *state.db_path.lock().unwrap() = path.clone();
            HttpResponse::Ok().json(SelectDatabaseResponse {
                path: path.display().to_string(),
                tables: cached.schema.tables.len(),
            })
        }
        Err(IntrospectionError::FileNotFound(p)) => {
            warn!(path = %p, "database file not found");
            HttpResponse::NotFound().json(ErrorResponse {
                error: format!("Database file not found: {}", p),
            })
        }
        Err(IntrospectionError::NotADatabase(message)) => {
            warn!(path = %path.display(), "not a SQLite database");
            HttpResponse::BadRequest().json(ErrorResponse { error: message })
        }
        Err(e) => {
            error!(error = %e, path = %path.display(), "failed to open database");
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: format!("Failed to open database: {}", e),
            })
        }
    }
}

/// (Re)seed the bundled demo database and make it the active database.
#[post("/api/database/demo")]
pub async fn reset_demo_database(state: web::Data<AppState>) -> impl Responder {
    let demo_path = state.demo_path.clone();

    if let Err(e) = seed_demo_at(&demo_path) {
        error!(error = %e, path = %demo_path.display(), "failed to seed demo database");
        return HttpResponse::InternalServerError().json(ErrorResponse {
            error: format!("Failed to seed demo database: {}", e),
        });
    }

    info!(path = %demo_path.display(), "demo database seeded");

    {
        let mut cache = state.schema_cache.lock().unwrap();
        cache.invalidate(&demo_path);
    }
    *state.db_path.lock().unwrap() = demo_path.clone();

    HttpResponse::Ok().json(SelectDatabaseResponse {
        path: demo_path.display().to_string(),
        tables: 2,
    })
}

/// Seed the demo dataset at `path`, creating parent directories as needed.
pub fn seed_demo_at(path: &std::path::Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let conn = Connection::open(path)?;
    seed_demo_db(&conn)?;
    Ok(())
}
