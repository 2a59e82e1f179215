mod common;

use std::sync::Arc;

use actix_web::{test, App};
use serde_json::Value;

use askdb_api::handlers::database::{reset_demo_database, select_database};
use askdb_api::handlers::execute::execute;
use askdb_api::handlers::logs::logs;
use askdb_api::handlers::schema::schema;
use common::{seeded_demo_db, test_state, MockLlmClient};

#[actix_rt::test]
async fn test_execute_select_returns_rows() {
    let db = seeded_demo_db().unwrap();
    let state = test_state(db.path().to_path_buf(), Arc::new(MockLlmClient::new()));

    let app = test::init_service(App::new().app_data(state).service(execute)).await;

    let req = test::TestRequest::post()
        .uri("/api/execute")
        .set_json(serde_json::json!({"sql": "SELECT COUNT(*) FROM customers"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["validation"]["verdict"], "allowed");
    assert_eq!(body["result"]["rows"][0][0], 50);
}

#[actix_rt::test]
async fn test_execute_rejects_drop() {
    let db = seeded_demo_db().unwrap();
    let state = test_state(db.path().to_path_buf(), Arc::new(MockLlmClient::new()));

    let app = test::init_service(App::new().app_data(state).service(execute)).await;

    let req = test::TestRequest::post()
        .uri("/api/execute")
        .set_json(serde_json::json!({"sql": "DROP TABLE customers"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["validation"]["verdict"], "rejected");
    assert!(body["result"].is_null());
}

#[actix_rt::test]
async fn test_execute_rejects_second_statement() {
    let db = seeded_demo_db().unwrap();
    let state = test_state(db.path().to_path_buf(), Arc::new(MockLlmClient::new()));

    let app = test::init_service(App::new().app_data(state).service(execute)).await;

    let req = test::TestRequest::post()
        .uri("/api/execute")
        .set_json(serde_json::json!({"sql": "SELECT 1; DROP TABLE customers;"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["validation"]["verdict"], "rejected");
    assert!(body["validation"]["reason"]
        .as_str()
        .unwrap()
        .contains("DROP"));
}

#[actix_rt::test]
async fn test_execute_surfaces_engine_error() {
    let db = seeded_demo_db().unwrap();
    let state = test_state(db.path().to_path_buf(), Arc::new(MockLlmClient::new()));

    let app = test::init_service(App::new().app_data(state).service(execute)).await;

    let req = test::TestRequest::post()
        .uri("/api/execute")
        .set_json(serde_json::json!({"sql": "SELECT FROM customers"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["validation"]["verdict"], "allowed");
    assert!(body["result"].is_null());
    assert!(!body["error"].as_str().unwrap().is_empty());
}

#[actix_rt::test]
async fn test_schema_endpoint_renders_demo_tables() {
    let db = seeded_demo_db().unwrap();
    let state = test_state(db.path().to_path_buf(), Arc::new(MockLlmClient::new()));

    let app = test::init_service(App::new().app_data(state).service(schema)).await;

    let req = test::TestRequest::get().uri("/api/schema").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let rendered = body["rendered"].as_str().unwrap();
    assert!(rendered.contains("Table: customers"));
    assert!(rendered.contains("Table: orders"));
    assert!(rendered.contains("Foreign Key: customer_id -> customers.id"));
    assert_eq!(body["schema"]["tables"].as_array().unwrap().len(), 2);
}

#[actix_rt::test]
async fn test_select_database_rejects_missing_file() {
    let db = seeded_demo_db().unwrap();
    let state = test_state(db.path().to_path_buf(), Arc::new(MockLlmClient::new()));

    let app = test::init_service(App::new().app_data(state).service(select_database)).await;

    let req = test::TestRequest::post()
        .uri("/api/database")
        .set_json(serde_json::json!({"path": "/nonexistent/path.sqlite"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_select_database_rejects_non_sqlite_file() {
    let db = seeded_demo_db().unwrap();
    let bogus = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(bogus.path(), b"this is not a database").unwrap();

    let state = test_state(db.path().to_path_buf(), Arc::new(MockLlmClient::new()));
    let app = test::init_service(App::new().app_data(state).service(select_database)).await;

    let req = test::TestRequest::post()
        .uri("/api/database")
        .set_json(serde_json::json!({"path": bogus.path().to_string_lossy()}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_select_database_switches_active_db() {
    let db = seeded_demo_db().unwrap();
    let other = seeded_demo_db().unwrap();
    let state = test_state(db.path().to_path_buf(), Arc::new(MockLlmClient::new()));

    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .service(select_database),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/database")
        .set_json(serde_json::json!({"path": other.path().to_string_lossy()}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["tables"], 2);
    assert_eq!(
        *state.db_path.lock().unwrap(),
        other.path().to_path_buf()
    );
}

#[actix_rt::test]
async fn test_reset_demo_database_reseeds() {
    let db = seeded_demo_db().unwrap();
    // Delete a row, then reseed through the endpoint and check it is back.
    {
        let conn = rusqlite::Connection::open(db.path()).unwrap();
        conn.execute("DELETE FROM orders", []).unwrap();
    }

    let state = test_state(db.path().to_path_buf(), Arc::new(MockLlmClient::new()));
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .service(reset_demo_database),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/database/demo")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["tables"], 2);

    let conn = rusqlite::Connection::open(db.path()).unwrap();
    let orders: i64 = conn
        .query_row("SELECT COUNT(*) FROM orders", [], |row| row.get(0))
        .unwrap();
    assert_eq!(orders, 200);
}

#[actix_rt::test]
async fn test_logs_record_executed_queries() {
    let db = seeded_demo_db().unwrap();
    let state = test_state(db.path().to_path_buf(), Arc::new(MockLlmClient::new()));

    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .service(execute)
            .service(logs),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/execute")
        .set_json(serde_json::json!({"sql": "SELECT 1"}))
        .to_request();
    let _: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/execute")
        .set_json(serde_json::json!({"sql": "DROP TABLE customers"}))
        .to_request();
    let _: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::get().uri("/api/logs").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    // Newest first.
    assert_eq!(entries[0]["status"], "rejected");
    assert_eq!(entries[1]["status"], "ok");
    assert_eq!(entries[1]["rows"], 1);
}
