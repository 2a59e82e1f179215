//! Read-only query execution.
//!
//! Runs an already validated SELECT against a connection and collects rows
//! into a JSON-friendly result. The connection is expected to come from
//! [`crate::schema::open_read_only`], so the engine itself rejects writes
//! behind the validator.

use rusqlite::types::ValueRef;
use rusqlite::Connection;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::ExecutionError;

/// Column names plus column-aligned row tuples. Owned entirely by the
/// request that produced it; never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    /// True when the row budget cut collection short.
    pub truncated: bool,
}

/// Execute `sql` and collect up to `max_rows` rows (no budget when `None`).
///
/// Any engine-level error (syntax error, missing table, type mismatch) comes
/// back as an [`ExecutionError`] with the raw SQLite message.
pub fn run_query(
    conn: &Connection,
    sql: &str,
    max_rows: Option<usize>,
) -> Result<QueryResult, ExecutionError> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();
    let column_count = columns.len();

    let mut rows = stmt.query([])?;
    let mut collected: Vec<Vec<Value>> = Vec::new();
    let mut truncated = false;

    while let Some(row) = rows.next()? {
        if let Some(limit) = max_rows {
            if collected.len() >= limit {
                truncated = true;
                break;
            }
        }
        let mut values = Vec::with_capacity(column_count);
        for idx in 0..column_count {
            values.push(value_to_json(row.get_ref(idx)?));
        }
        collected.push(values);
    }

    debug!(
        rows = collected.len(),
        truncated, "query executed"
    );

    Ok(QueryResult {
        columns,
        rows: collected,
        truncated,
    })
}

fn value_to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        // BLOBs as lowercase hex; result rows must stay JSON-serializable.
        ValueRef::Blob(b) => Value::String(b.iter().map(|byte| format!("{byte:02x}")).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE customers (id INTEGER PRIMARY KEY, name TEXT, city TEXT);
             INSERT INTO customers (name, city) VALUES
                ('Ali Khan', 'Lahore'),
                ('Sara Malik', 'Karachi'),
                ('Omer Sheikh', 'Lahore'),
                ('Zara Butt', 'Multan');",
        )
        .unwrap();
        conn
    }

    #[test]
    fn group_by_returns_expected_columns_and_counts() {
        let conn = seeded_conn();
        let result = run_query(
            &conn,
            "SELECT city, COUNT(*) FROM customers GROUP BY city ORDER BY city",
            None,
        )
        .unwrap();

        assert_eq!(result.columns, vec!["city", "COUNT(*)"]);
        assert_eq!(result.rows.len(), 3);
        assert_eq!(result.rows[0], vec![Value::from("Karachi"), Value::from(1)]);
        assert_eq!(result.rows[1], vec![Value::from("Lahore"), Value::from(2)]);
        assert_eq!(result.rows[2], vec![Value::from("Multan"), Value::from(1)]);
        assert!(!result.truncated);
    }

    #[test]
    fn syntax_error_yields_execution_error_not_panic() {
        let conn = seeded_conn();
        let err = run_query(&conn, "SELECT FROM customers", None).unwrap_err();
        assert!(!err.message.is_empty());
    }

    #[test]
    fn missing_table_yields_execution_error() {
        let conn = seeded_conn();
        let err = run_query(&conn, "SELECT * FROM no_such_table", None).unwrap_err();
        assert!(err.message.contains("no_such_table"));
    }

    #[test]
    fn row_budget_truncates() {
        let conn = seeded_conn();
        let result = run_query(&conn, "SELECT id FROM customers ORDER BY id", Some(2)).unwrap();
        assert_eq!(result.rows.len(), 2);
        assert!(result.truncated);
    }

    #[test]
    fn null_real_and_blob_values_map_to_json() {
        let conn = Connection::open_in_memory().unwrap();
        let result = run_query(
            &conn,
            "SELECT NULL, 1.5, x'deadbeef', 'text'",
            None,
        )
        .unwrap();
        assert_eq!(
            result.rows[0],
            vec![
                Value::Null,
                Value::from(1.5),
                Value::from("deadbeef"),
                Value::from("text"),
            ]
        );
    }

    #[test]
    fn empty_result_keeps_column_names() {
        let conn = seeded_conn();
        let result = run_query(&conn, "SELECT name FROM customers WHERE id = -1", None).unwrap();
        assert_eq!(result.columns, vec!["name"]);
        assert!(result.rows.is_empty());
    }
}
