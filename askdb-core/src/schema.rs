//! SQLite schema introspection.
//!
//! Reads table, column and foreign-key metadata from a database file into a
//! [`SchemaDescription`], and renders it to the compact text form used
//! verbatim as LLM prompt context. Rendering is deterministic: repeated calls
//! against an unchanged database yield byte-identical text.

use rusqlite::{Connection, OpenFlags};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::IntrospectionError;

/// A single column of a user table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    /// Declared type as written in the CREATE TABLE statement (may be empty).
    pub declared_type: String,
    pub not_null: bool,
    pub primary_key: bool,
}

/// A declared foreign-key relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKeyInfo {
    pub column: String,
    pub references_table: String,
    pub references_column: String,
}

/// A user table with its columns in native declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableInfo {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
    pub foreign_keys: Vec<ForeignKeyInfo>,
}

/// Structured description of a database schema.
///
/// Table names are unique; the description is immutable once built and is
/// produced fresh per file (or served from a [`crate::SchemaCache`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDescription {
    pub tables: Vec<TableInfo>,
}

/// Open a database file strictly for reading.
///
/// The read-only flags make mutating statements fail at the engine level,
/// independent of the validator in [`crate::validate`].
pub fn open_read_only(path: &Path) -> Result<Connection, IntrospectionError> {
    if !path.exists() {
        return Err(IntrospectionError::FileNotFound(
            path.display().to_string(),
        ));
    }

    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(IntrospectionError::Open)?;

    // SQLite opens lazily; force a read so a corrupt or non-database file
    // fails here instead of on first use.
    conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| {
        row.get::<_, i64>(0)
    })
    .map_err(|e| IntrospectionError::NotADatabase(e.to_string()))?;

    Ok(conn)
}

/// Read the full schema of the connected database.
///
/// Tables are ordered by name, columns in native declaration order and
/// foreign keys in constraint order, so the result is stable for an
/// unchanged file.
pub fn introspect(conn: &Connection) -> Result<SchemaDescription, IntrospectionError> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
         ORDER BY name",
    )?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut tables = Vec::with_capacity(names.len());
    for name in names {
        tables.push(introspect_table(conn, &name)?);
    }

    debug!(table_count = tables.len(), "introspected schema");
    Ok(SchemaDescription { tables })
}

fn introspect_table(conn: &Connection, name: &str) -> Result<TableInfo, IntrospectionError> {
    // PRAGMA table_info columns: cid, name, type, notnull, dflt_value, pk
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote_identifier(name)))?;
    let columns = stmt
        .query_map([], |row| {
            Ok(ColumnInfo {
                name: row.get(1)?,
                declared_type: row.get(2)?,
                not_null: row.get::<_, i64>(3)? != 0,
                primary_key: row.get::<_, i64>(5)? != 0,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    // PRAGMA foreign_key_list columns: id, seq, table, from, to, ...
    let mut stmt = conn.prepare(&format!(
        "PRAGMA foreign_key_list({})",
        quote_identifier(name)
    ))?;
    let foreign_keys = stmt
        .query_map([], |row| {
            // "to" is NULL when the constraint references the implicit
            // primary key of the target table.
            let to: Option<String> = row.get(4)?;
            Ok(ForeignKeyInfo {
                column: row.get(3)?,
                references_table: row.get(2)?,
                references_column: to.unwrap_or_else(|| "id".to_string()),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TableInfo {
        name: name.to_string(),
        columns,
        foreign_keys,
    })
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

impl SchemaDescription {
    /// Render the schema to the compact text form used as prompt context.
    pub fn render(&self) -> String {
        let mut parts = Vec::with_capacity(self.tables.len());
        for table in &self.tables {
            let mut lines = vec![format!("Table: {}", table.name)];
            for col in &table.columns {
                lines.push(format!("- {} ({})", col.name, col.declared_type));
            }
            for fk in &table.foreign_keys {
                lines.push(format!(
                    "- Foreign Key: {} -> {}.{}",
                    fk.column, fk.references_table, fk.references_column
                ));
            }
            parts.push(lines.join("\n"));
        }
        parts.join("\n\n")
    }

    /// Render the schema with up to five distinct sample values appended to
    /// text-typed columns, to ground the LLM in the values that actually
    /// exist. Columns whose sampling fails are rendered without samples.
    pub fn render_with_samples(&self, conn: &Connection) -> String {
        let mut parts = Vec::with_capacity(self.tables.len());
        for table in &self.tables {
            let mut lines = vec![format!("Table: {}", table.name)];
            for col in &table.columns {
                let mut line = format!("- {} ({})", col.name, col.declared_type);
                let upper_type = col.declared_type.to_uppercase();
                if upper_type.contains("TEXT") || upper_type.contains("CHAR") {
                    let values = sample_values(conn, &table.name, &col.name, 5);
                    if !values.is_empty() {
                        line.push_str(&format!(" (Sample Values: {})", values.join(", ")));
                    }
                }
                lines.push(line);
            }
            for fk in &table.foreign_keys {
                lines.push(format!(
                    "- Foreign Key: {} -> {}.{}",
                    fk.column, fk.references_table, fk.references_column
                ));
            }
            parts.push(lines.join("\n"));
        }
        parts.join("\n\n")
    }
}

/// Fetch up to `limit` distinct values from a column, ordered for stable
/// output. Returns an empty list on any failure.
fn sample_values(conn: &Connection, table: &str, column: &str, limit: usize) -> Vec<String> {
    let sql = format!(
        "SELECT DISTINCT {col} FROM {table} WHERE {col} IS NOT NULL ORDER BY {col} LIMIT {limit}",
        col = quote_identifier(column),
        table = quote_identifier(table),
    );
    let Ok(mut stmt) = conn.prepare(&sql) else {
        return Vec::new();
    };
    let rows = stmt.query_map([], |row| row.get::<_, String>(0));
    match rows {
        Ok(rows) => rows.filter_map(Result::ok).collect(),
        Err(_) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn seeded_db_file() -> NamedTempFile {
        let file = NamedTempFile::new().unwrap();
        let conn = Connection::open(file.path()).unwrap();
        conn.execute_batch(
            "CREATE TABLE customers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                city TEXT NOT NULL
            );
            CREATE TABLE orders (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                customer_id INTEGER,
                amount REAL NOT NULL,
                order_date TEXT,
                FOREIGN KEY (customer_id) REFERENCES customers(id)
            );
            INSERT INTO customers (name, city) VALUES
                ('Ali Khan', 'Lahore'),
                ('Sara Malik', 'Karachi'),
                ('Omer Sheikh', 'Lahore');",
        )
        .unwrap();
        file
    }

    #[test]
    fn introspects_tables_columns_and_foreign_keys() {
        let file = seeded_db_file();
        let conn = open_read_only(file.path()).unwrap();
        let schema = introspect(&conn).unwrap();

        assert_eq!(schema.tables.len(), 2);
        // Ordered by name: customers before orders.
        assert_eq!(schema.tables[0].name, "customers");
        assert_eq!(schema.tables[1].name, "orders");

        let customers = &schema.tables[0];
        let col_names: Vec<&str> = customers.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(col_names, ["id", "name", "city"]);
        assert!(customers.columns[0].primary_key);
        assert!(customers.columns[1].not_null);
        assert!(customers.foreign_keys.is_empty());

        let orders = &schema.tables[1];
        let col_names: Vec<&str> = orders.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(col_names, ["id", "customer_id", "amount", "order_date"]);
        assert_eq!(orders.foreign_keys.len(), 1);
        let fk = &orders.foreign_keys[0];
        assert_eq!(fk.column, "customer_id");
        assert_eq!(fk.references_table, "customers");
        assert_eq!(fk.references_column, "id");
    }

    #[test]
    fn rendering_is_deterministic() {
        let file = seeded_db_file();
        let conn = open_read_only(file.path()).unwrap();
        let first = introspect(&conn).unwrap().render();
        let second = introspect(&conn).unwrap().render();
        assert_eq!(first, second);
        assert!(first.contains("Table: customers"));
        assert!(first.contains("- city (TEXT)"));
        assert!(first.contains("- Foreign Key: customer_id -> customers.id"));
    }

    #[test]
    fn sample_enrichment_lists_distinct_text_values() {
        let file = seeded_db_file();
        let conn = open_read_only(file.path()).unwrap();
        let schema = introspect(&conn).unwrap();
        let rendered = schema.render_with_samples(&conn);
        assert!(rendered.contains("city (TEXT) (Sample Values: Karachi, Lahore)"));
        // Integer columns are never sampled.
        assert!(rendered.contains("- id (INTEGER)\n"));
        // Deterministic as well.
        assert_eq!(rendered, schema.render_with_samples(&conn));
    }

    #[test]
    fn read_only_connection_rejects_writes() {
        let file = seeded_db_file();
        let conn = open_read_only(file.path()).unwrap();
        let err = conn.execute("INSERT INTO customers (name, city) VALUES ('x', 'y')", []);
        assert!(err.is_err());
    }

    #[test]
    fn missing_file_is_an_introspection_error() {
        let err = open_read_only(Path::new("/nonexistent/definitely-not-here.sqlite"));
        assert!(matches!(err, Err(IntrospectionError::FileNotFound(_))));
    }

    #[test]
    fn non_database_file_is_rejected() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"this is not a sqlite database, not even close")
            .unwrap();
        let err = open_read_only(file.path());
        assert!(matches!(err, Err(IntrospectionError::NotADatabase(_))));
    }

    #[test]
    fn internal_tables_are_excluded() {
        let file = seeded_db_file();
        let conn = open_read_only(file.path()).unwrap();
        let schema = introspect(&conn).unwrap();
        // AUTOINCREMENT creates sqlite_sequence; it must not appear.
        assert!(schema.tables.iter().all(|t| !t.name.starts_with("sqlite_")));
    }
}
