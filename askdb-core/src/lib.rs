//! # askdb-core
//!
//! The safety-critical core of askdb: SQLite schema introspection, SELECT-only
//! SQL validation, and read-only query execution. Everything here is a
//! single-pass transformation with no background tasks; callers own the
//! request lifecycle.
//!
//! ## Example
//!
//! ```rust,no_run
//! use askdb_core::schema::{introspect, open_read_only};
//! use askdb_core::validate::{validate_sql, ValidationResult};
//! use askdb_core::execute::run_query;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let conn = open_read_only("db/demo.sqlite".as_ref())?;
//!     let schema = introspect(&conn)?;
//!     println!("{}", schema.render());
//!
//!     match validate_sql("SELECT name FROM customers LIMIT 5") {
//!         ValidationResult::Allowed { sql } => {
//!             let result = run_query(&conn, &sql, Some(1000))?;
//!             println!("{} rows", result.rows.len());
//!         }
//!         ValidationResult::Rejected { reason } => eprintln!("rejected: {}", reason),
//!     }
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod context;
pub mod demo;
pub mod error;
pub mod execute;
pub mod schema;
pub mod validate;

pub use cache::{CachedSchema, SchemaCache};
pub use context::{ContextStore, KeywordContextStore};
pub use error::{ExecutionError, IntrospectionError};
pub use execute::{run_query, QueryResult};
pub use schema::{ColumnInfo, ForeignKeyInfo, SchemaDescription, TableInfo};
pub use validate::{validate_sql, ValidationResult};
