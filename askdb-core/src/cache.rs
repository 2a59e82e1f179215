//! Schema context cache.
//!
//! Re-introspecting and re-rendering the schema on every request is wasted
//! work, but a swapped database file must never serve stale prompt context.
//! The cache is therefore explicit and keyed by (canonical path, modification
//! time): a changed mtime invalidates the entry and introspection re-runs.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use tracing::debug;

use crate::error::IntrospectionError;
use crate::schema::{introspect, open_read_only, SchemaDescription};

/// A cached, immutable view of one database file's schema.
#[derive(Debug, Clone)]
pub struct CachedSchema {
    pub schema: Arc<SchemaDescription>,
    /// Plain rendered form, for display.
    pub rendered: Arc<str>,
    /// Sample-value enriched form, for LLM prompt context.
    pub enriched: Arc<str>,
    pub modified: SystemTime,
}

struct CacheEntry {
    modified: SystemTime,
    cached: CachedSchema,
}

/// Cache of introspected schemas keyed by file identity.
#[derive(Default)]
pub struct SchemaCache {
    entries: HashMap<PathBuf, CacheEntry>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached schema for `path`, introspecting when the file is
    /// new or its modification time changed.
    pub fn get_or_introspect(&mut self, path: &Path) -> Result<CachedSchema, IntrospectionError> {
        if !path.exists() {
            return Err(IntrospectionError::FileNotFound(
                path.display().to_string(),
            ));
        }
        let modified = fs::metadata(path)?.modified()?;
        let key = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());

        if let Some(entry) = self.entries.get(&key) {
            if entry.modified == modified {
                return Ok(entry.cached.clone());
            }
            debug!(path = %key.display(), "schema cache entry is stale");
        }

        let conn = open_read_only(path)?;
        let schema = Arc::new(introspect(&conn)?);
        let cached = CachedSchema {
            rendered: schema.render().into(),
            enriched: schema.render_with_samples(&conn).into(),
            schema,
            modified,
        };
        self.entries.insert(
            key,
            CacheEntry {
                modified,
                cached: cached.clone(),
            },
        );
        Ok(cached)
    }

    /// Drop the entry for `path`, forcing re-introspection on next access.
    pub fn invalidate(&mut self, path: &Path) {
        let key = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        self.entries.remove(&key);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
