//! Retrieval of schema and SQL-guidance snippets for prompt context.
//!
//! An external vector store is an optional collaborator; this built-in store
//! keeps the same contract (given a question, return the top-k relevant
//! snippets) with plain keyword-overlap scoring, so translation degrades
//! gracefully to schema-only context when nothing matches.

use tracing::debug;

/// Contract for a context snippet collaborator.
pub trait ContextStore: Send + Sync {
    /// Return up to `k` snippets relevant to the question, most relevant
    /// first. May be empty.
    fn relevant_snippets(&self, question: &str, k: usize) -> Vec<String>;
}

/// Generic SQL guidance seeded into every store, independent of any schema.
const GENERIC_SQL_GUIDANCE: &[&str] = &[
    "To calculate total, use SUM(column).",
    "To count items, use COUNT(column).",
    "To filter results, use WHERE column = 'value'.",
    "To sort results, use ORDER BY column DESC/ASC.",
    "To group data, use GROUP BY column.",
    "To limit results, use LIMIT N.",
    "For 'top N per category', use window function: RANK() OVER (PARTITION BY category ORDER BY val DESC).",
    "For recursive hierarchies (e.g. org chart), use WITH RECURSIVE cte AS (...).",
    "For moving averages, use AVG(val) OVER (ORDER BY date ROWS BETWEEN 6 PRECEDING AND CURRENT ROW).",
    "For year-over-year growth, use LAG(val) OVER (ORDER BY date).",
];

/// Keyword-overlap snippet store over guidance documents and indexed schema
/// chunks.
pub struct KeywordContextStore {
    documents: Vec<String>,
    /// Number of leading documents that are generic guidance; schema chunks
    /// live after this index and are replaced wholesale on re-index.
    guidance_len: usize,
}

impl Default for KeywordContextStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordContextStore {
    pub fn new() -> Self {
        let documents: Vec<String> = GENERIC_SQL_GUIDANCE
            .iter()
            .map(|s| s.to_string())
            .collect();
        let guidance_len = documents.len();
        Self {
            documents,
            guidance_len,
        }
    }

    /// Index a rendered schema, replacing any previously indexed schema so a
    /// swapped database cannot leave stale chunks behind. Chunks are split
    /// on `Table: ` headers, one per table.
    pub fn index_schema(&mut self, schema_text: &str) {
        self.documents.truncate(self.guidance_len);
        for chunk in schema_text.split("Table: ") {
            if chunk.trim().is_empty() {
                continue;
            }
            self.documents
                .push(format!("Table: {}", chunk.trim_end()));
        }
        debug!(
            chunks = self.documents.len() - self.guidance_len,
            "indexed schema chunks"
        );
    }
}

fn keywords(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|w| w.len() > 2)
        .map(|w| w.to_lowercase())
        .collect()
}

impl ContextStore for KeywordContextStore {
    fn relevant_snippets(&self, question: &str, k: usize) -> Vec<String> {
        let terms = keywords(question);
        if terms.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(usize, &String)> = self
            .documents
            .iter()
            .map(|doc| {
                let haystack = doc.to_lowercase();
                let score = terms.iter().filter(|t| haystack.contains(*t)).count();
                (score, doc)
            })
            .filter(|(score, _)| *score > 0)
            .collect();

        // Stable sort keeps insertion order among equal scores.
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().take(k).map(|(_, doc)| doc.clone()).collect()
    }
}
