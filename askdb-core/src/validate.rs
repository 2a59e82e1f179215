//! SELECT-only SQL validation.
//!
//! Classifies a candidate SQL string (model-generated or user-typed) as safe
//! to execute or rejected. The classifier is a tokenizer, not a regex:
//! keyword checks are whole-token and case-insensitive, so identifiers such
//! as `deleted_users` or `updated_at` never trigger a false rejection, and
//! keywords hidden in comments or string literals never slip through.
//!
//! The validator only gates pass/fail. An allowed query is returned verbatim,
//! never rewritten.

use serde::Serialize;

/// Verdict on a candidate SQL string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum ValidationResult {
    /// The statement is a single read-only query; `sql` is the original
    /// input text, unmodified.
    Allowed { sql: String },
    /// The statement was rejected; `reason` is suitable for display.
    Rejected { reason: String },
}

impl ValidationResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, ValidationResult::Allowed { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            ValidationResult::Rejected { reason } => Some(reason),
            ValidationResult::Allowed { .. } => None,
        }
    }
}

/// Keywords whose presence as a whole token, at any nesting depth, forces
/// rejection.
const PROHIBITED_KEYWORDS: &[&str] = &[
    "INSERT", "UPDATE", "DELETE", "DROP", "ALTER", "CREATE", "TRUNCATE", "REPLACE", "ATTACH",
    "DETACH", "PRAGMA", "VACUUM", "GRANT", "REVOKE", "COMMIT", "ROLLBACK", "EXEC", "EXECUTE",
];

#[derive(Debug, Clone, PartialEq)]
enum Token {
    /// Bare word: identifier or keyword.
    Word(String),
    /// Identifier quoted with `"`, `` ` `` or `[...]`; never keyword-matched.
    QuotedIdent(String),
    /// String literal; never keyword-matched.
    Str(String),
    Number(String),
    LParen,
    RParen,
    Comma,
    Semicolon,
    Punct(char),
}

fn describe_token(token: &Token) -> String {
    match token {
        Token::Word(w) => format!("'{}'", w.to_uppercase()),
        Token::QuotedIdent(s) => format!("identifier \"{}\"", s),
        Token::Str(_) => "a string literal".to_string(),
        Token::Number(n) => format!("'{}'", n),
        Token::LParen => "'('".to_string(),
        Token::RParen => "')'".to_string(),
        Token::Comma => "','".to_string(),
        Token::Semicolon => "';'".to_string(),
        Token::Punct(c) => format!("'{}'", c),
    }
}

/// Tokenize SQL, skipping whitespace and `--` / `/* */` comments.
fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            _ if c.is_whitespace() => {
                chars.next();
            }
            '-' => {
                chars.next();
                if chars.peek() == Some(&'-') {
                    // Line comment.
                    for c in chars.by_ref() {
                        if c == '\n' {
                            break;
                        }
                    }
                } else {
                    tokens.push(Token::Punct('-'));
                }
            }
            '/' => {
                chars.next();
                if chars.peek() == Some(&'*') {
                    // Block comment; an unterminated one swallows the rest.
                    chars.next();
                    let mut prev = '\0';
                    for c in chars.by_ref() {
                        if prev == '*' && c == '/' {
                            break;
                        }
                        prev = c;
                    }
                } else {
                    tokens.push(Token::Punct('/'));
                }
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            ';' => {
                chars.next();
                tokens.push(Token::Semicolon);
            }
            '\'' => {
                chars.next();
                tokens.push(Token::Str(read_quoted(&mut chars, '\'')));
            }
            '"' => {
                chars.next();
                tokens.push(Token::QuotedIdent(read_quoted(&mut chars, '"')));
            }
            '`' => {
                chars.next();
                tokens.push(Token::QuotedIdent(read_quoted(&mut chars, '`')));
            }
            '[' => {
                chars.next();
                let mut ident = String::new();
                for c in chars.by_ref() {
                    if c == ']' {
                        break;
                    }
                    ident.push(c);
                }
                tokens.push(Token::QuotedIdent(ident));
            }
            _ if c.is_ascii_digit() => {
                let mut num = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '.' {
                        num.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Number(num));
            }
            _ if c.is_alphabetic() || c == '_' => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        word.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Word(word));
            }
            _ => {
                chars.next();
                tokens.push(Token::Punct(c));
            }
        }
    }

    tokens
}

/// Read until the closing quote, honoring SQL doubled-quote escapes.
fn read_quoted(chars: &mut std::iter::Peekable<std::str::Chars>, quote: char) -> String {
    let mut s = String::new();
    while let Some(c) = chars.next() {
        if c == quote {
            if chars.peek() == Some(&quote) {
                s.push(c);
                chars.next();
            } else {
                break;
            }
        } else {
            s.push(c);
        }
    }
    s
}

fn is_word(token: Option<&Token>, keyword: &str) -> bool {
    matches!(token, Some(Token::Word(w)) if w.eq_ignore_ascii_case(keyword))
}

/// Validate a candidate SQL string.
///
/// Allowed means: a single read-only query (SELECT, or a set operation over
/// read-only queries), optionally preceded by CTEs, with no prohibited
/// keyword at any nesting depth and no second statement after a separator.
pub fn validate_sql(sql: &str) -> ValidationResult {
    let tokens = tokenize(sql);

    if tokens.is_empty() {
        return ValidationResult::Rejected {
            reason: "query is empty or contains only comments".to_string(),
        };
    }

    // Multi-statement payloads are rejected even when the first statement
    // alone would pass: sequencing a hidden mutating statement after a
    // benign one is the canonical bypass attempt. A single trailing
    // semicolon is fine.
    if let Some(pos) = tokens.iter().position(|t| *t == Token::Semicolon) {
        if pos + 1 < tokens.len() {
            return ValidationResult::Rejected {
                reason: format!(
                    "multiple statements are not allowed (found {} after the first statement)",
                    describe_token(&tokens[pos + 1])
                ),
            };
        }
    }

    // Outermost statement type, discounting leading CTE definitions.
    if let Err(reason) = check_outer_statement(&tokens) {
        return ValidationResult::Rejected { reason };
    }

    // Prohibited keywords anywhere, at any depth. Only bare words count;
    // quoted identifiers and string literals never match.
    for token in &tokens {
        if let Token::Word(w) = token {
            let upper = w.to_uppercase();
            if PROHIBITED_KEYWORDS.contains(&upper.as_str()) {
                return ValidationResult::Rejected {
                    reason: format!("prohibited keyword detected: {}", upper),
                };
            }
        }
    }

    ValidationResult::Allowed {
        sql: sql.to_string(),
    }
}

/// Check that the statement, after skipping `WITH ... AS (...)` clauses,
/// begins with a read-only query. Returns the rejection reason on failure.
fn check_outer_statement(tokens: &[Token]) -> Result<(), String> {
    let mut i = 0;

    if is_word(tokens.get(i), "WITH") {
        i += 1;
        if is_word(tokens.get(i), "RECURSIVE") {
            i += 1;
        }
        loop {
            // CTE name.
            match tokens.get(i) {
                Some(Token::Word(_)) | Some(Token::QuotedIdent(_)) => i += 1,
                _ => return Err("malformed WITH clause: expected a CTE name".to_string()),
            }
            // Optional column list.
            if tokens.get(i) == Some(&Token::LParen) {
                i = skip_parens(tokens, i)?;
            }
            if !is_word(tokens.get(i), "AS") {
                return Err("malformed WITH clause: expected AS".to_string());
            }
            i += 1;
            // Optional [NOT] MATERIALIZED hint.
            if is_word(tokens.get(i), "NOT") {
                i += 1;
            }
            if is_word(tokens.get(i), "MATERIALIZED") {
                i += 1;
            }
            if tokens.get(i) != Some(&Token::LParen) {
                return Err("malformed WITH clause: expected the CTE body".to_string());
            }
            i = skip_parens(tokens, i)?;
            if tokens.get(i) == Some(&Token::Comma) {
                i += 1;
                continue;
            }
            break;
        }
    }

    head_is_read_only(tokens, i)
}

/// Verify that the query head at `i` is read-only. Nested bodies and set-op
/// branches are covered by the prohibited-keyword scan; only the leading
/// statement keyword decides the statement type.
fn head_is_read_only(tokens: &[Token], i: usize) -> Result<(), String> {
    match tokens.get(i) {
        Some(Token::Word(w))
            if w.eq_ignore_ascii_case("SELECT") || w.eq_ignore_ascii_case("VALUES") =>
        {
            Ok(())
        }
        Some(Token::Word(w)) => Err(format!(
            "statement type {} is not permitted",
            w.to_uppercase()
        )),
        // A parenthesized compound head: check the first token inside,
        // which may itself be WITH, SELECT or another paren.
        Some(Token::LParen) => {
            if is_word(tokens.get(i + 1), "WITH") {
                // Re-run the CTE skip on the inner slice.
                let end = matching_paren(tokens, i)?;
                check_outer_statement(&tokens[i + 1..end])
            } else {
                head_is_read_only(tokens, i + 1)
            }
        }
        Some(other) => Err(format!(
            "statement must begin with SELECT, found {}",
            describe_token(other)
        )),
        None => Err("statement must begin with SELECT".to_string()),
    }
}

/// Given `tokens[open] == LParen`, return the index just past the matching
/// close paren.
fn skip_parens(tokens: &[Token], open: usize) -> Result<usize, String> {
    Ok(matching_paren(tokens, open)? + 1)
}

/// Given `tokens[open] == LParen`, return the index of the matching RParen.
fn matching_paren(tokens: &[Token], open: usize) -> Result<usize, String> {
    let mut depth = 0usize;
    for (offset, token) in tokens[open..].iter().enumerate() {
        match token {
            Token::LParen => depth += 1,
            Token::RParen => {
                depth -= 1;
                if depth == 0 {
                    return Ok(open + offset);
                }
            }
            _ => {}
        }
    }
    Err("unbalanced parentheses".to_string())
}
