//! Typed SQL literals and placeholder tokens.

use chrono::NaiveDateTime;

/// Positional placeholder understood by the storage engine.
pub const PLACEHOLDER: &str = "?";

/// Storage format for every persisted timestamp.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One SQL value or raw token.
///
/// String and timestamp payloads are quoted with embedded quotes doubled.
/// Tokens render verbatim and must never carry untrusted input.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    String(String),
    Timestamp(NaiveDateTime),
    Token(String),
}

impl Value {
    /// Creates a verbatim token (placeholder or raw SQL fragment).
    pub fn token(token: impl Into<String>) -> Self {
        Self::Token(token.into())
    }

    /// Creates a quoted string literal.
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// Creates the `?` placeholder token.
    pub fn placeholder() -> Self {
        Self::token(PLACEHOLDER)
    }

    /// Renders the value as a single SQL literal or token.
    pub fn render(&self) -> String {
        match self {
            Self::Integer(value) => value.to_string(),
            Self::Float(value) => render_float(*value),
            Self::String(value) => quote(value),
            Self::Timestamp(value) => quote(&value.format(DATETIME_FORMAT).to_string()),
            Self::Token(token) => token.clone(),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Self::Timestamp(value)
    }
}

/// Returns `count` placeholder tokens.
pub fn placeholders(count: usize) -> Vec<Value> {
    (0..count).map(|_| Value::placeholder()).collect()
}

fn quote(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', "''"))
}

fn render_float(value: f64) -> String {
    // SQL has no literal for NaN or infinities.
    if !value.is_finite() {
        return "NULL".to_string();
    }
    let rendered = value.to_string();
    if rendered.contains(['.', 'e', 'E']) {
        rendered
    } else {
        format!("{rendered}.0")
    }
}
