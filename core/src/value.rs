//! Dynamically-typed scalar values.
//!
//! SQLite stores one of five storage classes per cell regardless of the
//! column's declared type. [`Value`] models that explicitly so builders and
//! renderers branch on the tag instead of guessing from text.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single stored or bound cell value.
///
/// # Examples
///
/// ```
/// use tabula_core::Value;
///
/// assert_eq!(Value::Integer(42).cell_text(), "42");
/// assert_eq!(Value::Null.cell_text(), "");
/// assert!(Value::text("  ").is_blank());
/// assert!(!Value::Integer(0).is_blank());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum Value {
    /// SQL `NULL`.
    #[default]
    Null,
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit float.
    Real(f64),
    /// UTF-8 text.
    Text(String),
    /// Raw bytes.
    Blob(Vec<u8>),
}

impl Value {
    /// Creates a text value.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Returns `true` for `NULL` and for text that is empty after trimming.
    ///
    /// Blank values count as "not supplied" in insert and update intents.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Returns `true` if this is `NULL`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short name of the storage class, as SQLite's `typeof()` reports it.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Text(_) => "text",
            Self::Blob(_) => "blob",
        }
    }

    /// Renders the value as plain cell text.
    ///
    /// `NULL` renders as an empty string and blobs as lowercase hex, which
    /// is the representation used by CSV and Markdown output.
    pub fn cell_text(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Integer(i) => i.to_string(),
            Self::Real(f) => format_real(*f),
            Self::Text(s) => s.clone(),
            Self::Blob(bytes) => hex(bytes),
        }
    }

    /// Converts the value to JSON, keeping numbers as numbers.
    ///
    /// Non-finite reals have no JSON form and become `null`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tabula_core::Value;
    ///
    /// assert_eq!(Value::Integer(7).to_json(), serde_json::json!(7));
    /// assert_eq!(Value::text("7").to_json(), serde_json::json!("7"));
    /// assert_eq!(Value::Null.to_json(), serde_json::Value::Null);
    /// ```
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Integer(i) => serde_json::Value::from(*i),
            Self::Real(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::Text(s) => serde_json::Value::String(s.clone()),
            Self::Blob(bytes) => serde_json::Value::String(hex(bytes)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            other => f.write_str(&other.cell_text()),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Blob(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Self::Null)
    }
}

// Keep a trailing ".0" on integral reals so they read back as REAL.
fn format_real(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{f:.1}")
    } else {
        f.to_string()
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_cell_text_keeps_fraction_marker() {
        assert_eq!(Value::Real(3.0).cell_text(), "3.0");
        assert_eq!(Value::Real(2.5).cell_text(), "2.5");
    }

    #[test]
    fn test_blob_renders_as_hex() {
        assert_eq!(Value::Blob(vec![0x00, 0xab, 0x10]).cell_text(), "00ab10");
        assert_eq!(Value::Blob(vec![0xff]).to_json(), serde_json::json!("ff"));
    }

    #[test]
    fn test_blank_detection() {
        assert!(Value::Null.is_blank());
        assert!(Value::text("").is_blank());
        assert!(!Value::text("x").is_blank());
        assert!(!Value::Real(0.0).is_blank());
        assert!(!Value::Blob(Vec::new()).is_blank());
    }

    #[test]
    fn test_display_shows_null_marker() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::text("a").to_string(), "a");
    }

    #[test]
    fn test_non_finite_real_is_null_in_json() {
        assert_eq!(Value::Real(f64::NAN).to_json(), serde_json::Value::Null);
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("a")), Value::text("a"));
    }
}
