//! SQL literal rendering.
//!
//! Every value that ends up inside a generated `INSERT` goes through
//! [`format_value`]. Escaping is minimal: strings are
//! single-quoted with embedded quotes doubled, nothing else is touched.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use std::fmt;

/// A typed value headed for a SQL literal
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// NULL / absent
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point
    Float(f64),
    /// Point in time, rendered as ISO-8601 UTC
    Timestamp(DateTime<Utc>),
    /// Calendar date
    Date(NaiveDate),
    /// Text
    Text(String),
    /// Record or array, rendered as compact JSON text
    Json(serde_json::Value),
}

/// Render a value as a SQL literal. Total: every value maps to a literal.
pub fn format_value(value: &SqlValue) -> String {
    match value {
        SqlValue::Null => "NULL".to_string(),
        SqlValue::Bool(true) => "TRUE".to_string(),
        SqlValue::Bool(false) => "FALSE".to_string(),
        SqlValue::Int(n) => n.to_string(),
        SqlValue::Float(f) if f.is_finite() => f.to_string(),
        SqlValue::Float(f) => quote_string(&non_finite_text(*f)),
        SqlValue::Timestamp(ts) => quote_string(&ts.to_rfc3339_opts(SecondsFormat::Millis, true)),
        SqlValue::Date(d) => quote_string(&d.format("%Y-%m-%d").to_string()),
        SqlValue::Text(s) => quote_string(s),
        SqlValue::Json(v) => quote_string(&v.to_string()),
    }
}

/// Single-quote a string, doubling embedded single quotes
pub fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\'' {
            out.push('\'');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

/// Inverse of [`quote_string`]: recover the text of a quoted literal.
///
/// Returns `None` if the input is not a well-formed single-quoted literal
/// (missing quotes or an undoubled quote inside).
pub fn parse_string_literal(literal: &str) -> Option<String> {
    let inner = literal.strip_prefix('\'')?.strip_suffix('\'')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\'' {
            if chars.next() != Some('\'') {
                return None;
            }
        }
        out.push(c);
    }
    Some(out)
}

fn non_finite_text(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_sign_positive() {
        "Infinity".to_string()
    } else {
        "-Infinity".to_string()
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_value(self))
    }
}

impl From<serde_json::Value> for SqlValue {
    fn from(v: serde_json::Value) -> Self {
        use serde_json::Value;
        match v {
            Value::Null => SqlValue::Null,
            Value::Bool(b) => SqlValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => SqlValue::Int(i),
                // u64 beyond i64 and floats: keep the exact decimal text
                None => match n.as_f64() {
                    Some(f) if n.is_f64() => SqlValue::Float(f),
                    _ => SqlValue::Text(n.to_string()),
                },
            },
            Value::String(s) => SqlValue::Text(s),
            other => SqlValue::Json(other),
        }
    }
}

impl From<&str> for SqlValue {
    fn from(s: &str) -> Self {
        SqlValue::Text(s.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(s: String) -> Self {
        SqlValue::Text(s)
    }
}

impl From<i64> for SqlValue {
    fn from(n: i64) -> Self {
        SqlValue::Int(n)
    }
}

impl From<f64> for SqlValue {
    fn from(f: f64) -> Self {
        SqlValue::Float(f)
    }
}

impl From<bool> for SqlValue {
    fn from(b: bool) -> Self {
        SqlValue::Bool(b)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(ts: DateTime<Utc>) -> Self {
        SqlValue::Timestamp(ts)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(SqlValue::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_scalars() {
        assert_eq!(format_value(&SqlValue::Null), "NULL");
        assert_eq!(format_value(&SqlValue::Bool(true)), "TRUE");
        assert_eq!(format_value(&SqlValue::Bool(false)), "FALSE");
        assert_eq!(format_value(&SqlValue::Int(42)), "42");
        assert_eq!(format_value(&SqlValue::Int(-7)), "-7");
        assert_eq!(format_value(&SqlValue::Float(3.5)), "3.5");
    }

    #[test]
    fn test_quotes_are_doubled() {
        assert_eq!(format_value(&"O'Brien".into()), "'O''Brien'");
        assert_eq!(format_value(&"''".into()), "''''''");
        // Backslashes are not escape characters in standard SQL strings
        assert_eq!(format_value(&r"C:\tmp".into()), r"'C:\tmp'");
    }

    #[test]
    fn test_timestamp_and_date() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
        assert_eq!(
            format_value(&SqlValue::Timestamp(ts)),
            "'2024-03-09T14:05:00.000Z'"
        );
        let d = NaiveDate::from_ymd_opt(1999, 12, 31).unwrap();
        assert_eq!(format_value(&SqlValue::Date(d)), "'1999-12-31'");
    }

    #[test]
    fn test_structured_values_become_json_strings() {
        let v = SqlValue::Json(json!({"name": "it's", "tags": [1, 2]}));
        assert_eq!(format_value(&v), r#"'{"name":"it''s","tags":[1,2]}'"#);
        assert_eq!(format_value(&SqlValue::Json(json!([]))), "'[]'");
    }

    #[test]
    fn test_non_finite_floats_are_quoted() {
        assert_eq!(format_value(&SqlValue::Float(f64::NAN)), "'NaN'");
        assert_eq!(format_value(&SqlValue::Float(f64::INFINITY)), "'Infinity'");
        assert_eq!(
            format_value(&SqlValue::Float(f64::NEG_INFINITY)),
            "'-Infinity'"
        );
    }

    #[test]
    fn test_from_json() {
        assert_eq!(SqlValue::from(json!(null)), SqlValue::Null);
        assert_eq!(SqlValue::from(json!(7)), SqlValue::Int(7));
        assert_eq!(SqlValue::from(json!(1.25)), SqlValue::Float(1.25));
        assert_eq!(SqlValue::from(json!("x")), SqlValue::Text("x".into()));
        assert_eq!(
            SqlValue::from(json!(u64::MAX)),
            SqlValue::Text(u64::MAX.to_string())
        );
        assert!(matches!(SqlValue::from(json!({"a": 1})), SqlValue::Json(_)));
    }

    #[test]
    fn test_option_maps_none_to_null() {
        let none: Option<i64> = None;
        assert_eq!(format_value(&none.into()), "NULL");
        assert_eq!(format_value(&Some(5i64).into()), "5");
    }

    #[test]
    fn test_string_literal_round_trip() {
        for s in ["", "'", "O'Brien", "''quoted''", "a'b'c'", "no quotes", "ünï'cödé"] {
            let literal = format_value(&s.into());
            assert_eq!(parse_string_literal(&literal).as_deref(), Some(s));
        }
    }

    #[test]
    fn test_parse_rejects_malformed_literals() {
        assert_eq!(parse_string_literal("abc"), None);
        assert_eq!(parse_string_literal("'a'b'"), None);
        assert_eq!(parse_string_literal("'"), None);
    }
}
