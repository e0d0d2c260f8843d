//! SQL literal rendering
//!
//! This module turns column values into escaped SQL literals for the
//! human-readable statement form. Executors receive parameters instead.

use crate::types::ColumnValue;

/// Quote a string as a SQL literal, doubling embedded single quotes
pub fn escape_string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        if c == '\'' {
            out.push('\'');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

fn is_numeric_text(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    !digits.is_empty()
        && digits.chars().filter(|c| *c == '.').count() <= 1
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.chars().any(|c| c.is_ascii_digit())
}

/// Render a column value as a literal that is safe to splice into statement text
pub fn render_literal(value: &ColumnValue) -> String {
    match value {
        ColumnValue::Text(s) => escape_string_literal(s),
        ColumnValue::SmallInt(v) => v.to_string(),
        ColumnValue::Integer(v) => v.to_string(),
        ColumnValue::BigInt(v) => v.to_string(),
        // Finite by construction; the conversion layer rejects NaN and infinities
        ColumnValue::Float(v) if v.is_finite() => v.to_string(),
        ColumnValue::Float(_) => "NULL".to_string(),
        ColumnValue::Boolean(true) => "TRUE".to_string(),
        ColumnValue::Boolean(false) => "FALSE".to_string(),
        ColumnValue::Uuid(v) => escape_string_literal(&v.to_string()),
        ColumnValue::Timestamp(v) => escape_string_literal(&v.to_rfc3339()),
        ColumnValue::Decimal(s) if is_numeric_text(s) => s.clone(),
        ColumnValue::Decimal(s) => escape_string_literal(s),
        ColumnValue::Json(v) => escape_string_literal(&v.to_string()),
        ColumnValue::Null => "NULL".to_string(),
        ColumnValue::Unset => "DEFAULT".to_string(),
    }
}
