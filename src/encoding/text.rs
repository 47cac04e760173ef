//! Textual renderings of field values: the compact form used inside partition
//! identifiers and the quoted literal form used for display.

use crate::config::{DateStyle, FormatSettings};
use crate::types::{date, DataType, Field};

/// Decimal rendering of an integral value as it appears in an identifier.
///
/// Dates render as `YYYYMMDD`, everything else integral as its decimal value.
/// Returns `None` for types that have no direct identifier form.
pub fn id_component(data_type: &DataType, field: &Field) -> Option<String> {
    match (data_type, field) {
        (DataType::Date, Field::UInt(days)) => {
            let days = u16::try_from(*days).ok()?;
            Some(date::to_yyyymmdd(date::date_from_days(days)).to_string())
        }
        (ty, Field::UInt(v)) if ty.is_integral() => Some(v.to_string()),
        (ty, Field::Int(v)) if ty.is_integral() => Some(v.to_string()),
        _ => None,
    }
}

/// Renders a value as a literal, the way it would be written in a query.
pub fn literal(data_type: &DataType, field: &Field, settings: &FormatSettings) -> String {
    match (data_type.remove_nullable(), field) {
        (_, Field::Null) => "NULL".to_string(),
        (DataType::Date, Field::UInt(days)) => match u16::try_from(*days) {
            Ok(days) => {
                let date = date::date_from_days(days);
                match settings.date_style {
                    DateStyle::Iso => format!("'{}'", date.format("%Y-%m-%d")),
                    DateStyle::Compact => date::to_yyyymmdd(date).to_string(),
                }
            }
            Err(_) => days.to_string(),
        },
        (DataType::DateTime, Field::UInt(seconds)) => {
            match chrono::DateTime::from_timestamp(*seconds as i64, 0) {
                Some(ts) => match settings.date_style {
                    DateStyle::Iso => format!("'{}'", ts.format("%Y-%m-%d %H:%M:%S")),
                    DateStyle::Compact => ts.format("%Y%m%d%H%M%S").to_string(),
                },
                None => seconds.to_string(),
            }
        }
        (DataType::Bool, Field::UInt(v)) => (*v != 0).to_string(),
        (_, Field::UInt(v)) => v.to_string(),
        (_, Field::Int(v)) => v.to_string(),
        (_, Field::Float(v)) => float_literal(*v),
        (_, Field::String(s)) => quote(s),
    }
}

fn float_literal(v: f64) -> String {
    if v.is_nan() {
        "nan".to_string()
    } else if v.is_infinite() {
        if v > 0.0 { "inf" } else { "-inf" }.to_string()
    } else {
        v.to_string()
    }
}

/// Single-quotes a string, escaping quotes, backslashes and control characters.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}
