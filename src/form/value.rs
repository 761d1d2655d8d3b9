use serde_json::Value;

use crate::domain::{FieldSpec, InputKind, number_value};

use super::options::FormOptions;

/// Turns raw user input into the buffer representation for `field`.
/// Numbers never fail: blank or malformed input reads as zero.
pub(crate) fn coerce_input(field: &FieldSpec, raw: &str, options: &FormOptions) -> Value {
    match field.kind {
        InputKind::Number => coerce_number(raw),
        kind if kind.is_textual() && options.trim_text => Value::String(raw.trim().to_string()),
        InputKind::Select | InputKind::Date => Value::String(raw.trim().to_string()),
        _ => Value::String(raw.to_string()),
    }
}

pub(crate) fn coerce_number(raw: &str) -> Value {
    let trimmed = raw.trim();
    if let Ok(integer) = trimmed.parse::<i64>() {
        return Value::from(integer);
    }
    match trimmed.parse::<f64>() {
        Ok(number) if number.is_finite() => number_value(number),
        _ => Value::from(0),
    }
}

/// Brings a seeded value into the shape the field expects. Numbers stored as
/// text by an older record are read leniently; everything else is kept.
pub(crate) fn normalize_seed(field: &FieldSpec, value: Value) -> Value {
    match (field.kind, &value) {
        (InputKind::Number, Value::Number(_)) => value,
        (InputKind::Number, Value::String(text)) => coerce_number(text),
        (InputKind::Number, Value::Null) => Value::from(0),
        (_, Value::Null) => field.initial_value(),
        _ => value,
    }
}
