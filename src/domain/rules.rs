use std::{
    fmt,
    sync::{Arc, LazyLock},
};

use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;

use super::derive::numeric;

type CheckFn = dyn Fn(&Value) -> Result<(), String> + Send + Sync;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@.]+(?:\.[^\s@.]+)+$").expect("valid email regex")
});

/// Field-level validation predicate. Rules only look at non-empty values;
/// emptiness is the business of the schema's required keys.
#[derive(Clone)]
pub enum Rule {
    Pattern { regex: Regex, message: String },
    Email,
    Date,
    MinLength(usize),
    /// Inclusive lower bound.
    Min(f64),
    /// Inclusive upper bound.
    Max(f64),
    /// Exclusive lower bound.
    GreaterThan(f64),
    Custom { name: String, check: Arc<CheckFn> },
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Pattern { regex, .. } => f.debug_tuple("Pattern").field(&regex.as_str()).finish(),
            Rule::Email => f.write_str("Email"),
            Rule::Date => f.write_str("Date"),
            Rule::MinLength(len) => f.debug_tuple("MinLength").field(len).finish(),
            Rule::Min(bound) => f.debug_tuple("Min").field(bound).finish(),
            Rule::Max(bound) => f.debug_tuple("Max").field(bound).finish(),
            Rule::GreaterThan(bound) => f.debug_tuple("GreaterThan").field(bound).finish(),
            Rule::Custom { name, .. } => f.debug_tuple("Custom").field(name).finish(),
        }
    }
}

impl Rule {
    /// Anchored pattern rule. The pattern must match the whole value.
    pub fn pattern(pattern: &str, message: impl Into<String>) -> Result<Self, regex::Error> {
        let anchored = format!("^(?:{pattern})$");
        Ok(Rule::Pattern {
            regex: Regex::new(&anchored)?,
            message: message.into(),
        })
    }

    pub fn custom<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        Rule::Custom {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    pub fn check(&self, value: &Value) -> Result<(), String> {
        if is_blank(value) {
            return Ok(());
        }
        match self {
            Rule::Pattern { regex, message } => {
                if regex.is_match(&display_text(value)) {
                    Ok(())
                } else {
                    Err(message.clone())
                }
            }
            Rule::Email => {
                if EMAIL.is_match(&display_text(value)) {
                    Ok(())
                } else {
                    Err("enter a valid email address".to_string())
                }
            }
            Rule::Date => NaiveDate::parse_from_str(&display_text(value), "%Y-%m-%d")
                .map(|_| ())
                .map_err(|_| "expected a date as YYYY-MM-DD".to_string()),
            Rule::MinLength(len) => {
                if display_text(value).chars().count() >= *len {
                    Ok(())
                } else {
                    Err(format!("must be at least {len} characters"))
                }
            }
            Rule::Min(bound) => {
                if numeric(value) >= *bound {
                    Ok(())
                } else {
                    Err(format!("must be at least {bound}"))
                }
            }
            Rule::Max(bound) => {
                if numeric(value) <= *bound {
                    Ok(())
                } else {
                    Err(format!("must be at most {bound}"))
                }
            }
            Rule::GreaterThan(bound) => {
                if numeric(value) > *bound {
                    Ok(())
                } else {
                    Err(format!("must be greater than {bound}"))
                }
            }
            Rule::Custom { check, .. } => check(value),
        }
    }
}

type RecordCheckFn =
    dyn Fn(&dyn Fn(&str) -> Option<Value>) -> Option<(String, String)> + Send + Sync;

/// Cross-field validation evaluated at submit after the per-field rules.
#[derive(Clone)]
pub enum RecordCheck {
    /// `field` must hold exactly the value of `other`.
    Matches {
        field: String,
        other: String,
        message: String,
    },
    /// Returns the offending key and message, or `None` when satisfied.
    Custom { name: String, check: Arc<RecordCheckFn> },
}

impl fmt::Debug for RecordCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordCheck::Matches { field, other, .. } => f
                .debug_struct("Matches")
                .field("field", field)
                .field("other", other)
                .finish(),
            RecordCheck::Custom { name, .. } => f.debug_tuple("Custom").field(name).finish(),
        }
    }
}

impl RecordCheck {
    pub fn matches(
        field: impl Into<String>,
        other: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RecordCheck::Matches {
            field: field.into(),
            other: other.into(),
            message: message.into(),
        }
    }

    pub fn custom<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&dyn Fn(&str) -> Option<Value>) -> Option<(String, String)> + Send + Sync + 'static,
    {
        RecordCheck::Custom {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    pub(crate) fn referenced_keys(&self) -> Vec<&str> {
        match self {
            RecordCheck::Matches { field, other, .. } => vec![field.as_str(), other.as_str()],
            RecordCheck::Custom { .. } => Vec::new(),
        }
    }

    /// `lookup` resolves a key against the record being checked.
    pub fn evaluate(&self, lookup: &dyn Fn(&str) -> Option<Value>) -> Option<(String, String)> {
        match self {
            RecordCheck::Matches {
                field,
                other,
                message,
            } => {
                let left = lookup(field.as_str()).unwrap_or(Value::Null);
                let right = lookup(other.as_str()).unwrap_or(Value::Null);
                if left == right {
                    None
                } else {
                    Some((field.clone(), message.clone()))
                }
            }
            RecordCheck::Custom { check, .. } => check(lookup),
        }
    }
}

/// Empty strings, nulls and empty arrays count as "not provided".
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Number(_) | Value::Bool(_) => false,
    }
}

pub fn display_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Array(items) => items
            .iter()
            .map(display_text)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(map) => map
            .get("name")
            .map(display_text)
            .unwrap_or_else(|| Value::Object(map.clone()).to_string()),
    }
}
