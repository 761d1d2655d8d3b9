use indexmap::IndexMap;
use serde_json::Value;

use crate::domain::{InputKind, Record, RecordSchema, display_text, is_blank};

use super::{buffer::EditBuffer, options::PendingPolicy, pending::PendingOps};

pub const REQUIRED_MESSAGE: &str = "this field is required";
pub const PENDING_MESSAGE: &str = "upload in progress";

/// Field key to message for every failing field of one submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: IndexMap<String, String>,
}

impl ValidationErrors {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.errors.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.errors.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors
            .iter()
            .map(|(key, message)| (key.as_str(), message.as_str()))
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// The first message recorded for a key wins.
    pub fn insert(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(key.into()).or_insert_with(|| message.into());
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<String> {
        self.errors.shift_remove(key)
    }

    pub(crate) fn clear(&mut self) {
        self.errors.clear();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    Valid,
    Invalid(ValidationErrors),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// What a submit produced: exactly one of these per call.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Finalized(Record),
    Invalid(ValidationErrors),
}

impl SubmitOutcome {
    pub fn record(&self) -> Option<&Record> {
        match self {
            SubmitOutcome::Finalized(record) => Some(record),
            SubmitOutcome::Invalid(_) => None,
        }
    }

    pub fn errors(&self) -> Option<&ValidationErrors> {
        match self {
            SubmitOutcome::Finalized(_) => None,
            SubmitOutcome::Invalid(errors) => Some(errors),
        }
    }
}

/// Collects every failure at once: completeness of required keys, in-flight
/// file operations, per-field rules, select membership, then record checks.
pub(crate) fn validate_buffer(
    schema: &RecordSchema,
    buffer: &EditBuffer,
    pending: &PendingOps,
    policy: PendingPolicy,
) -> ValidationResult {
    let mut errors = ValidationErrors::default();

    for key in schema.required_keys() {
        let missing = buffer.get(key).is_none_or(is_blank);
        if missing {
            errors.insert(key.clone(), REQUIRED_MESSAGE);
        }
    }

    if policy == PendingPolicy::Reject {
        for key in pending.keys() {
            errors.insert(key.clone(), PENDING_MESSAGE);
        }
    }

    for field in schema.fields() {
        let Some(value) = buffer.get(&field.key) else {
            continue;
        };
        if field.kind == InputKind::Select && !is_blank(value) {
            let chosen = display_text(value);
            if !field.options.iter().any(|option| *option == chosen) {
                errors.insert(
                    field.key.clone(),
                    format!("'{chosen}' is not one of: {}", field.options.join(", ")),
                );
                continue;
            }
        }
        for rule in &field.rules {
            if let Err(message) = rule.check(value) {
                errors.insert(field.key.clone(), message);
                break;
            }
        }
    }

    let lookup = |key: &str| -> Option<Value> { buffer.get(key).cloned() };
    for check in schema.checks() {
        if let Some((key, message)) = check.evaluate(&lookup) {
            errors.insert(key, message);
        }
    }

    if errors.is_empty() {
        ValidationResult::Valid
    } else {
        ValidationResult::Invalid(errors)
    }
}
