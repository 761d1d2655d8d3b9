use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use super::{
    derive::Derivation,
    rules::{RecordCheck, Rule},
    schema::{FieldSpec, FileMode, InputKind, RecordSchema, SectionSpec},
};

/// Declarative form of a [`RecordSchema`], as found in JSON/YAML/TOML documents.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDocument {
    pub kind: String,
    pub title: String,
    #[serde(default = "default_id_key")]
    pub id_key: String,
    pub sections: Vec<SectionDocument>,
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub checks: Vec<CheckDocument>,
}

#[derive(Debug, Deserialize)]
pub struct SectionDocument {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub fields: Vec<FieldDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDocument {
    pub key: String,
    pub label: Option<String>,
    #[serde(default)]
    pub kind: InputKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<String>,
    pub default: Option<Value>,
    pub placeholder: Option<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    pub file: Option<FileMode>,
    #[serde(default)]
    pub hidden: bool,
    pub derive: Option<DeriveDocument>,
    #[serde(default)]
    pub rules: Vec<RuleDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeriveDocument {
    Sum(Vec<String>),
    Copy(String),
    DiscountedPrice { price: String, discount: String },
    StockStatus(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleDocument {
    Pattern {
        pattern: String,
        message: Option<String>,
    },
    Email,
    Date,
    MinLength(usize),
    Min(f64),
    Max(f64),
    GreaterThan(f64),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckDocument {
    Matches {
        field: String,
        other: String,
        message: Option<String>,
    },
}

fn default_id_key() -> String {
    "id".to_string()
}

pub fn parse_record_schema(value: &Value) -> Result<RecordSchema> {
    let document: SchemaDocument =
        serde_json::from_value(value.clone()).context("invalid record schema document")?;
    build_record_schema(document)
}

pub fn build_record_schema(document: SchemaDocument) -> Result<RecordSchema> {
    let mut builder =
        RecordSchema::builder(document.kind.clone(), document.title).id_key(document.id_key);
    for section in document.sections {
        let mut spec = SectionSpec::new(section.id, section.title);
        for field in section.fields {
            spec = spec.field(build_field(field)?);
        }
        builder = builder.section(spec);
    }
    for key in document.required {
        builder = builder.require(key);
    }
    for check in document.checks {
        builder = builder.check(match check {
            CheckDocument::Matches {
                field,
                other,
                message,
            } => {
                let message = message.unwrap_or_else(|| format!("must match {other}"));
                RecordCheck::matches(field, other, message)
            }
        });
    }
    builder
        .build()
        .with_context(|| format!("record schema '{}' is inconsistent", document.kind))
}

fn build_field(document: FieldDocument) -> Result<FieldSpec> {
    let label = document.label.unwrap_or_else(|| document.key.clone());
    let mut field = FieldSpec::new(document.key.clone(), label, document.kind);
    field.required = document.required;
    field.options = document.options;
    field.placeholder = document.placeholder;
    field.suggestions = document.suggestions;
    field.hidden = document.hidden;
    field.file_mode = match (document.kind, document.file) {
        (InputKind::File, None) => Some(FileMode::DataUrl),
        (_, mode) => mode,
    };
    if let Some(default) = document.default {
        field = field.default_value(default);
    }
    match document.kind {
        InputKind::Email => field = field.rule(Rule::Email),
        InputKind::Date => field = field.rule(Rule::Date),
        _ => {}
    }
    for rule in document.rules {
        let rule = match rule {
            RuleDocument::Pattern { pattern, message } => {
                let message = message.unwrap_or_else(|| format!("must match {pattern}"));
                Rule::pattern(&pattern, message)
                    .with_context(|| format!("field '{}' has an invalid pattern", document.key))?
            }
            RuleDocument::Email => Rule::Email,
            RuleDocument::Date => Rule::Date,
            RuleDocument::MinLength(len) => Rule::MinLength(len),
            RuleDocument::Min(bound) => Rule::Min(bound),
            RuleDocument::Max(bound) => Rule::Max(bound),
            RuleDocument::GreaterThan(bound) => Rule::GreaterThan(bound),
        };
        field = field.rule(rule);
    }
    if let Some(derive) = document.derive {
        field = field.derived(match derive {
            DeriveDocument::Sum(keys) => Derivation::sum(keys),
            DeriveDocument::Copy(key) => Derivation::copy(key),
            DeriveDocument::DiscountedPrice { price, discount } => {
                Derivation::discounted_price(price, discount)
            }
            DeriveDocument::StockStatus(key) => Derivation::stock_status(key),
        });
    }
    Ok(field)
}
