use std::{collections::HashMap, fmt, sync::Arc};

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    derive::{Derivation, derivation_order},
    error::SchemaError,
    rules::{RecordCheck, Rule},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    #[default]
    Text,
    Email,
    Password,
    Number,
    Select,
    Date,
    File,
    TextArea,
}

impl InputKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, InputKind::Number)
    }

    pub fn is_textual(self) -> bool {
        matches!(
            self,
            InputKind::Text | InputKind::Email | InputKind::Password | InputKind::TextArea
        )
    }
}

/// How a `File` field turns a selected file into a buffer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileMode {
    /// Read locally and stored inline as a `data:` URL (photos, avatars).
    DataUrl,
    /// Sent to the image upload service; the returned URL is stored.
    Upload,
    /// Kept as a list of attachment descriptors.
    Attachments,
}

type GenerateFn = dyn Fn() -> Value + Send + Sync;

#[derive(Clone, Default)]
pub enum FieldDefault {
    /// Empty string, zero, or an empty list depending on the input kind.
    #[default]
    Empty,
    Value(Value),
    /// Produced fresh for every new record, e.g. generated item codes.
    Generated(Arc<GenerateFn>),
}

impl fmt::Debug for FieldDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldDefault::Empty => f.write_str("Empty"),
            FieldDefault::Value(value) => f.debug_tuple("Value").field(value).finish(),
            FieldDefault::Generated(_) => f.write_str("Generated"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub key: String,
    pub label: String,
    pub kind: InputKind,
    pub required: bool,
    pub options: Vec<String>,
    pub rules: Vec<Rule>,
    pub derivation: Option<Derivation>,
    pub default: FieldDefault,
    pub placeholder: Option<String>,
    pub suggestions: Vec<String>,
    pub file_mode: Option<FileMode>,
    /// Kept in records but never rendered (identifiers, legacy mirrors).
    pub hidden: bool,
}

impl FieldSpec {
    pub fn new(key: impl Into<String>, label: impl Into<String>, kind: InputKind) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind,
            required: false,
            options: Vec::new(),
            rules: Vec::new(),
            derivation: None,
            default: FieldDefault::Empty,
            placeholder: None,
            suggestions: Vec::new(),
            file_mode: None,
            hidden: false,
        }
    }

    pub fn text(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, InputKind::Text)
    }

    pub fn email(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, InputKind::Email).rule(Rule::Email)
    }

    pub fn password(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, InputKind::Password)
    }

    pub fn number(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, InputKind::Number)
    }

    pub fn date(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, InputKind::Date).rule(Rule::Date)
    }

    pub fn textarea(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, InputKind::TextArea)
    }

    pub fn select<I, S>(key: impl Into<String>, label: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut field = Self::new(key, label, InputKind::Select);
        field.options = options.into_iter().map(Into::into).collect();
        field
    }

    pub fn file(key: impl Into<String>, label: impl Into<String>, mode: FileMode) -> Self {
        let mut field = Self::new(key, label, InputKind::File);
        field.file_mode = Some(mode);
        field
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn derived(mut self, derivation: Derivation) -> Self {
        self.derivation = Some(derivation);
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = FieldDefault::Value(value.into());
        self
    }

    pub fn generated<F>(mut self, generate: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.default = FieldDefault::Generated(Arc::new(generate));
        self
    }

    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = Some(text.into());
        self
    }

    pub fn suggestions<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suggestions = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn is_derived(&self) -> bool {
        self.derivation.is_some()
    }

    /// Editable through the UI: neither derived nor hidden.
    pub fn is_editable(&self) -> bool {
        !self.is_derived() && !self.hidden
    }

    pub fn display_label(&self) -> String {
        if self.required {
            format!("{} *", self.label)
        } else {
            self.label.clone()
        }
    }

    pub fn initial_value(&self) -> Value {
        match &self.default {
            FieldDefault::Value(value) => value.clone(),
            FieldDefault::Generated(generate) => generate(),
            FieldDefault::Empty => match (self.kind, self.file_mode) {
                (InputKind::Number, _) => Value::from(0),
                (InputKind::File, Some(FileMode::Attachments)) => Value::Array(Vec::new()),
                _ => Value::String(String::new()),
            },
        }
    }

    /// Case-insensitive containment filter over the suggestion list.
    pub fn suggest(&self, typed: &str) -> Vec<&str> {
        let needle = typed.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.suggestions
            .iter()
            .filter(|candidate| candidate.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct SectionSpec {
    pub id: String,
    pub title: String,
    pub fields: Vec<FieldSpec>,
}

impl SectionSpec {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn visible_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|field| !field.hidden)
    }
}

/// Static description of one record kind. Built once and shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    kind: String,
    title: String,
    id_key: String,
    sections: Vec<SectionSpec>,
    required_keys: IndexSet<String>,
    checks: Vec<RecordCheck>,
    index: HashMap<String, (usize, usize)>,
    derivation_order: Vec<String>,
}

impl RecordSchema {
    pub fn builder(kind: impl Into<String>, title: impl Into<String>) -> RecordSchemaBuilder {
        RecordSchemaBuilder {
            kind: kind.into(),
            title: title.into(),
            id_key: "id".to_string(),
            sections: Vec::new(),
            required: Vec::new(),
            checks: Vec::new(),
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn id_key(&self) -> &str {
        &self.id_key
    }

    pub fn sections(&self) -> &[SectionSpec] {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Option<&SectionSpec> {
        self.sections.get(index)
    }

    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        let (section, field) = *self.index.get(key)?;
        self.sections.get(section)?.fields.get(field)
    }

    /// Index of the section that owns `key`.
    pub fn section_of(&self, key: &str) -> Option<usize> {
        self.index.get(key).map(|(section, _)| *section)
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.sections.iter().flat_map(|section| section.fields.iter())
    }

    pub fn required_keys(&self) -> &IndexSet<String> {
        &self.required_keys
    }

    pub fn checks(&self) -> &[RecordCheck] {
        &self.checks
    }

    /// Derived field keys, dependencies first.
    pub fn derivation_order(&self) -> &[String] {
        &self.derivation_order
    }
}

#[derive(Debug)]
pub struct RecordSchemaBuilder {
    kind: String,
    title: String,
    id_key: String,
    sections: Vec<SectionSpec>,
    required: Vec<String>,
    checks: Vec<RecordCheck>,
}

impl RecordSchemaBuilder {
    pub fn id_key(mut self, key: impl Into<String>) -> Self {
        self.id_key = key.into();
        self
    }

    pub fn section(mut self, section: SectionSpec) -> Self {
        self.sections.push(section);
        self
    }

    /// Adds a submit-time completeness requirement beyond fields marked `required`.
    pub fn require(mut self, key: impl Into<String>) -> Self {
        self.required.push(key.into());
        self
    }

    pub fn check(mut self, check: RecordCheck) -> Self {
        self.checks.push(check);
        self
    }

    pub fn build(self) -> Result<RecordSchema, SchemaError> {
        let mut index = HashMap::new();
        for (section_idx, section) in self.sections.iter().enumerate() {
            for (field_idx, field) in section.fields.iter().enumerate() {
                if index
                    .insert(field.key.clone(), (section_idx, field_idx))
                    .is_some()
                {
                    return Err(SchemaError::DuplicateField(field.key.clone()));
                }
                if field.kind == InputKind::Select && field.options.is_empty() {
                    return Err(SchemaError::MissingOptions(field.key.clone()));
                }
            }
        }

        if !index.contains_key(&self.id_key) {
            return Err(SchemaError::UnknownIdKey(self.id_key));
        }

        let all_fields = || self.sections.iter().flat_map(|section| section.fields.iter());
        for field in all_fields() {
            if let Some(derivation) = &field.derivation {
                for dependency in derivation.dependencies() {
                    if !index.contains_key(dependency) {
                        return Err(SchemaError::UnknownDependency {
                            field: field.key.clone(),
                            dependency: dependency.clone(),
                        });
                    }
                }
            }
        }

        let mut required_keys: IndexSet<String> = all_fields()
            .filter(|field| field.required)
            .map(|field| field.key.clone())
            .collect();
        for key in self.required {
            if !index.contains_key(&key) {
                return Err(SchemaError::UnknownRequiredKey(key));
            }
            required_keys.insert(key);
        }

        for check in &self.checks {
            for key in check.referenced_keys() {
                if !index.contains_key(key) {
                    return Err(SchemaError::UnknownCheckField(key.to_string()));
                }
            }
        }

        let derivation_order = derivation_order(all_fields())?;

        Ok(RecordSchema {
            kind: self.kind,
            title: self.title,
            id_key: self.id_key,
            sections: self.sections,
            required_keys,
            checks: self.checks,
            index,
            derivation_order,
        })
    }
}
