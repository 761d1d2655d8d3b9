use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{FieldSpec, FileMode, InputKind, Record, RecordSchema};

use super::{
    buffer::EditBuffer,
    engine::recompute,
    error::FormError,
    options::FormOptions,
    pending::{FileOutcome, FilePayload, PendingOps, PendingToken},
    validation::{SubmitOutcome, ValidationErrors, ValidationResult, validate_buffer},
    value::{coerce_input, normalize_seed},
};

static NEXT_SESSION: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Opened, nothing changed yet.
    Empty,
    Editing,
    SubmittedValid,
    SubmittedInvalid,
}

/// Edit session for one record. Owns its buffer exclusively; dropping or
/// cancelling the session discards every unsaved change.
#[derive(Debug)]
pub struct FormSession {
    id: u64,
    schema: Arc<RecordSchema>,
    buffer: EditBuffer,
    state: SessionState,
    dirty: bool,
    errors: ValidationErrors,
    pending: PendingOps,
    notices: Vec<String>,
    options: FormOptions,
}

impl FormSession {
    /// Seeds a buffer from schema defaults, overlays `seed` when editing, and
    /// settles derived fields.
    pub fn open(schema: Arc<RecordSchema>, seed: Option<&Record>, options: FormOptions) -> Self {
        let mut buffer: EditBuffer = schema
            .fields()
            .map(|field| (field.key.clone(), field.initial_value()))
            .collect();
        if let Some(record) = seed {
            for (key, value) in record.iter() {
                let value = match schema.field(key) {
                    Some(field) => normalize_seed(field, value.clone()),
                    None => value.clone(),
                };
                buffer.insert(key.clone(), value);
            }
        }
        recompute(&mut buffer, &schema);

        let id = NEXT_SESSION.fetch_add(1, Ordering::Relaxed);
        debug!(session = id, kind = schema.kind(), seeded = seed.is_some(), "form session opened");
        Self {
            id,
            schema,
            buffer,
            state: SessionState::Empty,
            dirty: false,
            errors: ValidationErrors::default(),
            pending: PendingOps::default(),
            notices: Vec::new(),
            options,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    pub fn buffer(&self) -> &EditBuffer {
        &self.buffer
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        self.buffer.get(key)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Errors of the last submit still standing; edits clear their field's entry.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn error(&self, key: &str) -> Option<&str> {
        self.errors.get(key)
    }

    /// Coerces `raw` for the field's input kind and recomputes derived fields.
    pub fn set_field(&mut self, key: &str, raw: &str) -> Result<(), FormError> {
        let field = self.editable_field(key)?;
        let value = coerce_input(field, raw, &self.options);
        self.write(key, value);
        Ok(())
    }

    /// Stores an already typed value, skipping input coercion.
    pub fn set_value(&mut self, key: &str, value: Value) -> Result<(), FormError> {
        let field = self.editable_field(key)?;
        let value = normalize_seed(field, value);
        self.write(key, value);
        Ok(())
    }

    /// Side-effect free check of the current buffer.
    pub fn validate(&self) -> ValidationResult {
        validate_buffer(
            &self.schema,
            &self.buffer,
            &self.pending,
            self.options.pending_policy,
        )
    }

    pub fn submit(&mut self) -> Result<SubmitOutcome, FormError> {
        if self.state == SessionState::SubmittedValid {
            return Err(FormError::Finalized);
        }
        match self.validate() {
            ValidationResult::Valid => {
                self.errors.clear();
                self.state = SessionState::SubmittedValid;
                let record = self.buffer.to_record(&self.schema);
                debug!(session = self.id, kind = self.schema.kind(), "form submitted");
                Ok(SubmitOutcome::Finalized(record))
            }
            ValidationResult::Invalid(errors) => {
                warn!(
                    session = self.id,
                    kind = self.schema.kind(),
                    issues = errors.len(),
                    "form submit rejected"
                );
                self.errors = errors.clone();
                self.state = SessionState::SubmittedInvalid;
                Ok(SubmitOutcome::Invalid(errors))
            }
        }
    }

    /// Discards the session and its buffer. Nothing is confirmed or kept.
    pub fn cancel(self) {
        debug!(session = self.id, dirty = self.dirty, "form session cancelled");
    }

    /// Marks a file field as in flight and hands back the token the host
    /// must present when the read or upload finishes.
    pub fn begin_file(&mut self, key: &str) -> Result<PendingToken, FormError> {
        let field = self.file_field(key)?;
        if field.file_mode == Some(FileMode::Attachments) {
            return Err(FormError::NotFileField(key.to_string()));
        }
        self.ensure_open()?;
        Ok(self.pending.begin(self.id, key))
    }

    /// Applies a finished file operation. Returns `false` when the token is
    /// stale (superseded, from another session, or already applied).
    pub fn complete_file(&mut self, token: &PendingToken, outcome: FileOutcome) -> bool {
        if token.session != self.id || self.state == SessionState::SubmittedValid {
            return false;
        }
        if !self.pending.finish(token) {
            return false;
        }
        let value = match outcome {
            FileOutcome::Read(payload) => payload.data_url(),
            FileOutcome::Uploaded(url) => url,
            FileOutcome::Failed(message) => {
                warn!(session = self.id, field = %token.key, %message, "file operation failed");
                self.notices.push(message);
                String::new()
            }
        };
        self.write(&token.key, Value::String(value));
        true
    }

    /// Empties a file field, abandoning any outstanding operation on it.
    pub fn clear_file(&mut self, key: &str) -> Result<(), FormError> {
        let field = self.file_field(key)?;
        let empty = field.initial_value();
        self.ensure_open()?;
        self.pending.cancel(key);
        self.write(key, empty);
        Ok(())
    }

    pub fn attach_files(&mut self, key: &str, files: &[FilePayload]) -> Result<(), FormError> {
        let mut list = self.attachment_list(key)?;
        list.extend(files.iter().map(FilePayload::descriptor));
        self.write(key, Value::Array(list));
        Ok(())
    }

    pub fn remove_attachment(&mut self, key: &str, index: usize) -> Result<bool, FormError> {
        let mut list = self.attachment_list(key)?;
        if index >= list.len() {
            return Ok(false);
        }
        list.remove(index);
        self.write(key, Value::Array(list));
        Ok(true)
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.pending.is_pending(key)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// User-facing messages from failed external operations, oldest first.
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    /// Type-ahead candidates for a text field, based on its current value.
    pub fn suggestions(&self, key: &str) -> Vec<&str> {
        let Some(field) = self.schema.field(key) else {
            return Vec::new();
        };
        let typed = self
            .buffer
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default();
        field.suggest(typed)
    }

    /// Puts a finalized session back into the invalid state, e.g. when the
    /// owning collection refuses the record.
    pub(crate) fn reject(&mut self, errors: ValidationErrors) {
        self.errors = errors;
        self.state = SessionState::SubmittedInvalid;
    }

    fn editable_field(&self, key: &str) -> Result<&FieldSpec, FormError> {
        self.ensure_open()?;
        let field = self
            .schema
            .field(key)
            .ok_or_else(|| FormError::UnknownField(key.to_string()))?;
        if field.is_derived() {
            return Err(FormError::ReadOnlyField(key.to_string()));
        }
        Ok(field)
    }

    fn file_field(&self, key: &str) -> Result<&FieldSpec, FormError> {
        let field = self
            .schema
            .field(key)
            .ok_or_else(|| FormError::UnknownField(key.to_string()))?;
        if field.kind != InputKind::File {
            return Err(FormError::NotFileField(key.to_string()));
        }
        Ok(field)
    }

    fn attachment_list(&self, key: &str) -> Result<Vec<Value>, FormError> {
        let field = self.file_field(key)?;
        if field.file_mode != Some(FileMode::Attachments) {
            return Err(FormError::NotFileField(key.to_string()));
        }
        self.ensure_open()?;
        Ok(self
            .buffer
            .get(key)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }

    fn ensure_open(&self) -> Result<(), FormError> {
        if self.state == SessionState::SubmittedValid {
            Err(FormError::Finalized)
        } else {
            Ok(())
        }
    }

    fn write(&mut self, key: &str, value: Value) {
        debug!(session = self.id, field = key, "field edited");
        self.buffer.insert(key.to_string(), value);
        recompute(&mut self.buffer, &self.schema);
        self.errors.remove(key);
        self.dirty = true;
        self.state = SessionState::Editing;
    }
}
