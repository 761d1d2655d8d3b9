use std::{fmt, sync::Arc};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    domain::{FieldDefault, Record, RecordSchema},
    form::{
        FileOutcome, FormError, FormOptions, FormSession, PendingToken, REQUIRED_MESSAGE,
        SubmitOutcome, ValidationErrors,
    },
};

use super::{
    collection::{CollectionError, RecordCollection},
    table::{DataTable, RowAction, TableRow, columns_for},
};

/// What the open form is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveSession {
    None,
    Creating,
    Editing(String),
}

/// How a finished form was folded into the collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Reconciled {
    /// No session was open.
    Idle,
    Created(String),
    Updated(String),
    /// The session stays open with these errors.
    Invalid(ValidationErrors),
}

enum Mode {
    Creating,
    Editing(String),
}

struct ActiveForm {
    mode: Mode,
    session: FormSession,
}

type SavedHook = Box<dyn FnMut(&Record)>;

/// Fresh identifiers tried when a generated one is already taken.
const ID_RETRIES: usize = 8;

/// Owns the record collection of one kind and at most one open form.
pub struct ListCoordinator {
    schema: Arc<RecordSchema>,
    collection: RecordCollection,
    table: DataTable,
    options: FormOptions,
    active: Option<ActiveForm>,
    query: String,
    on_saved: Option<SavedHook>,
}

impl fmt::Debug for ListCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListCoordinator")
            .field("kind", &self.schema.kind())
            .field("records", &self.collection.len())
            .field("active", &self.active())
            .field("query", &self.query)
            .finish()
    }
}

impl ListCoordinator {
    pub fn new(schema: Arc<RecordSchema>, collection: RecordCollection) -> Self {
        let table = DataTable::new(columns_for(&schema));
        Self {
            schema,
            collection,
            table,
            options: FormOptions::default(),
            active: None,
            query: String::new(),
            on_saved: None,
        }
    }

    pub fn with_table(mut self, table: DataTable) -> Self {
        self.table = table;
        self
    }

    pub fn with_form_options(mut self, options: FormOptions) -> Self {
        self.options = options;
        self
    }

    /// Called with every record that lands in the collection.
    pub fn on_saved<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&Record) + 'static,
    {
        self.on_saved = Some(Box::new(hook));
        self
    }

    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    pub fn collection(&self) -> &RecordCollection {
        &self.collection
    }

    pub fn into_collection(self) -> RecordCollection {
        self.collection
    }

    pub fn table(&self) -> &DataTable {
        &self.table
    }

    pub fn active(&self) -> ActiveSession {
        match &self.active {
            None => ActiveSession::None,
            Some(ActiveForm {
                mode: Mode::Creating,
                ..
            }) => ActiveSession::Creating,
            Some(ActiveForm {
                mode: Mode::Editing(key),
                ..
            }) => ActiveSession::Editing(key.clone()),
        }
    }

    pub fn session(&self) -> Option<&FormSession> {
        self.active.as_ref().map(|form| &form.session)
    }

    pub fn session_mut(&mut self) -> Option<&mut FormSession> {
        self.active.as_mut().map(|form| &mut form.session)
    }

    /// Opens a form seeded from schema defaults. An already open form is
    /// discarded.
    pub fn start_create(&mut self) -> &mut FormSession {
        self.discard_active();
        let session = FormSession::open(self.schema.clone(), None, self.options.clone());
        debug!(kind = self.schema.kind(), session = session.id(), "create form opened");
        &mut self
            .active
            .insert(ActiveForm {
                mode: Mode::Creating,
                session,
            })
            .session
    }

    /// Opens a form seeded from the stored record. Does nothing when `key`
    /// is not in the collection.
    pub fn start_edit(&mut self, key: &str) -> Option<&mut FormSession> {
        let record = self.collection.get(key)?.clone();
        self.discard_active();
        let session = FormSession::open(self.schema.clone(), Some(&record), self.options.clone());
        debug!(kind = self.schema.kind(), key, session = session.id(), "edit form opened");
        let form = self.active.insert(ActiveForm {
            mode: Mode::Editing(key.to_string()),
            session,
        });
        Some(&mut form.session)
    }

    /// Submits the open form and folds a finalized record into the collection.
    pub fn submit_active(&mut self) -> Result<Reconciled, FormError> {
        let Some(form) = self.active.as_mut() else {
            return Ok(Reconciled::Idle);
        };
        match form.session.submit()? {
            SubmitOutcome::Finalized(record) => Ok(self.handle_result(record)),
            SubmitOutcome::Invalid(errors) => Ok(Reconciled::Invalid(errors)),
        }
    }

    /// Inserts `record` when creating, replaces the edited entry when
    /// editing, then closes the form. A record whose identifier is missing or
    /// collides with another entry is refused and the form reopened with an
    /// error on the identifier field.
    pub fn handle_result(&mut self, mut record: Record) -> Reconciled {
        let editing = match self.active.as_ref().map(|form| &form.mode) {
            None => return Reconciled::Idle,
            Some(Mode::Creating) => None,
            Some(Mode::Editing(key)) => Some(key.clone()),
        };
        let created = editing.is_none();
        let stored = match editing {
            None => self.insert_created(&mut record),
            Some(key) => match self.collection.replace(&key, record.clone()) {
                // Deleted while the form was open.
                Err(CollectionError::UnknownKey(_)) => self.collection.insert(record.clone()),
                other => other,
            },
        };

        match stored {
            Ok(key) => {
                self.active = None;
                info!(
                    kind = self.schema.kind(),
                    %key,
                    created,
                    total = self.collection.len(),
                    "record saved"
                );
                if let Some(hook) = self.on_saved.as_mut() {
                    hook(&record);
                }
                if created {
                    Reconciled::Created(key)
                } else {
                    Reconciled::Updated(key)
                }
            }
            Err(err) => {
                let message = match &err {
                    CollectionError::MissingKey(_) => REQUIRED_MESSAGE.to_string(),
                    other => other.to_string(),
                };
                warn!(kind = self.schema.kind(), error = %err, "record refused by collection");
                let mut errors = ValidationErrors::default();
                errors.insert(self.schema.id_key(), message);
                if let Some(form) = self.active.as_mut() {
                    form.session.reject(errors.clone());
                }
                Reconciled::Invalid(errors)
            }
        }
    }

    /// Closes the open form without saving.
    pub fn handle_cancel(&mut self) {
        self.discard_active();
    }

    /// Removes the entry immediately. There is no undo.
    pub fn delete(&mut self, key: &str) -> Option<Record> {
        let removed = self.collection.remove(key);
        if removed.is_some() {
            info!(kind = self.schema.kind(), key, total = self.collection.len(), "record deleted");
        }
        removed
    }

    pub fn view(&self, key: &str) -> Option<&Record> {
        self.collection.get(key)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Sets the search text and returns the rows that match it.
    pub fn search(&mut self, query: &str) -> Vec<TableRow> {
        self.set_query(query);
        self.visible_rows()
    }

    pub fn visible_rows(&self) -> Vec<TableRow> {
        self.table.rows(&self.collection, &self.query)
    }

    /// Runs a row control. Returns `false` when the control is hidden or the
    /// row no longer exists.
    pub fn apply_row_action(&mut self, action: RowAction, key: &str) -> bool {
        if !self.table.actions.allows(action) {
            return false;
        }
        match action {
            RowAction::View => self.collection.contains_key(key),
            RowAction::Edit => self.start_edit(key).is_some(),
            RowAction::Delete => self.delete(key).is_some(),
        }
    }

    /// Routes a finished file operation to the open form. Results for a form
    /// that has since closed are dropped.
    pub fn complete_file(&mut self, token: &PendingToken, outcome: FileOutcome) -> bool {
        match self.active.as_mut() {
            Some(form) if form.session.id() == token.session_id() => {
                form.session.complete_file(token, outcome)
            }
            _ => {
                debug!(
                    session = token.session_id(),
                    field = token.key(),
                    "late file result dropped"
                );
                false
            }
        }
    }

    /// Convenience for hosts that edit through the coordinator directly.
    pub fn set_field(&mut self, key: &str, raw: &str) -> Result<(), FormError> {
        match self.session_mut() {
            Some(session) => session.set_field(key, raw),
            None => Err(FormError::Finalized),
        }
    }

    pub fn field_value(&self, key: &str) -> Option<&Value> {
        self.session().and_then(|session| session.value(key))
    }

    /// Inserts a new record. When its identifier is generated and not
    /// editable by the user, a taken identifier is replaced by a fresh one.
    fn insert_created(&mut self, record: &mut Record) -> Result<String, CollectionError> {
        let mut retries = 0;
        loop {
            match self.collection.insert(record.clone()) {
                Err(CollectionError::DuplicateKey(taken)) if retries < ID_RETRIES => {
                    let Some(fresh) = self.fresh_id() else {
                        return Err(CollectionError::DuplicateKey(taken));
                    };
                    debug!(
                        kind = self.schema.kind(),
                        %taken,
                        "generated identifier taken, minting another"
                    );
                    record.insert(self.schema.id_key(), fresh);
                    retries += 1;
                }
                other => return other,
            }
        }
    }

    fn fresh_id(&self) -> Option<Value> {
        let field = self.schema.field(self.schema.id_key())?;
        match &field.default {
            FieldDefault::Generated(generate) if !field.is_editable() => Some(generate()),
            _ => None,
        }
    }

    fn discard_active(&mut self) {
        if let Some(form) = self.active.take() {
            form.session.cancel();
        }
    }
}
