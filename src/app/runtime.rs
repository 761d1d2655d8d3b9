use std::{collections::HashMap, fs, path::Path};

use anyhow::Result;
use crossterm::event::{Event, KeyEvent, KeyEventKind};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    domain::{FieldSpec, FileMode, InputKind, display_text, numeric},
    form::{FileOutcome, FilePayload, FormCommand, FormEngine, FormError, SectionNavigator},
    list::{ActiveSession, ListCoordinator, Reconciled, RowAction},
    presentation::{self, DetailView, FilePrompt, FormView, UiContext},
    shell::{MenuItem, MenuState, SessionContext, default_menu},
    upload::UploadWorker,
};

use super::{
    input::{KeyCommand, classify},
    options::UiOptions,
    status::StatusLine,
    terminal::EditorTerminal,
};

const BROWSE_HELP: &str =
    "↑/↓ select • n new • e/Enter edit • v view • d delete • / search • m menu • q quit";
const SEARCH_HELP: &str = "Type to filter • Enter keep filter • Esc clear";
const VIEW_HELP: &str = "Esc/Enter close • e edit";
const FORM_HELP: &str =
    "Tab/↑/↓ fields • PgUp/PgDn sections • ←/→ choose • Enter attach file • Ctrl+D clear file • Ctrl+S save • Esc discard";
const PROMPT_HELP: &str = "Type a file path • Enter load • Esc back";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Mode {
    Browse,
    Search,
    View(String),
    Form,
    FilePrompt { key: String, input: String },
}

/// The focused field, detached from the schema borrow.
struct Focus {
    key: String,
    label: String,
    kind: InputKind,
    file_mode: Option<FileMode>,
    derived: bool,
    options: Vec<String>,
}

impl Focus {
    fn from_field(field: &FieldSpec) -> Self {
        Self {
            key: field.key.clone(),
            label: field.label.clone(),
            kind: field.kind,
            file_mode: field.file_mode,
            derived: field.is_derived(),
            options: field.options.clone(),
        }
    }
}

pub(crate) struct App {
    coordinator: ListCoordinator,
    navigator: SectionNavigator,
    drafts: HashMap<String, String>,
    mode: Mode,
    selected_row: usize,
    status: StatusLine,
    context: SessionContext,
    menu: Vec<MenuItem>,
    menu_state: MenuState,
    uploads: UploadWorker,
    options: UiOptions,
    exit_armed: bool,
    should_quit: bool,
}

impl App {
    pub fn new(
        coordinator: ListCoordinator,
        uploads: UploadWorker,
        context: SessionContext,
        options: UiOptions,
    ) -> Self {
        let navigator = SectionNavigator::new(coordinator.schema());
        let menu = default_menu();
        let mut menu_state = MenuState::default();
        if let Some(group) = group_of(&menu, coordinator.schema().kind()) {
            menu_state.toggle(group);
        }
        Self {
            coordinator,
            navigator,
            drafts: HashMap::new(),
            mode: Mode::Browse,
            selected_row: 0,
            status: StatusLine::new(),
            context,
            menu,
            menu_state,
            uploads,
            options,
            exit_armed: false,
            should_quit: false,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let mut terminal = EditorTerminal::open()?;
        while !self.should_quit {
            self.poll_uploads();
            terminal.render(|frame| self.draw(frame))?;
            match terminal.next_event(self.options.tick_rate)? {
                Some(Event::Key(key)) => self.handle_key(key),
                Some(_) | None => {}
            }
        }
        terminal.close()
    }

    /// Folds finished background uploads into the open form.
    pub fn poll_uploads(&mut self) {
        for (token, outcome) in self.uploads.drain() {
            let uploaded = matches!(outcome, FileOutcome::Uploaded(_));
            if !self.coordinator.complete_file(&token, outcome) {
                continue;
            }
            let notice = self
                .coordinator
                .session_mut()
                .and_then(|session| session.take_notices().pop());
            match notice {
                Some(notice) => self.status.set_raw(notice),
                None if uploaded => self.status.set_raw("Upload finished"),
                None => {}
            }
        }
    }

    pub fn uploads_in_flight(&self) -> usize {
        self.uploads.in_flight()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn status(&self) -> &str {
        self.status.message()
    }

    pub fn coordinator(&self) -> &ListCoordinator {
        &self.coordinator
    }

    pub fn into_coordinator(self) -> ListCoordinator {
        self.coordinator
    }

    pub fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let rows = self.coordinator.visible_rows();
        let greeting = self.context.greeting();
        let lines = self.menu_state.lines(&self.menu);
        let schema = self.coordinator.schema();

        let form = match (&self.mode, self.coordinator.session()) {
            (Mode::Form | Mode::FilePrompt { .. }, Some(session)) => Some(FormView {
                session,
                navigator: &self.navigator,
                drafts: &self.drafts,
                creating: self.coordinator.active() == ActiveSession::Creating,
            }),
            _ => None,
        };
        let detail = match &self.mode {
            Mode::View(key) => self.coordinator.view(key).map(|record| DetailView {
                schema,
                key,
                record,
            }),
            _ => None,
        };
        let file_prompt = match &self.mode {
            Mode::FilePrompt { key, input } => Some(FilePrompt {
                label: schema
                    .field(key)
                    .map(|field| field.label.as_str())
                    .unwrap_or(key.as_str()),
                input,
            }),
            _ => None,
        };
        let help = self.options.show_help.then(|| match self.mode {
            Mode::Browse => BROWSE_HELP,
            Mode::Search => SEARCH_HELP,
            Mode::View(_) => VIEW_HELP,
            Mode::Form => FORM_HELP,
            Mode::FilePrompt { .. } => PROMPT_HELP,
        });

        presentation::draw(
            frame,
            UiContext {
                title: self.options.title.as_deref().unwrap_or(schema.title()),
                greeting: &greeting,
                active_kind: schema.kind(),
                table: self.coordinator.table(),
                rows: &rows,
                selected_row: self.selected_row,
                query: self.coordinator.query(),
                searching: self.mode == Mode::Search,
                form,
                detail,
                file_prompt,
                sidebar: self.options.show_sidebar.then_some(lines.as_slice()),
                status_message: self.status.message(),
                help,
            },
        );
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let command = classify(&key);
        if command != KeyCommand::Quit {
            self.exit_armed = false;
        }
        match self.mode.clone() {
            Mode::Browse => self.handle_browse(command),
            Mode::Search => self.handle_search(command),
            Mode::View(record_key) => self.handle_view(command, &record_key),
            Mode::Form => self.handle_form(command),
            Mode::FilePrompt { key, input } => self.handle_prompt(command, key, input),
        }
    }

    fn handle_browse(&mut self, command: KeyCommand) {
        match command {
            KeyCommand::Quit | KeyCommand::Char('q') => self.should_quit = true,
            KeyCommand::NextField => self.move_selection(1),
            KeyCommand::PrevField => self.move_selection(-1),
            KeyCommand::Char('n') => self.open_create(),
            KeyCommand::Confirm | KeyCommand::Char('e') => {
                if let Some(key) = self.selected_key() {
                    self.open_edit(&key);
                }
            }
            KeyCommand::Char('v') => {
                if let Some(key) = self.selected_key() {
                    if self.coordinator.apply_row_action(RowAction::View, &key) {
                        self.mode = Mode::View(key);
                    } else {
                        self.status.set_raw("Viewing is disabled for this list");
                    }
                }
            }
            KeyCommand::Char('d') | KeyCommand::ClearFile => {
                if let Some(key) = self.selected_key() {
                    if self.coordinator.apply_row_action(RowAction::Delete, &key) {
                        self.status.deleted(&key);
                        self.clamp_selection();
                    } else {
                        self.status.set_raw("Deleting is disabled for this list");
                    }
                }
            }
            KeyCommand::Char('/') => {
                self.mode = Mode::Search;
                self.status.set_raw("Search");
            }
            KeyCommand::Char('m') => {
                if let Some(group) = group_of(&self.menu, self.coordinator.schema().kind()) {
                    self.menu_state.toggle(group);
                }
            }
            KeyCommand::Cancel => self.status.ready(),
            _ => {}
        }
    }

    fn handle_search(&mut self, command: KeyCommand) {
        let mut query = self.coordinator.query().to_string();
        match command {
            KeyCommand::Char(ch) => query.push(ch),
            KeyCommand::Backspace => {
                query.pop();
            }
            KeyCommand::Confirm => {
                self.mode = Mode::Browse;
                let shown = self.coordinator.visible_rows().len();
                self.status.set_raw(format!("{shown} matching record(s)"));
                return;
            }
            KeyCommand::Cancel => {
                query.clear();
                self.mode = Mode::Browse;
                self.status.ready();
            }
            KeyCommand::Quit => {
                self.should_quit = true;
                return;
            }
            _ => return,
        }
        self.coordinator.search(&query);
        self.selected_row = 0;
    }

    fn handle_view(&mut self, command: KeyCommand, key: &str) {
        match command {
            KeyCommand::Cancel | KeyCommand::Confirm => self.mode = Mode::Browse,
            KeyCommand::Char('e') => self.open_edit(key),
            KeyCommand::Quit => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_form(&mut self, command: KeyCommand) {
        match command {
            KeyCommand::Save => self.submit(),
            KeyCommand::Quit => self.request_exit(),
            KeyCommand::Cancel => {
                self.coordinator.handle_cancel();
                self.close_form();
                self.status.discarded();
            }
            KeyCommand::SwitchSection(delta) => {
                self.dispatch(FormCommand::FocusNextSection(delta));
            }
            KeyCommand::NextField => self.dispatch(FormCommand::FocusNextField),
            KeyCommand::PrevField => self.dispatch(FormCommand::FocusPrevField),
            KeyCommand::Cycle(delta) => self.cycle_focused(delta),
            KeyCommand::Confirm => match self.focus() {
                Some(focus) if focus.kind == InputKind::File => {
                    self.mode = Mode::FilePrompt {
                        key: focus.key,
                        input: String::new(),
                    };
                }
                _ => self.dispatch(FormCommand::FocusNextField),
            },
            KeyCommand::ClearFile => self.clear_focused_file(),
            KeyCommand::Backspace => self.edit_draft(|draft| {
                draft.pop();
            }),
            KeyCommand::Char(ch) => self.edit_draft(|draft| draft.push(ch)),
            KeyCommand::None => {}
        }
    }

    fn handle_prompt(&mut self, command: KeyCommand, key: String, mut input: String) {
        match command {
            KeyCommand::Char(ch) => input.push(ch),
            KeyCommand::Backspace => {
                input.pop();
            }
            KeyCommand::Cancel => {
                self.mode = Mode::Form;
                return;
            }
            KeyCommand::Confirm => {
                self.mode = Mode::Form;
                self.load_file(&key, input.trim());
                return;
            }
            _ => return,
        }
        self.mode = Mode::FilePrompt { key, input };
    }

    fn open_create(&mut self) {
        self.coordinator.start_create();
        self.open_form(true);
    }

    fn open_edit(&mut self, key: &str) {
        if self.coordinator.apply_row_action(RowAction::Edit, key) {
            self.open_form(false);
        } else {
            self.mode = Mode::Browse;
            self.status.set_raw("Editing is disabled for this list");
        }
    }

    fn open_form(&mut self, creating: bool) {
        self.navigator = SectionNavigator::new(self.coordinator.schema());
        self.drafts.clear();
        if let Some(session) = self.coordinator.session() {
            for field in session.schema().fields() {
                if !field.is_editable() || !uses_draft(field.kind) {
                    continue;
                }
                let value = session.value(&field.key).cloned().unwrap_or(Value::Null);
                let draft = if field.kind.is_numeric() && numeric(&value) == 0.0 {
                    String::new()
                } else {
                    display_text(&value)
                };
                self.drafts.insert(field.key.clone(), draft);
            }
        }
        self.mode = Mode::Form;
        let title = self.coordinator.schema().title().to_string();
        self.status.form_opened(&title, creating);
    }

    fn close_form(&mut self) {
        self.drafts.clear();
        self.mode = Mode::Browse;
    }

    fn submit(&mut self) {
        match self.coordinator.submit_active() {
            Ok(Reconciled::Created(key)) | Ok(Reconciled::Updated(key)) => {
                self.close_form();
                self.status.saved(&key);
                if let Some(index) = self
                    .coordinator
                    .visible_rows()
                    .iter()
                    .position(|row| row.key == key)
                {
                    self.selected_row = index;
                }
            }
            Ok(Reconciled::Invalid(errors)) => {
                self.status.issues_remaining(errors.len());
                if let Some(first) = errors.keys().next() {
                    let first = first.to_string();
                    self.focus_key(&first);
                }
            }
            Ok(Reconciled::Idle) => self.close_form(),
            Err(err) => self.status.set_raw(err.to_string()),
        }
    }

    fn request_exit(&mut self) {
        if self.options.confirm_exit && !self.exit_armed {
            self.exit_armed = true;
            self.status.pending_exit();
            return;
        }
        self.coordinator.handle_cancel();
        self.should_quit = true;
    }

    fn dispatch(&mut self, command: FormCommand) {
        let Some(session) = self.coordinator.session_mut() else {
            return;
        };
        let mut engine = FormEngine::new(session, &mut self.navigator);
        if let Err(err) = engine.dispatch(command) {
            self.status.set_raw(err.to_string());
        }
    }

    fn focus(&self) -> Option<Focus> {
        let schema = self.coordinator.schema();
        let section = schema.section(self.navigator.current())?;
        let field = section.visible_fields().nth(self.navigator.field_index())?;
        Some(Focus::from_field(field))
    }

    fn focus_key(&mut self, key: &str) {
        let schema = self.coordinator.schema().clone();
        let Some(section_index) = schema.section_of(key) else {
            return;
        };
        self.navigator.go_to(section_index);
        if let Some(position) = schema
            .section(section_index)
            .and_then(|section| section.visible_fields().position(|field| field.key == key))
        {
            self.navigator.focus_field(position);
        }
    }

    fn edit_draft(&mut self, edit: impl FnOnce(&mut String)) {
        let Some(focus) = self.focus() else {
            return;
        };
        if focus.derived {
            self.status.read_only(&focus.label);
            return;
        }
        if !uses_draft(focus.kind) {
            return;
        }
        let draft = self.drafts.entry(focus.key.clone()).or_default();
        edit(draft);
        let raw = draft.clone();
        self.dispatch(FormCommand::FieldEdited {
            key: focus.key,
            raw,
        });
        self.status.editing(&focus.label);
    }

    fn cycle_focused(&mut self, delta: i32) {
        let Some(focus) = self.focus() else {
            return;
        };
        let Some(session) = self.coordinator.session_mut() else {
            return;
        };
        let current = session.value(&focus.key).map(display_text).unwrap_or_default();
        let suggestion = session
            .suggestions(&focus.key)
            .first()
            .map(|suggestion| suggestion.to_string());
        if focus.kind == InputKind::Select && !focus.options.is_empty() {
            let len = focus.options.len() as i32;
            let next = match focus.options.iter().position(|option| *option == current) {
                Some(index) => (index as i32 + delta).rem_euclid(len),
                None if delta < 0 => len - 1,
                None => 0,
            };
            let choice = focus.options[next as usize].clone();
            if let Err(err) = session.set_value(&focus.key, Value::String(choice)) {
                self.status.set_raw(err.to_string());
                return;
            }
            self.status.editing(&focus.label);
        } else if delta > 0
            && let Some(suggestion) = suggestion
            && suggestion != current
        {
            if let Err(err) = session.set_field(&focus.key, &suggestion) {
                self.status.set_raw(err.to_string());
                return;
            }
            self.drafts.insert(focus.key.clone(), suggestion);
            self.status.editing(&focus.label);
        }
    }

    fn clear_focused_file(&mut self) {
        let Some(focus) = self.focus() else {
            return;
        };
        let Some(session) = self.coordinator.session_mut() else {
            return;
        };
        let result = match focus.file_mode {
            Some(FileMode::Attachments) => {
                let count = session
                    .value(&focus.key)
                    .and_then(Value::as_array)
                    .map_or(0, Vec::len);
                match count.checked_sub(1) {
                    Some(last) => session.remove_attachment(&focus.key, last).map(|_| ()),
                    None => Ok(()),
                }
            }
            Some(_) => session.clear_file(&focus.key),
            None => Err(FormError::NotFileField(focus.key.clone())),
        };
        match result {
            Ok(()) => self.status.set_raw(format!("{} cleared", focus.label)),
            Err(err) => self.status.set_raw(err.to_string()),
        }
    }

    fn load_file(&mut self, key: &str, path: &str) {
        if path.is_empty() {
            return;
        }
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(%path, error = %err, "file could not be read");
                self.status.set_raw(format!("cannot read {path}: {err}"));
                return;
            }
        };
        let name = Path::new(path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string());
        let payload = FilePayload::from_name(name, bytes);
        debug!(field = key, file = %payload.name, size = payload.bytes.len(), "file selected");

        let mode = self
            .coordinator
            .schema()
            .field(key)
            .and_then(|field| field.file_mode);
        let result = match mode {
            Some(FileMode::Attachments) => match self.coordinator.session_mut() {
                Some(session) => session.attach_files(key, std::slice::from_ref(&payload)),
                None => return,
            },
            Some(FileMode::Upload) => {
                let token = match self.coordinator.session_mut() {
                    Some(session) => session.begin_file(key),
                    None => return,
                };
                match token {
                    Ok(token) => {
                        self.status.set_raw(format!("Uploading {}…", payload.name));
                        self.uploads.spawn(token, payload);
                        return;
                    }
                    Err(err) => Err(err),
                }
            }
            _ => {
                let token = match self.coordinator.session_mut() {
                    Some(session) => session.begin_file(key),
                    None => return,
                };
                token.map(|token| {
                    self.coordinator
                        .complete_file(&token, FileOutcome::Read(payload.clone()));
                })
            }
        };

        if let Err(err) = result {
            self.status.set_raw(err.to_string());
            return;
        }
        let notices = self
            .coordinator
            .session_mut()
            .map(|session| session.take_notices())
            .unwrap_or_default();
        match notices.last() {
            Some(notice) => self.status.set_raw(notice.clone()),
            None => self.status.set_raw(format!("{} attached", payload.name)),
        }
    }

    fn selected_key(&self) -> Option<String> {
        self.coordinator
            .visible_rows()
            .get(self.selected_row)
            .map(|row| row.key.clone())
    }

    fn move_selection(&mut self, delta: i32) {
        let len = self.coordinator.visible_rows().len();
        if len == 0 {
            self.selected_row = 0;
            return;
        }
        let next = (self.selected_row as i64 + delta as i64).clamp(0, len as i64 - 1);
        self.selected_row = next as usize;
    }

    fn clamp_selection(&mut self) {
        let len = self.coordinator.visible_rows().len();
        self.selected_row = self.selected_row.min(len.saturating_sub(1));
    }
}

fn uses_draft(kind: InputKind) -> bool {
    kind.is_textual() || kind.is_numeric() || kind == InputKind::Date
}

fn group_of<'a>(menu: &'a [MenuItem], kind: &str) -> Option<&'a str> {
    menu.iter()
        .find(|item| item.children.iter().any(|child| child.kind == Some(kind)))
        .map(|item| item.key)
}
