use std::collections::HashMap;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::{
    domain::{Record, RecordSchema},
    form::{FormSession, SectionNavigator},
    list::{DataTable, TableRow},
    shell::MenuLine,
};

use super::components::{
    render_detail, render_file_prompt, render_footer, render_form, render_header,
    render_search_bar, render_sidebar, render_table,
};

pub struct UiContext<'a> {
    pub title: &'a str,
    pub greeting: &'a str,
    pub active_kind: &'a str,
    pub table: &'a DataTable,
    pub rows: &'a [TableRow],
    pub selected_row: usize,
    pub query: &'a str,
    pub searching: bool,
    pub form: Option<FormView<'a>>,
    pub detail: Option<DetailView<'a>>,
    pub file_prompt: Option<FilePrompt<'a>>,
    pub sidebar: Option<&'a [MenuLine<'a>]>,
    pub status_message: &'a str,
    pub help: Option<&'a str>,
}

pub struct FormView<'a> {
    pub session: &'a FormSession,
    pub navigator: &'a SectionNavigator,
    /// Raw text typed per field, shown instead of the coerced buffer value.
    pub drafts: &'a HashMap<String, String>,
    pub creating: bool,
}

pub struct DetailView<'a> {
    pub schema: &'a RecordSchema,
    pub key: &'a str,
    pub record: &'a Record,
}

pub struct FilePrompt<'a> {
    pub label: &'a str,
    pub input: &'a str,
}

pub fn draw(frame: &mut Frame<'_>, ctx: UiContext<'_>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(7),
            Constraint::Length(4),
        ])
        .split(frame.area());
    render_header(frame, rows[0], &ctx);

    let mut main = rows[1];
    if let Some(lines) = ctx.sidebar {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(28), Constraint::Min(20)])
            .split(rows[1]);
        render_sidebar(frame, columns[0], lines, ctx.active_kind);
        main = columns[1];
    }

    let list = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(main);
    render_search_bar(frame, list[0], ctx.query, ctx.searching);
    let table_focused = ctx.form.is_none() && ctx.detail.is_none() && !ctx.searching;
    render_table(
        frame,
        list[1],
        ctx.table,
        ctx.rows,
        ctx.selected_row,
        table_focused,
    );
    render_footer(frame, rows[2], &ctx);

    if let Some(form) = &ctx.form {
        render_form(frame, form, ctx.file_prompt.is_none());
    }
    if let Some(detail) = &ctx.detail {
        render_detail(frame, detail);
    }
    if let Some(prompt) = &ctx.file_prompt {
        render_file_prompt(frame, prompt);
    }
}
