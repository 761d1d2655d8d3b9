use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs},
};
use serde_json::Value;
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

use crate::{
    domain::{FieldSpec, FileMode, InputKind, display_text},
    form::FormSession,
};

use super::{super::view::FormView, layout::modal_rect};

pub fn render_form(frame: &mut Frame<'_>, form: &FormView<'_>, enable_cursor: bool) {
    let area = modal_rect(frame.area(), 90, 90);
    frame.render_widget(Clear, area);

    let session = form.session;
    let schema = session.schema();
    let verb = if form.creating { "New" } else { "Edit" };
    let outer = Block::default()
        .title(format!("{verb} {}", schema.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(inner);

    let current = form.navigator.current();
    let titles: Vec<Line<'static>> = schema
        .sections()
        .iter()
        .map(|section| {
            let flagged = section
                .fields
                .iter()
                .any(|field| session.error(&field.key).is_some());
            let title = if flagged {
                format!("{} !", section.title)
            } else {
                section.title.clone()
            };
            Line::from(title)
        })
        .collect();
    let tabs = Tabs::new(titles)
        .block(Block::default().title("Sections").borders(Borders::ALL))
        .select(current)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, chunks[0]);

    render_fields(frame, chunks[1], form, enable_cursor);
}

fn render_fields(frame: &mut Frame<'_>, area: Rect, form: &FormView<'_>, enable_cursor: bool) {
    let session = form.session;
    let Some(section) = session.schema().section(form.navigator.current()) else {
        return;
    };
    let fields: Vec<&FieldSpec> = section.visible_fields().collect();
    if fields.is_empty() {
        let placeholder = Paragraph::new("This section has no fields").block(
            Block::default()
                .title(section.title.clone())
                .borders(Borders::ALL),
        );
        frame.render_widget(placeholder, area);
        return;
    }

    let selected = form.navigator.field_index().min(fields.len() - 1);
    let content_width = area.width.saturating_sub(6).max(8) as usize;
    let mut items = Vec::with_capacity(fields.len());
    let mut cursor_line = None;
    let mut line_offset = 0usize;
    for (index, field) in fields.iter().enumerate() {
        let is_selected = index == selected;
        let render = field_lines(field, form, is_selected, content_width);
        if is_selected {
            cursor_line = render.cursor.map(|(line, column)| (line_offset + line, column));
        }
        line_offset += render.lines.len();
        items.push(ListItem::new(render.lines));
    }

    let mut state = ListState::default();
    state.select(Some(selected));
    let list = List::new(items)
        .block(
            Block::default()
                .title(section.title.clone())
                .borders(Borders::ALL),
        )
        .highlight_style(Style::default().bg(Color::Rgb(30, 30, 30)))
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, area, &mut state);

    if enable_cursor
        && state.offset() == 0
        && let Some((line, column)) = cursor_line
        && line + 2 < area.height as usize
    {
        let x = area.x + 1 + 2 + 2 + column as u16;
        let y = area.y + 1 + line as u16;
        if x < area.right() {
            frame.set_cursor_position((x, y));
        }
    }
}

struct FieldLines {
    lines: Vec<Line<'static>>,
    /// Line within the item and display column of the text cursor.
    cursor: Option<(usize, usize)>,
}

fn field_lines(
    field: &FieldSpec,
    form: &FormView<'_>,
    is_selected: bool,
    width: usize,
) -> FieldLines {
    let session = form.session;
    let mut lines = Vec::new();
    let label_style = if is_selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    };
    lines.push(Line::from(Span::styled(field.display_label(), label_style)));

    let text = value_text(field, form);
    let value_style = if field.is_derived() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::White)
    };
    let mut segments: Vec<String> = wrap(&text, width)
        .into_iter()
        .map(|segment| segment.into_owned())
        .collect();
    if segments.is_empty() {
        segments.push(String::new());
    }
    if text.is_empty()
        && let Some(placeholder) = &field.placeholder
    {
        segments = vec![placeholder.clone()];
    }
    let last_width = if text.is_empty() {
        0
    } else {
        segments
            .last()
            .map(|segment| UnicodeWidthStr::width(segment.as_str()))
            .unwrap_or(0)
    };
    for segment in segments {
        lines.push(Line::from(vec![Span::raw("  "), Span::styled(segment, value_style)]));
    }
    let cursor = (is_selected && takes_text(field)).then(|| (lines.len() - 1, last_width));

    lines.push(meta_line(field, session));

    if is_selected {
        let suggestions = session.suggestions(&field.key);
        if !suggestions.is_empty() && !field.is_derived() {
            lines.push(Line::from(Span::styled(
                format!("  suggestions (→ accepts first): {}", suggestions.join(", ")),
                Style::default().fg(Color::Magenta),
            )));
        }
    }

    if let Some(message) = session.error(&field.key) {
        for segment in wrap(message, width) {
            lines.push(Line::from(Span::styled(
                format!("  {}", segment.into_owned()),
                Style::default().fg(Color::Red),
            )));
        }
    }

    FieldLines { lines, cursor }
}

fn value_text(field: &FieldSpec, form: &FormView<'_>) -> String {
    let session = form.session;
    let value = session.value(&field.key).cloned().unwrap_or(Value::Null);
    if session.is_pending(&field.key) {
        return "uploading…".to_string();
    }
    match (field.kind, field.file_mode) {
        (InputKind::Password, _) => {
            let typed = form.drafts.get(&field.key).map_or(0, |draft| draft.chars().count());
            "•".repeat(typed)
        }
        (InputKind::Select, _) => {
            let chosen = display_text(&value);
            if chosen.is_empty() {
                "‹ choose with ←/→ ›".to_string()
            } else {
                format!("‹ {chosen} ›")
            }
        }
        (InputKind::File, Some(FileMode::Attachments)) => {
            let names: Vec<String> = value
                .as_array()
                .map(|items| {
                    items
                        .iter()
                        .map(|item| display_text(item.get("name").unwrap_or(&Value::Null)))
                        .collect()
                })
                .unwrap_or_default();
            if names.is_empty() {
                "no attachments (Enter to add)".to_string()
            } else {
                names.join(", ")
            }
        }
        (InputKind::File, Some(FileMode::DataUrl)) => {
            let url = display_text(&value);
            if url.is_empty() {
                "no image (Enter to choose)".to_string()
            } else {
                format!("image attached ({} chars)", url.len())
            }
        }
        (InputKind::File, _) => {
            let url = display_text(&value);
            if url.is_empty() {
                "no image (Enter to upload)".to_string()
            } else {
                url
            }
        }
        _ if field.is_derived() => display_text(&value),
        _ => form
            .drafts
            .get(&field.key)
            .cloned()
            .unwrap_or_else(|| display_text(&value)),
    }
}

fn takes_text(field: &FieldSpec) -> bool {
    !field.is_derived()
        && (field.kind.is_textual() || field.kind.is_numeric() || field.kind == InputKind::Date)
}

fn meta_line(field: &FieldSpec, session: &FormSession) -> Line<'static> {
    let mut meta = vec![Span::styled(
        format!("  {}", kind_label(field)),
        Style::default().fg(Color::DarkGray),
    )];
    if field.is_derived() {
        meta.push(Span::styled("  • calculated", Style::default().fg(Color::Blue)));
    }
    if session.error(&field.key).is_some() {
        meta.push(Span::styled(
            "  • invalid",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }
    Line::from(meta)
}

fn kind_label(field: &FieldSpec) -> &'static str {
    match (field.kind, field.file_mode) {
        (InputKind::Text, _) => "text",
        (InputKind::Email, _) => "email",
        (InputKind::Password, _) => "password",
        (InputKind::Number, _) => "number",
        (InputKind::Select, _) => "select",
        (InputKind::Date, _) => "date (YYYY-MM-DD)",
        (InputKind::TextArea, _) => "text area",
        (InputKind::File, Some(FileMode::Upload)) => "image upload",
        (InputKind::File, Some(FileMode::Attachments)) => "attachments",
        (InputKind::File, _) => "image",
    }
}
