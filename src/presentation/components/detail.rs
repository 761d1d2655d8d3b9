use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::domain::{FileMode, InputKind, display_text};

use super::{
    super::view::{DetailView, FilePrompt},
    layout::{modal_rect, popup_rect},
};

pub fn render_detail(frame: &mut Frame<'_>, detail: &DetailView<'_>) {
    let area = modal_rect(frame.area(), 70, 80);
    frame.render_widget(Clear, area);

    let mut lines = Vec::new();
    for section in detail.schema.sections() {
        lines.push(Line::from(Span::styled(
            section.title.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        for field in section.visible_fields() {
            let value = detail.record.get(&field.key);
            let text = match (field.kind, field.file_mode, value) {
                (_, _, None) => String::new(),
                (InputKind::Password, _, Some(_)) => "••••••".to_string(),
                (InputKind::File, Some(FileMode::DataUrl), Some(value))
                    if !display_text(value).is_empty() =>
                {
                    "[image]".to_string()
                }
                (_, _, Some(value)) => display_text(value),
            };
            lines.push(Line::from(vec![
                Span::styled(format!("  {}: ", field.label), Style::default().fg(Color::Gray)),
                Span::raw(text),
            ]));
        }
    }

    let widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(format!("{} {}", detail.schema.title(), detail.key))
            .borders(Borders::ALL),
    );
    frame.render_widget(widget, area);
}

pub fn render_file_prompt(frame: &mut Frame<'_>, prompt: &FilePrompt<'_>) {
    let width = frame.area().width.saturating_sub(8).min(72);
    let area = popup_rect(frame.area(), width, 3);
    frame.render_widget(Clear, area);
    let input = Paragraph::new(format!("{}▏", prompt.input)).block(
        Block::default()
            .title(format!("File for {}", prompt.label))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(input, area);
}
