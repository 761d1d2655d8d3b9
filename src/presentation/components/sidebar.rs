use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::shell::MenuLine;

pub fn render_sidebar(
    frame: &mut Frame<'_>,
    area: Rect,
    lines: &[MenuLine<'_>],
    active_kind: &str,
) {
    let rendered: Vec<Line<'static>> = lines
        .iter()
        .map(|line| {
            let indent = "  ".repeat(line.depth);
            let marker = match (line.item.is_group(), line.expanded) {
                (true, true) => "▾ ",
                (true, false) => "▸ ",
                (false, _) => "  ",
            };
            let style = if line.item.kind == Some(active_kind) {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Blue)
                    .add_modifier(Modifier::BOLD)
            } else if line.item.kind.is_some() {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Line::from(Span::styled(
                format!("{indent}{marker}{}", line.item.label),
                style,
            ))
        })
        .collect();
    let menu = Paragraph::new(rendered).block(Block::default().title("Menu").borders(Borders::ALL));
    frame.render_widget(menu, area);
}
