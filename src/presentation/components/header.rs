use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_width::UnicodeWidthStr;

use super::super::view::UiContext;

pub fn render_header(frame: &mut Frame<'_>, area: Rect, ctx: &UiContext<'_>) {
    let title = format!(" {} ", ctx.title);
    let gap = (area.width as usize)
        .saturating_sub(UnicodeWidthStr::width(title.as_str()))
        .saturating_sub(UnicodeWidthStr::width(ctx.greeting) + 1);
    let line = Line::from(vec![
        Span::styled(
            title,
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" ".repeat(gap)),
        Span::styled(ctx.greeting.to_string(), Style::default().fg(Color::Gray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
