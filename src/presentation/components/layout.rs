use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// A `width` x `height` rectangle centred in `area`, shrunk to fit.
pub fn popup_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(area.width.saturating_sub(width) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);
    horizontal[1]
}

/// Centred rectangle covering the given share of `area`.
pub fn modal_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    popup_rect(
        area,
        area.width.saturating_mul(percent_x) / 100,
        area.height.saturating_mul(percent_y) / 100,
    )
}
