use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};
use unicode_width::UnicodeWidthStr;

use crate::list::{DataTable, RowAction, TableRow};

const MAX_COLUMN_WIDTH: usize = 32;

pub fn render_search_bar(frame: &mut Frame<'_>, area: Rect, query: &str, searching: bool) {
    let (text, style) = if query.is_empty() && !searching {
        ("Press / to search".to_string(), Style::default().fg(Color::DarkGray))
    } else if searching {
        (format!("{query}▏"), Style::default().fg(Color::White))
    } else {
        (query.to_string(), Style::default().fg(Color::White))
    };
    let border = if searching {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let bar = Paragraph::new(Line::from(Span::styled(text, style))).block(
        Block::default()
            .title("Search")
            .borders(Borders::ALL)
            .border_style(border),
    );
    frame.render_widget(bar, area);
}

pub fn render_table(
    frame: &mut Frame<'_>,
    area: Rect,
    table: &DataTable,
    rows: &[TableRow],
    selected: usize,
    focused: bool,
) {
    let block = Block::default()
        .title(format!("Records ({})", rows.len()))
        .borders(Borders::ALL);
    if rows.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "No data available",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let actions = action_label(table);
    let mut widths: Vec<usize> = table
        .columns
        .iter()
        .map(|column| UnicodeWidthStr::width(column.header.as_str()))
        .collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(&row.cells) {
            *width = (*width).max(UnicodeWidthStr::width(cell.as_str()));
        }
    }
    let mut constraints: Vec<Constraint> = widths
        .iter()
        .map(|width| Constraint::Length((*width).min(MAX_COLUMN_WIDTH) as u16 + 1))
        .collect();

    let mut header: Vec<Cell<'_>> = table
        .columns
        .iter()
        .map(|column| Cell::from(column.header.clone()))
        .collect();
    if let Some(actions) = &actions {
        header.push(Cell::from("Actions"));
        constraints.push(Constraint::Length(
            UnicodeWidthStr::width(actions.as_str()).max(7) as u16,
        ));
    }

    let body: Vec<Row<'_>> = rows
        .iter()
        .map(|row| {
            let mut cells: Vec<Cell<'_>> = row
                .cells
                .iter()
                .map(|cell| Cell::from(cell.clone()))
                .collect();
            if let Some(actions) = &actions {
                cells.push(Cell::from(actions.clone()).style(Style::default().fg(Color::DarkGray)));
            }
            Row::new(cells)
        })
        .collect();

    let highlight = if focused {
        Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
    } else {
        Style::default().bg(Color::DarkGray)
    };
    let widget = Table::new(body, constraints)
        .header(
            Row::new(header).style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
        )
        .block(block)
        .row_highlight_style(highlight)
        .highlight_symbol("» ");

    let mut state = TableState::default();
    state.select(Some(selected.min(rows.len() - 1)));
    frame.render_stateful_widget(widget, area, &mut state);
}

fn action_label(table: &DataTable) -> Option<String> {
    let labels: Vec<&str> = table
        .actions
        .visible()
        .into_iter()
        .map(|action| match action {
            RowAction::View => "v:view",
            RowAction::Edit => "e:edit",
            RowAction::Delete => "d:del",
        })
        .collect();
    (!labels.is_empty()).then(|| labels.join(" "))
}
