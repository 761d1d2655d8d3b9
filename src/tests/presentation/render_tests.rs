use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{Terminal, backend::TestBackend};

use crate::{
    app::{App, RecordUI, UiOptions},
    domain::{Record, catalog},
    list::RecordCollection,
    shell::SessionContext,
    upload::UnconfiguredUploader,
};

fn render(app: &App, width: u16, height: u16) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).expect("terminal");
    terminal.draw(|frame| app.draw(frame)).expect("draw");
    let buffer = terminal.backend().buffer();
    let area = buffer.area;
    let mut text = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            text.push_str(buffer[(x, y)].symbol());
        }
        text.push('\n');
    }
    text
}

fn product_app(records: Vec<Record>) -> App {
    let schema = catalog::product_schema().expect("product schema");
    let collection = RecordCollection::from_records("id", records).expect("unique ids");
    RecordUI::new(schema)
        .with_collection(collection)
        .with_session(SessionContext::signed_in("ops"))
        .with_uploader(UnconfiguredUploader::new("offline"))
        .into_app()
        .expect("app")
}

#[test]
fn empty_list_shows_placeholder_and_greeting() {
    let app = product_app(Vec::new());
    let screen = render(&app, 120, 30);
    assert!(screen.contains("Product"));
    assert!(screen.contains("Welcome, ops"));
    assert!(screen.contains("No data available"));
    assert!(screen.contains("Records (0)"));
}

#[test]
fn rows_render_with_formatted_cells() {
    let record = Record::new()
        .with("id", "PROD-1")
        .with("itemCode", "ITEM-1")
        .with("name", "Trail Shoe")
        .with("category", "Footwear")
        .with("tradePrice", 100)
        .with("discount", 10)
        .with("finalPrice", 90)
        .with("stock", 4)
        .with("status", "Low Stock");
    let app = product_app(vec![record]);
    let screen = render(&app, 160, 30);
    assert!(screen.contains("Trail Shoe"));
    assert!(screen.contains("$100.00"));
    assert!(screen.contains("10%"));
    assert!(screen.contains("$90.00"));
    assert!(screen.contains("Records (1)"));
}

#[test]
fn sidebar_marks_the_expanded_group() {
    let app = product_app(Vec::new());
    let screen = render(&app, 120, 30);
    assert!(screen.contains("▾ Inventory"));
    assert!(screen.contains("Brand Management"));
    assert!(screen.contains("▸ Sales"));
}

#[test]
fn hidden_sidebar_is_not_drawn() {
    let schema = catalog::product_schema().expect("product schema");
    let app = RecordUI::new(schema)
        .with_options(UiOptions::default().with_sidebar(false))
        .with_uploader(UnconfiguredUploader::new("offline"))
        .into_app()
        .expect("app");
    let screen = render(&app, 120, 30);
    assert!(!screen.contains("Inventory"));
}

#[test]
fn open_form_shows_sections_and_calculated_fields() {
    let mut app = product_app(Vec::new());
    app.handle_key(KeyEvent::new(KeyCode::Char('n'), KeyModifiers::NONE));
    let screen = render(&app, 140, 50);
    assert!(screen.contains("New Product"));
    assert!(screen.contains("General Information"));
    assert!(screen.contains("Sales Information"));
    assert!(screen.contains("Product Name *"));

    app.handle_key(KeyEvent::new(KeyCode::PageDown, KeyModifiers::NONE));
    let screen = render(&app, 140, 50);
    assert!(screen.contains("Final Price"));
    assert!(screen.contains("calculated"));
}

#[test]
fn failed_submit_marks_invalid_fields() {
    let mut app = product_app(Vec::new());
    app.handle_key(KeyEvent::new(KeyCode::Char('n'), KeyModifiers::NONE));
    app.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
    let screen = render(&app, 140, 50);
    assert!(screen.contains("this field is required"));
    assert!(screen.contains("invalid"));
}
