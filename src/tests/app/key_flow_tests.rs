use std::{
    fs,
    sync::{Mutex, mpsc},
    thread,
    time::{Duration, Instant},
};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::json;

use crate::{
    app::{App, Mode, RecordUI, UiOptions},
    domain::{Record, catalog},
    form::{FilePayload, PENDING_MESSAGE},
    list::RecordCollection,
    upload::{UnconfiguredUploader, UploadError, UploadService},
};

/// Holds every upload until the test releases it.
struct GatedUploader {
    gate: Mutex<mpsc::Receiver<()>>,
}

impl UploadService for GatedUploader {
    fn upload(&self, file: &FilePayload) -> Result<String, UploadError> {
        let gate = self
            .gate
            .lock()
            .map_err(|_| UploadError::Transport("gate poisoned".into()))?;
        gate.recv_timeout(Duration::from_secs(2))
            .map_err(|_| UploadError::Transport("gate never opened".into()))?;
        Ok(format!("https://img.example/{}", file.name))
    }
}

fn customer(id: &str, name: &str, company: &str) -> Record {
    Record::new()
        .with("id", id)
        .with("name", name)
        .with("email", "someone@example.com")
        .with("phone", "555-0100")
        .with("company", company)
        .with("status", "Active")
}

fn build_app(records: Vec<Record>) -> App {
    let schema = catalog::customer_schema().expect("customer schema");
    let collection = RecordCollection::from_records("id", records).expect("unique ids");
    RecordUI::new(schema)
        .with_collection(collection)
        .with_uploader(UnconfiguredUploader::new("offline"))
        .into_app()
        .expect("app")
}

fn press(app: &mut App, code: KeyCode) {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
}

fn chord(app: &mut App, ch: char) {
    app.handle_key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL));
}

fn type_text(app: &mut App, text: &str) {
    for ch in text.chars() {
        press(app, KeyCode::Char(ch));
    }
}

#[test]
fn typing_a_new_record_and_saving_adds_it() {
    let mut app = build_app(Vec::new());
    press(&mut app, KeyCode::Char('n'));
    assert_eq!(app.mode(), &Mode::Form);

    type_text(&mut app, "Ada");
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "ada@example.com");
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "555-0101");
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "Engines");
    chord(&mut app, 's');

    assert_eq!(app.mode(), &Mode::Browse);
    assert!(app.status().starts_with("Saved CUST-"));
    let collection = app.coordinator().collection();
    assert_eq!(collection.len(), 1);
    let record = collection.records().next().expect("saved record");
    assert_eq!(record.text("name"), "Ada");
    assert_eq!(record.text("company"), "Engines");
}

#[test]
fn saving_an_empty_form_reports_issues_and_stays_open() {
    let mut app = build_app(Vec::new());
    press(&mut app, KeyCode::Char('n'));
    chord(&mut app, 's');
    assert_eq!(app.mode(), &Mode::Form);
    assert_eq!(app.status(), "4 issue(s) remaining");
    assert!(app.coordinator().collection().is_empty());
}

#[test]
fn escape_discards_the_form() {
    let mut app = build_app(vec![customer("CUST-1", "Grace", "Navy")]);
    press(&mut app, KeyCode::Char('e'));
    assert_eq!(app.mode(), &Mode::Form);
    type_text(&mut app, " Hopper");
    press(&mut app, KeyCode::Esc);

    assert_eq!(app.mode(), &Mode::Browse);
    assert_eq!(app.status(), "Changes discarded");
    let record = app.coordinator().view("CUST-1").expect("record");
    assert_eq!(record.text("name"), "Grace");
}

#[test]
fn right_arrow_cycles_select_options() {
    let mut app = build_app(Vec::new());
    press(&mut app, KeyCode::Char('n'));
    for _ in 0..4 {
        press(&mut app, KeyCode::Tab);
    }
    press(&mut app, KeyCode::Right);
    assert_eq!(
        app.coordinator()
            .field_value("status")
            .and_then(|value| value.as_str()),
        Some("Inactive")
    );
    press(&mut app, KeyCode::Right);
    assert_eq!(
        app.coordinator()
            .field_value("status")
            .and_then(|value| value.as_str()),
        Some("Active")
    );
}

#[test]
fn quitting_with_an_open_form_needs_confirmation() {
    let mut app = build_app(Vec::new());
    press(&mut app, KeyCode::Char('n'));
    chord(&mut app, 'q');
    assert!(!app.should_quit());
    assert!(app.status().contains("Ctrl+Q again"));
    chord(&mut app, 'q');
    assert!(app.should_quit());
}

#[test]
fn quitting_without_confirmation_when_disabled() {
    let schema = catalog::customer_schema().expect("customer schema");
    let mut app = RecordUI::new(schema)
        .with_options(UiOptions::default().with_confirm_exit(false))
        .with_uploader(UnconfiguredUploader::new("offline"))
        .into_app()
        .expect("app");
    press(&mut app, KeyCode::Char('n'));
    chord(&mut app, 'q');
    assert!(app.should_quit());
}

#[test]
fn browse_keys_search_view_and_delete() {
    let mut app = build_app(vec![
        customer("CUST-1", "Ada", "Engines"),
        customer("CUST-2", "Grace", "Navy"),
    ]);

    press(&mut app, KeyCode::Char('/'));
    assert_eq!(app.mode(), &Mode::Search);
    type_text(&mut app, "navy");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.mode(), &Mode::Browse);
    assert_eq!(app.status(), "1 matching record(s)");

    press(&mut app, KeyCode::Char('v'));
    assert_eq!(app.mode(), &Mode::View("CUST-2".to_string()));
    press(&mut app, KeyCode::Esc);

    press(&mut app, KeyCode::Char('d'));
    assert_eq!(app.status(), "Deleted CUST-2");
    assert_eq!(
        app.coordinator().collection().keys().collect::<Vec<_>>(),
        ["CUST-1"]
    );
}

#[test]
fn mismatched_collection_keys_are_refused() {
    let schema = catalog::register_schema().expect("register schema");
    let result = RecordUI::new(schema)
        .with_collection(RecordCollection::new("id"))
        .into_app();
    let err = result.err().expect("id key mismatch");
    assert!(err.to_string().contains("keyed by 'username'"));
}

#[test]
fn uploads_run_in_the_background_and_block_saving() {
    let (release, gate) = mpsc::channel();
    let schema = catalog::product_schema().expect("product schema");
    let mut app = RecordUI::new(schema)
        .with_uploader(GatedUploader {
            gate: Mutex::new(gate),
        })
        .into_app()
        .expect("app");
    let image = std::env::temp_dir().join(format!("recordui-{}-shoe.png", std::process::id()));
    fs::write(&image, [1u8, 2, 3]).expect("scratch image");

    press(&mut app, KeyCode::Char('n'));
    press(&mut app, KeyCode::Enter);
    assert!(matches!(app.mode(), Mode::FilePrompt { key, .. } if key == "imageUrl"));
    type_text(&mut app, &image.to_string_lossy());
    let started = Instant::now();
    press(&mut app, KeyCode::Enter);
    assert!(started.elapsed() < Duration::from_secs(1));
    fs::remove_file(&image).ok();

    assert_eq!(app.mode(), &Mode::Form);
    assert!(app.status().starts_with("Uploading"));
    assert_eq!(app.uploads_in_flight(), 1);
    let session = app.coordinator().session().expect("open form");
    assert!(session.is_pending("imageUrl"));

    chord(&mut app, 's');
    assert_eq!(app.mode(), &Mode::Form);
    let session = app.coordinator().session().expect("open form");
    assert_eq!(session.error("imageUrl"), Some(PENDING_MESSAGE));

    release.send(()).expect("uploader waiting");
    let deadline = Instant::now() + Duration::from_secs(5);
    while app.uploads_in_flight() > 0 && Instant::now() < deadline {
        app.poll_uploads();
        thread::sleep(Duration::from_millis(5));
    }
    let file_name = image.file_name().expect("file name").to_string_lossy();
    assert_eq!(
        app.coordinator().field_value("imageUrl"),
        Some(&json!(format!("https://img.example/{file_name}")))
    );
    assert_eq!(app.status(), "Upload finished");
    let session = app.coordinator().session().expect("open form");
    assert!(!session.is_pending("imageUrl"));
    assert_eq!(session.error("imageUrl"), None);
}
