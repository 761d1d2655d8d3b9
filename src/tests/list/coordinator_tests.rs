use std::{
    cell::RefCell,
    rc::Rc,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use serde_json::json;

use crate::{
    domain::{FieldSpec, Record, RecordSchema, SectionSpec, catalog},
    form::{FileOutcome, FormError, REQUIRED_MESSAGE, SessionState},
    list::{
        ActiveSession, DataTable, ListCoordinator, Reconciled, RecordCollection, RowAction,
        TableActions, TableColumn,
    },
};

fn customer_schema() -> Arc<RecordSchema> {
    Arc::new(catalog::customer_schema().expect("customer schema"))
}

fn customer(id: &str, name: &str, company: &str) -> Record {
    Record::new()
        .with("id", id)
        .with("name", name)
        .with("email", format!("{}@example.com", name.to_lowercase()))
        .with("phone", "555-0100")
        .with("company", company)
        .with("status", "Active")
}

fn coordinator() -> ListCoordinator {
    let collection = RecordCollection::from_records(
        "id",
        [
            customer("CUST-1", "Ada", "Analytical Engines"),
            customer("CUST-2", "Grace", "Navy"),
            customer("CUST-3", "Linus", "Kernel Org"),
        ],
    )
    .expect("unique ids");
    ListCoordinator::new(customer_schema(), collection)
}

fn fill_customer(coordinator: &mut ListCoordinator, name: &str) {
    for (key, raw) in [
        ("name", name),
        ("email", "new@example.com"),
        ("phone", "555-0199"),
        ("company", "Initech"),
    ] {
        coordinator.set_field(key, raw).expect("editable field");
    }
}

#[test]
fn create_appends_one_record() {
    let mut coordinator = coordinator();
    coordinator.start_create();
    assert_eq!(coordinator.active(), ActiveSession::Creating);
    fill_customer(&mut coordinator, "Margaret");

    let key = match coordinator.submit_active().expect("submit") {
        Reconciled::Created(key) => key,
        other => panic!("expected a created record, got {other:?}"),
    };
    assert!(key.starts_with("CUST-"));
    assert_eq!(coordinator.collection().len(), 4);
    assert_eq!(coordinator.collection().keys().last(), Some(key.as_str()));
    assert_eq!(coordinator.active(), ActiveSession::None);
}

#[test]
fn edit_replaces_in_place() {
    let mut coordinator = coordinator();
    let session = coordinator.start_edit("CUST-2").expect("existing record");
    assert_eq!(session.value("name"), Some(&json!("Grace")));
    session.set_field("company", "US Navy").expect("company");

    assert_eq!(
        coordinator.submit_active().expect("submit"),
        Reconciled::Updated("CUST-2".to_string())
    );
    let collection = coordinator.collection();
    assert_eq!(collection.len(), 3);
    assert_eq!(collection.position("CUST-2"), Some(1));
    assert_eq!(
        collection.get("CUST-2").map(|record| record.text("company")),
        Some("US Navy".to_string())
    );
}

#[test]
fn editing_an_absent_record_opens_nothing() {
    let mut coordinator = coordinator();
    assert!(coordinator.start_edit("CUST-404").is_none());
    assert_eq!(coordinator.active(), ActiveSession::None);
}

#[test]
fn invalid_submit_keeps_the_form_open() {
    let mut coordinator = coordinator();
    coordinator.start_create();
    let Reconciled::Invalid(errors) = coordinator.submit_active().expect("submit") else {
        panic!("empty customer must be invalid");
    };
    assert_eq!(errors.len(), 4);
    assert_eq!(coordinator.active(), ActiveSession::Creating);
    assert_eq!(coordinator.collection().len(), 3);
}

#[test]
fn cancel_discards_and_the_next_create_starts_fresh() {
    let mut coordinator = coordinator();
    coordinator.start_create();
    coordinator.set_field("name", "Draft").expect("name");
    coordinator.handle_cancel();
    assert_eq!(coordinator.active(), ActiveSession::None);
    assert_eq!(coordinator.collection().len(), 3);

    let session = coordinator.start_create();
    assert_eq!(session.value("name"), Some(&json!("")));
    assert_eq!(session.value("status"), Some(&json!("Active")));
    assert_eq!(session.state(), SessionState::Empty);
}

#[test]
fn colliding_identifiers_are_refused_on_the_id_field() {
    let mut coordinator = coordinator();
    coordinator.start_create();
    fill_customer(&mut coordinator, "Clone");
    coordinator.set_field("id", "CUST-1").expect("id");

    let Reconciled::Invalid(errors) = coordinator.submit_active().expect("submit") else {
        panic!("duplicate id must be refused");
    };
    assert_eq!(
        errors.get("id"),
        Some("a record with key 'CUST-1' already exists")
    );
    let session = coordinator.session().expect("form stays open");
    assert_eq!(session.state(), SessionState::SubmittedInvalid);
    assert!(session.error("id").is_some());
    assert_eq!(coordinator.collection().len(), 3);

    coordinator.set_field("id", "CUST-9").expect("id");
    assert_eq!(
        coordinator.submit_active().expect("submit"),
        Reconciled::Created("CUST-9".to_string())
    );
}

#[test]
fn blank_identifier_reads_as_required() {
    let mut coordinator = coordinator();
    coordinator.start_create();
    fill_customer(&mut coordinator, "Anon");
    coordinator.set_field("id", "  ").expect("id");
    let Reconciled::Invalid(errors) = coordinator.submit_active().expect("submit") else {
        panic!("blank id must be refused");
    };
    assert_eq!(errors.get("id"), Some(REQUIRED_MESSAGE));
}

#[test]
fn delete_keeps_the_remaining_order() {
    let mut coordinator = coordinator();
    let removed = coordinator.delete("CUST-2").expect("existing record");
    assert_eq!(removed.text("name"), "Grace");
    assert_eq!(
        coordinator.collection().keys().collect::<Vec<_>>(),
        ["CUST-1", "CUST-3"]
    );
    assert!(coordinator.delete("CUST-2").is_none());
}

#[test]
fn deleting_the_edited_record_reinserts_on_save() {
    let mut coordinator = coordinator();
    coordinator.start_edit("CUST-1").expect("existing record");
    coordinator.delete("CUST-1");
    assert_eq!(
        coordinator.submit_active().expect("submit"),
        Reconciled::Updated("CUST-1".to_string())
    );
    assert_eq!(coordinator.collection().len(), 3);
    assert_eq!(coordinator.collection().keys().last(), Some("CUST-1"));
}

#[test]
fn search_matches_rendered_cells_without_case() {
    let mut coordinator = coordinator();
    let rows = coordinator.search("  NAVY ");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].key, "CUST-2");
    assert_eq!(coordinator.visible_rows(), rows);

    assert_eq!(coordinator.search("").len(), 3);
    assert!(coordinator.search("nobody").is_empty());
}

#[test]
fn row_actions_respect_hidden_controls() {
    let table = DataTable::new(vec![TableColumn::new("name", "Name")]).with_actions(TableActions {
        delete: false,
        ..TableActions::default()
    });
    let mut coordinator = coordinator().with_table(table);
    assert!(!coordinator.apply_row_action(RowAction::Delete, "CUST-1"));
    assert_eq!(coordinator.collection().len(), 3);
    assert!(coordinator.apply_row_action(RowAction::View, "CUST-1"));
    assert!(!coordinator.apply_row_action(RowAction::View, "CUST-404"));
    assert!(coordinator.apply_row_action(RowAction::Edit, "CUST-3"));
    assert_eq!(
        coordinator.active(),
        ActiveSession::Editing("CUST-3".to_string())
    );
}

#[test]
fn file_results_for_closed_forms_are_dropped() {
    let schema = Arc::new(catalog::employee_schema().expect("employee schema"));
    let mut coordinator = ListCoordinator::new(schema, RecordCollection::new("id"));
    let token = coordinator
        .start_create()
        .begin_file("avatar")
        .expect("file field");
    coordinator.handle_cancel();
    coordinator.start_create();
    assert!(!coordinator.complete_file(&token, FileOutcome::Uploaded("late".into())));
    assert_eq!(coordinator.field_value("avatar"), Some(&json!("")));
}

#[test]
fn saved_hook_sees_every_stored_record() {
    let saved = Rc::new(RefCell::new(Vec::new()));
    let sink = saved.clone();
    let mut coordinator = coordinator().on_saved(move |record| {
        sink.borrow_mut().push(record.text("name"));
    });
    coordinator.start_edit("CUST-3").expect("existing record");
    coordinator.submit_active().expect("submit");
    coordinator.start_create();
    fill_customer(&mut coordinator, "Barbara");
    coordinator.submit_active().expect("submit");
    assert_eq!(*saved.borrow(), ["Linus", "Barbara"]);
}

#[test]
fn editing_without_a_form_is_an_error() {
    let mut coordinator = coordinator();
    assert_eq!(coordinator.set_field("name", "x"), Err(FormError::Finalized));
    assert_eq!(coordinator.submit_active(), Ok(Reconciled::Idle));
}

fn contact_schema<F>(generate: F) -> Arc<RecordSchema>
where
    F: Fn() -> serde_json::Value + Send + Sync + 'static,
{
    let schema = RecordSchema::builder("contact", "Contact")
        .section(
            SectionSpec::new("main", "Main")
                .field(FieldSpec::text("id", "Contact ID").generated(generate).hidden())
                .field(FieldSpec::text("name", "Name").required()),
        )
        .build()
        .expect("contact schema");
    Arc::new(schema)
}

fn contacts(schema: Arc<RecordSchema>) -> ListCoordinator {
    let existing = Record::new().with("id", "C-1").with("name", "Ada");
    let collection = RecordCollection::from_records("id", [existing]).expect("unique ids");
    ListCoordinator::new(schema, collection)
}

#[test]
fn taken_generated_ids_are_replaced_on_create() {
    let next = AtomicU64::new(1);
    let schema = contact_schema(move || {
        json!(format!("C-{}", next.fetch_add(1, Ordering::Relaxed)))
    });
    let mut coordinator = contacts(schema);

    let session = coordinator.start_create();
    assert_eq!(session.value("id"), Some(&json!("C-1")));
    session.set_field("name", "Grace").expect("name");

    assert_eq!(
        coordinator.submit_active().expect("submit"),
        Reconciled::Created("C-2".to_string())
    );
    assert_eq!(coordinator.collection().keys().collect::<Vec<_>>(), ["C-1", "C-2"]);
    assert_eq!(
        coordinator.view("C-2").map(|record| record.text("name")),
        Some("Grace".to_string())
    );
    assert_eq!(coordinator.active(), ActiveSession::None);
}

#[test]
fn exhausted_generated_ids_report_on_the_identifier() {
    let schema = contact_schema(|| json!("C-1"));
    let mut coordinator = contacts(schema);
    coordinator.start_create().set_field("name", "Grace").expect("name");

    let Reconciled::Invalid(errors) = coordinator.submit_active().expect("submit") else {
        panic!("a generator stuck on a taken id cannot save");
    };
    assert_eq!(errors.get("id"), Some("a record with key 'C-1' already exists"));
    assert_eq!(coordinator.active(), ActiveSession::Creating);
    assert_eq!(coordinator.collection().len(), 1);
}
