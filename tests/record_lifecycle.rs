use std::sync::Arc;

use recordui::{
    FormOptions, FormSession, ListCoordinator, Reconciled, Record, RecordCollection,
    RecordSchema, SubmitOutcome, catalog,
};
use serde_json::json;

fn employees() -> Arc<RecordSchema> {
    Arc::new(catalog::employee_schema().expect("employee schema"))
}

fn employee(id: &str, name: &str, basic: i64) -> Record {
    Record::new()
        .with("id", id)
        .with("name", name)
        .with("email", format!("{}@example.com", name.to_lowercase()))
        .with("contact", "0300-0000000")
        .with("designation", "Accountant")
        .with("department", "Finance")
        .with("basicSalary", basic)
}

fn roster() -> ListCoordinator {
    let collection = RecordCollection::from_records(
        "id",
        [
            employee("EMP-1", "Ada", 1000),
            employee("EMP-2", "Grace", 1200),
            employee("EMP-3", "Linus", 900),
        ],
    )
    .expect("unique ids");
    ListCoordinator::new(employees(), collection)
}

#[test]
fn gross_salary_is_basic_plus_benefits() {
    let mut session = FormSession::open(employees(), None, FormOptions::default());
    session.set_field("basicSalary", "1000").expect("basic");
    session.set_field("benefits", "200").expect("benefits");
    assert_eq!(session.value("grossSalary"), Some(&json!(1200)));
}

#[test]
fn malformed_numbers_read_as_zero() {
    let mut session = FormSession::open(employees(), None, FormOptions::default());
    session.set_field("basicSalary", "12abc").expect("basic");
    session.set_field("benefits", "50").expect("benefits");
    assert_eq!(session.value("basicSalary"), Some(&json!(0)));
    assert_eq!(session.value("grossSalary"), Some(&json!(50)));
}

#[test]
fn submit_lists_all_missing_required_fields() {
    let mut session = FormSession::open(employees(), None, FormOptions::default());
    session.set_field("name", "Ada").expect("name");
    let SubmitOutcome::Invalid(errors) = session.submit().expect("submit") else {
        panic!("incomplete employee must be invalid");
    };
    let mut keys: Vec<_> = errors.keys().collect();
    keys.sort_unstable();
    assert_eq!(keys, ["contact", "department", "designation", "email"]);
}

#[test]
fn finalized_records_hold_every_required_key() {
    let schema = employees();
    let mut coordinator = ListCoordinator::new(schema.clone(), RecordCollection::new("id"));
    coordinator.start_create();
    for (key, raw) in [
        ("name", "Ada"),
        ("email", "ada@example.com"),
        ("contact", "0300-1111111"),
        ("designation", "Team Lead"),
        ("department", "Information Technology"),
        ("basicSalary", "1500"),
    ] {
        coordinator.set_field(key, raw).expect("editable field");
    }
    let Reconciled::Created(key) = coordinator.submit_active().expect("submit") else {
        panic!("complete employee must be saved");
    };
    let record = coordinator.view(&key).expect("stored record");
    for required in schema.required_keys() {
        assert!(!record.text(required).is_empty(), "{required} is blank");
    }
    assert_eq!(record.get("salary"), Some(&json!(1500)));
    assert_eq!(record.text("position"), "Team Lead");
    assert_eq!(record.text("status"), "Active");
}

#[test]
fn create_adds_exactly_one_record() {
    let mut coordinator = roster();
    coordinator.start_create();
    for (key, raw) in [
        ("name", "Barbara"),
        ("email", "barbara@example.com"),
        ("contact", "0300-2222222"),
        ("designation", "Business Analyst"),
        ("department", "Operations"),
    ] {
        coordinator.set_field(key, raw).expect("editable field");
    }
    assert!(matches!(
        coordinator.submit_active().expect("submit"),
        Reconciled::Created(_)
    ));
    assert_eq!(coordinator.collection().len(), 4);
}

#[test]
fn edit_keeps_the_collection_length() {
    let mut coordinator = roster();
    coordinator
        .start_edit("EMP-2")
        .expect("existing record")
        .set_field("benefits", "300")
        .expect("benefits");
    assert_eq!(
        coordinator.submit_active().expect("submit"),
        Reconciled::Updated("EMP-2".to_string())
    );
    assert_eq!(coordinator.collection().len(), 3);
    let updated = coordinator.view("EMP-2").expect("record");
    assert_eq!(updated.get("grossSalary"), Some(&json!(1500)));
}

#[test]
fn delete_removes_one_and_keeps_order() {
    let mut coordinator = roster();
    coordinator.delete("EMP-1").expect("existing record");
    assert_eq!(
        coordinator.collection().keys().collect::<Vec<_>>(),
        ["EMP-2", "EMP-3"]
    );
}

#[test]
fn cancelled_create_leaves_no_trace() {
    let mut coordinator = roster();
    coordinator.start_create().set_field("name", "Ghost").expect("name");
    coordinator.handle_cancel();
    let session = coordinator.start_create();
    assert_eq!(session.value("name"), Some(&json!("")));
    assert!(!session.is_dirty());
    assert_eq!(coordinator.collection().len(), 3);
}

#[test]
fn product_final_price_and_stock_status() {
    let schema = Arc::new(catalog::product_schema().expect("product schema"));
    let mut session = FormSession::open(schema, None, FormOptions::default());
    session.set_field("tradePrice", "100").expect("trade price");
    session.set_field("discount", "10").expect("discount");
    session.set_field("stock", "0").expect("stock");
    assert_eq!(session.value("finalPrice"), Some(&json!(90)));
    assert_eq!(session.value("status"), Some(&json!("Out of Stock")));
}

#[test]
fn register_passwords_must_match() {
    let schema = Arc::new(catalog::register_schema().expect("register schema"));
    let mut session = FormSession::open(schema, None, FormOptions::default());
    for (key, raw) in [
        ("username", "ops"),
        ("email", "ops@example.com"),
        ("password", "hunter22"),
        ("confirmPassword", "hunter23"),
    ] {
        session.set_field(key, raw).expect("editable field");
    }
    let SubmitOutcome::Invalid(errors) = session.submit().expect("submit") else {
        panic!("mismatched passwords must be invalid");
    };
    assert_eq!(errors.get("confirmPassword"), Some("Passwords do not match."));
    assert_eq!(errors.len(), 1);
}
