use std::sync::Arc;

use serde_json::json;

use crate::{
    domain::{Record, RecordSchema, catalog},
    form::{
        FileOutcome, FilePayload, FormError, FormOptions, FormSession, PENDING_MESSAGE,
        PendingPolicy, REQUIRED_MESSAGE, SessionState, SubmitOutcome,
    },
    upload::{UnconfiguredUploader, UploadService},
};

fn employee() -> Arc<RecordSchema> {
    Arc::new(catalog::employee_schema().expect("employee schema"))
}

fn product() -> Arc<RecordSchema> {
    Arc::new(catalog::product_schema().expect("product schema"))
}

fn fill_employee(session: &mut FormSession) {
    for (key, raw) in [
        ("name", "Ada Lovelace"),
        ("email", "ada@example.com"),
        ("contact", "0300-1234567"),
        ("designation", "Team Lead"),
        ("department", "Sales"),
    ] {
        session.set_field(key, raw).expect("editable field");
    }
}

#[test]
fn gross_salary_follows_its_inputs() {
    let mut session = FormSession::open(employee(), None, FormOptions::default());
    session.set_field("basicSalary", "1000").expect("basic");
    session.set_field("benefits", "200").expect("benefits");
    assert_eq!(session.value("grossSalary"), Some(&json!(1200)));

    session.set_field("benefits", "").expect("benefits");
    assert_eq!(session.value("grossSalary"), Some(&json!(1000)));
}

#[test]
fn final_price_applies_discount() {
    let mut session = FormSession::open(product(), None, FormOptions::default());
    session.set_field("tradePrice", "100").expect("trade price");
    session.set_field("discount", "10").expect("discount");
    assert_eq!(session.value("finalPrice"), Some(&json!(90)));
}

#[test]
fn derived_fields_refuse_direct_edits() {
    let mut session = FormSession::open(employee(), None, FormOptions::default());
    assert_eq!(
        session.set_field("grossSalary", "5"),
        Err(FormError::ReadOnlyField("grossSalary".to_string()))
    );
    assert_eq!(
        session.set_field("nickname", "x"),
        Err(FormError::UnknownField("nickname".to_string()))
    );
}

#[test]
fn every_missing_required_field_is_reported_at_once() {
    let mut session = FormSession::open(employee(), None, FormOptions::default());
    let outcome = session.submit().expect("submit");
    let errors = outcome.errors().expect("invalid outcome");
    let keys: Vec<_> = errors.keys().collect();
    for key in ["name", "email", "contact", "designation", "department"] {
        assert!(keys.contains(&key), "{key} should be reported");
        assert_eq!(errors.get(key), Some(REQUIRED_MESSAGE));
    }
    assert_eq!(session.state(), SessionState::SubmittedInvalid);
    assert_eq!(session.error("name"), Some(REQUIRED_MESSAGE));
}

#[test]
fn editing_a_field_clears_its_error() {
    let mut session = FormSession::open(employee(), None, FormOptions::default());
    session.submit().expect("submit");
    session.set_field("name", "Ada").expect("name");
    assert!(session.error("name").is_none());
    assert!(session.error("email").is_some());
    assert_eq!(session.state(), SessionState::Editing);
}

#[test]
fn finalized_record_carries_every_required_key() {
    let schema = employee();
    let mut session = FormSession::open(schema.clone(), None, FormOptions::default());
    fill_employee(&mut session);
    let outcome = session.submit().expect("submit");
    let record = outcome.record().expect("finalized record");
    for key in schema.required_keys() {
        assert!(record.contains_key(key), "{key} missing from record");
    }
    assert!(record.text("id").starts_with("EMP-"));
    assert_eq!(session.state(), SessionState::SubmittedValid);
    assert_eq!(session.submit(), Err(FormError::Finalized));
}

#[test]
fn seeded_sessions_start_untouched() {
    let record = Record::new()
        .with("id", "EMP-1")
        .with("name", "Grace")
        .with("basicSalary", "900")
        .with("benefits", 100);
    let session = FormSession::open(employee(), Some(&record), FormOptions::default());
    assert_eq!(session.state(), SessionState::Empty);
    assert!(!session.is_dirty());
    assert_eq!(session.value("basicSalary"), Some(&json!(900)));
    assert_eq!(session.value("grossSalary"), Some(&json!(1000)));
    assert_eq!(session.value("workingStatus"), Some(&json!("Active")));
}

#[test]
fn select_values_must_be_offered_options() {
    let mut session = FormSession::open(employee(), None, FormOptions::default());
    fill_employee(&mut session);
    session.set_field("department", "Moon Base").expect("department");
    let outcome = session.submit().expect("submit");
    let message = outcome
        .errors()
        .and_then(|errors| errors.get("department"))
        .expect("department error");
    assert!(message.starts_with("'Moon Base' is not one of"));
}

#[test]
fn pending_reads_block_submit_until_they_finish() {
    let mut session = FormSession::open(employee(), None, FormOptions::default());
    fill_employee(&mut session);
    let token = session.begin_file("avatar").expect("file field");
    assert!(session.is_pending("avatar"));

    let outcome = session.submit().expect("submit");
    assert_eq!(
        outcome.errors().and_then(|errors| errors.get("avatar")),
        Some(PENDING_MESSAGE)
    );

    let payload = FilePayload::new("me.png", "image/png", vec![1, 2, 3]);
    assert!(session.complete_file(&token, FileOutcome::Read(payload)));
    assert!(!session.has_pending());
    let stored = session.value("avatar").and_then(|value| value.as_str());
    assert_eq!(stored, Some("data:image/png;base64,AQID"));
    assert!(matches!(
        session.submit().expect("submit"),
        SubmitOutcome::Finalized(_)
    ));
}

#[test]
fn ignoring_pending_work_finalizes_and_drops_the_late_result() {
    let options = FormOptions::default().with_pending_policy(PendingPolicy::Ignore);
    let mut session = FormSession::open(employee(), None, options);
    fill_employee(&mut session);
    let token = session.begin_file("avatar").expect("file field");
    let outcome = session.submit().expect("submit");
    assert!(outcome.record().is_some());
    assert!(!session.complete_file(&token, FileOutcome::Uploaded("https://img/1".into())));
}

#[test]
fn superseded_tokens_are_stale() {
    let mut session = FormSession::open(employee(), None, FormOptions::default());
    let first = session.begin_file("avatar").expect("file field");
    let second = session.begin_file("avatar").expect("file field");
    assert!(!session.complete_file(&first, FileOutcome::Uploaded("old".into())));
    assert!(session.complete_file(&second, FileOutcome::Uploaded("new".into())));
    assert_eq!(session.value("avatar"), Some(&json!("new")));

    let mut other = FormSession::open(employee(), None, FormOptions::default());
    let foreign = other.begin_file("avatar").expect("file field");
    assert!(!session.complete_file(&foreign, FileOutcome::Uploaded("x".into())));
}

#[test]
fn failed_uploads_leave_the_field_empty_with_a_notice() {
    let mut session = FormSession::open(product(), None, FormOptions::default());
    let uploader = UnconfiguredUploader::new("no cloud configured");
    let payload = FilePayload::from_name("shoe.jpg", vec![0xff]);
    let token = session.begin_file("imageUrl").expect("upload field");
    assert!(session.is_pending("imageUrl"));
    let err = uploader.upload(&payload).expect_err("unconfigured");
    assert!(session.complete_file(&token, FileOutcome::Failed(err.to_string())));
    assert!(!session.is_pending("imageUrl"));
    assert_eq!(session.value("imageUrl"), Some(&json!("")));
    let notices = session.take_notices();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].contains("no cloud configured"));
    assert!(session.take_notices().is_empty());
}

#[test]
fn attachments_accumulate_and_can_be_removed() {
    let mut session = FormSession::open(employee(), None, FormOptions::default());
    let files = [
        FilePayload::from_name("cv.pdf", b"cv".to_vec()),
        FilePayload::from_name("id.png", b"id".to_vec()),
    ];
    session.attach_files("attachments", &files).expect("attach");
    let names: Vec<_> = session
        .value("attachments")
        .and_then(|value| value.as_array())
        .expect("attachment list")
        .iter()
        .filter_map(|item| item.get("name").and_then(|name| name.as_str()))
        .collect();
    assert_eq!(names, ["cv.pdf", "id.png"]);

    assert!(session.remove_attachment("attachments", 0).expect("remove"));
    assert!(!session.remove_attachment("attachments", 5).expect("remove"));
    assert_eq!(
        session
            .value("attachments")
            .and_then(|value| value.as_array())
            .map(Vec::len),
        Some(1)
    );
    assert_eq!(
        session.begin_file("attachments"),
        Err(FormError::NotFileField("attachments".to_string()))
    );
}

#[test]
fn suggestions_follow_the_typed_text() {
    let mut session = FormSession::open(product(), None, FormOptions::default());
    assert!(session.suggestions("brandName").is_empty());
    session.set_field("brandName", "sam").expect("brand");
    assert_eq!(session.suggestions("brandName"), vec!["Samsung"]);
}
