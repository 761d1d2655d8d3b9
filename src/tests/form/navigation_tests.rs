use std::sync::Arc;

use serde_json::json;

use crate::{
    domain::catalog,
    form::{FormCommand, FormEngine, FormOptions, FormSession, SectionNavigator},
};

fn employee_session() -> (FormSession, SectionNavigator) {
    let schema = Arc::new(catalog::employee_schema().expect("employee schema"));
    let navigator = SectionNavigator::new(&schema);
    let session = FormSession::open(schema, None, FormOptions::default());
    (session, navigator)
}

#[test]
fn navigator_counts_only_visible_fields() {
    let (session, navigator) = employee_session();
    assert_eq!(navigator.section_count(), session.schema().sections().len());
    assert_eq!(navigator.section_count(), 4);
    assert_eq!(navigator.current(), 0);
    assert_eq!(navigator.field_index(), 0);
}

#[test]
fn engine_routes_navigation_and_edits() {
    let (mut session, mut navigator) = employee_session();
    {
        let mut engine = FormEngine::new(&mut session, &mut navigator);
        engine
            .dispatch(FormCommand::FocusNextSection(2))
            .expect("navigation");
        engine
            .dispatch(FormCommand::FieldEdited {
                key: "basicSalary".into(),
                raw: "750".into(),
            })
            .expect("edit");
    }
    assert_eq!(navigator.current(), 2);
    assert_eq!(session.value("grossSalary"), Some(&json!(750)));
}

#[test]
fn switching_sections_keeps_buffer_values() {
    let (mut session, mut navigator) = employee_session();
    session.set_field("name", "Ada").expect("name");
    navigator.step(1);
    navigator.step(-1);
    navigator.step(-1);
    assert_eq!(navigator.current(), 3);
    assert_eq!(session.value("name"), Some(&json!("Ada")));
}

#[test]
fn walking_past_a_section_end_enters_the_next_section() {
    let (session, mut navigator) = employee_session();
    let personal = session
        .schema()
        .section(0)
        .map(|section| section.visible_fields().count())
        .expect("personal section");
    for _ in 0..personal {
        navigator.focus_next_field();
    }
    assert_eq!(navigator.current(), 1);
    assert_eq!(navigator.field_index(), 0);

    navigator.focus_prev_field();
    assert_eq!(navigator.current(), 0);
    assert_eq!(navigator.field_index(), personal - 1);
}

#[test]
fn edits_through_the_engine_surface_form_errors() {
    let (mut session, mut navigator) = employee_session();
    let mut engine = FormEngine::new(&mut session, &mut navigator);
    let err = engine
        .dispatch(FormCommand::FieldEdited {
            key: "grossSalary".into(),
            raw: "1".into(),
        })
        .unwrap_err();
    assert_eq!(err.to_string(), "field 'grossSalary' is computed and cannot be edited");
}
