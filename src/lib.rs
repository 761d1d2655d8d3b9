#![deny(rust_2018_idioms)]

//! Record editing core for an administrative console: declarative record
//! schemas with derived fields, edit sessions with submit-time validation,
//! a section navigator and a list/detail coordinator, plus a terminal host.

mod app;
pub mod domain;
pub mod form;
pub mod io;
pub mod list;
mod presentation;
pub mod shell;
pub mod upload;

#[cfg(test)]
mod tests;

pub use app::{RecordUI, UiOptions};
pub use domain::{
    FieldSpec, InputKind, Record, RecordSchema, SchemaError, SectionSpec, catalog,
    parse_record_schema,
};
pub use form::{
    FormError, FormOptions, FormSession, PendingPolicy, SectionNavigator, SessionState,
    SubmitOutcome, ValidationErrors, recompute,
};
pub use io::{
    DocumentFormat, FormatProbe, OutputDestination, OutputOptions, emit_collection,
    guess_document, load_collection, parse_document_str, read_document,
};
pub use list::{ListCoordinator, Reconciled, RecordCollection};

pub mod prelude {
    pub use super::{
        FormSession, ListCoordinator, Record, RecordCollection, RecordSchema, RecordUI,
        UiOptions, catalog,
    };
}
