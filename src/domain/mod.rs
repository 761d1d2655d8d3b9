pub mod catalog;
mod derive;
mod error;
mod parser;
mod record;
mod rules;
mod schema;

pub use derive::{Derivation, number_value, numeric};
pub use error::SchemaError;
pub use parser::{
    CheckDocument, DeriveDocument, FieldDocument, RuleDocument, SchemaDocument, SectionDocument,
    build_record_schema, parse_record_schema,
};
pub use record::Record;
pub use rules::{RecordCheck, Rule, display_text, is_blank};
pub use schema::{
    FieldDefault, FieldSpec, FileMode, InputKind, RecordSchema, RecordSchemaBuilder, SectionSpec,
};
