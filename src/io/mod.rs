mod format;
mod input;
mod output;

pub use format::{DocumentFormat, FormatProbe};
pub use input::{
    guess_document, load_collection, load_record_schema, parse_document_str, read_document,
};
pub use output::{
    OutputDestination, OutputOptions, collection_document, emit, emit_collection,
};
