use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::{
    domain::{Record, RecordSchema, parse_record_schema},
    list::RecordCollection,
};

use super::{DocumentFormat, FormatProbe};

/// Parse structured data in any supported format into a `serde_json::Value`.
pub fn parse_document_str(contents: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Json => {
            serde_json::from_str::<Value>(contents).with_context(|| "failed to parse JSON document")
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => {
            serde_yaml::from_str::<Value>(contents).with_context(|| "failed to parse YAML document")
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => contents
            .parse::<toml::Value>()
            .with_context(|| "failed to parse TOML document")
            .and_then(|value| {
                serde_json::to_value(value).context("failed to convert TOML to JSON")
            }),
    }
}

/// Parses text whose format is not known up front. `preferred` is tried
/// first, then every other compiled-in format. The error names all of them.
pub fn guess_document(
    contents: &str,
    preferred: Option<DocumentFormat>,
) -> Result<(Value, DocumentFormat)> {
    let mut order = DocumentFormat::available_formats();
    if let Some(preferred) = preferred {
        order.retain(|format| *format != preferred);
        order.insert(0, preferred);
    }
    let mut first_error = None;
    for format in &order {
        match parse_document_str(contents, *format) {
            Ok(value) => return Ok((value, *format)),
            Err(err) => {
                first_error.get_or_insert(err);
            }
        }
    }
    let tried: Vec<String> = order.iter().map(ToString::to_string).collect();
    match first_error {
        Some(err) => Err(err.context(format!("not a {} document", tried.join("/")))),
        None => bail!("no document formats are compiled in"),
    }
}

/// Reads a document from disk, taking the format from the extension unless
/// `format` is given.
pub fn read_document(path: &Path, format: Option<DocumentFormat>) -> Result<Value> {
    let format = match format {
        Some(format) => format,
        None => match DocumentFormat::probe(path) {
            FormatProbe::Known(format) => format,
            FormatProbe::MissingFeature(feature) => bail!(
                "{} needs the '{feature}' feature, which this build lacks",
                path.display()
            ),
            FormatProbe::Unknown => DocumentFormat::default(),
        },
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read file {}", path.display()))?;
    parse_document_str(&contents, format)
        .with_context(|| format!("failed to load {}", path.display()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CollectionDocument {
    Wrapped { records: Vec<Record> },
    Bare(Vec<Record>),
}

/// Builds a collection from either a bare list of records or an object
/// holding them under `records`. Records are keyed by the schema's
/// identifier field.
pub fn load_collection(value: Value, schema: &RecordSchema) -> Result<RecordCollection> {
    let records = match serde_json::from_value::<CollectionDocument>(value)
        .context("collection must be a list of records or an object with a `records` list")?
    {
        CollectionDocument::Wrapped { records } | CollectionDocument::Bare(records) => records,
    };
    let mut collection = RecordCollection::new(schema.id_key());
    for (index, record) in records.into_iter().enumerate() {
        collection
            .insert(record)
            .with_context(|| format!("record #{} cannot be loaded", index + 1))?;
    }
    debug!(kind = schema.kind(), records = collection.len(), "collection loaded");
    Ok(collection)
}

pub fn load_record_schema(contents: &str, format: DocumentFormat) -> Result<RecordSchema> {
    let value = parse_document_str(contents, format)?;
    parse_record_schema(&value)
}
