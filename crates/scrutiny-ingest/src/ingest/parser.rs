//! JSON dump parser with validation
//!
//! Every schema section must be present as a list of objects. The section's
//! `match_key` and any field declared `required` must be present in each
//! entry; their values may be null. Fields outside the record schema are
//! kept as-is.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use scrutiny_core::errors::ScrutinyError;
use scrutiny_core::{Record, SchemaConfig};

use crate::errors::{document_invalid, io_error, parse_error, Result};

/// Parsed dump: section name to records, for schema sections only.
pub type Document = BTreeMap<String, Vec<Record>>;

/// Parse a dump file
///
/// # Errors
///
/// `ERR_IO` when the file cannot be read, otherwise as [`parse_document_str`].
pub fn parse_document_file(path: &Path, schema: &SchemaConfig) -> Result<Document> {
    let content = fs::read_to_string(path).map_err(|e| io_error("ingest", path, e))?;
    parse_document_str(&content, schema)
}

/// Parse a dump from JSON text
///
/// # Errors
///
/// `ERR_SERIALIZATION` for malformed JSON, otherwise as
/// [`parse_document_value`].
pub fn parse_document_str(content: &str, schema: &SchemaConfig) -> Result<Document> {
    let raw: serde_json::Value =
        serde_json::from_str(content).map_err(|e| parse_error("ingest", e))?;
    parse_document_value(raw, schema)
}

/// Validate and convert an already-decoded dump
///
/// # Errors
///
/// `ERR_INVALID_INPUT` when the root is not an object, a schema section is
/// missing or not a list, an entry is not an object, or a required field
/// is absent.
pub fn parse_document_value(raw: serde_json::Value, schema: &SchemaConfig) -> Result<Document> {
    let mut root = match raw {
        serde_json::Value::Object(map) => map,
        other => {
            return Err(document_invalid(format!(
                "Document root must be an object, got {}",
                json_type_name(&other)
            )))
        }
    };

    let mut parsed = Document::new();
    for section in &schema.sections {
        let name = section.name.as_str();
        let entries = match root.remove(name) {
            Some(serde_json::Value::Array(entries)) => entries,
            Some(other) => {
                return Err(ScrutinyError::SectionNotList {
                    section: name.to_string(),
                    found: json_type_name(&other).to_string(),
                }
                .into())
            }
            None => {
                return Err(ScrutinyError::MissingSection {
                    section: name.to_string(),
                }
                .into())
            }
        };

        let required = section.required_fields();
        let mut records = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            let record = Record::from_json(entry).ok_or_else(|| ScrutinyError::EntryNotObject {
                section: name.to_string(),
                index,
            })?;
            if let Some(field) = required.iter().find(|f| !record.contains(f)) {
                return Err(ScrutinyError::MissingRequiredField {
                    section: name.to_string(),
                    index,
                    field: field.to_string(),
                }
                .into());
            }
            records.push(record);
        }

        tracing::debug!(section = name, records = records.len(), "section ingested");
        parsed.insert(name.to_string(), records);
    }

    Ok(parsed)
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "list",
        serde_json::Value::Object(_) => "object",
    }
}
