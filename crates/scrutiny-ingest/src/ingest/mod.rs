//! Dump ingestion
//!
//! Parses a JSON capability dump into per-section record lists, validated
//! against a loaded schema.

pub mod parser;

pub use parser::{parse_document_file, parse_document_str, parse_document_value, Document};
