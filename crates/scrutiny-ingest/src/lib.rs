//! Scrutiny Ingest - schema loading and dump ingestion
//!
//! Provides:
//! - YAML schema loader with defaults merging and validation
//! - Guarded reading of per-section documentation files
//! - JSON dump parser validating sections against the loaded schema

#![allow(clippy::result_large_err)]

pub mod errors;
pub mod ingest;
pub mod schema;

// Re-export key types
pub use errors::Result;
pub use ingest::{parse_document_file, parse_document_str, parse_document_value, Document};
pub use schema::{load_schema_file, load_schema_file_with, load_schema_str, LoadOptions};
