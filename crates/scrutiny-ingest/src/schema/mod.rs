//! Schema loading
//!
//! Provides:
//! - YAML helpers (defaults deep-merge, scalar text, value conversion)
//! - Section validation and normalization into `SchemaConfig`
//! - Guarded `report.doc` reading

pub mod doc;
pub mod loader;
pub mod yaml;

pub use loader::{
    load_schema_file, load_schema_file_with, load_schema_str, LoadOptions,
    SUPPORTED_SCHEMA_VERSIONS,
};
