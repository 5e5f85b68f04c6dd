//! Error handling for scrutiny-ingest
//!
//! Wraps scrutiny-core ExError with loader and parser helpers

use scrutiny_core::errors::{ExError, ExErrorKind, ScrutinyError};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a document-level schema error
pub fn schema_invalid(reason: impl Into<String>) -> ExError {
    ScrutinyError::SchemaInvalid {
        reason: reason.into(),
    }
    .into()
}

/// Create a section-level schema error
pub fn section_invalid(section: &str, reason: impl Into<String>) -> ExError {
    ScrutinyError::SectionInvalid {
        section: section.to_string(),
        reason: reason.into(),
    }
    .into()
}

/// Create a rejected `report.doc` error
pub fn doc_rejected(section: &str, reason: impl Into<String>) -> ExError {
    ScrutinyError::DocRejected {
        section: section.to_string(),
        reason: reason.into(),
    }
    .into()
}

/// Create an ingestion error for a malformed document root
pub fn document_invalid(reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("ingest")
        .with_message(reason.into())
}

/// Create a YAML/JSON syntax error
pub fn parse_error(operation: &str, reason: impl std::fmt::Display) -> ExError {
    ExError::from(ScrutinyError::Serialization {
        reason: reason.to_string(),
    })
    .with_op(operation)
}

/// Create an IO error
pub fn io_error(operation: &str, path: &std::path::Path, err: std::io::Error) -> ExError {
    ExError::from(ScrutinyError::Io {
        path: path.display().to_string(),
        reason: err.to_string(),
    })
    .with_op(operation)
}
