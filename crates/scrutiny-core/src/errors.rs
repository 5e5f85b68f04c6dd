use thiserror::Error;

/// Result type alias using the canonical error facility
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every fatal failure in the comparison pipeline maps onto one of these
/// kinds. Each kind carries a stable `ERR_*` code that tests and callers can
/// match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Structural/Validation
    InvalidInput,

    // Schema
    SchemaInvalid,
    UnsupportedSchemaVersion,
    /// A `report.doc` reference escaped the schema directory, had the wrong
    /// extension or exceeded the size cap
    DocRejected,

    // Registry
    ComparatorNotFound,
    InvalidComparatorName,

    // Integration/IO
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::SchemaInvalid => "ERR_SCHEMA_INVALID",
            ExErrorKind::UnsupportedSchemaVersion => "ERR_UNSUPPORTED_SCHEMA_VERSION",
            ExErrorKind::DocRejected => "ERR_DOC_REJECTED",
            ExErrorKind::ComparatorNotFound => "ERR_COMPARATOR_NOT_FOUND",
            ExErrorKind::InvalidComparatorName => "ERR_INVALID_COMPARATOR_NAME",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Classification fields for programmatic handling plus the section and
/// operation that were active when the failure happened.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    section: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            section: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add section context
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the section context, if any
    pub fn section(&self) -> Option<&str> {
        self.section.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if let Some(section) = &self.section {
            write!(f, " (section: {})", section)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(source) = &self.source {
            write!(f, " <- {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for scrutiny operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScrutinyError {
    // ===== Registry =====
    /// Comparator registered under an empty or whitespace-only name
    #[error("Comparator name must be non-empty")]
    EmptyComparatorName,

    /// Neither the requested comparator nor the basic fallback is registered
    #[error("Comparator '{name}' not found and no 'basic' fallback is registered")]
    FallbackUnavailable { section: String, name: String },

    // ===== Schema =====
    /// `schema_version` missing or not one of the supported versions
    #[error("Unsupported or missing schema_version '{version}'. Supported: {supported:?}")]
    UnsupportedSchemaVersion {
        version: String,
        supported: Vec<String>,
    },

    /// Document-level schema problem
    #[error("Invalid schema: {reason}")]
    SchemaInvalid { reason: String },

    /// Section-level schema problem
    #[error("Section '{section}': {reason}")]
    SectionInvalid { section: String, reason: String },

    /// Section `report.doc` reference rejected
    #[error("Section '{section}': {reason}")]
    DocRejected { section: String, reason: String },

    // ===== Ingestion =====
    /// Document lacks a section the schema declares
    #[error("Missing section: '{section}'")]
    MissingSection { section: String },

    /// Section payload is not a list
    #[error("Section '{section}' must be a list, got {found}")]
    SectionNotList { section: String, found: String },

    /// List entry is not an object
    #[error("Entry #{index} in '{section}' is not an object")]
    EntryNotObject { section: String, index: usize },

    /// Required field absent from an entry
    #[error("Entry #{index} in '{section}' missing required field '{field}'")]
    MissingRequiredField {
        section: String,
        index: usize,
        field: String,
    },

    // ===== IO / serialization =====
    /// File could not be read or written
    #[error("{path}: {reason}")]
    Io { path: String, reason: String },

    /// Payload could not be (de)serialized
    #[error("{reason}")]
    Serialization { reason: String },
}

impl From<ScrutinyError> for ExError {
    fn from(err: ScrutinyError) -> Self {
        let message = err.to_string();
        match err {
            ScrutinyError::EmptyComparatorName => ExError::new(ExErrorKind::InvalidComparatorName)
                .with_op("register_comparator")
                .with_message(message),

            ScrutinyError::FallbackUnavailable { section, .. } => {
                ExError::new(ExErrorKind::ComparatorNotFound)
                    .with_op("resolve_comparator")
                    .with_section(section)
                    .with_message(message)
            }

            ScrutinyError::UnsupportedSchemaVersion { .. } => {
                ExError::new(ExErrorKind::UnsupportedSchemaVersion)
                    .with_op("load_schema")
                    .with_message(message)
            }

            ScrutinyError::SchemaInvalid { .. } => ExError::new(ExErrorKind::SchemaInvalid)
                .with_op("load_schema")
                .with_message(message),

            ScrutinyError::SectionInvalid { section, .. } => {
                ExError::new(ExErrorKind::SchemaInvalid)
                    .with_op("load_schema")
                    .with_section(section)
                    .with_message(message)
            }

            ScrutinyError::DocRejected { section, .. } => ExError::new(ExErrorKind::DocRejected)
                .with_op("load_schema")
                .with_section(section)
                .with_message(message),

            ScrutinyError::MissingSection { section }
            | ScrutinyError::SectionNotList { section, .. }
            | ScrutinyError::EntryNotObject { section, .. }
            | ScrutinyError::MissingRequiredField { section, .. } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_op("ingest")
                    .with_section(section)
                    .with_message(message)
            }

            ScrutinyError::Io { .. } => ExError::new(ExErrorKind::Io).with_message(message),

            ScrutinyError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}
