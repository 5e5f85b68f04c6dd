//! End-to-end verification of a profile dump against a reference dump.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use scrutiny_core::report::SourceRows;
use scrutiny_core::{
    assemble_report, report_digest, AssembleRequest, CompareContext, CompareResult,
    ComparatorRegistry, Record, Report, SchemaConfig, SectionConfig,
};
use scrutiny_ingest::errors::Result;
use scrutiny_ingest::{load_schema_file_with, parse_document_file, Document, LoadOptions};

pub const DEFAULT_REFERENCE_NAME: &str = "reference";
pub const DEFAULT_PROFILE_NAME: &str = "profile";

/// Switches for a verification run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerifyOptions {
    /// Record matches for every section regardless of `include_matches`.
    pub emit_matches: bool,
    /// Load the schema in strict mode.
    pub strict_schema: bool,
}

/// Inputs of [`run_verification`].
#[derive(Debug, Clone)]
pub struct VerifyRequest {
    pub schema_path: PathBuf,
    pub reference_path: PathBuf,
    pub profile_path: PathBuf,
    /// Display name of the reference side; defaults to `reference`.
    pub reference_name: Option<String>,
    /// Display name of the profile side; defaults to `profile`.
    pub profile_name: Option<String>,
    pub options: VerifyOptions,
}

impl VerifyRequest {
    pub fn new(
        schema_path: impl Into<PathBuf>,
        reference_path: impl Into<PathBuf>,
        profile_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            schema_path: schema_path.into(),
            reference_path: reference_path.into(),
            profile_path: profile_path.into(),
            reference_name: None,
            profile_name: None,
            options: VerifyOptions::default(),
        }
    }
}

/// Outcome of a verification run.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationResult {
    pub report: Report,
    /// SHA-256 of the report's canonical JSON.
    pub digest: String,
}

/// Run one verification: load, ingest, compare every section and assemble.
///
/// Sections are processed in schema order. Unknown comparator names fall
/// back to `basic` with a warning.
///
/// # Errors
///
/// Propagates loader and ingestion errors, `ERR_COMPARATOR_NOT_FOUND` when
/// the registry lacks the `basic` fallback, and `ERR_SERIALIZATION` if the
/// report cannot be digested.
pub fn run_verification(
    request: &VerifyRequest,
    registry: &ComparatorRegistry,
) -> Result<VerificationResult> {
    let start = Instant::now();
    let schema_path = request.schema_path.display().to_string();
    scrutiny_core::log_op_start!("verify", schema = schema_path.as_str());

    let outcome = verify(request, registry).and_then(|report| {
        let digest = report_digest(&report)?;
        Ok(VerificationResult { report, digest })
    });

    let duration_ms = start.elapsed().as_millis() as u64;
    match outcome {
        Ok(result) => {
            scrutiny_core::log_op_end!(
                "verify",
                duration_ms = duration_ms,
                section_count = result.report.sections.len(),
                severity = result.report.overall.as_str()
            );
            Ok(result)
        }
        Err(e) => {
            scrutiny_core::log_op_error!("verify", e.clone(), duration_ms = duration_ms);
            Err(e)
        }
    }
}

fn verify(request: &VerifyRequest, registry: &ComparatorRegistry) -> Result<Report> {
    let load_options = LoadOptions {
        strict: request.options.strict_schema,
    };
    let schema = load_schema_file_with(&request.schema_path, &load_options)?;
    let reference = ingest(&request.reference_path, &schema, DEFAULT_REFERENCE_NAME)?;
    let profile = ingest(&request.profile_path, &schema, DEFAULT_PROFILE_NAME)?;

    let mut results = Vec::with_capacity(schema.sections.len());
    let mut source_rows = BTreeMap::new();
    for section in &schema.sections {
        let reference_rows = rows(&reference, &section.name);
        let profile_rows = rows(&profile, &section.name);

        results.push(compare_section(
            section,
            registry,
            request.options.emit_matches,
            reference_rows,
            profile_rows,
        )?);
        source_rows.insert(
            section.name.clone(),
            SourceRows {
                reference: reference_rows.to_vec(),
                tested: profile_rows.to_vec(),
            },
        );
    }

    Ok(assemble_report(&AssembleRequest {
        schema: &schema,
        results: &results,
        reference_name: request
            .reference_name
            .as_deref()
            .unwrap_or(DEFAULT_REFERENCE_NAME),
        profile_name: request
            .profile_name
            .as_deref()
            .unwrap_or(DEFAULT_PROFILE_NAME),
        source_rows: Some(&source_rows),
    }))
}

fn ingest(path: &Path, schema: &SchemaConfig, side: &str) -> Result<Document> {
    let doc = parse_document_file(path, schema)?;
    tracing::info!(side = side, path = %path.display(), sections = doc.len(), "dump loaded");
    Ok(doc)
}

fn rows<'a>(doc: &'a Document, section: &str) -> &'a [Record] {
    doc.get(section).map(Vec::as_slice).unwrap_or_default()
}

/// Compare one section with its resolved comparator.
///
/// # Errors
///
/// `ERR_COMPARATOR_NOT_FOUND` when neither the configured comparator nor
/// `basic` is registered.
pub fn compare_section(
    section: &SectionConfig,
    registry: &ComparatorRegistry,
    emit_matches: bool,
    reference: &[Record],
    tested: &[Record],
) -> Result<CompareResult> {
    let resolved = registry.resolve(&section.name, &section.component.comparator)?;
    let metadata = section.metadata(emit_matches);

    let result = resolved.comparator.compare(&CompareContext {
        section: &section.name,
        key_field: &section.component.match_key,
        show_field: section.component.show_key.as_deref(),
        metadata: &metadata,
        reference,
        tested,
    });

    let counts = result.counts.unwrap_or_default();
    tracing::debug!(
        section = section.name.as_str(),
        comparator = resolved.name.as_str(),
        compared = counts.compared,
        changed = counts.changed,
        "section compared"
    );
    Ok(result)
}
