//! scrutiny core: comparison and report assembly for capability dumps
//!
//! This crate provides the pipeline that turns a reference and a profile
//! dump into a severity-scored report:
//! - Closed value/record model decided at the ingestion boundary
//! - Pluggable per-section comparators behind a string-keyed registry
//! - Severity classification and count reconciliation
//! - Report assembly with radar normalization and dashboard counts
//! - Markdown summary rendering and a deterministic report digest
//!
//! Schema loading and JSON ingestion live in `scrutiny-ingest`; the
//! end-to-end run lives in `scrutiny-engine`.

#![allow(clippy::result_large_err)]

pub use scrutiny_core_types as core_types;

#[doc(hidden)]
pub use tracing as __tracing;

pub mod comparators;
pub mod config;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod normalize;
pub mod report;
pub mod severity;
pub mod stats;

// Re-export commonly used types
pub use comparators::{
    CompareContext, Comparator, ComparatorRegistry, ResolvedComparator, SectionMetadata,
};
pub use config::{SchemaConfig, SectionConfig, Theme};
pub use errors::{ExError, ExErrorKind, Result, ScrutinyError};
pub use model::{CompareResult, Counts, Diff, DiffField, Match, Op, Record, Value};
pub use report::{assemble_report, render_summary, report_digest, AssembleRequest, Report};
pub use severity::{compute_severity, Severity, SeverityThresholds};
pub use stats::{reconcile, tally_stats};
