//! Unified report assembly and rendering.

pub mod assembler;
pub mod buckets;
pub mod digest;
pub mod model;
pub mod radar;
pub mod summary;

pub use assembler::{assemble_report, AssembleRequest};
pub use digest::{report_digest, to_canonical_json};
pub use model::{
    Dashboard, RadarKind, RadarRow, Report, ReportConfig, ReportMeta, SectionReport, SourceRows,
    StateCounts,
};
pub use summary::render_summary;
