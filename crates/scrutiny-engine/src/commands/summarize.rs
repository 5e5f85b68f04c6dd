//! Markdown summary of a previously written report.

use std::fs;
use std::path::Path;
use std::time::Instant;

use scrutiny_core::{render_summary, Report};
use scrutiny_ingest::errors::{io_error, parse_error, Result};

/// Read a report JSON file.
///
/// # Errors
///
/// `ERR_IO` when the file cannot be read, `ERR_SERIALIZATION` when it is not
/// a report.
pub fn read_report(path: &Path) -> Result<Report> {
    let content = fs::read_to_string(path).map_err(|e| io_error("read_report", path, e))?;
    serde_json::from_str(&content).map_err(|e| parse_error("read_report", e))
}

/// Render the Markdown summary of the report at `path`.
///
/// # Errors
///
/// As [`read_report`].
pub fn summarize_report(path: &Path) -> Result<String> {
    let start = Instant::now();
    scrutiny_core::log_op_start!("summarize");

    match read_report(path) {
        Ok(report) => {
            let summary = render_summary(&report);
            scrutiny_core::log_op_end!(
                "summarize",
                duration_ms = start.elapsed().as_millis() as u64,
                section_count = report.sections.len()
            );
            Ok(summary)
        }
        Err(e) => {
            let duration_ms = start.elapsed().as_millis() as u64;
            scrutiny_core::log_op_error!("summarize", e.clone(), duration_ms = duration_ms);
            Err(e)
        }
    }
}
