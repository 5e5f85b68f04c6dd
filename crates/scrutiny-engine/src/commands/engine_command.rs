//! Engine-level commands for file-backed operations.

use std::path::PathBuf;

use scrutiny_core::ComparatorRegistry;
use scrutiny_ingest::errors::Result;

use crate::commands::summarize::summarize_report;
use crate::commands::verify::{run_verification, VerificationResult, VerifyRequest};

/// Engine-level commands that read or write files.
#[derive(Debug, Clone)]
pub enum EngineCommand {
    /// Compare a profile dump against a reference dump.
    Verify(VerifyRequest),
    /// Render the Markdown summary of a written report.
    Summarize { report_path: PathBuf },
}

/// Result of applying an engine command.
#[derive(Debug, Clone)]
pub enum EngineCommandResult {
    Verified(Box<VerificationResult>),
    Summary(String),
}

/// Apply an engine command against a populated registry.
///
/// # Errors
///
/// Propagates the errors of the underlying command.
pub fn apply_engine_command(
    cmd: EngineCommand,
    registry: &ComparatorRegistry,
) -> Result<EngineCommandResult> {
    match cmd {
        EngineCommand::Verify(request) => {
            let result = run_verification(&request, registry)?;
            Ok(EngineCommandResult::Verified(Box::new(result)))
        }
        EngineCommand::Summarize { report_path } => {
            Ok(EngineCommandResult::Summary(summarize_report(&report_path)?))
        }
    }
}
