//! Summary command
//!
//! Usage: scrutiny summary <REPORT> [--output <FILE>]

use clap::Args;
use std::path::PathBuf;

use scrutiny_core::ComparatorRegistry;
use scrutiny_engine::commands::engine_command::{
    apply_engine_command, EngineCommand, EngineCommandResult,
};

#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// Report JSON written by `verify`
    pub report: PathBuf,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute summary command
pub fn execute(args: SummaryArgs) -> Result<(), Box<dyn std::error::Error>> {
    let command = EngineCommand::Summarize {
        report_path: args.report,
    };
    let markdown = match apply_engine_command(command, &ComparatorRegistry::new())? {
        EngineCommandResult::Summary(text) => text,
        EngineCommandResult::Verified(_) => return Err("unexpected engine result".into()),
    };

    if let Some(output_path) = args.output {
        std::fs::write(&output_path, markdown)?;
        println!("✓ Summary written to {}", output_path.display());
    } else {
        print!("{}", markdown);
    }

    Ok(())
}
