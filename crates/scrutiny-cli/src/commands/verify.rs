//! Verify command
//!
//! Usage: scrutiny verify -s <SCHEMA> -r <REFERENCE> -p <PROFILE> [-o <FILE>]

use clap::{Args, ValueEnum};
use std::path::PathBuf;

use scrutiny_core::logging_facility::{init, Profile};
use scrutiny_core::report::SectionReport;
use scrutiny_core::ComparatorRegistry;
use scrutiny_engine::commands::engine_command::{
    apply_engine_command, EngineCommand, EngineCommandResult,
};
use scrutiny_engine::commands::verify::{VerifyOptions, VerifyRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// Path to the YAML schema
    #[arg(short, long)]
    pub schema: PathBuf,

    /// Path to the reference JSON dump
    #[arg(short, long)]
    pub reference: PathBuf,

    /// Path to the profile JSON dump under test
    #[arg(short, long)]
    pub profile: PathBuf,

    /// Output report path
    #[arg(short, long, default_value = "verification.json")]
    pub output_file: PathBuf,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Record matches for every section
    #[arg(long)]
    pub emit_matches: bool,

    /// Print up to N diffs per section (0 to disable)
    #[arg(long, value_name = "N", default_value_t = 3)]
    pub print_diffs: usize,

    /// Print up to N matches per section
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub print_matches: usize,

    /// Log output format on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Display name of the reference side
    #[arg(long)]
    pub reference_name: Option<String>,

    /// Display name of the profile side
    #[arg(long)]
    pub profile_name: Option<String>,

    /// Treat recoverable schema problems as errors
    #[arg(long)]
    pub strict: bool,
}

/// Execute verify command
pub fn execute(args: VerifyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let profile = match args.log_format {
        LogFormat::Text => Profile::Development,
        LogFormat::Json => Profile::Production,
    };
    init(profile, args.verbose);

    let request = VerifyRequest {
        schema_path: args.schema,
        reference_path: args.reference,
        profile_path: args.profile,
        reference_name: args.reference_name,
        profile_name: args.profile_name,
        options: VerifyOptions {
            emit_matches: args.emit_matches,
            strict_schema: args.strict,
        },
    };

    let registry = ComparatorRegistry::with_builtins();
    let result = match apply_engine_command(EngineCommand::Verify(request), &registry)? {
        EngineCommandResult::Verified(result) => result,
        EngineCommandResult::Summary(_) => return Err("unexpected engine result".into()),
    };

    for (name, section) in result.report.ordered_sections() {
        print_section(name, section, args.print_diffs, args.print_matches);
    }

    let json = serde_json::to_string_pretty(&result.report)?;
    std::fs::write(&args.output_file, json)?;

    println!("✓ Report written to {}", args.output_file.display());
    println!("Overall: {}", result.report.overall);
    println!("Digest: {}", result.digest);

    Ok(())
}

fn print_section(name: &str, section: &SectionReport, max_diffs: usize, max_matches: usize) {
    println!(
        "  • {}: diffs {}/{} [{}]",
        name, section.stats.changed, section.stats.compared, section.result
    );
    for diff in section.diffs.iter().take(max_diffs) {
        println!(
            "       - {}.{}: {} {} {}",
            diff.key,
            diff.field.as_str(),
            diff.reference.display_string(),
            diff.op.as_str(),
            diff.test.display_string()
        );
    }
    for m in section.matches.iter().take(max_matches) {
        println!(
            "       = {}.{}: {}",
            m.key,
            m.field.as_str(),
            m.value.display_string()
        );
    }
}
