//! Scrutiny CLI
//!
//! Command-line interface for comparing capability dumps

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "scrutiny")]
#[command(about = "Scrutiny - YAML-driven verification of capability dumps", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compare a profile dump against a reference dump
    Verify(commands::verify::VerifyArgs),
    /// Render a Markdown summary of a verification report
    Summary(commands::summary::SummaryArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Verify(args) => commands::verify::execute(args),
        Commands::Summary(args) => commands::summary::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
