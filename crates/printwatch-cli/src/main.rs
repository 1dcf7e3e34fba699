//! printwatch CLI
//!
//! Command-line interface for offline analysis and replay of printer
//! status logs

use clap::{Parser, Subcommand};
use printwatch_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "printwatch")]
#[command(about = "printwatch - 3D printer status stream analysis", long_about = None)]
struct Cli {
    /// Write debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Diff consecutive log entries, or watch fields for changes
    Analyze(commands::analyze::AnalyzeArgs),
    /// Run a log through the live tracker and print the events
    Replay(commands::replay::ReplayArgs),
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    if cli.verbose {
        init(Profile::Development);
    }

    let result = match cli.command {
        Commands::Analyze(args) => commands::analyze::execute(args),
        Commands::Replay(args) => commands::replay::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
