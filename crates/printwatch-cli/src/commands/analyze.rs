//! Analyze command
//!
//! Usage: printwatch analyze <LOG> [--tolerance FIELD:VALUE]... [--ignore FIELD]...
//!        [--watch FIELD]... [--context N]

use clap::Args;
use printwatch_engine::commands::{analyze_log, AnalyzeRequest};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// JSON Lines log, one status report per line
    pub logfile: PathBuf,

    /// Numeric tolerance as FIELD:VALUE (repeatable)
    #[arg(short, long, value_name = "FIELD:VALUE")]
    pub tolerance: Vec<String>,

    /// Field to leave out of every diff (repeatable; sequence_id always is)
    #[arg(short, long, value_name = "FIELD")]
    pub ignore: Vec<String>,

    /// Field to watch; switches to watch mode (repeatable)
    #[arg(short, long, value_name = "FIELD")]
    pub watch: Vec<String>,

    /// Entries to show before and after each watched change
    #[arg(short, long, default_value_t = 2)]
    pub context: usize,
}

/// Execute analyze command
pub fn execute(args: AnalyzeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let request = AnalyzeRequest {
        log_path: args.logfile,
        tolerances: args.tolerance,
        ignore: args.ignore,
        watch: args.watch,
        context: args.context,
    };

    let result = analyze_log(&request)?;
    print!("{}", result.report);

    Ok(())
}
