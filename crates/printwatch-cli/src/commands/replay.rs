//! Replay command
//!
//! Usage: printwatch replay <LOG> [--config FILE] [--json]

use clap::Args;
use printwatch_core::snapshot::format_remaining;
use printwatch_core::{Event, EventContext};
use printwatch_engine::commands::replay_log;
use printwatch_engine::load_settings;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// JSON Lines log, one status report per line
    pub logfile: PathBuf,

    /// TOML settings file (PRINTWATCH_* variables override it)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print each event as a JSON object
    #[arg(long)]
    pub json: bool,
}

/// Execute replay command
pub fn execute(args: ReplayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let settings = load_settings(args.config.as_deref())?;
    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(replay_log(&args.logfile, &settings))?;

    for event in &result.events {
        if args.json {
            println!("{}", serde_json::to_string(event)?);
        } else {
            println!("{}", describe(event));
        }
    }
    if !args.json {
        println!(
            "Replayed {} snapshots, {} events",
            result.snapshot_count,
            result.events.len()
        );
    }

    Ok(())
}

fn describe(event: &Event) -> String {
    let mut line = format!(
        "{} {}",
        event.timestamp.format("%Y-%m-%d %H:%M:%S"),
        event.kind
    );
    match event.context {
        EventContext::Percentage(p) => line.push_str(&format!(" {}%", p)),
        EventContext::Layer(l) => line.push_str(&format!(" layer {}", l)),
        EventContext::None => {}
    }
    line.push_str(&format!(" [{}]", event.snapshot.print_name()));
    if let Some(minutes) = event.snapshot.remaining_minutes().filter(|m| *m > 0) {
        line.push_str(&format!(", {} remaining", format_remaining(minutes)));
    }
    line
}
