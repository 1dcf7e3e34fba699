//! Offline log analysis: diff mode and watch mode.

use crate::errors::Result;
use printwatch_core::analyzer::{load_log, LogDiffAnalyzer, WatchQuery, DEFAULT_IGNORED};
use printwatch_core::diff::{
    render_baseline, render_changes, render_watch_window, DiffEngine, Tolerances,
};
use printwatch_core::errors::ExError;
use printwatch_core::snapshot::Fields;
use printwatch_core::{log_op_end, log_op_error, log_op_start};
use std::collections::BTreeSet;
use std::fmt::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeRequest {
    pub log_path: PathBuf,
    /// `field:threshold` specs.
    pub tolerances: Vec<String>,
    /// Ignored in addition to the default ignore set.
    pub ignore: Vec<String>,
    /// Non-empty selects watch mode.
    pub watch: Vec<String>,
    pub context: usize,
}

impl AnalyzeRequest {
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
            tolerances: Vec::new(),
            ignore: Vec::new(),
            watch: Vec::new(),
            context: WatchQuery::DEFAULT_CONTEXT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzeMode {
    Diff,
    Watch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeResult {
    pub mode: AnalyzeMode,
    pub entry_count: usize,
    /// Changed entries in diff mode, windows in watch mode.
    pub match_count: usize,
    /// Human-readable report.
    pub report: String,
}

/// Load a log and run the requested analysis.
///
/// # Errors
///
/// - `ERR_INVALID_TOLERANCE` for a malformed `--tolerance`
/// - `ERR_IO` when the log cannot be opened
/// - `ERR_INVALID_RECORD` for a line that is not a JSON object
pub fn analyze_log(request: &AnalyzeRequest) -> Result<AnalyzeResult> {
    log_op_start!(
        "analyze_log",
        path = %request.log_path.display(),
        watch = !request.watch.is_empty()
    );
    let start = std::time::Instant::now();

    let result = analyze_log_impl(request).map_err(|e| {
        log_op_error!(
            "analyze_log",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "analyze_log",
        duration_ms = start.elapsed().as_millis() as u64,
        entry_count = result.entry_count,
        match_count = result.match_count
    );

    Ok(result)
}

fn analyze_log_impl(request: &AnalyzeRequest) -> Result<AnalyzeResult> {
    let tolerances = Tolerances::from_specs(&request.tolerances).map_err(ExError::from)?;
    let entries = load_log(&request.log_path).map_err(ExError::from)?;

    let ignored: BTreeSet<String> = DEFAULT_IGNORED
        .iter()
        .map(|s| s.to_string())
        .chain(request.ignore.iter().cloned())
        .collect();
    let engine = DiffEngine::new(tolerances).with_ignored(ignored);
    let analyzer = LogDiffAnalyzer::new(&entries, engine);

    let mode = if request.watch.is_empty() {
        AnalyzeMode::Diff
    } else {
        AnalyzeMode::Watch
    };

    let mut report = String::new();
    if entries.is_empty() {
        report.push_str("Log file is empty.\n");
        return Ok(AnalyzeResult {
            mode,
            entry_count: 0,
            match_count: 0,
            report,
        });
    }

    let match_count = match mode {
        AnalyzeMode::Diff => render_diff_mode(&analyzer, &mut report),
        AnalyzeMode::Watch => render_watch_mode(&analyzer, request, &entries, &mut report),
    };

    Ok(AnalyzeResult {
        mode,
        entry_count: entries.len(),
        match_count,
        report,
    })
}

fn render_diff_mode(analyzer: &LogDiffAnalyzer<'_>, out: &mut String) -> usize {
    let engine = analyzer.engine();
    let ignored: Vec<&str> = engine.ignored().iter().map(String::as_str).collect();
    let _ = writeln!(out, "[*] Analyzing in Diff Mode...");
    let _ = writeln!(out, "[*] Ignoring keys: {}", ignored.join(", "));
    if !engine.tolerances().is_empty() {
        let tolerances: Vec<String> = engine
            .tolerances()
            .iter()
            .map(|(field, t)| format!("{}:{}", field, t))
            .collect();
        let _ = writeln!(out, "[*] Applying tolerances: {}", tolerances.join(", "));
    }
    out.push('\n');

    if let Some(baseline) = analyzer.baseline() {
        let _ = writeln!(out, "--- Entry 1 (Baseline) ---");
        out.push_str(&render_baseline(baseline, |key| engine.is_ignored(key)));
    }

    let mut count = 0;
    for (index, diff) in analyzer.diffs() {
        let _ = writeln!(out, "\n--- Changes in Entry {} ---", index + 1);
        out.push_str(&render_changes(&diff));
        count += 1;
    }
    count
}

fn render_watch_mode(
    analyzer: &LogDiffAnalyzer<'_>,
    request: &AnalyzeRequest,
    entries: &[Fields],
    out: &mut String,
) -> usize {
    let query = WatchQuery::new(request.watch.iter().cloned()).with_context(request.context);
    let watched: Vec<&str> = query.fields.iter().map(String::as_str).collect();
    let _ = writeln!(out, "[*] Analyzing in Watch Mode...");
    let _ = writeln!(out, "[*] Watching keys: {}", watched.join(", "));
    let _ = writeln!(
        out,
        "[*] Context window: {} entries before and after\n",
        query.context
    );

    let engine = analyzer.engine().unignoring(&query.fields);
    let ignored = |key: &str| engine.is_ignored(key);

    let mut count = 0;
    for window in analyzer.watch(query.clone()) {
        out.push_str(&render_watch_window(&window, entries, &ignored));
        out.push('\n');
        count += 1;
    }
    if count == 0 {
        out.push_str("No changes found for the watched keys.\n");
    }
    count
}
