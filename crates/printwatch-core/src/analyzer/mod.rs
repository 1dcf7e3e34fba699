//! Offline analysis of recorded status logs.
//!
//! The analyzer is sequential and stateless. Both modes are lazy iterators
//! borrowing the loaded entries; calling [`LogDiffAnalyzer::diffs`] or
//! [`LogDiffAnalyzer::watch`] again restarts from the beginning.
//!
//! # Example
//!
//! ```
//! use printwatch_core::analyzer::{parse_log, LogDiffAnalyzer};
//!
//! let log = "{\"mc_percent\": 1}\n{\"mc_percent\": 1}\n{\"mc_percent\": 2}\n";
//! let entries = parse_log(log.as_bytes()).unwrap();
//! let analyzer = LogDiffAnalyzer::with_default_ignores(&entries);
//!
//! let changed: Vec<usize> = analyzer.diffs().map(|(i, _)| i).collect();
//! assert_eq!(changed, vec![2]);
//! ```

pub mod log;
pub mod watch;

pub use log::{load_log, parse_log, recorded_at, to_snapshots};
pub use watch::{WatchQuery, WatchWindow, Watches, WindowEntry};

use crate::diff::{DiffEngine, DiffEntry};
use crate::snapshot::Fields;

/// Fields that change on every report and are ignored unless asked for.
pub const DEFAULT_IGNORED: &[&str] = &["sequence_id"];

/// Diff and watch queries over one loaded log.
#[derive(Debug, Clone)]
pub struct LogDiffAnalyzer<'a> {
    entries: &'a [Fields],
    engine: DiffEngine,
}

impl<'a> LogDiffAnalyzer<'a> {
    pub fn new(entries: &'a [Fields], engine: DiffEngine) -> Self {
        Self { entries, engine }
    }

    /// Analyzer with no tolerances that ignores [`DEFAULT_IGNORED`].
    pub fn with_default_ignores(entries: &'a [Fields]) -> Self {
        Self::new(
            entries,
            DiffEngine::default().with_ignored(DEFAULT_IGNORED.iter().copied()),
        )
    }

    pub fn entries(&self) -> &'a [Fields] {
        self.entries
    }

    pub fn engine(&self) -> &DiffEngine {
        &self.engine
    }

    /// The first entry, against which the first diff is taken.
    pub fn baseline(&self) -> Option<&'a Fields> {
        self.entries.first()
    }

    /// Non-empty diffs between consecutive entries, keyed by the later index.
    pub fn diffs(&self) -> Diffs<'_> {
        Diffs {
            entries: self.entries,
            engine: &self.engine,
            next: 1,
        }
    }

    /// Context windows around every change to a watched field.
    pub fn watch(&self, query: WatchQuery) -> Watches<'a> {
        Watches::new(self.entries, &self.engine, query)
    }
}

/// Lazy iterator over consecutive-pair diffs.
pub struct Diffs<'a> {
    entries: &'a [Fields],
    engine: &'a DiffEngine,
    next: usize,
}

impl Iterator for Diffs<'_> {
    type Item = (usize, DiffEntry);

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.entries.len() {
            let i = self.next;
            self.next += 1;
            let diff = self
                .engine
                .diff_fields(&self.entries[i - 1], &self.entries[i]);
            if !diff.is_empty() {
                return Some((i, diff));
            }
        }
        None
    }
}
