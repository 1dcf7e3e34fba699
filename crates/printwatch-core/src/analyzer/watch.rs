//! Watch mode: context windows around changes to chosen fields.

use crate::diff::{DiffEngine, DiffEntry, FieldChange};
use crate::snapshot::Fields;
use std::collections::{BTreeMap, BTreeSet};

/// Which fields to watch and how many neighbours to show on each side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchQuery {
    pub fields: BTreeSet<String>,
    pub context: usize,
}

impl WatchQuery {
    pub const DEFAULT_CONTEXT: usize = 2;

    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            context: Self::DEFAULT_CONTEXT,
        }
    }

    pub fn with_context(mut self, context: usize) -> Self {
        self.context = context;
        self
    }
}

/// One entry inside a watch window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowEntry {
    pub index: usize,
    pub is_trigger: bool,
    /// Diff against the previous entry; `None` for the first entry of the log.
    pub changes: Option<DiffEntry>,
}

/// Entries `start..=end` around a change to a watched field at `trigger_index`.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchWindow {
    pub trigger_index: usize,
    pub start: usize,
    pub end: usize,
    /// Watched fields that changed at `trigger_index`.
    pub triggers: BTreeMap<String, FieldChange>,
    pub entries: Vec<WindowEntry>,
}

/// Lazy iterator over watch windows, in trigger order.
pub struct Watches<'a> {
    entries: &'a [Fields],
    engine: DiffEngine,
    query: WatchQuery,
    next: usize,
}

impl<'a> Watches<'a> {
    /// Watched fields are compared even if `engine` ignores them.
    pub(crate) fn new(entries: &'a [Fields], engine: &DiffEngine, query: WatchQuery) -> Self {
        Self {
            entries,
            engine: engine.unignoring(&query.fields),
            query,
            next: 1,
        }
    }

    fn window(&self, trigger_index: usize, triggers: BTreeMap<String, FieldChange>) -> WatchWindow {
        let start = trigger_index.saturating_sub(self.query.context);
        let end = trigger_index
            .saturating_add(self.query.context)
            .min(self.entries.len() - 1);

        let entries = (start..=end)
            .map(|index| WindowEntry {
                index,
                is_trigger: index == trigger_index,
                changes: (index > 0).then(|| {
                    self.engine
                        .diff_fields(&self.entries[index - 1], &self.entries[index])
                }),
            })
            .collect();

        WatchWindow {
            trigger_index,
            start,
            end,
            triggers,
            entries,
        }
    }
}

impl Iterator for Watches<'_> {
    type Item = WatchWindow;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.entries.len() {
            let i = self.next;
            self.next += 1;

            let diff = self
                .engine
                .diff_fields(&self.entries[i - 1], &self.entries[i]);
            let triggers: BTreeMap<String, FieldChange> = diff
                .changes
                .into_iter()
                .filter(|(key, _)| self.query.fields.contains(key))
                .collect();
            if !triggers.is_empty() {
                return Some(self.window(i, triggers));
            }
        }
        None
    }
}
