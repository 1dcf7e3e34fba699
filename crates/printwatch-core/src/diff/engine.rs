//! Field-level diff computation.
//!
//! The core entry point is [`DiffEngine::diff_fields`]. It never fails:
//! values that cannot be compared numerically are compared as JSON, and
//! anything unequal is reported.

use crate::diff::model::{DiffEntry, FieldChange, Tolerances};
use crate::snapshot::{Fields, Snapshot};
use serde_json::Value;
use std::collections::BTreeSet;

/// Field-level differ with per-field tolerances and an ignore set.
#[derive(Debug, Clone, Default)]
pub struct DiffEngine {
    tolerances: Tolerances,
    ignored: BTreeSet<String>,
}

impl DiffEngine {
    pub fn new(tolerances: Tolerances) -> Self {
        Self {
            tolerances,
            ignored: BTreeSet::new(),
        }
    }

    /// Exclude these fields from every comparison.
    pub fn with_ignored<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored.extend(fields.into_iter().map(Into::into));
        self
    }

    /// A copy of this engine that no longer ignores `fields`.
    pub fn unignoring<'a, I>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut engine = self.clone();
        for field in fields {
            engine.ignored.remove(field);
        }
        engine
    }

    pub fn tolerances(&self) -> &Tolerances {
        &self.tolerances
    }

    pub fn ignored(&self) -> &BTreeSet<String> {
        &self.ignored
    }

    pub fn is_ignored(&self, field: &str) -> bool {
        self.ignored.contains(field)
    }

    /// Diff two snapshots over their raw field maps.
    pub fn diff(&self, previous: &Snapshot, current: &Snapshot) -> DiffEntry {
        self.diff_fields(previous.fields(), current.fields())
    }

    /// Diff two raw field maps.
    pub fn diff_fields(&self, previous: &Fields, current: &Fields) -> DiffEntry {
        let keys: BTreeSet<&String> = previous.keys().chain(current.keys()).collect();
        let mut entry = DiffEntry::default();

        for key in keys {
            if self.ignored.contains(key) {
                continue;
            }
            let old = previous.get(key);
            let new = current.get(key);
            if self.is_changed(key, old, new) {
                entry.changes.insert(
                    key.clone(),
                    FieldChange {
                        old: old.cloned(),
                        new: new.cloned(),
                    },
                );
            }
        }

        entry
    }

    fn is_changed(&self, key: &str, old: Option<&Value>, new: Option<&Value>) -> bool {
        match (old, new) {
            (None, None) => false,
            (Some(a), Some(b)) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => match self.tolerances.get(key) {
                    Some(tolerance) => (y - x).abs() > tolerance,
                    None => a != b && numbers_differ(a, b, x, y),
                },
                _ => a != b,
            },
            _ => true,
        }
    }
}

/// Integers compare exactly; anything else by value, so `1` equals `1.0`.
fn numbers_differ(a: &Value, b: &Value, x: f64, y: f64) -> bool {
    if let (Some(p), Some(q)) = (a.as_i64(), b.as_i64()) {
        return p != q;
    }
    if let (Some(p), Some(q)) = (a.as_u64(), b.as_u64()) {
        return p != q;
    }
    x != y
}

/// Diff two snapshots with the given tolerances and nothing ignored.
pub fn compute_diff(previous: &Snapshot, current: &Snapshot, tolerances: &Tolerances) -> DiffEntry {
    DiffEngine::new(tolerances.clone()).diff(previous, current)
}
