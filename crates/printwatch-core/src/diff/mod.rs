//! Snapshot diff engine.
//!
//! Compares two snapshots field by field and reports what changed, subject
//! to per-field numeric tolerances. Used by the offline log analyzer and
//! available to live consumers that want to show "what moved".
//!
//! ## Entry point
//!
//! ```
//! use printwatch_core::diff::{DiffEngine, Tolerances};
//! use printwatch_core::snapshot::Fields;
//! use serde_json::json;
//!
//! let tolerances = Tolerances::from_specs(["bed_temper:1.0"]).unwrap();
//! let engine = DiffEngine::new(tolerances);
//! let mut a = Fields::new();
//! let mut b = Fields::new();
//! a.insert("bed_temper".into(), json!(59.4));
//! b.insert("bed_temper".into(), json!(60.1));
//! assert!(engine.diff_fields(&a, &b).is_empty());
//! ```
//!
//! ## Guarantees
//!
//! - **Symmetry**: `diff(a, b)` and `diff(b, a)` name the same fields.
//! - **Total**: never fails; incomparable values are reported as changed.
//! - **Determinism**: output is ordered by field name.

pub mod engine;
pub mod human_summary;
pub mod model;

pub use engine::{compute_diff, DiffEngine};
pub use human_summary::{format_value, render_baseline, render_changes, render_watch_window};
pub use model::{parse_tolerance, DiffEntry, FieldChange, Tolerances};
