//! Diff output types.
//!
//! Collections use `BTreeMap` so that rendering and serialization are
//! deterministic.

use crate::errors::{PrintwatchError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Old/new values for one changed field.
///
/// `None` on either side means the field was not present there.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldChange {
    pub old: Option<Value>,
    pub new: Option<Value>,
}

impl FieldChange {
    /// The same change seen from the other direction.
    pub fn reversed(&self) -> Self {
        Self {
            old: self.new.clone(),
            new: self.old.clone(),
        }
    }
}

/// Fields that changed between two snapshots, filtered by tolerance.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DiffEntry {
    pub changes: BTreeMap<String, FieldChange>,
}

impl DiffEntry {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.changes.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&FieldChange> {
        self.changes.get(field)
    }

    /// Changed field names in sorted order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.changes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldChange)> {
        self.changes.iter()
    }
}

/// Per-field numeric tolerances.
///
/// A field with a tolerance is only reported when both sides are numeric
/// and differ by strictly more than the tolerance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tolerances(BTreeMap<String, f64>);

impl Tolerances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a list of `field:threshold` specs.
    ///
    /// # Errors
    ///
    /// `InvalidTolerance` for the first spec that does not parse.
    pub fn from_specs<I, S>(specs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tolerances = Self::new();
        for spec in specs {
            let (field, threshold) = parse_tolerance(spec.as_ref())?;
            tolerances.insert(field, threshold);
        }
        Ok(tolerances)
    }

    pub fn insert(&mut self, field: impl Into<String>, threshold: f64) {
        self.0.insert(field.into(), threshold);
    }

    pub fn get(&self, field: &str) -> Option<f64> {
        self.0.get(field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &f64)> {
        self.0.iter()
    }
}

/// Parse one `field:threshold` spec.
///
/// # Errors
///
/// `InvalidTolerance` when the separator is missing, the field is empty, or
/// the threshold is not a finite non-negative number.
pub fn parse_tolerance(spec: &str) -> Result<(String, f64)> {
    let invalid = |reason: &str| PrintwatchError::InvalidTolerance {
        spec: spec.to_string(),
        reason: reason.to_string(),
    };

    let (field, value) = spec
        .split_once(':')
        .ok_or_else(|| invalid("expected FIELD:VALUE"))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(invalid("field name is empty"));
    }
    let threshold: f64 = value
        .trim()
        .parse()
        .map_err(|_| invalid("threshold is not a number"))?;
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(invalid("threshold must be a finite non-negative number"));
    }
    Ok((field.to_string(), threshold))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tolerance() {
        assert_eq!(
            parse_tolerance("bed_temper:1.0").unwrap(),
            ("bed_temper".to_string(), 1.0)
        );
        assert_eq!(
            parse_tolerance(" nozzle_temper : 2 ").unwrap(),
            ("nozzle_temper".to_string(), 2.0)
        );
    }

    #[test]
    fn test_parse_tolerance_rejects_garbage() {
        for spec in ["bed_temper", ":1.0", "bed_temper:warm", "bed_temper:-1", "x:NaN"] {
            let err = parse_tolerance(spec).unwrap_err();
            assert!(
                matches!(err, PrintwatchError::InvalidTolerance { .. }),
                "{spec} should be rejected"
            );
        }
    }

    #[test]
    fn test_from_specs_last_wins() {
        let t = Tolerances::from_specs(["a:1", "b:2", "a:3"]).unwrap();
        assert_eq!(t.get("a"), Some(3.0));
        assert_eq!(t.get("b"), Some(2.0));
        assert_eq!(t.get("c"), None);
    }
}
