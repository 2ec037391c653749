//! Validator - accumulates per-field error messages across a validation pass.
//!
//! A validator carries no knowledge of any entity. Rule sets (see
//! [`crate::movie::validate_movie`]) call [`Validator::check`] once per
//! constraint; every check runs, so one pass reports every violated rule.
//!
//! ## Example
//!
//! ```
//! use movies_api::validator::{self, Validator};
//!
//! let mut v = Validator::new();
//! v.check(!"".is_empty(), "title", "must be provided");
//! v.check(validator::unique(&["drama", "war"]), "genres", "must not contain duplicate values");
//!
//! assert!(!v.is_valid());
//! assert_eq!(v.errors().get("title").map(String::as_str), Some("must be provided"));
//! ```

use std::collections::{BTreeMap, HashSet};
use std::hash::Hash;

/// Field name to human-readable message.
pub type ValidationErrors = BTreeMap<String, String>;

/// Error accumulator for one validation pass.
#[derive(Debug, Default, Clone)]
pub struct Validator {
    errors: ValidationErrors,
}

impl Validator {
    /// Create a validator with an empty error set.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no check has failed.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Read-only view of the failed fields.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Consume the validator, handing the error set to the caller.
    pub fn into_errors(self) -> ValidationErrors {
        self.errors
    }

    /// Record `message` for `field` unless the field already has one.
    pub fn add_error(&mut self, field: &str, message: &str) {
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    /// Record `message` for `field` when `ok` is false.
    pub fn check(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.add_error(field, message);
        }
    }
}

/// True if no two elements of `values` are equal.
pub fn unique<T: Eq + Hash>(values: &[T]) -> bool {
    let mut seen = HashSet::with_capacity(values.len());
    values.iter().all(|v| seen.insert(v))
}
