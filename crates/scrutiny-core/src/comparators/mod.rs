//! Pluggable per-section comparison strategies.
//!
//! A comparator turns the reference and profile record lists of one section
//! into diffs, matches and counts. Implementations are pure: they never
//! mutate their inputs and never fail on malformed optional fields.

pub mod basic;
pub mod field_normalized;
mod index;
pub mod performance;
pub mod registry;

use std::collections::BTreeMap;

use crate::model::record::Record;
use crate::model::result::CompareResult;
use crate::model::value::Value;
use crate::normalize::{parse_boolish, parse_number};
use crate::severity::SeverityThresholds;

pub use basic::BasicComparator;
pub use field_normalized::FieldNormalizedComparator;
pub use performance::PerformanceComparator;
pub use registry::{ComparatorRegistry, ResolvedComparator};

/// Per-section settings handed to a comparator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionMetadata {
    /// Emit a `Match` entry for every field that compared equal.
    pub include_matches: bool,
    /// The section's resolved thresholds, for comparators that grade rows
    /// themselves. Section severity is computed by the assembler from the
    /// schema, overlaid with `CompareResult::severity`.
    pub thresholds: SeverityThresholds,
    /// Comparator-specific options from the section `target` block.
    pub options: BTreeMap<String, Value>,
}

impl SectionMetadata {
    pub fn option(&self, name: &str) -> Option<&Value> {
        self.options.get(name).filter(|v| !v.is_null())
    }

    pub fn option_str(&self, name: &str) -> Option<&str> {
        self.option(name).and_then(Value::as_str)
    }

    pub fn option_bool(&self, name: &str) -> Option<bool> {
        self.option(name).and_then(parse_boolish)
    }

    pub fn option_f64(&self, name: &str) -> Option<f64> {
        self.option(name).and_then(parse_number)
    }

    /// A list option given either as a sequence of strings or a comma
    /// separated string.
    pub fn option_list(&self, name: &str) -> Option<Vec<String>> {
        match self.option(name)? {
            Value::Sequence(items) => Some(
                items
                    .iter()
                    .filter(|v| !v.is_null())
                    .map(Value::display_string)
                    .collect(),
            ),
            other => Some(
                other
                    .display_string()
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
        }
    }
}

/// Everything a comparator needs for one section.
#[derive(Debug, Clone, Copy)]
pub struct CompareContext<'a> {
    pub section: &'a str,
    /// Identity field of a record within the section.
    pub key_field: &'a str,
    /// Field supplying the human label; defaults to the key.
    pub show_field: Option<&'a str>,
    pub metadata: &'a SectionMetadata,
    pub reference: &'a [Record],
    pub tested: &'a [Record],
}

/// A comparison strategy.
pub trait Comparator: Send + Sync {
    fn compare(&self, ctx: &CompareContext<'_>) -> CompareResult;
}
