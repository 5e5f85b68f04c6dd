//! Per-section comparator output.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::diff::{Diff, Match};
use crate::model::value::Value;
use crate::severity::SeverityThresholds;

/// Canonical comparison counts for one section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub compared: u64,
    pub changed: u64,
    pub matched: u64,
    pub only_ref: u64,
    pub only_test: u64,
}

impl Counts {
    /// `compared` equals the sum of the four outcome buckets.
    pub fn is_consistent(&self) -> bool {
        self.compared == self.changed + self.matched + self.only_ref + self.only_test
    }
}

/// Outcome of one performance row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartStatus {
    Missing,
    Extra,
    ErrorMismatch,
    Error,
    DataError,
    Skipped,
    Mismatch,
    Match,
}

/// Chart-ready row emitted by the performance comparator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRow {
    pub key: String,
    pub ref_avg: Option<f64>,
    pub test_avg: Option<f64>,
    pub delta_ms: Option<f64>,
    pub delta_pct: Option<f64>,
    pub status: ChartStatus,
    pub note: String,
}

/// Comparator-specific extras.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Artifacts {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chart_rows: Vec<ChartRow>,
}

/// Output of one `Comparator::compare` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompareResult {
    pub section: String,
    /// Comparator-supplied counts; reconciled from diffs/matches when absent.
    pub counts: Option<Counts>,
    pub labels: BTreeMap<String, String>,
    pub diffs: Vec<Diff>,
    /// `None` unless matches were requested for the section.
    pub matches: Option<Vec<Match>>,
    pub artifacts: Artifacts,
    /// Highest-precedence severity thresholds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<SeverityThresholds>,
    /// Report display fields merged over the schema report block.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub display: BTreeMap<String, Value>,
}

impl CompareResult {
    pub fn new(section: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            ..Self::default()
        }
    }

    pub fn matches(&self) -> &[Match] {
        self.matches.as_deref().unwrap_or_default()
    }
}
