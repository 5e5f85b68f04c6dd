//! Report document types.
//!
//! The serialized form of [`Report`] is the interchange document written by
//! `scrutiny verify`. Maps are `BTreeMap`s so serialization is deterministic.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::{ReportType, Theme};
use crate::model::diff::{Diff, Match};
use crate::model::record::Record;
use crate::model::result::{ChartRow, Counts};
use crate::model::value::Value;
use crate::severity::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RadarKind {
    Bool,
    Numeric,
}

/// One axis of a section's radar plot, scores in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarRow {
    pub key: String,
    pub ref_score: f64,
    pub test_score: f64,
    pub ref_raw: Option<f64>,
    pub test_raw: Option<f64>,
    pub kind: RadarKind,
}

/// Display configuration of one section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    pub types: Vec<ReportType>,
    pub theme: Theme,
    pub doc: Option<String>,
    pub doc_text: Option<String>,
    /// Comparator-provided display fields.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Raw input rows of a section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceRows {
    pub reference: Vec<Record>,
    pub tested: Vec<Record>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionReport {
    pub result: Severity,
    pub stats: Counts,
    pub stats_display: Counts,
    pub key_labels: BTreeMap<String, String>,
    pub diffs: Vec<Diff>,
    pub matches: Vec<Match>,
    pub chart_rows: Vec<ChartRow>,
    pub radar_rows: Vec<RadarRow>,
    pub report: ReportConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_rows: Option<SourceRows>,
}

impl SectionReport {
    /// Display label of a raw key, falling back to the key itself.
    pub fn display_key<'a>(&'a self, key: &'a str) -> &'a str {
        self.key_labels.get(key).map(String::as_str).unwrap_or(key)
    }
}

/// Sections per severity state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCounts {
    #[serde(rename = "MATCH")]
    pub matched: u64,
    #[serde(rename = "WARN")]
    pub warn: u64,
    #[serde(rename = "SUSPICIOUS")]
    pub suspicious: u64,
    #[serde(rename = "TOTAL")]
    pub total: u64,
}

impl StateCounts {
    pub fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Match => self.matched += 1,
            Severity::Warn => self.warn += 1,
            Severity::Suspicious => self.suspicious += 1,
        }
        self.total += 1;
    }

    pub fn one_hot(severity: Severity) -> Self {
        let mut counts = Self::default();
        counts.record(severity);
        counts
    }

    pub fn get(&self, severity: Severity) -> u64 {
        match severity {
            Severity::Match => self.matched,
            Severity::Warn => self.warn,
            Severity::Suspicious => self.suspicious,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub overall_state_counts: StateCounts,
    pub by_section: BTreeMap<String, StateCounts>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportMeta {
    pub generated_by: String,
    pub schema_title: Option<String>,
    /// Section names in schema order.
    #[serde(default)]
    pub section_order: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub reference_name: String,
    pub profile_name: String,
    pub theme: Theme,
    pub overall: Severity,
    pub sections: BTreeMap<String, SectionReport>,
    pub dashboard: Dashboard,
    pub meta: ReportMeta,
}

impl Report {
    /// Sections in schema order; sections missing from the recorded order
    /// follow alphabetically.
    pub fn ordered_sections(&self) -> Vec<(&str, &SectionReport)> {
        let mut out: Vec<(&str, &SectionReport)> = self
            .meta
            .section_order
            .iter()
            .filter_map(|name| self.sections.get_key_value(name.as_str()))
            .map(|(name, sec)| (name.as_str(), sec))
            .collect();
        for (name, sec) in &self.sections {
            if !self.meta.section_order.iter().any(|n| n == name) {
                out.push((name.as_str(), sec));
            }
        }
        out
    }
}
