//! Validated schema configuration.
//!
//! Built by the schema loader from YAML; consumed by the ingestion step, the
//! verification engine and the report assembler. Section order is the order
//! in which sections appear in the schema file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::comparators::SectionMetadata;
use crate::model::value::Value;
use crate::severity::SeverityThresholds;

/// Report colour theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// One requested visualization, e.g. `table` with variant `cplc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportType {
    #[serde(rename = "type")]
    pub kind: String,
    pub variant: Option<String>,
}

impl ReportType {
    pub fn new(kind: impl Into<String>, variant: Option<String>) -> Self {
        Self {
            kind: kind.into(),
            variant,
        }
    }
}

/// Declared shape of one record field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub dtype: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSettings {
    pub record_schema: BTreeMap<String, FieldDef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSettings {
    pub types: Option<Vec<ReportType>>,
    pub theme: Option<Theme>,
    pub doc: Option<String>,
    pub doc_text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentSettings {
    /// Lower-cased registry name.
    pub comparator: String,
    pub match_key: String,
    pub show_key: Option<String>,
    pub include_matches: bool,
    pub threshold_ratio: Option<Value>,
    pub threshold_count: Option<Value>,
}

impl ComponentSettings {
    pub fn thresholds(&self) -> SeverityThresholds {
        SeverityThresholds::new(self.threshold_ratio.clone(), self.threshold_count.clone())
    }
}

/// Fully merged configuration of one section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionConfig {
    pub name: String,
    pub data: DataSettings,
    pub report: ReportSettings,
    pub component: ComponentSettings,
    pub target: BTreeMap<String, Value>,
}

impl SectionConfig {
    /// Fields that every record must carry: the match key plus any field
    /// declared `required`.
    pub fn required_fields(&self) -> Vec<&str> {
        self.data
            .record_schema
            .iter()
            .filter(|(name, def)| def.required || **name == self.component.match_key)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Metadata handed to the comparator; `emit_matches` forces matches on.
    pub fn metadata(&self, emit_matches: bool) -> SectionMetadata {
        SectionMetadata {
            include_matches: self.component.include_matches || emit_matches,
            thresholds: self.component.thresholds(),
            options: self.target.clone(),
        }
    }
}

/// A loaded schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaConfig {
    pub version: String,
    pub title: Option<String>,
    /// Thresholds from `defaults.component`; apply to result sections the
    /// schema does not describe.
    pub default_thresholds: SeverityThresholds,
    pub sections: Vec<SectionConfig>,
}

impl SchemaConfig {
    pub fn section(&self, name: &str) -> Option<&SectionConfig> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn section_names(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name.as_str()).collect()
    }

    /// First section theme in schema order, else light.
    pub fn global_theme(&self) -> Theme {
        self.sections
            .iter()
            .find_map(|s| s.report.theme)
            .unwrap_or_default()
    }
}
