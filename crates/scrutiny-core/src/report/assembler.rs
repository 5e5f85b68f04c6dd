//! Merges per-section comparator output with schema configuration into one
//! [`Report`].

use std::collections::BTreeMap;

use crate::config::{SchemaConfig, SectionConfig, Theme};
use crate::model::result::CompareResult;
use crate::model::value::Value;
use crate::report::model::{
    Dashboard, Report, ReportConfig, ReportMeta, SectionReport, SourceRows, StateCounts,
};
use crate::report::radar::radar_rows;
use crate::severity::{compute_severity, Severity, SeverityThresholds};
use crate::stats::reconcile;

pub const GENERATED_BY: &str = "assemble_report";

/// Inputs of [`assemble_report`].
#[derive(Debug, Clone, Copy)]
pub struct AssembleRequest<'a> {
    pub schema: &'a SchemaConfig,
    /// Comparator results in the order sections should be reported.
    pub results: &'a [CompareResult],
    pub reference_name: &'a str,
    pub profile_name: &'a str,
    /// Raw rows per section, copied into the report when present.
    pub source_rows: Option<&'a BTreeMap<String, SourceRows>>,
}

/// Thresholds in precedence order: schema defaults, then the section's
/// component block, then the comparator's own override.
///
/// Loaded sections already carry the defaults merged into their component
/// block, so an explicit `null` there stays cleared.
fn resolve_thresholds(
    schema: &SchemaConfig,
    section: Option<&SectionConfig>,
    result: &CompareResult,
) -> SeverityThresholds {
    let base = match section {
        Some(sec) => sec.component.thresholds(),
        None => schema.default_thresholds.clone(),
    };
    match &result.severity {
        Some(over) => base.overlay(over),
        None => base,
    }
}

/// Schema report block with comparator display fields on top. `types` and
/// `doc_text` always come from the schema.
fn report_config(
    section: Option<&SectionConfig>,
    display: &BTreeMap<String, Value>,
    global_theme: Theme,
) -> ReportConfig {
    let mut cfg = ReportConfig {
        theme: global_theme,
        ..ReportConfig::default()
    };
    if let Some(report) = section.map(|s| &s.report) {
        cfg.types = report.types.clone().unwrap_or_default();
        cfg.theme = report.theme.unwrap_or(global_theme);
        cfg.doc = report.doc.clone();
        cfg.doc_text = report.doc_text.clone().filter(|t| !t.is_empty());
    }

    for (key, value) in display {
        match key.as_str() {
            "types" | "doc_text" => {}
            "theme" => {
                if let Some(theme) = value.as_str().and_then(Theme::parse) {
                    cfg.theme = theme;
                }
            }
            "doc" => cfg.doc = value.as_str().map(str::to_string),
            _ => {
                cfg.extra.insert(key.clone(), value.clone());
            }
        }
    }
    cfg
}

fn assemble_section(
    req: &AssembleRequest<'_>,
    result: &CompareResult,
    global_theme: Theme,
) -> SectionReport {
    let name = result.section.as_str();
    let schema_section = req.schema.section(name);
    let matches = result.matches().to_vec();

    let stats = reconcile(result.counts.as_ref(), &result.diffs, &matches);
    let thresholds = resolve_thresholds(req.schema, schema_section, result);
    let severity = compute_severity(&thresholds, stats.changed, stats.compared);

    tracing::debug!(
        section = name,
        severity = severity.as_str(),
        compared = stats.compared,
        changed = stats.changed,
        "section assembled"
    );

    let chart_rows = result.artifacts.chart_rows.clone();
    let radar = radar_rows(&chart_rows, &result.diffs, &matches);

    SectionReport {
        result: severity,
        stats,
        stats_display: stats,
        key_labels: result.labels.clone(),
        diffs: result.diffs.clone(),
        matches,
        chart_rows,
        radar_rows: radar,
        report: report_config(schema_section, &result.display, global_theme),
        source_rows: req.source_rows.and_then(|rows| rows.get(name)).cloned(),
    }
}

/// Builds the unified report.
///
/// Pure: identical requests produce identical reports.
pub fn assemble_report(req: &AssembleRequest<'_>) -> Report {
    let theme = req.schema.global_theme();

    let mut sections = BTreeMap::new();
    let mut section_order: Vec<String> = Vec::new();
    for result in req.results {
        let section = assemble_section(req, result, theme);
        if !section_order.contains(&result.section) {
            section_order.push(result.section.clone());
        }
        sections.insert(result.section.clone(), section);
    }

    let mut overall = Severity::Match;
    let mut dashboard = Dashboard::default();
    for (name, section) in &sections {
        overall = overall.max(section.result);
        dashboard.overall_state_counts.record(section.result);
        dashboard
            .by_section
            .insert(name.clone(), StateCounts::one_hot(section.result));
    }

    Report {
        reference_name: req.reference_name.to_string(),
        profile_name: req.profile_name.to_string(),
        theme,
        overall,
        sections,
        dashboard,
        meta: ReportMeta {
            generated_by: GENERATED_BY.to_string(),
            schema_title: req.schema.title.clone(),
            section_order,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ComponentSettings, ReportSettings, ReportType};
    use crate::model::diff::Diff;
    use crate::model::result::Counts;

    fn schema_section(name: &str, ratio: Option<f64>, count: Option<i64>) -> SectionConfig {
        SectionConfig {
            name: name.to_string(),
            component: ComponentSettings {
                comparator: "basic".to_string(),
                match_key: "name".to_string(),
                threshold_ratio: ratio.map(Value::float),
                threshold_count: count.map(Value::int),
                ..ComponentSettings::default()
            },
            ..SectionConfig::default()
        }
    }

    fn changed_result(section: &str, changed: u64, compared: u64) -> CompareResult {
        let mut result = CompareResult::new(section);
        result.counts = Some(Counts {
            compared,
            changed,
            matched: compared - changed,
            only_ref: 0,
            only_test: 0,
        });
        result.diffs = (0..changed)
            .map(|i| Diff::changed(format!("k{i}"), "v", Value::int(1), Value::int(2)))
            .collect();
        result
    }

    fn assemble(schema: &SchemaConfig, results: &[CompareResult]) -> Report {
        assemble_report(&AssembleRequest {
            schema,
            results,
            reference_name: "ref",
            profile_name: "prof",
            source_rows: None,
        })
    }

    #[test]
    fn test_threshold_precedence() {
        let schema = SchemaConfig {
            default_thresholds: SeverityThresholds::count(100),
            sections: vec![schema_section("A", Some(0.5), None)],
            ..SchemaConfig::default()
        };

        let plain = assemble(&schema, &[changed_result("A", 3, 10)]);
        assert_eq!(plain.sections["A"].result, Severity::Warn);

        let mut overridden = changed_result("A", 3, 10);
        overridden.severity = Some(SeverityThresholds::ratio(0.25));
        let report = assemble(&schema, &[overridden]);
        assert_eq!(report.sections["A"].result, Severity::Suspicious);

        let unknown = assemble(&schema, &[changed_result("Z", 3, 10)]);
        assert_eq!(unknown.sections["Z"].result, Severity::Warn);
    }

    #[test]
    fn test_dashboard_and_overall() {
        let schema = SchemaConfig {
            sections: vec![
                schema_section("A", None, Some(1)),
                schema_section("B", None, None),
                schema_section("C", None, None),
            ],
            ..SchemaConfig::default()
        };
        let report = assemble(
            &schema,
            &[
                changed_result("A", 2, 4),
                changed_result("B", 1, 4),
                changed_result("C", 0, 4),
            ],
        );

        assert_eq!(report.overall, Severity::Suspicious);
        let counts = report.dashboard.overall_state_counts;
        assert_eq!(
            (counts.matched, counts.warn, counts.suspicious, counts.total),
            (1, 1, 1, 3)
        );
        assert_eq!(report.dashboard.by_section["B"], StateCounts::one_hot(Severity::Warn));
        assert_eq!(report.meta.section_order, vec!["A", "B", "C"]);
        assert_eq!(report.meta.generated_by, GENERATED_BY);
    }

    #[test]
    fn test_empty_section_is_match() {
        let schema = SchemaConfig::default();
        let report = assemble(&schema, &[CompareResult::new("E")]);
        let section = &report.sections["E"];
        assert_eq!(section.result, Severity::Match);
        assert_eq!(section.stats, Counts::default());
        assert!(section.radar_rows.is_empty());
    }

    #[test]
    fn test_missing_stats_are_reconciled() {
        let mut result = CompareResult::new("A");
        result.diffs = vec![Diff::only_in_profile("x"), Diff::changed("y", "v", Value::int(1), Value::int(2))];
        let report = assemble(&SchemaConfig::default(), &[result]);
        let stats = report.sections["A"].stats;
        assert_eq!((stats.only_test, stats.changed, stats.compared), (1, 1, 2));
        assert_eq!(report.sections["A"].stats_display, stats);
    }

    #[test]
    fn test_report_config_merge() {
        let mut section = schema_section("A", None, None);
        section.report = ReportSettings {
            types: Some(vec![ReportType::new("table", None)]),
            theme: None,
            doc: Some("a.md".to_string()),
            doc_text: Some("About A".to_string()),
        };
        let mut dark = schema_section("B", None, None);
        dark.report.theme = Some(Theme::Dark);
        let schema = SchemaConfig {
            sections: vec![section, dark],
            ..SchemaConfig::default()
        };

        let mut result = CompareResult::new("A");
        result.display.insert("types".to_string(), Value::str("radar"));
        result.display.insert("doc_text".to_string(), Value::str("ignored"));
        result.display.insert("caption".to_string(), Value::str("Timing"));

        let report = assemble(&schema, &[result]);
        let cfg = &report.sections["A"].report;
        assert_eq!(cfg.types, vec![ReportType::new("table", None)]);
        assert_eq!(cfg.doc_text.as_deref(), Some("About A"));
        assert_eq!(cfg.theme, Theme::Dark);
        assert_eq!(cfg.extra.get("caption"), Some(&Value::str("Timing")));
        assert_eq!(report.theme, Theme::Dark);
    }

    #[test]
    fn test_source_rows_pass_through() {
        let mut rows = BTreeMap::new();
        rows.insert("A".to_string(), SourceRows::default());
        let schema = SchemaConfig::default();
        let results = [CompareResult::new("A"), CompareResult::new("B")];
        let report = assemble_report(&AssembleRequest {
            schema: &schema,
            results: &results,
            reference_name: "ref",
            profile_name: "prof",
            source_rows: Some(&rows),
        });
        assert!(report.sections["A"].source_rows.is_some());
        assert!(report.sections["B"].source_rows.is_none());
    }
}
