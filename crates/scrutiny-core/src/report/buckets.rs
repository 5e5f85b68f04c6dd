//! Grouping of a section's diffs into display buckets.

use std::collections::BTreeMap;

use crate::model::diff::{Diff, DiffField};
use crate::model::result::Counts;
use crate::model::value::{Scalar, Value};
use crate::report::model::{Report, SectionReport};
use crate::severity::Severity;

/// Support state shown for boolean capability values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Supported,
    Unsupported,
    Unknown,
}

impl Badge {
    pub fn as_str(&self) -> &'static str {
        match self {
            Badge::Supported => "Supported",
            Badge::Unsupported => "Unsupported",
            Badge::Unknown => "Unknown",
        }
    }
}

pub fn bool_badge(value: &Value) -> Badge {
    if let Some(b) = value.as_bool() {
        return if b { Badge::Supported } else { Badge::Unsupported };
    }
    match value.display_string().trim().to_lowercase().as_str() {
        "true" | "yes" | "supported" => Badge::Supported,
        "false" | "no" | "unsupported" => Badge::Unsupported,
        _ => Badge::Unknown,
    }
}

/// One-line count summary of a section.
pub fn fast_summary(counts: &Counts) -> String {
    format!(
        "Compared {} items. Differences: {}. Missing on profile: {}. Extra on profile: {}.",
        counts.compared, counts.changed, counts.only_ref, counts.only_test
    )
}

/// Resolves a raw key through the label table.
pub fn display_key<'a>(key: &'a str, labels: &'a BTreeMap<String, String>) -> &'a str {
    labels.get(key).map(String::as_str).unwrap_or(key)
}

/// A removed/added group element, paired for display.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupChange {
    Changed { removed: Value, added: Value },
    Removed(Value),
    Added(Value),
}

/// Pairs removed and added elements positionally (first with first);
/// leftovers are reported alone.
pub fn pair_group_changes(removed: Vec<Value>, added: Vec<Value>) -> Vec<GroupChange> {
    let mut removed = removed.into_iter();
    let mut added = added.into_iter();
    let mut out = Vec::new();
    loop {
        match (removed.next(), added.next()) {
            (Some(r), Some(a)) => out.push(GroupChange::Changed {
                removed: r,
                added: a,
            }),
            (Some(r), None) => {
                out.push(GroupChange::Removed(r));
                out.extend(removed.by_ref().map(GroupChange::Removed));
            }
            (None, Some(a)) => {
                out.push(GroupChange::Added(a));
                out.extend(added.by_ref().map(GroupChange::Added));
            }
            (None, None) => break,
        }
    }
    out
}

/// Mapping entries whose value merely repeats the item label are dropped,
/// unless nothing would remain.
fn label_filtered<'a>(item: &'a Value, label: &str) -> Option<BTreeMap<&'a str, &'a Value>> {
    let Value::Mapping(map) = item else {
        return None;
    };
    let filtered: BTreeMap<&str, &Value> = map
        .iter()
        .filter(|(_, v)| v.display_string() != label)
        .map(|(k, v)| (k.as_str(), v))
        .collect();
    if filtered.is_empty() {
        Some(map.iter().map(|(k, v)| (k.as_str(), v)).collect())
    } else {
        Some(filtered)
    }
}

fn element_text(item: &Value, label: &str) -> String {
    match label_filtered(item, label) {
        None if item.is_null() => String::new(),
        None => item.display_string(),
        Some(entries) => entries
            .iter()
            .map(|(k, v)| format!("{} {}", k, v.display_string()))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

fn element_fields(reference: &Value, test: &Value, label: &str) -> String {
    let mut keys: Vec<&str> = label_filtered(reference, label)
        .into_iter()
        .chain(label_filtered(test, label))
        .flat_map(|m| m.into_keys())
        .collect();
    keys.sort_unstable();
    keys.dedup();
    if keys.is_empty() {
        "set".to_string()
    } else {
        keys.join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceRow {
    pub item: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoolRow {
    pub item: String,
    pub field: String,
    pub reference: Badge,
    pub test: Badge,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueRow {
    pub item: String,
    pub field: String,
    pub reference: String,
    pub test: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionBuckets {
    pub boolean_rows: Vec<BoolRow>,
    pub value_rows: Vec<ValueRow>,
    /// More than one distinct field among value rows.
    pub include_field_column: bool,
    pub missing_rows: Vec<PresenceRow>,
    pub extra_rows: Vec<PresenceRow>,
}

impl SectionBuckets {
    pub fn is_empty(&self) -> bool {
        self.boolean_rows.is_empty()
            && self.value_rows.is_empty()
            && self.missing_rows.is_empty()
            && self.extra_rows.is_empty()
    }
}

fn is_bool(value: &Value) -> bool {
    matches!(value, Value::Scalar(Scalar::Bool(_)))
}

/// Sorts a section's diffs into missing, extra, boolean and value rows.
pub fn extract_buckets(section: &SectionReport) -> SectionBuckets {
    let labels = &section.key_labels;
    let mut buckets = SectionBuckets::default();
    let mut groups: Vec<(&str, Vec<Value>, Vec<Value>)> = Vec::new();
    let mut group_index: BTreeMap<&str, usize> = BTreeMap::new();

    for diff in &section.diffs {
        let item = display_key(&diff.key, labels).to_string();
        match &diff.field {
            DiffField::Presence => push_presence(&mut buckets, item, diff),
            DiffField::Group => {
                let idx = *group_index.entry(diff.key.as_str()).or_insert_with(|| {
                    groups.push((diff.key.as_str(), Vec::new(), Vec::new()));
                    groups.len() - 1
                });
                let entry = &mut groups[idx];
                match (diff.reference.is_null(), diff.test.is_null()) {
                    (false, true) => entry.1.push(diff.reference.clone()),
                    (true, false) => entry.2.push(diff.test.clone()),
                    _ => {}
                }
            }
            DiffField::Named(field) => {
                if is_bool(&diff.reference) || is_bool(&diff.test) {
                    buckets.boolean_rows.push(BoolRow {
                        item,
                        field: field.clone(),
                        reference: bool_badge(&diff.reference),
                        test: bool_badge(&diff.test),
                    });
                } else {
                    buckets.value_rows.push(ValueRow {
                        item,
                        field: field.clone(),
                        reference: diff.reference.display_string(),
                        test: diff.test.display_string(),
                    });
                }
            }
        }
    }

    for (key, removed, added) in groups {
        let item = display_key(key, labels).to_string();
        for change in pair_group_changes(removed, added) {
            match change {
                GroupChange::Changed { removed, added } => buckets.value_rows.push(ValueRow {
                    item: item.clone(),
                    field: element_fields(&removed, &added, &item),
                    reference: element_text(&removed, &item),
                    test: element_text(&added, &item),
                }),
                GroupChange::Removed(v) => buckets.missing_rows.push(PresenceRow {
                    item: item.clone(),
                    detail: element_text(&v, &item),
                }),
                GroupChange::Added(v) => buckets.extra_rows.push(PresenceRow {
                    item: item.clone(),
                    detail: element_text(&v, &item),
                }),
            }
        }
    }

    let mut fields: Vec<&str> = buckets.value_rows.iter().map(|r| r.field.as_str()).collect();
    fields.sort_unstable();
    fields.dedup();
    buckets.include_field_column = fields.len() > 1;

    buckets.boolean_rows.sort_by(|a, b| a.item.cmp(&b.item));
    if buckets.include_field_column {
        buckets
            .value_rows
            .sort_by(|a, b| (&a.item, &a.field).cmp(&(&b.item, &b.field)));
    } else {
        buckets.value_rows.sort_by(|a, b| a.item.cmp(&b.item));
    }
    buckets.missing_rows.sort_by(|a, b| a.item.cmp(&b.item));
    buckets.extra_rows.sort_by(|a, b| a.item.cmp(&b.item));
    buckets
}

fn push_presence(buckets: &mut SectionBuckets, item: String, diff: &Diff) {
    match (diff.reference.as_bool(), diff.test.as_bool()) {
        (Some(true), Some(false)) => buckets.missing_rows.push(PresenceRow {
            item,
            detail: "present in reference only".to_string(),
        }),
        (Some(false), Some(true)) => buckets.extra_rows.push(PresenceRow {
            item,
            detail: "present in profile only".to_string(),
        }),
        _ => {}
    }
}

/// Sections in schema order with every non-`MATCH` section moved ahead of
/// the matching ones; relative order within each group is kept.
pub fn sections_issues_first(report: &Report) -> Vec<(&str, &SectionReport)> {
    let (mut issues, matches): (Vec<_>, Vec<_>) = report
        .ordered_sections()
        .into_iter()
        .partition(|(_, sec)| sec.result != Severity::Match);
    issues.extend(matches);
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pair_group_changes_fifo() {
        let pairs = pair_group_changes(
            vec![Value::int(1), Value::int(2), Value::int(3)],
            vec![Value::int(9)],
        );
        assert_eq!(
            pairs,
            vec![
                GroupChange::Changed {
                    removed: Value::int(1),
                    added: Value::int(9),
                },
                GroupChange::Removed(Value::int(2)),
                GroupChange::Removed(Value::int(3)),
            ]
        );

        let added_only = pair_group_changes(vec![], vec![Value::int(4), Value::int(5)]);
        assert_eq!(
            added_only,
            vec![GroupChange::Added(Value::int(4)), GroupChange::Added(Value::int(5))]
        );
    }

    #[test]
    fn test_interleaved_group_diffs_pair_within_their_key() {
        let section = SectionReport {
            result: Severity::Suspicious,
            stats: Counts::default(),
            stats_display: Counts::default(),
            key_labels: BTreeMap::new(),
            diffs: vec![
                Diff::group_removed("b", Value::int(3)),
                Diff::group_removed("a", Value::int(1)),
                Diff::group_added("b", Value::int(2)),
                Diff::group_added("a", Value::int(9)),
            ],
            matches: Vec::new(),
            chart_rows: Vec::new(),
            radar_rows: Vec::new(),
            report: crate::report::model::ReportConfig::default(),
            source_rows: None,
        };

        let rows: Vec<(String, String, String)> = extract_buckets(&section)
            .value_rows
            .into_iter()
            .map(|r| (r.item, r.reference, r.test))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("a".to_string(), "1".to_string(), "9".to_string()),
                ("b".to_string(), "3".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_bool_badge() {
        assert_eq!(bool_badge(&Value::bool(true)), Badge::Supported);
        assert_eq!(bool_badge(&Value::str(" No ")), Badge::Unsupported);
        assert_eq!(bool_badge(&Value::str("supported")), Badge::Supported);
        assert_eq!(bool_badge(&Value::Null), Badge::Unknown);
        assert_eq!(bool_badge(&Value::int(1)), Badge::Unknown);
    }

    #[test]
    fn test_fast_summary() {
        let counts = Counts {
            compared: 10,
            changed: 2,
            matched: 5,
            only_ref: 1,
            only_test: 2,
        };
        assert_eq!(
            fast_summary(&counts),
            "Compared 10 items. Differences: 2. Missing on profile: 1. Extra on profile: 2."
        );
    }

    #[test]
    fn test_element_text_drops_label_echo() {
        let item = Value::from(json!({"key": "AES", "value": 128}));
        assert_eq!(element_text(&item, "AES"), "value 128");
        assert_eq!(element_text(&item, "other"), "key AES, value 128");
        assert_eq!(element_text(&Value::int(5), "x"), "5");
        assert_eq!(element_fields(&Value::int(1), &Value::int(2), "x"), "set");
        assert_eq!(element_fields(&item, &Value::Null, "AES"), "value");
    }
}
