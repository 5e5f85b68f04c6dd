//! Radar-plot normalization of a section's values.
//!
//! Pairs come from performance chart rows when present, otherwise from the
//! diffs and matches. Boolean pairs score 0 or 1; numeric pairs are divided
//! by the largest numeric raw value of the section.

use std::collections::BTreeSet;

use crate::model::diff::{Diff, Match};
use crate::model::result::ChartRow;
use crate::model::value::Value;
use crate::normalize::{parse_boolish, parse_number};
use crate::report::model::{RadarKind, RadarRow};

#[derive(Debug, Clone, PartialEq)]
struct RawPair {
    key: String,
    ref_raw: Option<f64>,
    test_raw: Option<f64>,
    kind: RadarKind,
}

fn pairs_from_chart(rows: &[ChartRow]) -> Vec<RawPair> {
    rows.iter()
        .filter(|r| r.ref_avg.is_some() || r.test_avg.is_some())
        .map(|r| RawPair {
            key: r.key.clone(),
            ref_raw: r.ref_avg,
            test_raw: r.test_avg,
            kind: RadarKind::Numeric,
        })
        .collect()
}

/// Bool when every non-null side is boolish, else numeric when any side
/// parses as a number, else unusable.
fn classify(key: &str, reference: &Value, test: &Value) -> Option<RawPair> {
    let sides = [reference, test];
    let present: Vec<&Value> = sides.iter().copied().filter(|v| !v.is_null()).collect();
    if present.is_empty() {
        return None;
    }

    if present.iter().all(|v| parse_boolish(v).is_some()) {
        let as_raw = |v: &Value| parse_boolish(v).map(|b| if b { 1.0 } else { 0.0 });
        return Some(RawPair {
            key: key.to_string(),
            ref_raw: as_raw(reference),
            test_raw: as_raw(test),
            kind: RadarKind::Bool,
        });
    }

    let ref_raw = parse_number(reference);
    let test_raw = parse_number(test);
    if ref_raw.is_none() && test_raw.is_none() {
        return None;
    }
    Some(RawPair {
        key: key.to_string(),
        ref_raw,
        test_raw,
        kind: RadarKind::Numeric,
    })
}

/// First diff of a key supplies both sides; a match only fills keys with no diff.
fn pairs_from_rows(diffs: &[Diff], matches: &[Match]) -> Vec<RawPair> {
    let mut keys: BTreeSet<&str> = BTreeSet::new();
    let mut seen: Vec<(&str, &Value, &Value)> = Vec::new();
    for d in diffs {
        if keys.insert(d.key.as_str()) {
            seen.push((d.key.as_str(), &d.reference, &d.test));
        }
    }
    for m in matches {
        if keys.insert(m.key.as_str()) {
            seen.push((m.key.as_str(), &m.value, &m.value));
        }
    }
    seen.into_iter()
        .filter_map(|(key, r, t)| classify(key, r, t))
        .collect()
}

fn normalize(pairs: Vec<RawPair>) -> Vec<RadarRow> {
    let max = pairs
        .iter()
        .filter(|p| p.kind == RadarKind::Numeric)
        .flat_map(|p| [p.ref_raw, p.test_raw])
        .flatten()
        .fold(0.0_f64, f64::max);
    let scale = if max <= 0.0 { 1.0 } else { max };

    let score = |kind: RadarKind, raw: Option<f64>| {
        let raw = raw.unwrap_or(0.0);
        match kind {
            RadarKind::Bool => {
                if raw >= 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
            RadarKind::Numeric => (raw / scale).clamp(0.0, 1.0),
        }
    };

    pairs
        .into_iter()
        .map(|p| RadarRow {
            ref_score: score(p.kind, p.ref_raw),
            test_score: score(p.kind, p.test_raw),
            key: p.key,
            ref_raw: p.ref_raw,
            test_raw: p.test_raw,
            kind: p.kind,
        })
        .collect()
}

/// Radar rows for one section.
pub fn radar_rows(chart_rows: &[ChartRow], diffs: &[Diff], matches: &[Match]) -> Vec<RadarRow> {
    let mut pairs = pairs_from_chart(chart_rows);
    if pairs.is_empty() {
        pairs = pairs_from_rows(diffs, matches);
    }
    normalize(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::diff::DiffField;
    use crate::model::result::ChartStatus;

    fn chart(key: &str, r: Option<f64>, t: Option<f64>) -> ChartRow {
        ChartRow {
            key: key.to_string(),
            ref_avg: r,
            test_avg: t,
            delta_ms: None,
            delta_pct: None,
            status: ChartStatus::Match,
            note: String::new(),
        }
    }

    fn scores(rows: &[RadarRow]) -> Vec<(f64, f64)> {
        rows.iter().map(|r| (r.ref_score, r.test_score)).collect()
    }

    #[test]
    fn test_numeric_pairs_share_one_scale() {
        let diffs = vec![
            Diff::changed("a", "v", Value::int(10), Value::int(20)),
            Diff::changed("b", "v", Value::int(5), Value::int(0)),
        ];
        let rows = radar_rows(&[], &diffs, &[]);
        assert_eq!(scores(&rows), vec![(0.5, 1.0), (0.25, 0.0)]);
        assert!(rows.iter().all(|r| r.kind == RadarKind::Numeric));
    }

    #[test]
    fn test_chart_rows_take_priority() {
        let charts = vec![chart("x", Some(4.0), Some(8.0)), chart("gone", None, None)];
        let diffs = vec![Diff::changed("a", "v", Value::int(100), Value::int(1))];
        let rows = radar_rows(&charts, &diffs, &[]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key, "x");
        assert_eq!(scores(&rows), vec![(0.5, 1.0)]);
    }

    #[test]
    fn test_boolish_pairs_and_presence() {
        let diffs = vec![
            Diff::only_in_reference("p"),
            Diff::changed("s", "supported", Value::str("yes"), Value::str("no")),
        ];
        let rows = radar_rows(&[], &diffs, &[]);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.kind == RadarKind::Bool));
        assert_eq!(scores(&rows), vec![(1.0, 0.0), (1.0, 0.0)]);
    }

    #[test]
    fn test_first_diff_wins_and_matches_fill_gaps() {
        let diffs = vec![
            Diff::changed("a", "v", Value::int(2), Value::int(4)),
            Diff::changed("a", "w", Value::int(100), Value::int(100)),
        ];
        let matches = vec![
            Match::new("a", DiffField::named("x"), Value::int(50)),
            Match::new("b", DiffField::named("x"), Value::int(2)),
        ];
        let rows = radar_rows(&[], &diffs, &matches);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].ref_raw, Some(2.0));
        assert_eq!(rows[1].key, "b");
        assert_eq!(scores(&rows), vec![(0.5, 1.0), (0.5, 0.5)]);
    }

    #[test]
    fn test_many_keys_keep_diff_order() {
        let diffs: Vec<Diff> = (0..500)
            .flat_map(|i| {
                let key = format!("k{i:03}");
                [
                    Diff::changed(key.as_str(), "v", Value::int(i), Value::int(i + 1)),
                    Diff::changed(key.as_str(), "w", Value::int(0), Value::int(0)),
                ]
            })
            .collect();
        let rows = radar_rows(&[], &diffs, &[]);
        assert_eq!(rows.len(), 500);
        assert_eq!(rows[0].key, "k000");
        assert_eq!(rows[499].ref_raw, Some(499.0));
        assert_eq!(rows[499].test_score, 1.0);
    }

    #[test]
    fn test_unparseable_and_group_items_dropped() {
        let diffs = vec![
            Diff::changed("a", "v", Value::str("x"), Value::str("y")),
            Diff::group_removed("g", Value::Sequence(vec![Value::int(1)])),
        ];
        assert!(radar_rows(&[], &diffs, &[]).is_empty());
    }

    #[test]
    fn test_non_positive_max_uses_unit_scale() {
        let diffs = vec![Diff::changed("a", "v", Value::int(-3), Value::int(0))];
        let rows = radar_rows(&[], &diffs, &[]);
        assert_eq!(scores(&rows), vec![(0.0, 0.0)]);
    }
}
