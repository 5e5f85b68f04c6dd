//! Algorithm timing comparator.
//!
//! Rows carry `avg_ms`, `min_ms`, `max_ms` and `error`. A timing change only
//! counts when it exceeds both the reference run's own spread and a relative
//! tolerance; very fast and known-noisy operations are exempt.

use crate::comparators::index::{pair_rows, Pairing, Tally};
use crate::comparators::{CompareContext, Comparator, SectionMetadata};
use crate::model::diff::{Diff, DiffField, Match, Op};
use crate::model::record::Record;
use crate::model::result::{Artifacts, ChartRow, ChartStatus, CompareResult};
use crate::model::value::Value;
use crate::normalize::parse_number;

const FIELD_AVG: &str = "avg_ms";
const FIELD_MIN: &str = "min_ms";
const FIELD_MAX: &str = "max_ms";
const FIELD_ERROR: &str = "error";
const FIELD_AVG_SKIPPED: &str = "avg_ms (skipped)";

const DEFAULT_FAST_PATH_MS: f64 = 2.0;
const DEFAULT_LOW_STAKES_MS: f64 = 10.0;
const DEFAULT_RELATIVE_TOLERANCE: f64 = 0.2;
const DEFAULT_NOISY_MARKER: &str = "clearkey()";

#[derive(Debug, Clone, Copy, Default)]
pub struct PerformanceComparator;

/// Thresholds in effect for one section.
#[derive(Debug, Clone, PartialEq)]
struct Tuning {
    /// Both averages at or below this are not compared at all.
    fast_path_ms: f64,
    /// Both averages at or below this waive significance.
    low_stakes_ms: f64,
    relative_tolerance: f64,
    /// Lower-cased key fragments that waive significance.
    noisy_markers: Vec<String>,
}

impl Tuning {
    fn from_metadata(metadata: &SectionMetadata) -> Self {
        Self {
            fast_path_ms: metadata
                .option_f64("fast_path_ms")
                .unwrap_or(DEFAULT_FAST_PATH_MS),
            low_stakes_ms: metadata
                .option_f64("low_stakes_ms")
                .unwrap_or(DEFAULT_LOW_STAKES_MS),
            relative_tolerance: metadata
                .option_f64("relative_tolerance")
                .unwrap_or(DEFAULT_RELATIVE_TOLERANCE),
            noisy_markers: metadata
                .option_list("noisy_markers")
                .unwrap_or_else(|| vec![DEFAULT_NOISY_MARKER.to_string()])
                .into_iter()
                .map(|m| m.to_lowercase())
                .collect(),
        }
    }

    fn is_noisy(&self, key: &str) -> bool {
        let key = key.to_lowercase();
        self.noisy_markers.iter().any(|m| key.contains(m.as_str()))
    }
}

fn chart_row(
    key: &str,
    status: ChartStatus,
    ref_avg: Option<f64>,
    test_avg: Option<f64>,
    note: impl Into<String>,
) -> ChartRow {
    let (delta_ms, delta_pct) = match (ref_avg, test_avg) {
        (Some(r), Some(t)) if status_has_delta(status) => {
            let delta = t - r;
            (Some(delta), (r != 0.0).then(|| delta / r * 100.0))
        }
        _ => (None, None),
    };
    ChartRow {
        key: key.to_string(),
        ref_avg,
        test_avg,
        delta_ms,
        delta_pct,
        status,
        note: note.into(),
    }
}

fn status_has_delta(status: ChartStatus) -> bool {
    matches!(
        status,
        ChartStatus::Skipped | ChartStatus::Mismatch | ChartStatus::Match
    )
}

fn compare_timings(
    tally: &mut Tally,
    tuning: &Tuning,
    key: &str,
    r: &Record,
    t: &Record,
) -> ChartRow {
    let r_err = r.field(FIELD_ERROR);
    let t_err = t.field(FIELD_ERROR);

    if r_err != t_err {
        tally.changed(Diff::changed(key, FIELD_ERROR, r_err.clone(), t_err.clone()));
        let note = format!(
            "error ref={} vs prof={}",
            r_err.display_string(),
            t_err.display_string()
        );
        return chart_row(key, ChartStatus::ErrorMismatch, None, None, note);
    }

    if !r_err.is_null() {
        tally.matched(Match::new(key, DiffField::named(FIELD_ERROR), r_err.clone()));
        let note = format!("both failed: {}", r_err.display_string());
        return chart_row(key, ChartStatus::Error, None, None, note);
    }

    let (r_avg, t_avg) = match (
        parse_number(r.field(FIELD_AVG)),
        parse_number(t.field(FIELD_AVG)),
    ) {
        (Some(ra), Some(ta)) => (ra, ta),
        (ra, ta) => {
            tally.changed(Diff::changed(
                key,
                FIELD_AVG,
                r.field(FIELD_AVG).clone(),
                t.field(FIELD_AVG).clone(),
            ));
            return chart_row(key, ChartStatus::DataError, ra, ta, "missing numeric avg");
        }
    };

    if r_avg <= tuning.fast_path_ms && t_avg <= tuning.fast_path_ms {
        tally.matched(Match::new(
            key,
            DiffField::named(FIELD_AVG_SKIPPED),
            Value::float(t_avg),
        ));
        let note = format!("both ≤ {} ms", tuning.fast_path_ms);
        return chart_row(key, ChartStatus::Skipped, Some(r_avg), Some(t_avg), note);
    }

    let avg_diff = (r_avg - t_avg).abs();
    let ref_spread = match (parse_number(r.field(FIELD_MIN)), parse_number(r.field(FIELD_MAX))) {
        (Some(min), Some(max)) => max - min,
        _ => 0.0,
    };
    let significant = avg_diff > ref_spread && avg_diff > tuning.relative_tolerance * r_avg;
    let exempt = (r_avg <= tuning.low_stakes_ms && t_avg <= tuning.low_stakes_ms)
        || tuning.is_noisy(key);

    if significant && !exempt {
        tally.changed(Diff::new(
            key,
            DiffField::named(FIELD_AVG),
            Value::float(r_avg),
            Op::compare(r_avg, t_avg),
            Value::float(t_avg),
        ));
        chart_row(key, ChartStatus::Mismatch, Some(r_avg), Some(t_avg), "significant diff")
    } else if exempt {
        tally.matched(Match::new(
            key,
            DiffField::named(FIELD_AVG_SKIPPED),
            Value::float(t_avg),
        ));
        chart_row(key, ChartStatus::Skipped, Some(r_avg), Some(t_avg), "fast op")
    } else {
        tally.matched(Match::new(key, DiffField::named(FIELD_AVG), Value::float(t_avg)));
        chart_row(key, ChartStatus::Match, Some(r_avg), Some(t_avg), "similar")
    }
}

impl Comparator for PerformanceComparator {
    fn compare(&self, ctx: &CompareContext<'_>) -> CompareResult {
        let tuning = Tuning::from_metadata(ctx.metadata);
        let mut tally = Tally::new(ctx.metadata.include_matches);
        let mut chart_rows = Vec::new();

        for (key, pairing) in pair_rows(ctx) {
            let row = match pairing {
                Pairing::OnlyRef(r) => {
                    tally.only_ref(&key);
                    let ref_avg = parse_number(r.field(FIELD_AVG));
                    chart_row(&key, ChartStatus::Missing, ref_avg, None, "present only in reference")
                }
                Pairing::OnlyTest(t) => {
                    tally.only_test(&key);
                    let test_avg = parse_number(t.field(FIELD_AVG));
                    chart_row(&key, ChartStatus::Extra, None, test_avg, "present only in profile")
                }
                Pairing::Both(r, t) => {
                    tally.label(&key, r, ctx);
                    compare_timings(&mut tally, &tuning, &key, r, t)
                }
            };
            chart_rows.push(row);
        }

        let mut result = tally.finish(ctx.section);
        result.artifacts = Artifacts { chart_rows };
        result
    }
}
