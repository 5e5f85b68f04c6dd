//! Row indexing and outcome bookkeeping shared by the built-in comparators.

use std::collections::BTreeMap;

use crate::comparators::CompareContext;
use crate::model::diff::{Diff, Match};
use crate::model::record::Record;
use crate::model::result::{CompareResult, Counts};
use crate::model::value::{Scalar, Value};

/// Sort key of a record identity: type tag first, then text.
type RowKey = (&'static str, String);

/// How a key is represented across the two sides.
pub(crate) enum Pairing<'a> {
    OnlyRef(&'a Record),
    OnlyTest(&'a Record),
    Both(&'a Record, &'a Record),
}

/// Identity of a key value. Integral floats share the `int` tag so `1` and
/// `1.0` name the same row, matching [`Scalar`] equality.
fn row_key(key: &Value) -> RowKey {
    if let Value::Scalar(Scalar::Float(x)) = key {
        if x.is_finite() && x.fract() == 0.0 && x.abs() < i64::MAX as f64 {
            return ("int", (*x as i64).to_string());
        }
    }
    (key.type_name(), key.display_string())
}

fn index_rows<'a>(rows: &'a [Record], key_field: &str) -> BTreeMap<RowKey, &'a Record> {
    let mut index = BTreeMap::new();
    for row in rows {
        let key = row.field(key_field);
        if key.is_null() {
            continue;
        }
        // later duplicates replace earlier ones
        index.insert(row_key(key), row);
    }
    index
}

/// Union of both sides' keys in stable `(type, text)` order.
pub(crate) fn pair_rows<'a>(ctx: &CompareContext<'a>) -> Vec<(String, Pairing<'a>)> {
    let mut reference = index_rows(ctx.reference, ctx.key_field);
    let tested = index_rows(ctx.tested, ctx.key_field);

    let mut merged: BTreeMap<RowKey, Pairing<'a>> = BTreeMap::new();
    for (key, test_row) in tested {
        let pairing = match reference.remove(&key) {
            Some(ref_row) => Pairing::Both(ref_row, test_row),
            None => Pairing::OnlyTest(test_row),
        };
        merged.insert(key, pairing);
    }
    for (key, ref_row) in reference {
        merged.insert(key, Pairing::OnlyRef(ref_row));
    }
    merged
        .into_iter()
        .map(|((_, text), pairing)| (text, pairing))
        .collect()
}

/// Accumulates counts, diffs, matches and labels for one section.
pub(crate) struct Tally {
    include_matches: bool,
    counts: Counts,
    diffs: Vec<Diff>,
    matches: Vec<Match>,
    labels: BTreeMap<String, String>,
}

impl Tally {
    pub(crate) fn new(include_matches: bool) -> Self {
        Self {
            include_matches,
            counts: Counts::default(),
            diffs: Vec::new(),
            matches: Vec::new(),
            labels: BTreeMap::new(),
        }
    }

    pub(crate) fn only_ref(&mut self, key: &str) {
        self.counts.only_ref += 1;
        self.diffs.push(Diff::only_in_reference(key));
    }

    pub(crate) fn only_test(&mut self, key: &str) {
        self.counts.only_test += 1;
        self.diffs.push(Diff::only_in_profile(key));
    }

    /// Records the display label of a key present on both sides.
    pub(crate) fn label(&mut self, key: &str, reference: &Record, ctx: &CompareContext<'_>) {
        let shown = ctx
            .show_field
            .map(|field| reference.field(field))
            .filter(|v| !v.is_null())
            .map(|v| v.display_string())
            .unwrap_or_else(|| key.to_string());
        self.labels.insert(key.to_string(), shown);
    }

    pub(crate) fn changed(&mut self, diff: Diff) {
        self.counts.changed += 1;
        self.counts.compared += 1;
        self.diffs.push(diff);
    }

    pub(crate) fn matched(&mut self, m: Match) {
        self.counts.matched += 1;
        self.counts.compared += 1;
        if self.include_matches {
            self.matches.push(m);
        }
    }

    pub(crate) fn finish(self, section: &str) -> CompareResult {
        CompareResult {
            section: section.to_string(),
            counts: Some(self.counts),
            labels: self.labels,
            diffs: self.diffs,
            matches: self.include_matches.then_some(self.matches),
            ..CompareResult::default()
        }
    }
}
