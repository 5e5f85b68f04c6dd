//! Count reconciliation for comparator results.

use crate::model::diff::{Diff, DiffField, Match};
use crate::model::result::Counts;

/// Infers counts from diffs and matches.
///
/// A presence diff with boolean sides counts towards `only_ref` or
/// `only_test`; every other diff is a change.
pub fn tally_stats(diffs: &[Diff], matches: &[Match]) -> Counts {
    let mut counts = Counts::default();

    for diff in diffs {
        if diff.field != DiffField::Presence {
            counts.changed += 1;
            continue;
        }
        match (diff.reference.as_bool(), diff.test.as_bool()) {
            (Some(true), Some(false)) => counts.only_ref += 1,
            (Some(false), Some(true)) => counts.only_test += 1,
            _ => counts.changed += 1,
        }
    }

    counts.matched = matches.len() as u64;
    counts.compared = counts.changed + counts.matched + counts.only_ref + counts.only_test;
    counts
}

/// Picks the canonical counts for a section.
///
/// Supplied counts are kept unless they claim nothing was compared while
/// diffs or matches exist.
pub fn reconcile(provided: Option<&Counts>, diffs: &[Diff], matches: &[Match]) -> Counts {
    match provided {
        Some(counts) if counts.compared > 0 || (diffs.is_empty() && matches.is_empty()) => *counts,
        _ => tally_stats(diffs, matches),
    }
}
