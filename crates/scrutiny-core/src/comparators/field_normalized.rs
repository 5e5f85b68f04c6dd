//! Single-value comparator with a normalization step.
//!
//! Intended for key/value style sections such as CPLC dumps:
//!
//! ```yaml
//! component:
//!   comparator: field_normalized
//!   match_key: field
//! target:
//!   value_field: value          # default "value"
//!   compare_first_token: true   # default true
//! ```
//!
//! `"4001 (2014-01-01)"` and `"4001"` compare equal under the default
//! first-token normalization. Diffs and matches carry the raw values.

use crate::comparators::index::{pair_rows, Pairing, Tally};
use crate::comparators::{CompareContext, Comparator};
use crate::model::diff::{Diff, DiffField, Match};
use crate::model::result::CompareResult;
use crate::model::value::Value;
use crate::normalize::first_token;

const DEFAULT_VALUE_FIELD: &str = "value";

#[derive(Debug, Clone, Copy, Default)]
pub struct FieldNormalizedComparator;

impl Comparator for FieldNormalizedComparator {
    fn compare(&self, ctx: &CompareContext<'_>) -> CompareResult {
        let value_field = ctx
            .metadata
            .option_str("value_field")
            .filter(|f| !f.trim().is_empty())
            .unwrap_or(DEFAULT_VALUE_FIELD);
        let use_first_token = ctx
            .metadata
            .option_bool("compare_first_token")
            .unwrap_or(true);
        let normalize = |v: &Value| {
            if use_first_token {
                first_token(v)
            } else {
                v.clone()
            }
        };

        let mut tally = Tally::new(ctx.metadata.include_matches);

        for (key, pairing) in pair_rows(ctx) {
            match pairing {
                Pairing::OnlyRef(_) => tally.only_ref(&key),
                Pairing::OnlyTest(_) => tally.only_test(&key),
                Pairing::Both(r, t) => {
                    tally.label(&key, r, ctx);
                    let rv = r.field(value_field);
                    let tv = t.field(value_field);
                    if normalize(rv) == normalize(tv) {
                        tally.matched(Match::new(&*key, DiffField::named(value_field), tv.clone()));
                    } else {
                        tally.changed(Diff::changed(&*key, value_field, rv.clone(), tv.clone()));
                    }
                }
            }
        }

        tally.finish(ctx.section)
    }
}
