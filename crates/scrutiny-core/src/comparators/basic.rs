//! General-purpose field-by-field comparator.

use std::collections::{BTreeMap, BTreeSet};

use crate::comparators::index::{pair_rows, Pairing, Tally};
use crate::comparators::{CompareContext, Comparator};
use crate::model::diff::{Diff, DiffField, Match};
use crate::model::record::Record;
use crate::model::result::CompareResult;
use crate::model::value::Value;

/// Compares every non-key field of records present on both sides.
///
/// Scalars compare by equality. Containers compare as sets of elements
/// keyed by their canonical form, emitting one `__group__` diff per removed
/// or added element; a sequence against a mapping is still an element-wise
/// comparison. A scalar against a container produces a plain `!=` diff.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicComparator;

/// Elements of a container keyed by canonical form; first occurrence wins.
/// Null reads as an empty container.
fn group_items(value: &Value) -> BTreeMap<String, Value> {
    let mut items = BTreeMap::new();
    match value {
        Value::Sequence(elements) => {
            for element in elements {
                items
                    .entry(element.canonical_repr())
                    .or_insert_with(|| element.clone());
            }
        }
        Value::Mapping(map) => {
            for (k, v) in map {
                let mut entry = BTreeMap::new();
                entry.insert("key".to_string(), Value::str(k.clone()));
                entry.insert("value".to_string(), v.clone());
                let item = Value::Mapping(entry);
                items.entry(item.canonical_repr()).or_insert(item);
            }
        }
        _ => {}
    }
    items
}

/// Whether two values take the element-wise group path.
fn is_group_pair(reference: &Value, test: &Value) -> bool {
    match (reference, test) {
        (a, Value::Null) | (Value::Null, a) => a.is_container(),
        (a, b) => a.is_container() && b.is_container(),
    }
}

fn compare_group(tally: &mut Tally, key: &str, reference: &Value, test: &Value) {
    let ref_items = group_items(reference);
    let test_items = group_items(test);

    let mut changed = false;
    for (repr, item) in &ref_items {
        if !test_items.contains_key(repr) {
            tally.changed(Diff::group_removed(key, item.clone()));
            changed = true;
        }
    }
    for (repr, item) in &test_items {
        if !ref_items.contains_key(repr) {
            tally.changed(Diff::group_added(key, item.clone()));
            changed = true;
        }
    }

    if !changed {
        tally.matched(Match::new(key, DiffField::Group, Value::Null));
    }
}

fn compare_records(tally: &mut Tally, key: &str, reference: &Record, test: &Record, key_field: &str) {
    let fields: BTreeSet<&String> = reference
        .fields()
        .chain(test.fields())
        .filter(|f| f.as_str() != key_field)
        .collect();

    for field in fields {
        let rv = reference.field(field);
        let tv = test.field(field);

        if is_group_pair(rv, tv) {
            compare_group(tally, key, rv, tv);
        } else if rv.is_container() || tv.is_container() {
            tally.changed(Diff::changed(key, field.as_str(), rv.clone(), tv.clone()));
        } else if rv == tv {
            tally.matched(Match::new(key, DiffField::named(field.as_str()), tv.clone()));
        } else {
            tally.changed(Diff::changed(key, field.as_str(), rv.clone(), tv.clone()));
        }
    }
}

impl Comparator for BasicComparator {
    fn compare(&self, ctx: &CompareContext<'_>) -> CompareResult {
        let mut tally = Tally::new(ctx.metadata.include_matches);

        for (key, pairing) in pair_rows(ctx) {
            match pairing {
                Pairing::OnlyRef(_) => tally.only_ref(&key),
                Pairing::OnlyTest(_) => tally.only_test(&key),
                Pairing::Both(r, t) => {
                    tally.label(&key, r, ctx);
                    compare_records(&mut tally, &key, r, t, ctx.key_field);
                }
            }
        }

        tally.finish(ctx.section)
    }
}
