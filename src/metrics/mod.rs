//! Grouped business metrics over normalized record collections.
//!
//! Every summarizer is total: zero records produce a zero-valued summary
//! with empty breakdowns, and no aggregate ever yields `NaN` or an
//! infinity. Guarded ratios resolve to `0.0` when their denominator is
//! zero.

pub mod cancellations;
pub mod clients;
pub mod discounts;
pub mod sessions;

use indexmap::IndexMap;

/// Group records by a string key, preserving first-seen key order.
///
/// Breakdown ordering everywhere in this module comes from this: groups
/// appear in the order their key first occurs in the input, never sorted.
pub fn group_by_key<'a, T, F>(records: &'a [T], key: F) -> IndexMap<String, Vec<&'a T>>
where
    F: Fn(&T) -> String,
{
    let mut groups: IndexMap<String, Vec<&T>> = IndexMap::new();
    for record in records {
        groups.entry(key(record)).or_default().push(record);
    }
    groups
}

/// `numerator / denominator`, or `0.0` when the denominator is zero.
pub(crate) fn guarded_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}
