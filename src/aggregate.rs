//! Grouping and summation over normalized records.
//!
//! Buckets live in `BTreeMap`s so iteration order follows the key type, not
//! the input order; equal input multisets always produce identical maps.
//! Grouping keys with zero records never materialize.

use std::collections::BTreeMap;

use crate::record::RegistrationRecord;

/// Sums registration counts per distinct key.
pub fn sum_by<K, F>(records: &[RegistrationRecord], mut key: F) -> BTreeMap<K, u64>
where
    K: Ord,
    F: FnMut(&RegistrationRecord) -> K,
{
    let mut buckets = BTreeMap::new();
    for record in records {
        *buckets.entry(key(record)).or_insert(0) += record.registrations;
    }
    buckets
}

/// One period series per group — the shape per-category and per-manufacturer
/// growth is computed over.
pub fn grouped_series<G, K, GF, KF>(
    records: &[RegistrationRecord],
    mut group: GF,
    mut period: KF,
) -> BTreeMap<G, BTreeMap<K, u64>>
where
    G: Ord,
    K: Ord,
    GF: FnMut(&RegistrationRecord) -> G,
    KF: FnMut(&RegistrationRecord) -> K,
{
    let mut series: BTreeMap<G, BTreeMap<K, u64>> = BTreeMap::new();
    for record in records {
        *series
            .entry(group(record))
            .or_default()
            .entry(period(record))
            .or_insert(0) += record.registrations;
    }
    series
}
