//! Manufacturer ranking and market share.

use serde::Serialize;

use crate::aggregate::sum_by;
use crate::record::RegistrationRecord;

/// A manufacturer's total volume within the analyzed slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManufacturerVolume {
    pub manufacturer: String,
    pub registrations: u64,
}

/// Ranks manufacturers by summed count, descending. Equal totals rank by
/// manufacturer name ascending: the stable sort over the name-ordered bucket
/// map keeps ties alphabetical.
pub fn rank_manufacturers(records: &[RegistrationRecord]) -> Vec<ManufacturerVolume> {
    let totals = sum_by(records, |r| r.manufacturer.clone());
    let mut ranked: Vec<_> = totals
        .into_iter()
        .map(|(manufacturer, registrations)| ManufacturerVolume {
            manufacturer,
            registrations,
        })
        .collect();
    ranked.sort_by(|a, b| b.registrations.cmp(&a.registrations));
    ranked
}

/// A value's share of a total, in percent. Defined as 0.0 when the total is 0.
pub fn share_of(value: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        value as f64 / total as f64 * 100.0
    }
}

/// The rank-0 manufacturer's share of all ranked volume.
pub fn leader_share(ranked: &[ManufacturerVolume]) -> f64 {
    let total: u64 = ranked.iter().map(|m| m.registrations).sum();
    match ranked.first() {
        Some(leader) => share_of(leader.registrations, total),
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Category;
    use chrono::NaiveDate;

    fn record(maker: &str, count: u64) -> RegistrationRecord {
        RegistrationRecord {
            date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            category: Category::TwoWheeler,
            manufacturer: maker.to_string(),
            registrations: count,
        }
    }

    #[test]
    fn test_ranking_is_descending_by_volume() {
        let records = vec![record("TVS Motor", 5), record("Hero MotoCorp", 20), record("Bajaj Auto", 10)];
        let ranked = rank_manufacturers(&records);
        let names: Vec<_> = ranked.iter().map(|m| m.manufacturer.as_str()).collect();
        assert_eq!(names, vec!["Hero MotoCorp", "Bajaj Auto", "TVS Motor"]);
    }

    #[test]
    fn test_ties_rank_alphabetically() {
        let records = vec![record("Yamaha", 10), record("Bajaj Auto", 10), record("Hero MotoCorp", 10)];
        let ranked = rank_manufacturers(&records);
        let names: Vec<_> = ranked.iter().map(|m| m.manufacturer.as_str()).collect();
        assert_eq!(names, vec!["Bajaj Auto", "Hero MotoCorp", "Yamaha"]);
    }

    #[test]
    fn test_leader_share() {
        let records = vec![record("Hero MotoCorp", 30), record("TVS Motor", 10)];
        let ranked = rank_manufacturers(&records);
        assert_eq!(leader_share(&ranked), 75.0);
    }

    #[test]
    fn test_zero_total_share_is_zero() {
        let records = vec![record("Hero MotoCorp", 0), record("TVS Motor", 0)];
        let ranked = rank_manufacturers(&records);
        assert_eq!(leader_share(&ranked), 0.0);
        assert_eq!(leader_share(&[]), 0.0);
    }

    #[test]
    fn test_shares_sum_to_total() {
        let records = vec![record("A", 7), record("B", 13), record("C", 5)];
        let ranked = rank_manufacturers(&records);
        let total: u64 = ranked.iter().map(|m| m.registrations).sum();
        let sum: f64 = ranked.iter().map(|m| share_of(m.registrations, total)).sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }
}
