//! Pipeline entry point: turns a slice of normalized records into the result
//! bundle the presentation layer consumes.
//!
//! `process` is a pure function — no state survives between calls, and the
//! caller owns the record slice and the returned bundle. Empty input (or
//! input that fully failed normalization upstream) yields the canonical
//! zero bundle instead of an error.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::aggregate::{grouped_series, sum_by};
use crate::growth::Growth;
use crate::market::{leader_share, rank_manufacturers, ManufacturerVolume};
use crate::period::{YearMonth, YearQuarter};
use crate::record::{Category, RegistrationRecord};

/// Table caps mirrored from the dashboard.
const TOP_MANUFACTURERS: usize = 15;
const GROWTH_MANUFACTURERS: usize = 10;
const SUMMARY_ROWS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryGrowth {
    pub category: Category,
    pub growth_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManufacturerGrowth {
    pub manufacturer: String,
    pub registrations: u64,
    pub yoy_growth: f64,
    pub qoq_growth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodVolume {
    pub month: YearMonth,
    pub registrations: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryVolume {
    pub category: Category,
    pub registrations: u64,
}

/// One month × category slice of the data: total volume plus how many
/// distinct manufacturers registered vehicles in it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub month: YearMonth,
    pub category: Category,
    pub registrations: u64,
    pub manufacturers: usize,
}

/// Everything the dashboard needs, fully populated even for empty input so
/// consumers never null-check.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalyticsBundle {
    pub total_registrations: u64,
    pub avg_monthly_registrations: u64,
    pub total_yoy_growth: f64,
    pub total_qoq_growth: f64,
    pub yoy_by_category: Vec<CategoryGrowth>,
    pub qoq_by_category: Vec<CategoryGrowth>,
    pub market_leader: Option<String>,
    pub market_leader_share: f64,
    pub top_manufacturers: Vec<ManufacturerVolume>,
    pub manufacturer_growth: Vec<ManufacturerGrowth>,
    pub monthly_trend: Vec<PeriodVolume>,
    pub category_distribution: Vec<CategoryVolume>,
    pub summary_table: Vec<SummaryRow>,
}

impl AnalyticsBundle {
    /// The canonical zero bundle: every metric 0, every table empty.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Runs the full aggregation pipeline over a normalized record slice.
pub fn process(records: &[RegistrationRecord]) -> AnalyticsBundle {
    if records.is_empty() {
        return AnalyticsBundle::empty();
    }

    let total_registrations: u64 = records.iter().map(|r| r.registrations).sum();

    let yearly = sum_by(records, |r| r.date.year());
    let quarterly = sum_by(records, |r| YearQuarter::of(r.date));
    let monthly = sum_by(records, |r| YearMonth::of(r.date));

    let avg_monthly_registrations = total_registrations / monthly.len() as u64;

    let yoy_by_category = grouped_series(records, |r| r.category.clone(), |r| r.date.year())
        .into_iter()
        .map(|(category, series)| CategoryGrowth {
            category,
            growth_pct: Growth::over(&series).pct,
        })
        .collect();
    let qoq_by_category = grouped_series(records, |r| r.category.clone(), |r| YearQuarter::of(r.date))
        .into_iter()
        .map(|(category, series)| CategoryGrowth {
            category,
            growth_pct: Growth::over(&series).pct,
        })
        .collect();

    let ranked = rank_manufacturers(records);
    let market_leader = ranked.first().map(|m| m.manufacturer.clone());
    let market_leader_share = leader_share(&ranked);

    let yearly_by_maker = grouped_series(records, |r| r.manufacturer.clone(), |r| r.date.year());
    let quarterly_by_maker =
        grouped_series(records, |r| r.manufacturer.clone(), |r| YearQuarter::of(r.date));
    let manufacturer_growth = ranked
        .iter()
        .take(GROWTH_MANUFACTURERS)
        .map(|maker| ManufacturerGrowth {
            manufacturer: maker.manufacturer.clone(),
            registrations: maker.registrations,
            yoy_growth: yearly_by_maker
                .get(&maker.manufacturer)
                .map(|series| Growth::over(series).pct)
                .unwrap_or(0.0),
            qoq_growth: quarterly_by_maker
                .get(&maker.manufacturer)
                .map(|series| Growth::over(series).pct)
                .unwrap_or(0.0),
        })
        .collect();

    let mut top_manufacturers = ranked;
    top_manufacturers.truncate(TOP_MANUFACTURERS);

    let monthly_trend = monthly
        .iter()
        .map(|(&month, &registrations)| PeriodVolume {
            month,
            registrations,
        })
        .collect();

    let category_distribution = sum_by(records, |r| r.category.clone())
        .into_iter()
        .map(|(category, registrations)| CategoryVolume {
            category,
            registrations,
        })
        .collect();

    AnalyticsBundle {
        total_registrations,
        avg_monthly_registrations,
        total_yoy_growth: Growth::over(&yearly).pct,
        total_qoq_growth: Growth::over(&quarterly).pct,
        yoy_by_category,
        qoq_by_category,
        market_leader,
        market_leader_share,
        top_manufacturers,
        manufacturer_growth,
        monthly_trend,
        category_distribution,
        summary_table: summary_table(records),
    }
}

/// Month × category rollup, newest month first, category ascending within a
/// month, capped at [`SUMMARY_ROWS`] rows.
fn summary_table(records: &[RegistrationRecord]) -> Vec<SummaryRow> {
    let mut buckets: BTreeMap<(YearMonth, Category), (u64, BTreeSet<&str>)> = BTreeMap::new();
    for record in records {
        let entry = buckets
            .entry((YearMonth::of(record.date), record.category.clone()))
            .or_default();
        entry.0 += record.registrations;
        entry.1.insert(record.manufacturer.as_str());
    }

    let mut rows: Vec<SummaryRow> = buckets
        .into_iter()
        .map(|((month, category), (registrations, makers))| SummaryRow {
            month,
            category,
            registrations,
            manufacturers: makers.len(),
        })
        .collect();
    rows.sort_by(|a, b| b.month.cmp(&a.month).then_with(|| a.category.cmp(&b.category)));
    rows.truncate(SUMMARY_ROWS);
    rows
}

/// Record-level filters applied ahead of [`process`]; mirrors the
/// dashboard's date-range / category / manufacturer controls. `None` means
/// the dimension is unconstrained.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub categories: Option<Vec<Category>>,
    pub manufacturers: Option<Vec<String>>,
}

impl RecordFilter {
    pub fn apply(&self, records: &[RegistrationRecord]) -> Vec<RegistrationRecord> {
        records
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect()
    }

    fn matches(&self, record: &RegistrationRecord) -> bool {
        if let Some(from) = self.from {
            if record.date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if record.date > to {
                return false;
            }
        }
        if let Some(categories) = &self.categories {
            if !categories.contains(&record.category) {
                return false;
            }
        }
        if let Some(manufacturers) = &self.manufacturers {
            if !manufacturers.iter().any(|m| m == &record.manufacturer) {
                return false;
            }
        }
        true
    }
}
