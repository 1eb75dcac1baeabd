use vahan_reg_tracker::analytics::{AnalyticsBundle, process};
use vahan_reg_tracker::market::share_of;
use vahan_reg_tracker::normalize::normalize_records;
use vahan_reg_tracker::parser::parse_records;
use vahan_reg_tracker::record::Category;

fn fixture_records() -> Vec<vahan_reg_tracker::record::RegistrationRecord> {
    let bytes = include_bytes!("fixtures/sample_registrations.json");
    let raw = parse_records(bytes).expect("Failed to parse fixture");
    normalize_records(&raw)
}

#[test]
fn test_full_pipeline() {
    let records = fixture_records();

    // 7 raw records: one has an unparsable date, one has no date at all
    assert_eq!(records.len(), 5);

    let bundle = process(&records);
    assert_eq!(bundle.total_registrations, 37);

    // yearly totals: 2022 -> 5, 2023 -> 32
    assert_eq!(bundle.total_yoy_growth, 540.0);

    assert_eq!(bundle.market_leader.as_deref(), Some("Hero MotoCorp"));
}

#[test]
fn test_heterogeneous_fields_normalize_to_one_schema() {
    let records = fixture_records();

    let hero: u64 = records
        .iter()
        .filter(|r| r.manufacturer == "Hero MotoCorp")
        .map(|r| r.registrations)
        .sum();
    assert_eq!(hero, 15);

    // "Scooter" is a two-wheeler synonym, "AUTO RICKSHAW" a three-wheeler one
    let categories: Vec<_> = records.iter().map(|r| r.category.clone()).collect();
    assert!(categories.contains(&Category::ThreeWheeler));
    assert_eq!(
        categories.iter().filter(|c| **c == Category::TwoWheeler).count(),
        3
    );
}

#[test]
fn test_category_partition_sums_to_total() {
    let bundle = process(&fixture_records());
    let partition: u64 = bundle
        .category_distribution
        .iter()
        .map(|c| c.registrations)
        .sum();
    assert_eq!(partition, bundle.total_registrations);
}

#[test]
fn test_empty_and_all_rejected_inputs_are_equivalent() {
    let all_rejected = normalize_records(&[
        serde_json::json!({"date": "never", "category": "2W", "registrations": 1}),
        serde_json::json!({"note": "no usable fields"}),
    ]);
    assert!(all_rejected.is_empty());

    assert_eq!(process(&[]), AnalyticsBundle::empty());
    assert_eq!(process(&all_rejected), AnalyticsBundle::empty());
}

#[test]
fn test_process_is_idempotent_over_fixture() {
    let records = fixture_records();
    assert_eq!(process(&records), process(&records));
}

#[test]
fn test_market_shares_sum_to_one_hundred() {
    let bundle = process(&fixture_records());
    let total = bundle.total_registrations;
    let sum: f64 = bundle
        .top_manufacturers
        .iter()
        .map(|m| share_of(m.registrations, total))
        .sum();
    assert!((sum - 100.0).abs() < 1e-9);
}

#[test]
fn test_quarterly_growth_uses_two_most_recent_quarters() {
    let bundle = process(&fixture_records());
    // quarterly totals: 2022-Q1 -> 5, 2023-Q1 -> 32
    assert_eq!(bundle.total_qoq_growth, 540.0);
}
