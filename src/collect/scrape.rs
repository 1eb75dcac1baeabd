//! Scrape fallback: mines registration figures out of dashboard page text.
//!
//! Pages are probed in order; each page's text is scanned line by line
//! against a small set of patterns. Extracted fields accumulate into a
//! candidate raw record, emitted once enough fields are present, and the
//! candidates then run through the ordinary normalizer.

use regex::Regex;
use serde_json::{json, Value};
use tokio::time::sleep;
use tracing::debug;

use super::SCRAPE_ATTEMPT_DELAY;
use crate::fetch::{fetch_text, HttpClient};
use crate::normalize::normalize_records;
use crate::record::RegistrationRecord;

/// Dashboard pages worth mining, probed in order.
const PAGES: &[&str] = &[
    "/dashboard/registration",
    "/dashboard",
    "/vehicleservice/SearchRegistrationDetails.do",
];

/// A candidate record needs at least this many extracted fields.
const MIN_FIELDS: usize = 3;

pub(super) async fn try_pages<C: HttpClient>(client: &C, base_url: &str) -> Vec<RegistrationRecord> {
    for page in PAGES {
        let url = format!("{base_url}{page}");
        match fetch_text(client, &url).await {
            Ok(text) => {
                let candidates = extract_candidates(&text);
                if !candidates.is_empty() {
                    let records = normalize_records(&candidates);
                    if !records.is_empty() {
                        return records;
                    }
                }
            }
            Err(e) => debug!(url, error = %e, "Page fetch failed"),
        }
        sleep(SCRAPE_ATTEMPT_DELAY).await;
    }
    Vec::new()
}

struct Patterns {
    count: Regex,
    manufacturer: Regex,
    category: Regex,
    date: Regex,
    month_year: Regex,
}

impl Patterns {
    fn new() -> Self {
        Self {
            count: Regex::new(r"(?i)(\d+)\s*(?:vehicles?|registrations?)")
                .expect("count pattern"),
            manufacturer: Regex::new(
                r"(?i)\b(Maruti|Honda|Hyundai|Tata|Mahindra|Toyota|Ford|Suzuki|Hero|Bajaj|TVS|Yamaha)\b",
            )
            .expect("manufacturer pattern"),
            category: Regex::new(
                r"(?i)\b(2W|3W|4W|Two Wheeler|Three Wheeler|Four Wheeler|Car|Bike|Motorcycle)\b",
            )
            .expect("category pattern"),
            date: Regex::new(r"\d{1,2}[-/]\d{1,2}[-/]\d{2,4}").expect("date pattern"),
            month_year: Regex::new(
                r"(?i)\b(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\s+(\d{4})",
            )
            .expect("month-year pattern"),
        }
    }
}

/// Scans page text for candidate raw records. Fields accumulate across
/// lines; a candidate is emitted once [`MIN_FIELDS`] fields are present and
/// accumulation restarts.
pub(crate) fn extract_candidates(text: &str) -> Vec<Value> {
    let patterns = Patterns::new();
    let mut candidates = Vec::new();
    let mut current = serde_json::Map::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(caps) = patterns.count.captures(line) {
            if let Ok(count) = caps[1].parse::<u64>() {
                current.insert("registrations".to_string(), json!(count));
            }
        }
        if let Some(m) = patterns.manufacturer.find(line) {
            current.insert("manufacturer".to_string(), json!(m.as_str()));
        }
        if let Some(m) = patterns.category.find(line) {
            current.insert("vehicle_category".to_string(), json!(m.as_str()));
        }
        if let Some(m) = patterns.date.find(line) {
            current.insert("date".to_string(), json!(m.as_str()));
        } else if let Some(caps) = patterns.month_year.captures(line) {
            current.insert("date".to_string(), json!(format!("{} {}", &caps[1], &caps[2])));
        }

        if current.len() >= MIN_FIELDS {
            candidates.push(Value::Object(std::mem::take(&mut current)));
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Category;

    #[test]
    fn test_extracts_candidate_from_page_text() {
        let text = "\
            Registration summary for Jan 2023\n\
            Hero leads the Two Wheeler segment with 12500 registrations\n";
        let candidates = extract_candidates(text);
        assert_eq!(candidates.len(), 1);

        let records = normalize_records(&candidates);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].category, Category::TwoWheeler);
        assert_eq!(records[0].manufacturer, "Hero");
        assert_eq!(records[0].registrations, 12500);
    }

    #[test]
    fn test_numeric_date_form() {
        let text = "Tata Car sales: 340 vehicles on 15-01-2023\n";
        let records = normalize_records(&extract_candidates(text));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date.to_string(), "2023-01-15");
    }

    #[test]
    fn test_candidate_without_count_is_dropped_downstream() {
        // three fields trigger emission, but the normalizer still rejects
        // candidates with no count field
        let text = "On 15-01-2023 Hyundai reported strong Car demand\n";
        let candidates = extract_candidates(text);
        assert_eq!(candidates.len(), 1);
        assert!(normalize_records(&candidates).is_empty());
    }

    #[test]
    fn test_irrelevant_text_yields_nothing() {
        let text = "About us\nContact\nTerms of service\n";
        assert!(extract_candidates(text).is_empty());
    }

    #[test]
    fn test_accumulation_restarts_after_emit() {
        let text = "\
            Jan 2023 Hero 100 registrations Bike\n\
            Feb 2023 Bajaj 200 registrations 3W\n";
        let candidates = extract_candidates(text);
        assert_eq!(candidates.len(), 2);
    }
}
