//! Record normalization: maps arbitrarily-shaped raw records onto the
//! canonical [`RegistrationRecord`] schema.
//!
//! Field names resolve through priority-ordered alias lists, dates through a
//! fixed format ladder, categories through substring synonym matching.
//! Records missing a date, category, or count after mapping are dropped;
//! no partial records survive.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use tracing::debug;

use crate::record::{Category, RegistrationRecord};

const DATE_ALIASES: &[&str] = &["date", "registration_date", "reg_date", "period", "month"];
const CATEGORY_ALIASES: &[&str] = &["vehicle_category", "category", "vehicle_type", "type"];
const MANUFACTURER_ALIASES: &[&str] = &["manufacturer", "make", "brand", "oem"];
const COUNT_ALIASES: &[&str] = &["registrations", "count", "total", "reg_count", "vehicles"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%m/%d/%Y", "%d/%m/%Y", "%Y/%m/%d"];
// Month-year inputs ("Mar 2024") resolve to the first of the month.
const MONTH_YEAR_FORMATS: &[&str] = &["%d %b %Y", "%d %B %Y"];

const TWO_WHEELER_TERMS: &[&str] = &["2W", "TWO WHEEL", "BIKE", "MOTORCYCLE", "SCOOTER"];
// "AUTO" alone covers "AUTO RICKSHAW"; "RICKSHAW" is deliberately absent so
// that e.g. "E-RICKSHAW" passes through unclassified.
const THREE_WHEELER_TERMS: &[&str] = &["3W", "THREE WHEEL", "AUTO"];
const FOUR_WHEELER_TERMS: &[&str] = &["4W", "FOUR WHEEL", "CAR", "PASSENGER"];

/// Known-brand spellings, matched against the uppercased raw name.
const BRAND_TABLE: &[(&str, &str)] = &[
    ("MARUTI SUZUKI", "Maruti Suzuki"),
    ("HERO MOTOCORP", "Hero MotoCorp"),
    ("HONDA MOTORCYCLE", "Honda Motorcycle"),
    ("BAJAJ AUTO", "Bajaj Auto"),
    ("TATA MOTORS", "Tata Motors"),
    ("MAHINDRA", "Mahindra"),
    ("HYUNDAI", "Hyundai"),
    ("TOYOTA", "Toyota"),
    ("TVS MOTOR", "TVS Motor"),
];

/// Normalizes a batch of raw records, dropping the ones that fail admission.
pub fn normalize_records(raw: &[Value]) -> Vec<RegistrationRecord> {
    let records: Vec<_> = raw.iter().filter_map(normalize_record).collect();
    let dropped = raw.len() - records.len();
    if dropped > 0 {
        debug!(dropped, kept = records.len(), "Discarded malformed records");
    }
    records
}

/// Maps one raw record onto the canonical schema.
///
/// Returns `None` when the record is not an object, the date is missing or
/// unparsable, or the category or count field is absent. A missing
/// manufacturer defaults to `"Unknown"`.
pub fn normalize_record(raw: &Value) -> Option<RegistrationRecord> {
    let obj = raw.as_object()?;

    let date = parse_date(field(obj, DATE_ALIASES)?)?;
    let category = normalize_category(&text_value(field(obj, CATEGORY_ALIASES)?)?);
    let registrations = count_value(field(obj, COUNT_ALIASES)?);
    let manufacturer = field(obj, MANUFACTURER_ALIASES)
        .and_then(text_value)
        .map(|name| clean_manufacturer(&name))
        .unwrap_or_else(|| "Unknown".to_string());

    Some(RegistrationRecord {
        date,
        category,
        manufacturer,
        registrations,
    })
}

/// First alias present in the record wins.
fn field<'a>(obj: &'a serde_json::Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases.iter().find_map(|name| obj.get(*name))
}

fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Coerces a count field to a non-negative integer. Present-but-unparsable
/// (or negative) values coerce to 0; only a missing field rejects the record.
fn count_value(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => {
            let cleaned = s.trim().replace(',', "");
            cleaned
                .parse::<u64>()
                .ok()
                .or_else(|| cleaned.parse::<f64>().ok().filter(|f| *f >= 0.0).map(|f| f as u64))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

/// Tries the fixed date format ladder, then ISO datetimes, then month-year
/// forms. `None` means unparsable and the record is discarded.
fn parse_date(value: &Value) -> Option<NaiveDate> {
    let text = value.as_str()?.trim();

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }

    if let Ok(datetime) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Some(datetime.date());
    }

    let day_padded = format!("01 {text}");
    for format in MONTH_YEAR_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&day_padded, format) {
            return Some(date);
        }
    }

    None
}

/// Classifies a raw category string by substring matching against the known
/// synonyms, checked two-wheeler first. Unrecognized values pass through
/// uppercased.
pub fn normalize_category(raw: &str) -> Category {
    let upper = raw.trim().to_uppercase();
    if TWO_WHEELER_TERMS.iter().any(|term| upper.contains(term)) {
        return Category::TwoWheeler;
    }
    if THREE_WHEELER_TERMS.iter().any(|term| upper.contains(term)) {
        return Category::ThreeWheeler;
    }
    if FOUR_WHEELER_TERMS.iter().any(|term| upper.contains(term)) {
        return Category::FourWheeler;
    }
    Category::Other(upper)
}

/// Canonicalizes a manufacturer name against the brand table, falling back
/// to title case.
pub fn clean_manufacturer(raw: &str) -> String {
    let trimmed = raw.trim();
    let upper = trimmed.to_uppercase();
    for (pattern, canonical) in BRAND_TABLE {
        if upper.contains(pattern) {
            return (*canonical).to_string();
        }
    }
    title_case(trimmed)
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
