//! Raw record ingestion from JSON or CSV payloads.

use anyhow::Result;
use serde_json::Value;

/// Keys an API payload may nest its record array under.
const PAYLOAD_KEYS: &[&str] = &["data", "results", "records"];

/// Parses a payload into raw (pre-normalization) records.
///
/// Accepts a JSON array of objects, a JSON object wrapping that array under
/// `data`/`results`/`records`, or CSV with a header row. CSV fields arrive
/// as strings; the normalizer does the type coercion.
///
/// # Errors
///
/// Returns an error when the payload is neither parseable JSON nor readable
/// CSV.
pub fn parse_records(bytes: &[u8]) -> Result<Vec<Value>> {
    if let Ok(json) = serde_json::from_slice::<Value>(bytes) {
        return Ok(extract_records(&json));
    }
    parse_csv_records(bytes)
}

/// Digs the record array out of a JSON payload. Non-array payloads yield no
/// records rather than an error; the empty path downstream handles it.
pub fn extract_records(json: &Value) -> Vec<Value> {
    let payload = match json {
        Value::Object(obj) => PAYLOAD_KEYS
            .iter()
            .find_map(|key| obj.get(*key))
            .unwrap_or(json),
        _ => json,
    };
    match payload {
        Value::Array(items) => items.iter().filter(|item| item.is_object()).cloned().collect(),
        _ => Vec::new(),
    }
}

fn parse_csv_records(bytes: &[u8]) -> Result<Vec<Value>> {
    let mut reader = csv::Reader::from_reader(bytes);
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let mut obj = serde_json::Map::new();
        for (header, cell) in headers.iter().zip(row.iter()) {
            obj.insert(header.to_string(), Value::String(cell.to_string()));
        }
        records.push(Value::Object(obj));
    }
    Ok(records)
}
