//! Live API endpoint attempts against the registration dashboard.

use serde_json::Value;
use tokio::time::sleep;
use tracing::debug;

use super::API_ATTEMPT_DELAY;
use crate::fetch::HttpClient;
use crate::normalize::normalize_records;
use crate::parser::extract_records;
use crate::record::RegistrationRecord;

/// Candidate endpoints, probed in order.
const ENDPOINTS: &[&str] = &[
    "/vahan/api/getVehicleData",
    "/api/vehicle-registration",
    "/dashboard/api/registration-data",
];

/// Query parameter sets tried against each endpoint.
const PARAM_SETS: &[&[(&str, &str)]] = &[
    &[("state", "DL"), ("period", "monthly"), ("vehicle_type", "all")],
    &[("state", "all"), ("from_date", "2023-01-01"), ("to_date", "2024-12-31")],
    &[("type", "registration"), ("format", "json")],
];

/// Probes every endpoint × parameter-set combination sequentially, returning
/// the first batch that normalizes to at least one record. Individual
/// attempt failures are logged and skipped.
pub(super) async fn try_endpoints<C: HttpClient>(client: &C, base_url: &str) -> Vec<RegistrationRecord> {
    for endpoint in ENDPOINTS {
        for params in PARAM_SETS {
            match attempt(client, base_url, endpoint, params).await {
                Ok(records) if !records.is_empty() => return records,
                Ok(_) => {}
                Err(e) => debug!(endpoint, error = %e, "API attempt failed"),
            }
            sleep(API_ATTEMPT_DELAY).await;
        }
    }
    Vec::new()
}

async fn attempt<C: HttpClient>(
    client: &C,
    base_url: &str,
    endpoint: &str,
    params: &[(&str, &str)],
) -> anyhow::Result<Vec<RegistrationRecord>> {
    let url = reqwest::Url::parse_with_params(&format!("{base_url}{endpoint}"), params)?;
    let req = reqwest::Request::new(reqwest::Method::GET, url);

    let resp = client.execute(req).await?;
    if !resp.status().is_success() {
        anyhow::bail!("endpoint returned status {}", resp.status());
    }

    let json: Value = resp.json().await?;
    let raw = extract_records(&json);
    Ok(normalize_records(&raw))
}
