//! Data acquisition: live API attempts, a web-scrape fallback, and a final
//! placeholder dataset.
//!
//! The chain is strictly sequential with fixed sleeps between attempts and a
//! per-request timeout on the client. Every failure degrades to the next
//! stage; [`Collector::collect`] itself never errors.

mod api;
mod sample;
mod scrape;

pub use sample::placeholder_records;

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::fetch::HttpClient;
use crate::record::{DataSource, RegistrationRecord};

/// Base URL of the national registration dashboard.
pub const DEFAULT_BASE_URL: &str = "https://vahan.parivahan.gov.in";

/// Pause between successive API endpoint attempts.
const API_ATTEMPT_DELAY: Duration = Duration::from_secs(1);
/// Pause between successive page scrape attempts.
const SCRAPE_ATTEMPT_DELAY: Duration = Duration::from_secs(2);

/// A collected batch of normalized records, tagged with the stage that
/// produced it.
#[derive(Debug, Clone)]
pub struct Collection {
    pub records: Vec<RegistrationRecord>,
    pub source: DataSource,
}

/// Sequential acquisition chain over a pluggable HTTP client.
pub struct Collector<C> {
    client: C,
    base_url: String,
}

impl<C: HttpClient> Collector<C> {
    pub fn new(client: C, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Runs the chain to completion: API endpoints, then page scraping, then
    /// the placeholder dataset. The first stage that yields at least one
    /// normalized record wins.
    pub async fn collect(&self) -> Collection {
        let records = api::try_endpoints(&self.client, &self.base_url).await;
        if !records.is_empty() {
            info!(count = records.len(), "Collected records from API");
            return Collection {
                records,
                source: DataSource::Api,
            };
        }
        debug!("API attempts produced no records");

        let records = scrape::try_pages(&self.client, &self.base_url).await;
        if !records.is_empty() {
            info!(count = records.len(), "Collected records from scraped pages");
            return Collection {
                records,
                source: DataSource::Scrape,
            };
        }
        debug!("Scrape attempts produced no records");

        let records = placeholder_records();
        warn!(count = records.len(), "Falling back to placeholder dataset");
        Collection {
            records,
            source: DataSource::Placeholder,
        }
    }
}
