//! CLI entry point for the registration growth tracker.
//!
//! Provides subcommands for analyzing a record payload from a file or URL,
//! running the live acquisition chain into a CSV store, and rebuilding the
//! analytics bundle from stored records.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use vahan_reg_tracker::{
    analytics::{RecordFilter, process},
    collect::{Collector, DEFAULT_BASE_URL},
    fetch::{
        BasicClient,
        auth::{ApiKey, UrlParam},
        fetch_bytes,
    },
    normalize::{normalize_category, normalize_records},
    output::{append_records, print_json, read_records, write_json},
    parser::parse_records,
    record::DataSource,
};

/// Per-request bound on live fetch attempts.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Parser)]
#[command(name = "vahan_reg_tracker")]
#[command(about = "Vehicle registration growth analytics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a record payload from a file or URL
    Analyze {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Optional JSON file to write the result bundle to
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Run the acquisition chain and append records to a CSV store
    Collect {
        /// CSV file to append collected records to
        #[arg(short, long, default_value = "registrations.csv")]
        output: String,

        /// Dashboard base URL
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,

        /// API key sent as an Authorization bearer header
        /// (falls back to the VAHAN_API_KEY environment variable)
        #[arg(long)]
        api_key: Option<String>,

        /// Send the API key as this URL query parameter instead of a header
        #[arg(long)]
        api_key_param: Option<String>,
    },
    /// Rebuild the analytics bundle from a CSV record store
    Report {
        /// CSV file previously written by `collect`
        #[arg(value_name = "CSV")]
        input: String,

        /// Keep only records on or after this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Keep only records on or before this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Keep only these categories (e.g. 2W, "Two Wheeler")
        #[arg(long)]
        category: Vec<String>,

        /// Keep only these manufacturers
        #[arg(long)]
        manufacturer: Vec<String>,

        /// Optional JSON file to write the result bundle to
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/vahan_reg_tracker.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("vahan_reg_tracker.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { source, output } => {
            let bytes = fetcher(&source).await?;
            let raw = parse_records(&bytes)?;
            let records = normalize_records(&raw);
            info!(raw = raw.len(), normalized = records.len(), "Payload ingested");

            let bundle = process(&records);
            print_json(&bundle)?;
            if let Some(path) = output {
                write_json(&path, &bundle)?;
            }
        }
        Commands::Collect {
            output,
            base_url,
            api_key,
            api_key_param,
        } => {
            let client = BasicClient::with_timeout(REQUEST_TIMEOUT)?;
            let api_key = api_key.or_else(|| std::env::var("VAHAN_API_KEY").ok());
            let collection = match (api_key, api_key_param) {
                (Some(key), Some(param_name)) => {
                    let client = UrlParam {
                        inner: client,
                        param_name,
                        key,
                    };
                    Collector::new(client, &base_url).collect().await
                }
                (Some(key), None) => {
                    Collector::new(ApiKey::bearer(client, key), &base_url)
                        .collect()
                        .await
                }
                (None, _) => Collector::new(client, &base_url).collect().await,
            };

            info!(
                source = ?collection.source,
                count = collection.records.len(),
                "Collection finished"
            );
            if collection.source == DataSource::Placeholder {
                warn!("Live sources unavailable; stored records are placeholders");
            }
            append_records(&output, &collection.records)?;
        }
        Commands::Report {
            input,
            from,
            to,
            category,
            manufacturer,
            output,
        } => {
            let records = read_records(&input)?;
            let filter = RecordFilter {
                from,
                to,
                categories: if category.is_empty() {
                    None
                } else {
                    Some(category.iter().map(|c| normalize_category(c)).collect())
                },
                manufacturers: if manufacturer.is_empty() {
                    None
                } else {
                    Some(manufacturer)
                },
            };

            let filtered = filter.apply(&records);
            info!(total = records.len(), kept = filtered.len(), "Records filtered");

            let bundle = process(&filtered);
            print_json(&bundle)?;
            if let Some(path) = output {
                write_json(&path, &bundle)?;
            }
        }
    }

    Ok(())
}

/// Loads a record payload from a local file path or fetches it over HTTP.
#[tracing::instrument(fields(source = %source))]
async fn fetcher(source: &String) -> Result<Vec<u8>> {
    let bytes = if source.starts_with("http") {
        let client = BasicClient::with_timeout(REQUEST_TIMEOUT)?;
        fetch_bytes(&client, source).await?
    } else {
        std::fs::read(source)?
    };
    Ok(bytes)
}
