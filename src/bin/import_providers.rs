//! One-shot provider directory import
//!
//! Reads a JSON array of provider records and replaces the directory
//! contents, then drops any cached search responses. Run out of band;
//! the serving path never writes to the directory.
//!
//! ```text
//! import-providers data/providers.json
//! ```

use std::collections::HashSet;
use std::process::ExitCode;

use serde::Deserialize;
use tracing::{error, info, warn};

use medmatch::config::Settings;
use medmatch::models::Provider;
use medmatch::services::{CacheKey, CacheManager, PgDirectory, ProviderDirectory};

/// A provider row as it appears in the source dataset
///
/// The dataset predates this service and uses capitalized column names;
/// aliases accept both spellings.
#[derive(Debug, Deserialize)]
struct ImportRecord {
    id: i64,
    #[serde(alias = "Name")]
    name: String,
    #[serde(alias = "Category")]
    category: String,
    #[serde(rename = "addressDetails", alias = "Address/Details")]
    address_details: String,
    #[serde(alias = "City")]
    city: String,
    #[serde(alias = "Rating")]
    rating: f64,
}

impl From<ImportRecord> for Provider {
    fn from(record: ImportRecord) -> Self {
        Provider {
            id: record.id,
            name: record.name,
            category: record.category,
            address_details: record.address_details,
            city: record.city,
            rating: record.rating,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("Usage: import-providers <providers.json>");
        return ExitCode::from(2);
    };

    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) => {
            error!("Failed to read {}: {}", path, e);
            return ExitCode::FAILURE;
        }
    };

    let records: Vec<ImportRecord> = match serde_json::from_str(&raw) {
        Ok(records) => records,
        Err(e) => {
            error!("Failed to parse {}: {}", path, e);
            return ExitCode::FAILURE;
        }
    };

    // Cross-stage de-duplication in the search assumes unique ids; refuse
    // a dataset that breaks that up front
    let mut seen = HashSet::new();
    for record in &records {
        if !seen.insert(record.id) {
            error!("Duplicate provider id {} in {}", record.id, path);
            return ExitCode::FAILURE;
        }
    }

    let providers: Vec<Provider> = records.into_iter().map(Into::into).collect();
    info!("Loaded {} provider records from {}", providers.len(), path);

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let directory = match PgDirectory::from_settings(
        &settings.database.url,
        settings.database.max_connections,
        settings.database.min_connections,
    )
    .await
    {
        Ok(directory) => directory,
        Err(e) => {
            error!("Failed to connect to provider directory: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let inserted = match directory.bulk_replace(providers).await {
        Ok(inserted) => inserted,
        Err(e) => {
            error!("Import failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Imported {} providers", inserted);

    // Cached search responses are stale now; clearing them is best-effort
    let cache_ttl = settings.cache.ttl_secs.unwrap_or(300);
    let l1_cache_size = settings.cache.l1_cache_size.unwrap_or(1000);

    match CacheManager::new(&settings.cache.redis_url, l1_cache_size, cache_ttl).await {
        Ok(cache) => {
            if let Err(e) = cache.invalidate_pattern(CacheKey::nearby_search_pattern()).await {
                warn!("Failed to invalidate cached searches: {}", e);
            }
        }
        Err(e) => {
            warn!("Redis unavailable, cached searches expire by TTL: {}", e);
        }
    }

    ExitCode::SUCCESS
}
