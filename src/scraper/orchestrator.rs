use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{info, warn};

use crate::error::ScrapeError;
use crate::scraper::ScraperRunner;
use crate::transform::ListingTransformer;
use crate::types::{NormalizedListing, RawListing};

/// Runs the scraper, loads its artifact and normalizes every record.
/// Every call is a full scraper run; nothing is cached between calls.
pub struct ScrapeOrchestrator {
    runner: Arc<dyn ScraperRunner>,
    transformer: ListingTransformer,
}

impl ScrapeOrchestrator {
    pub fn new(runner: Arc<dyn ScraperRunner>, transformer: ListingTransformer) -> Self {
        Self {
            runner,
            transformer,
        }
    }

    pub fn run(&self) -> Result<Vec<NormalizedListing>, ScrapeError> {
        let started = Instant::now();
        info!("[SCRAPE] starting live scrape");

        let artifact = self.runner.run()?;
        let records = parse_artifact(&artifact)?;
        info!("[SCRAPE] loaded {} raw listings", records.len());

        let listings: Vec<NormalizedListing> = records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                if !record.is_object() {
                    warn!("[TRANSFORM] record {i} is not an object; emitting empty listing");
                }
                self.transformer.transform(&RawListing::from_value(record))
            })
            .collect();

        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "[SCRAPE] normalized {} listings",
            listings.len()
        );
        Ok(listings)
    }
}

/// The artifact must be a non-empty JSON array.
pub fn parse_artifact(text: &str) -> Result<Vec<Value>, ScrapeError> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Array(records) = value else {
        return Err(ScrapeError::Unexpected(
            "scraper artifact is not a JSON array".to_string(),
        ));
    };
    if records.is_empty() {
        return Err(ScrapeError::EmptyResult);
    }
    Ok(records)
}
