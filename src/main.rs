mod api;
mod config;
mod error;
mod normalize;
mod scraper;
mod transform;
mod types;

use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::api::routes::{router, ApiState};
use crate::config::Config;
use crate::error::Result;
use crate::normalize::{CurrencyNormalizer, TextNormalizer};
use crate::scraper::{ProcessRunner, ScrapeOrchestrator};
use crate::transform::ListingTransformer;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    // --- Scraper collaborator ---
    let runner = ProcessRunner::new(cfg.launch.clone(), &cfg.scraper_workdir, &cfg.scraper_output);
    info!("Scraper launch strategy: {}", cfg.launch);
    info!("Scraper artifact: {}", runner.artifact().display());

    // --- Normalization pipeline ---
    let currency = CurrencyNormalizer::new(cfg.conversion_rate, cfg.currency_symbol.clone());
    let transformer = ListingTransformer::new(TextNormalizer::default(), currency);
    info!(
        "Currency conversion: x{} with symbol {:?} (fixed rate, not a live quote)",
        cfg.conversion_rate, cfg.currency_symbol
    );

    let orchestrator = ScrapeOrchestrator::new(Arc::new(runner), transformer);

    match cfg.scrape_timeout {
        Some(t) => info!("Scrape requests time out after {}s", t.as_secs()),
        None => warn!("SCRAPE_TIMEOUT_SECS not set; a hung scraper blocks /scrap indefinitely"),
    }

    // --- HTTP API server ---
    let app = router(ApiState::new(orchestrator, cfg.scrape_timeout));
    let bind_addr = format!("0.0.0.0:{}", cfg.api_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("HTTP API listening on {bind_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
