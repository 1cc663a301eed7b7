use std::path::PathBuf;
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::scraper::LaunchStrategy;

pub const SERVICE_NAME: &str = "Bolagsplatsen Scraper API";
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Artifact the scraper writes into its working directory.
pub const SCRAPER_OUTPUT: &str = "bolagsplatsen_listings.json";

/// Entry script preferred by the `auto` launch strategy when present.
pub const SCRAPER_ENTRYPOINT: &str = "start_scraper.py";
pub const SCRAPER_PYTHON: &str = "python3";
pub const SCRAPER_PROGRAM: &str = "scrapy";
pub const SCRAPER_SPIDER: &str = "bolagsplatsen";

/// Fixed SEK → USD rate. Approximate on purpose; this is not a live FX lookup.
pub const CONVERSION_RATE: f64 = 0.1;
pub const CURRENCY_SYMBOL: &str = "$";

/// Structured-content blocks whose trimmed text is this short or shorter are skipped.
pub const MIN_SECTION_CHARS: usize = 20;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub api_port: u16,
    /// Directory the scraper runs in and writes its artifact to (SCRAPER_WORKDIR)
    pub scraper_workdir: PathBuf,
    /// Artifact file name, relative to the workdir (SCRAPER_OUTPUT)
    pub scraper_output: String,
    /// How the scraper process is started (SCRAPER_LAUNCH=auto|script|crawl)
    pub launch: LaunchStrategy,
    /// Multiplier applied to scraped SEK prices (CONVERSION_RATE)
    pub conversion_rate: f64,
    pub currency_symbol: String,
    /// Boundary timeout for a scrape request (SCRAPE_TIMEOUT_SECS). None = wait forever.
    pub scrape_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            api_port: std::env::var("API_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse::<u16>()
                .map_err(|_| AppError::Config("API_PORT must be a valid port number".to_string()))?,
            scraper_workdir: std::env::var("SCRAPER_WORKDIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            scraper_output: std::env::var("SCRAPER_OUTPUT")
                .unwrap_or_else(|_| SCRAPER_OUTPUT.to_string()),
            launch: launch_from_env()?,
            conversion_rate: std::env::var("CONVERSION_RATE")
                .unwrap_or_else(|_| CONVERSION_RATE.to_string())
                .parse::<f64>()
                .ok()
                .filter(|r| r.is_finite())
                .ok_or_else(|| AppError::Config("CONVERSION_RATE must be a number".to_string()))?,
            currency_symbol: std::env::var("CURRENCY_SYMBOL")
                .unwrap_or_else(|_| CURRENCY_SYMBOL.to_string()),
            scrape_timeout: std::env::var("SCRAPE_TIMEOUT_SECS")
                .ok()
                .map(|s| {
                    s.trim().parse::<u64>().map(Duration::from_secs).map_err(|_| {
                        AppError::Config("SCRAPE_TIMEOUT_SECS must be whole seconds".to_string())
                    })
                })
                .transpose()?,
        })
    }
}

fn launch_from_env() -> Result<LaunchStrategy> {
    let interpreter = std::env::var("SCRAPER_PYTHON").unwrap_or_else(|_| SCRAPER_PYTHON.to_string());
    let script = std::env::var("SCRAPER_ENTRYPOINT")
        .unwrap_or_else(|_| SCRAPER_ENTRYPOINT.to_string());
    let program = std::env::var("SCRAPER_PROGRAM").unwrap_or_else(|_| SCRAPER_PROGRAM.to_string());
    let spider = std::env::var("SCRAPER_SPIDER").unwrap_or_else(|_| SCRAPER_SPIDER.to_string());

    let mode = std::env::var("SCRAPER_LAUNCH").unwrap_or_else(|_| "auto".to_string());
    parse_launch(&mode, interpreter, script, program, spider)
}

pub fn parse_launch(
    mode: &str,
    interpreter: String,
    script: String,
    program: String,
    spider: String,
) -> Result<LaunchStrategy> {
    match mode.trim().to_lowercase().as_str() {
        "auto" => Ok(LaunchStrategy::Auto {
            interpreter,
            script,
            program,
            spider,
        }),
        "script" => Ok(LaunchStrategy::EntryScript { interpreter, script }),
        "crawl" => Ok(LaunchStrategy::Crawl { program, spider }),
        other => Err(AppError::Config(format!(
            "SCRAPER_LAUNCH must be auto, script or crawl (got {other:?})"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn launch(mode: &str) -> Result<LaunchStrategy> {
        parse_launch(
            mode,
            "python3".to_string(),
            "start_scraper.py".to_string(),
            "scrapy".to_string(),
            "bolagsplatsen".to_string(),
        )
    }

    #[test]
    fn launch_modes_parse() {
        assert!(matches!(launch("auto"), Ok(LaunchStrategy::Auto { .. })));
        assert!(matches!(launch(" Script "), Ok(LaunchStrategy::EntryScript { .. })));
        match launch("crawl") {
            Ok(LaunchStrategy::Crawl { program, spider }) => {
                assert_eq!(program, "scrapy");
                assert_eq!(spider, "bolagsplatsen");
            }
            other => panic!("expected Crawl, got {other:?}"),
        }
    }

    #[test]
    fn unknown_launch_mode_is_config_error() {
        assert!(matches!(launch("docker"), Err(AppError::Config(_))));
    }
}
