pub mod orchestrator;
pub mod runner;

pub use orchestrator::ScrapeOrchestrator;
pub use runner::{LaunchStrategy, ProcessRunner, ScraperRunner};
