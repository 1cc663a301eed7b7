use axum::{http::StatusCode, response::IntoResponse, Json};
use thiserror::Error;

/// Terminal failures of a single scrape run. None of these are retried.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("scraper process error (exit status {status}): {stderr}")]
    ProcessFailure { status: String, stderr: String },

    #[error("no output produced: {0} was not written")]
    MissingArtifact(String),

    #[error("no data: scraper produced an empty listing array")]
    EmptyResult,

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl From<std::io::Error> for ScrapeError {
    fn from(e: std::io::Error) -> Self {
        ScrapeError::Unexpected(format!("IO error: {e}"))
    }
}

impl From<serde_json::Error> for ScrapeError {
    fn from(e: serde_json::Error) -> Self {
        ScrapeError::Unexpected(format!("JSON parse error: {e}"))
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    #[error("scrape did not finish within {0}s")]
    Timeout(u64),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = serde_json::json!({ "detail": format!("Scraping failed: {self}") });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_failure_carries_stderr() {
        let e = ScrapeError::ProcessFailure {
            status: "1".to_string(),
            stderr: "spider not found".to_string(),
        };
        let msg = e.to_string();
        assert!(msg.starts_with("scraper process error"));
        assert!(msg.contains("spider not found"));
    }

    #[test]
    fn scrape_errors_map_to_500() {
        let resp = AppError::from(ScrapeError::EmptyResult).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn timeout_maps_to_504() {
        let resp = AppError::Timeout(30).into_response();
        assert_eq!(resp.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn json_errors_become_unexpected_scrape_errors() {
        let json_err = serde_json::from_str::<serde_json::Value>("[{").unwrap_err();
        let app: AppError = ScrapeError::from(json_err).into();
        assert!(matches!(app, AppError::Scrape(ScrapeError::Unexpected(ref m)) if m.starts_with("JSON parse error")));
        assert_eq!(app.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
