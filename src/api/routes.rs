use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::api::health::HealthState;
use crate::config::{SERVICE_NAME, SERVICE_VERSION};
use crate::error::{AppError, Result, ScrapeError};
use crate::scraper::ScrapeOrchestrator;
use crate::types::NormalizedListing;

#[derive(Clone)]
pub struct ApiState {
    pub orchestrator: Arc<ScrapeOrchestrator>,
    pub health: Arc<HealthState>,
    /// Held for a whole run, since every run writes the same artifact path.
    /// Callers queue; each still gets its own fresh run.
    pub scrape_lock: Arc<Mutex<()>>,
    pub scrape_timeout: Option<Duration>,
}

impl ApiState {
    pub fn new(orchestrator: ScrapeOrchestrator, scrape_timeout: Option<Duration>) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            health: Arc::new(HealthState::new()),
            scrape_lock: Arc::new(Mutex::new(())),
            scrape_timeout,
        }
    }
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/scrap", get(scrape))
        .route("/scrape", get(scrape))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub health: &'static str,
    pub scrap: &'static str,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub timestamp: u64,
    pub scrapes_ok: u64,
    pub scrapes_failed: u64,
    pub last_count: u64,
    pub last_success_at: u64,
}

#[derive(Serialize)]
pub struct ScrapeResponse {
    pub success: bool,
    pub message: String,
    pub count: usize,
    pub data: Vec<NormalizedListing>,
}

impl ScrapeResponse {
    pub fn from_listings(data: Vec<NormalizedListing>) -> Self {
        Self {
            success: true,
            message: format!("Successfully scraped {} business listings", data.len()),
            count: data.len(),
            data,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: SERVICE_NAME,
        health: "/health",
        scrap: "/scrap",
    })
}

async fn health(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        version: SERVICE_VERSION,
        timestamp: now_secs(),
        scrapes_ok: state.health.scrapes_ok(),
        scrapes_failed: state.health.scrapes_failed(),
        last_count: state.health.last_count(),
        last_success_at: state.health.last_success_at(),
    })
}

async fn scrape(State(state): State<ApiState>) -> Result<Json<ScrapeResponse>> {
    let result = run_scrape(&state).await;
    match &result {
        Ok(listings) => {
            state.health.record_success(listings.len(), now_secs());
            info!("[API] scrape returned {} listings", listings.len());
        }
        Err(e) => {
            state.health.record_failure();
            error!("[API] scrape failed: {e}");
        }
    }
    Ok(Json(ScrapeResponse::from_listings(result?)))
}

/// Runs the blocking orchestrator off the async workers. The timeout covers
/// waiting for the scrape lock as well as the run; the lock stays held until
/// the run itself finishes, even if the caller timed out.
async fn run_scrape(state: &ApiState) -> Result<Vec<NormalizedListing>> {
    let lock = Arc::clone(&state.scrape_lock);
    let orchestrator = Arc::clone(&state.orchestrator);
    let scrape = async move {
        let guard = lock.lock_owned().await;
        tokio::task::spawn_blocking(move || {
            let _guard = guard;
            orchestrator.run()
        })
        .await
    };

    let joined = match state.scrape_timeout {
        Some(limit) => tokio::time::timeout(limit, scrape)
            .await
            .map_err(|_| AppError::Timeout(limit.as_secs()))?,
        None => scrape.await,
    };
    let listings =
        joined.map_err(|e| ScrapeError::Unexpected(format!("scrape task failed: {e}")))??;
    Ok(listings)
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    use crate::scraper::ScraperRunner;
    use crate::transform::ListingTransformer;

    struct FixedRunner(std::result::Result<&'static str, fn() -> ScrapeError>);

    impl ScraperRunner for FixedRunner {
        fn run(&self) -> std::result::Result<String, ScrapeError> {
            match &self.0 {
                Ok(text) => Ok(text.to_string()),
                Err(make) => Err(make()),
            }
        }
    }

    struct SlowRunner;

    impl ScraperRunner for SlowRunner {
        fn run(&self) -> std::result::Result<String, ScrapeError> {
            std::thread::sleep(Duration::from_millis(300));
            Ok(r#"[{"title": "late"}]"#.to_string())
        }
    }

    struct HungRunner;

    impl ScraperRunner for HungRunner {
        fn run(&self) -> std::result::Result<String, ScrapeError> {
            std::thread::sleep(Duration::from_millis(1500));
            Ok("[]".to_string())
        }
    }

    fn state_with(runner: Arc<dyn ScraperRunner>, timeout: Option<Duration>) -> ApiState {
        ApiState::new(
            ScrapeOrchestrator::new(runner, ListingTransformer::default()),
            timeout,
        )
    }

    #[tokio::test]
    async fn success_maps_count_and_data() {
        let state = state_with(
            Arc::new(FixedRunner(Ok(
                r#"[{"title": "Acme AB", "revenue": "5 mkr"}, {"title": "Bageri"}]"#,
            ))),
            None,
        );
        let Json(body) = scrape(State(state.clone())).await.expect("scrape ok");
        assert!(body.success);
        assert_eq!(body.count, 2);
        assert_eq!(body.count, body.data.len());
        assert_eq!(body.message, "Successfully scraped 2 business listings");
        assert_eq!(body.data[0].company, "Acme AB");
        assert_eq!(state.health.scrapes_ok(), 1);
        assert_eq!(state.health.last_count(), 2);
    }

    #[tokio::test]
    async fn failure_maps_to_error_response() {
        let state = state_with(Arc::new(FixedRunner(Err(|| ScrapeError::EmptyResult))), None);
        let err = match scrape(State(state.clone())).await {
            Err(e) => e,
            Ok(_) => panic!("expected failure"),
        };
        assert!(matches!(err, AppError::Scrape(ScrapeError::EmptyResult)));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(state.health.scrapes_failed(), 1);
    }

    #[tokio::test]
    async fn slow_scrape_times_out() {
        let state = state_with(Arc::new(SlowRunner), Some(Duration::from_millis(20)));
        match scrape(State(state)).await {
            Err(AppError::Timeout(_)) => {}
            Err(other) => panic!("expected Timeout, got {other}"),
            Ok(_) => panic!("expected Timeout, got success"),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn queued_caller_times_out_while_run_holds_lock() {
        let state = state_with(Arc::new(HungRunner), Some(Duration::from_millis(100)));

        let first = scrape(State(state.clone())).await;
        assert!(matches!(first, Err(AppError::Timeout(_))));

        // The hung run still holds the lock; the next caller must not wait on it forever.
        let started = std::time::Instant::now();
        let second = scrape(State(state.clone())).await;
        assert!(matches!(second, Err(AppError::Timeout(_))));
        assert!(
            started.elapsed() < Duration::from_millis(500),
            "second caller waited {:?}",
            started.elapsed()
        );
        assert_eq!(state.health.scrapes_failed(), 2);
    }

    #[tokio::test]
    async fn health_reports_fixed_fields() {
        let state = state_with(Arc::new(FixedRunner(Ok("[]"))), None);
        let Json(body) = health(State(state)).await;
        assert_eq!(body.status, "healthy");
        assert_eq!(body.service, SERVICE_NAME);
        assert_eq!(body.scrapes_ok, 0);
        assert!(body.timestamp > 0);
    }

    #[tokio::test]
    async fn root_points_at_routes() {
        let Json(body) = root().await;
        assert_eq!(body.health, "/health");
        assert_eq!(body.scrap, "/scrap");
    }

    #[test]
    fn router_builds() {
        let state = state_with(Arc::new(FixedRunner(Ok("[]"))), None);
        let _ = router(state);
    }
}
