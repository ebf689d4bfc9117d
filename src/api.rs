//! HTTP surface for the review analysis pipeline.
//!
//! This module exposes a compact Axum router:
//!
//! - `GET /` – Liveness check returning `{"status":"ok","message":"API is running"}`.
//! - `POST /analyze` – Run the full pipeline over `{"reviews": [...]}` and return one
//!   [`AnalysisResult`] per input, in order.
//! - `GET /metrics` – Observe pipeline counters.
//!
//! Browser access is restricted to the configured CORS origins. Malformed bodies are rejected by
//! the JSON extractor before the pipeline runs.

use crate::metrics::MetricsSnapshot;
use crate::pipeline::{AnalysisApi, AnalysisResult};
use axum::{
    Json, Router,
    extract::State,
    http::HeaderValue,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

/// Build the HTTP router exposing the analysis API surface.
pub fn create_router<S>(service: Arc<S>, cors_origins: &[String]) -> Router
where
    S: AnalysisApi + 'static,
{
    Router::new()
        .route("/", get(health))
        .route("/analyze", post(analyze_reviews::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .with_state(service)
        .layer(build_cors(cors_origins))
        .layer(TraceLayer::new_for_http())
}

/// Credentialed CORS cannot use wildcards, so methods and headers mirror the preflight request.
///
/// A `*` entry mirrors the request origin instead of listing origins.
fn build_cors(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|origin| origin.trim() == "*") {
        AllowOrigin::mirror_request()
    } else {
        let allowed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(error) => {
                    tracing::warn!(origin, %error, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(allowed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Response body for `GET /`.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    message: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: "API is running",
    })
}

/// Request body for the `POST /analyze` endpoint.
#[derive(Deserialize)]
struct AnalyzeRequest {
    /// Reviews to analyze, processed in order.
    reviews: Vec<String>,
}

/// Analyze a batch of reviews.
///
/// Per-review failures are folded into the results (empty topics, `Error: ...` summaries), so
/// this handler always answers 200 once the body parses.
async fn analyze_reviews<S>(
    State(service): State<Arc<S>>,
    Json(request): Json<AnalyzeRequest>,
) -> Json<Vec<AnalysisResult>>
where
    S: AnalysisApi,
{
    let count = request.reviews.len();
    let results = service.analyze_reviews(request.reviews).await;
    tracing::info!(reviews = count, "Analyze request completed");
    Json(results)
}

/// Return the pipeline counters.
async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<MetricsSnapshot>
where
    S: AnalysisApi,
{
    Json(service.metrics_snapshot())
}
