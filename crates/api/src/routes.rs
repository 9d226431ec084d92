use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::{Json, Router};
use extract::{Extractor, Trace};
use params::ExtractionRequest;
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::error::{ApiError, NO_TRACES};
use crate::form::read_eic_form;
use crate::metrics::{Metrics, MetricsSnapshot, Outcome, TimedOperation};
use crate::upload::TempUpload;

#[derive(Clone)]
pub struct AppState {
    pub extractor: Extractor,
    pub metrics: Arc<Metrics>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct EicResponse {
    pub traces: Vec<Trace>,
    #[serde(flatten)]
    pub request: ExtractionRequest,
    pub total_points: usize,
}

impl EicResponse {
    fn new(request: ExtractionRequest, traces: Vec<Trace>) -> Self {
        let total_points = traces.iter().map(|trace| trace.time.len()).sum();
        Self {
            traces,
            request,
            total_points,
        }
    }
}

pub fn build_router(state: Arc<AppState>, config: &ServerConfig) -> Result<Router> {
    Ok(Router::new()
        .route("/api/health", get(health_check))
        .route("/api/eic", post(extract_eics))
        .route("/api/stats", get(get_stats))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes()))
        .layer(cors_layer(&config.allowed_origins)?)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|origin| origin == "*") {
        return Ok(cors.allow_origin(Any));
    }

    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid allowed origin: {origin}"))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(cors.allow_origin(AllowOrigin::list(origins)))
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn get_stats(State(state): State<Arc<AppState>>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}

#[tracing::instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
async fn extract_eics(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<EicResponse>, ApiError> {
    let result = run_extraction(&state, multipart).await;

    match &result {
        Ok(response) => {
            info!(
                traces = response.traces.len(),
                total_points = response.total_points,
                "EIC extraction succeeded"
            );
            state.metrics.record_request(Outcome::Success {
                traces: response.traces.len(),
                points: response.total_points,
            });
        }
        Err(err @ ApiError::Processing(_)) => {
            error!(error = %err, "EIC extraction failed");
            state.metrics.record_request(Outcome::ProcessingFailure);
        }
        Err(err) => {
            warn!(error = %err, "Rejected EIC request");
            state.metrics.record_request(Outcome::ValidationFailure);
        }
    }

    result.map(Json)
}

async fn run_extraction(state: &AppState, multipart: Multipart) -> Result<EicResponse, ApiError> {
    let form = read_eic_form(multipart).await?;
    let request = ExtractionRequest::from_form(&form.fields)?;

    let upload = TempUpload::materialize(&form.file)
        .await
        .map_err(ApiError::processing)?;

    let timer = TimedOperation::start();
    let traces = state
        .extractor
        .extract_traces(upload.path(), &request)
        .await;
    state.metrics.record_extract(timer.elapsed());
    drop(upload);

    let traces = traces.map_err(ApiError::processing)?;
    if traces.is_empty() {
        return Err(ApiError::Validation(NO_TRACES.to_string()));
    }

    Ok(EicResponse::new(request, traces))
}
