use crate::infra::{AppState, PreviewRequest, ScoreRequest};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use scoreline::error::AppError;
use scoreline::settlement::{
    settlement_router, ChipEligibility, ScoringResult, Settlement, SettlementRepository,
    SettlementService, SettlementServiceError,
};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

pub(crate) fn with_settlement_routes<R, P>(service: Arc<SettlementService<R, P>>) -> axum::Router
where
    R: SettlementRepository + 'static,
    P: ChipEligibility + 'static,
{
    settlement_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/score", axum::routing::post(score_endpoint))
        .route(
            "/api/v1/score/preview",
            axum::routing::post(preview_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Scores an ad-hoc prediction without touching stored data.
pub(crate) async fn score_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<ScoreRequest>,
) -> Result<Json<ScoringResult>, AppError> {
    let outcome = state
        .engine
        .score(&payload.prediction, payload.result.as_ref());
    debug!(pending = outcome.is_pending(), "ad-hoc prediction scored");
    Ok(Json(outcome))
}

pub(crate) async fn preview_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<PreviewRequest>,
) -> Result<Json<Settlement>, AppError> {
    payload
        .prediction
        .validate()
        .map_err(SettlementServiceError::from)?;
    Ok(Json(state.engine.potential(&payload.prediction)))
}
