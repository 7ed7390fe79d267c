use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tracing::error;

use crate::error::AppError;

use super::chips::{ChipCommand, ChipDefinition, ChipEligibility};
use super::domain::{FixtureId, MatchResult, PredictionKey, PredictionSubmission, UserId};
use super::repository::{RepositoryError, SettlementRepository};
use super::service::{SettlementService, SettlementServiceError};

/// Router builder exposing prediction intake, result recording, and settlement reads.
pub fn settlement_router<R, P>(service: Arc<SettlementService<R, P>>) -> Router
where
    R: SettlementRepository + 'static,
    P: ChipEligibility + 'static,
{
    Router::new()
        .route("/api/v1/chips", get(catalog_handler::<R, P>))
        .route("/api/v1/rules", get(rules_handler::<R, P>))
        .route("/api/v1/predictions", post(submit_handler::<R, P>))
        .route(
            "/api/v1/predictions/:user_id/:fixture_id/chips",
            post(chip_handler::<R, P>),
        )
        .route(
            "/api/v1/predictions/:user_id/:fixture_id/score",
            get(score_handler::<R, P>),
        )
        .route(
            "/api/v1/predictions/:user_id/:fixture_id/preview",
            get(preview_handler::<R, P>),
        )
        .route(
            "/api/v1/fixtures/:fixture_id/result",
            post(result_handler::<R, P>),
        )
        .route("/api/v1/standings", get(standings_handler::<R, P>))
        .with_state(service)
}

fn prediction_key(user_id: String, fixture_id: String) -> PredictionKey {
    PredictionKey {
        user_id: UserId(user_id),
        fixture_id: FixtureId(fixture_id),
    }
}

pub(crate) async fn catalog_handler<R, P>(
    State(service): State<Arc<SettlementService<R, P>>>,
) -> Response
where
    R: SettlementRepository + 'static,
    P: ChipEligibility + 'static,
{
    let chips: Vec<&ChipDefinition> = service.engine().catalog().iter().collect();
    (StatusCode::OK, axum::Json(chips)).into_response()
}

pub(crate) async fn rules_handler<R, P>(
    State(service): State<Arc<SettlementService<R, P>>>,
) -> Response
where
    R: SettlementRepository + 'static,
    P: ChipEligibility + 'static,
{
    (StatusCode::OK, axum::Json(service.engine().rules().clone())).into_response()
}

pub(crate) async fn submit_handler<R, P>(
    State(service): State<Arc<SettlementService<R, P>>>,
    axum::Json(submission): axum::Json<PredictionSubmission>,
) -> Response
where
    R: SettlementRepository + 'static,
    P: ChipEligibility + 'static,
{
    match service.submit(submission) {
        Ok(record) => (StatusCode::ACCEPTED, axum::Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn chip_handler<R, P>(
    State(service): State<Arc<SettlementService<R, P>>>,
    Path((user_id, fixture_id)): Path<(String, String)>,
    axum::Json(command): axum::Json<ChipCommand>,
) -> Response
where
    R: SettlementRepository + 'static,
    P: ChipEligibility + 'static,
{
    let key = prediction_key(user_id, fixture_id);
    match service.apply_chip(&key, command) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn score_handler<R, P>(
    State(service): State<Arc<SettlementService<R, P>>>,
    Path((user_id, fixture_id)): Path<(String, String)>,
) -> Response
where
    R: SettlementRepository + 'static,
    P: ChipEligibility + 'static,
{
    let key = prediction_key(user_id, fixture_id);
    match service.score(&key) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn preview_handler<R, P>(
    State(service): State<Arc<SettlementService<R, P>>>,
    Path((user_id, fixture_id)): Path<(String, String)>,
) -> Response
where
    R: SettlementRepository + 'static,
    P: ChipEligibility + 'static,
{
    let key = prediction_key(user_id, fixture_id);
    match service.preview(&key) {
        Ok(settlement) => (StatusCode::OK, axum::Json(settlement)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn result_handler<R, P>(
    State(service): State<Arc<SettlementService<R, P>>>,
    Path(fixture_id): Path<String>,
    axum::Json(result): axum::Json<MatchResult>,
) -> Response
where
    R: SettlementRepository + 'static,
    P: ChipEligibility + 'static,
{
    match service.record_result(FixtureId(fixture_id), result) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn standings_handler<R, P>(
    State(service): State<Arc<SettlementService<R, P>>>,
) -> Response
where
    R: SettlementRepository + 'static,
    P: ChipEligibility + 'static,
{
    match service.standings() {
        Ok(standings) => (StatusCode::OK, axum::Json(standings)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: SettlementServiceError) -> Response {
    if let SettlementServiceError::Repository(RepositoryError::Unavailable(_)) = &err {
        error!(error = %err, "settlement repository unavailable");
    }
    AppError::from(err).into_response()
}
