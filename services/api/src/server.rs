use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemorySettlementRepository};
use crate::routes::with_settlement_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use scoreline::config::AppConfig;
use scoreline::error::AppError;
use scoreline::settlement::{AllowAllChips, ScoringEngine, SettlementService};
use scoreline::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let engine = ScoringEngine::new(config.scoring.clone());
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        engine: Arc::new(engine.clone()),
    };

    let repository = Arc::new(InMemorySettlementRepository::default());
    let settlement_service = Arc::new(SettlementService::new(
        repository,
        Arc::new(AllowAllChips),
        engine,
    ));

    let app = with_settlement_routes(settlement_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "prediction settlement service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
