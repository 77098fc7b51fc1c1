use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryCustomerRepository, InMemoryLoanRepository};
use crate::routes::with_lending_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use credit_core::config::AppConfig;
use credit_core::error::AppError;
use credit_core::lending::LendingService;
use credit_core::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let lending_service = Arc::new(LendingService::new(
        Arc::new(InMemoryCustomerRepository::default()),
        Arc::new(InMemoryLoanRepository::default()),
        config.lending,
    ));

    let policy = lending_service.policy().config().clone();

    let app = with_lending_routes(lending_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        affordability_ratio = policy.affordability_ratio,
        days_per_tenure_month = policy.days_per_tenure_month,
        "credit approval service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
