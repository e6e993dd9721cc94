use crate::cli::ServeArgs;
use crate::infra::{build_service, AppState};
use crate::routes::with_counselling_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use merit_counsel::config::AppConfig;
use merit_counsel::error::AppError;
use merit_counsel::telemetry;
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
    if let Some(catalog) = args.catalog.take() {
        config.counselling.catalog_path = Some(catalog);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));

    let service = build_service(&config.counselling)?;
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        catalog: Arc::clone(service.catalog()),
        catalog_path: config.counselling.catalog_path.clone(),
    };

    let app = with_counselling_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        seat_success_rate = config.counselling.seat_success_rate,
        seeded = config.counselling.seed.is_some(),
        "merit counselling service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
