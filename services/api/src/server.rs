use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryApplicationRepository, InMemoryJobRepository, InMemoryProfileRepository,
    InMemorySessionStore,
};
use crate::routes::with_portal_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use jobhub::config::AppConfig;
use jobhub::error::AppError;
use jobhub::portal::{PortalService, PortalState};
use jobhub::telemetry;
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
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let service = Arc::new(PortalService::new(
        Arc::new(InMemoryProfileRepository::default()),
        Arc::new(InMemoryJobRepository::default()),
        Arc::new(InMemoryApplicationRepository::default()),
    ));
    let portal_state = PortalState {
        service,
        sessions: Arc::new(InMemorySessionStore::default()),
    };

    let app = with_portal_routes(portal_state)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "job portal api ready");

    axum::serve(listener, app).await?;
    Ok(())
}
