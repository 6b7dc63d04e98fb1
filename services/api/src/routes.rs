use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;

use jobhub::portal::applications::ApplicationRepository;
use jobhub::portal::auth::SessionStore;
use jobhub::portal::jobs::JobRepository;
use jobhub::portal::profiles::ProfileRepository;
use jobhub::portal::{portal_router, PortalState};

pub(crate) fn with_portal_routes<P, J, A, S>(state: PortalState<P, J, A, S>) -> axum::Router
where
    P: ProfileRepository + 'static,
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    S: SessionStore + 'static,
{
    portal_router(state)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
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
