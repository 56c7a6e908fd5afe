use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

use boscocare::identity::IdentityProvider;
use boscocare::workflows::enrollment::{
    admissions_router, records_router, AdmissionsService, ApplicationRepository, RecordsService,
    StudentRecordRepository,
};

/// Assemble the full service router: enrollment endpoints plus the
/// operational probes.
pub(crate) fn with_enrollment_routes<A, S, I>(
    admissions: Arc<AdmissionsService<A, S>>,
    records: Arc<RecordsService<S>>,
    identity: Arc<I>,
) -> axum::Router
where
    A: ApplicationRepository + 'static,
    S: StudentRecordRepository + 'static,
    I: IdentityProvider + 'static,
{
    admissions_router(admissions, identity.clone())
        .merge(records_router(records, identity))
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
