use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use merit_counsel::counselling::{counselling_router, CounsellingService, SeatAvailability};
use merit_counsel::error::AppError;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_counselling_routes<A>(service: Arc<CounsellingService<A>>) -> axum::Router
where
    A: SeatAvailability + 'static,
{
    counselling_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/counselling/catalog/reload",
            axum::routing::post(catalog_reload_endpoint),
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
        json!({ "status": "ready", "catalog_version": state.catalog.snapshot().version })
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

/// Re-read the configured CSV. A failed reload leaves the current snapshot serving.
pub(crate) async fn catalog_reload_endpoint(
    Extension(state): Extension<AppState>,
) -> Result<Response, AppError> {
    let Some(path) = state.catalog_path.clone() else {
        let payload =
            json!({ "error": "no catalog path configured; serving the built-in sample" });
        return Ok((StatusCode::CONFLICT, Json(payload)).into_response());
    };

    let snapshot = state.catalog.reload_from_path(&path)?;
    Ok((
        StatusCode::OK,
        Json(json!({
            "version": snapshot.version,
            "loaded_at": snapshot.loaded_at,
            "programs": snapshot.catalog.program_count(),
        })),
    )
        .into_response())
}
