use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::allocation::SeatAvailability;
use super::domain::CandidateSubmission;
use super::service::{AllotmentRequest, CounsellingError, CounsellingService};

/// Router builder exposing eligibility, allotment, standing and catalog endpoints.
pub fn counselling_router<A>(service: Arc<CounsellingService<A>>) -> Router
where
    A: SeatAvailability + 'static,
{
    Router::new()
        .route(
            "/api/v1/counselling/eligibility",
            post(eligibility_handler::<A>),
        )
        .route(
            "/api/v1/counselling/eligibility/batch",
            post(batch_eligibility_handler::<A>),
        )
        .route("/api/v1/counselling/allotment", post(allotment_handler::<A>))
        .route(
            "/api/v1/counselling/standing/:rank",
            get(standing_handler::<A>),
        )
        .route("/api/v1/counselling/catalog", get(catalog_handler::<A>))
        .with_state(service)
}

fn error_response(error: CounsellingError) -> Response {
    let status = match error {
        CounsellingError::Intake(_) | CounsellingError::Preference(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        CounsellingError::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn eligibility_handler<A>(
    State(service): State<Arc<CounsellingService<A>>>,
    axum::Json(submission): axum::Json<CandidateSubmission>,
) -> Response
where
    A: SeatAvailability + 'static,
{
    match service.assess(&submission) {
        Ok(assessment) => (StatusCode::OK, axum::Json(assessment)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn batch_eligibility_handler<A>(
    State(service): State<Arc<CounsellingService<A>>>,
    axum::Json(submissions): axum::Json<Vec<CandidateSubmission>>,
) -> Response
where
    A: SeatAvailability + 'static,
{
    let outcomes = service.assess_batch(submissions).await;
    let payload: Vec<serde_json::Value> = outcomes
        .into_iter()
        .map(|outcome| match outcome {
            Ok(assessment) => json!({ "assessment": assessment }),
            Err(error) => json!({ "error": error.to_string() }),
        })
        .collect();

    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn allotment_handler<A>(
    State(service): State<Arc<CounsellingService<A>>>,
    axum::Json(request): axum::Json<AllotmentRequest>,
) -> Response
where
    A: SeatAvailability + 'static,
{
    match service.allot(&request) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn standing_handler<A>(
    State(service): State<Arc<CounsellingService<A>>>,
    Path(rank): Path<u32>,
) -> Response
where
    A: SeatAvailability + 'static,
{
    match service.standing(rank) {
        Ok(standing) => (StatusCode::OK, axum::Json(standing)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn catalog_handler<A>(
    State(service): State<Arc<CounsellingService<A>>>,
) -> Response
where
    A: SeatAvailability + 'static,
{
    let snapshot = service.catalog().snapshot();
    (StatusCode::OK, axum::Json(snapshot.as_ref())).into_response()
}
