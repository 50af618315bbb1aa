use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::PlacementError;
use super::report::export::{self, ExportError};
use super::repository::{RunId, RunRepository, RunStoreError};
use super::scoring::MatchingConfig;
use super::service::{PlacementService, PlacementServiceError};

/// Request body for a new allocation run.
#[derive(Debug, Deserialize)]
pub struct CreateRunRequest {
    pub students_csv: String,
    pub sites_csv: String,
    #[serde(default)]
    pub config: Option<MatchingConfig>,
}

/// Router builder exposing run creation, retrieval, downloads, and explanations.
pub fn placement_router<R>(service: Arc<PlacementService<R>>) -> Router
where
    R: RunRepository + 'static,
{
    Router::new()
        .route("/api/v1/placement/runs", post(create_run_handler::<R>))
        .route("/api/v1/placement/runs/:run_id", get(run_handler::<R>))
        .route(
            "/api/v1/placement/runs/:run_id/results.csv",
            get(results_csv_handler::<R>),
        )
        .route(
            "/api/v1/placement/runs/:run_id/summary.csv",
            get(summary_csv_handler::<R>),
        )
        .route(
            "/api/v1/placement/runs/:run_id/capacities.csv",
            get(capacities_csv_handler::<R>),
        )
        .route(
            "/api/v1/placement/runs/:run_id/explanations/:candidate_id",
            get(explanation_handler::<R>),
        )
        .route(
            "/api/v1/placement/runs/:run_id/explanations/by-index/:index",
            get(explanation_at_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn create_run_handler<R>(
    State(service): State<Arc<PlacementService<R>>>,
    axum::Json(request): axum::Json<CreateRunRequest>,
) -> Response
where
    R: RunRepository + 'static,
{
    match service.import_and_run(&request.students_csv, &request.sites_csv, request.config) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn run_handler<R>(
    State(service): State<Arc<PlacementService<R>>>,
    Path(run_id): Path<String>,
) -> Response
where
    R: RunRepository + 'static,
{
    match service.get(&RunId(run_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn results_csv_handler<R>(
    State(service): State<Arc<PlacementService<R>>>,
    Path(run_id): Path<String>,
) -> Response
where
    R: RunRepository + 'static,
{
    match service.get(&RunId(run_id)) {
        Ok(record) => csv_download(
            "placement_results.csv",
            export::results_csv(&record.report().results()),
        ),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn summary_csv_handler<R>(
    State(service): State<Arc<PlacementService<R>>>,
    Path(run_id): Path<String>,
) -> Response
where
    R: RunRepository + 'static,
{
    match service.get(&RunId(run_id)) {
        Ok(record) => csv_download(
            "placement_summary.csv",
            export::summary_csv(&record.report().slot_summaries()),
        ),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn capacities_csv_handler<R>(
    State(service): State<Arc<PlacementService<R>>>,
    Path(run_id): Path<String>,
) -> Response
where
    R: RunRepository + 'static,
{
    match service.get(&RunId(run_id)) {
        Ok(record) => csv_download(
            "placement_capacities.csv",
            export::capacities_csv(&record.report().capacities()),
        ),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn explanation_handler<R>(
    State(service): State<Arc<PlacementService<R>>>,
    Path((run_id, candidate_id)): Path<(String, String)>,
) -> Response
where
    R: RunRepository + 'static,
{
    match service.explain(&RunId(run_id), &candidate_id) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn explanation_at_handler<R>(
    State(service): State<Arc<PlacementService<R>>>,
    Path((run_id, index)): Path<(String, usize)>,
) -> Response
where
    R: RunRepository + 'static,
{
    match service.explain_at(&RunId(run_id), index) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

fn csv_download(filename: &str, body: Result<Vec<u8>, ExportError>) -> Response {
    match body {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{filename}\""),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

fn error_response(err: PlacementServiceError) -> Response {
    let status = match &err {
        PlacementServiceError::Import(_) | PlacementServiceError::Config(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        PlacementServiceError::Placement(PlacementError::AmbiguousCandidateId { .. }) => {
            StatusCode::CONFLICT
        }
        PlacementServiceError::Repository(RunStoreError::NotFound)
        | PlacementServiceError::Placement(_) => StatusCode::NOT_FOUND,
        PlacementServiceError::Repository(RunStoreError::Conflict) => StatusCode::CONFLICT,
        PlacementServiceError::Repository(RunStoreError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
