//! Axum REST API handlers.
//!
//! Every read handler re-queries the store and hands the fresh snapshot
//! to the engine, so responses always reflect the live membership and
//! tier state. Handlers return `Result<_, ApiError>`; the error type
//! maps itself onto status codes.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use payout_engine::{
    aggregate::CategoryAggregate,
    build_category_aggregate, build_worker_profile,
    model::CategorySelection,
    report::{allocation_rows, build_category_report, listing_rows, AllocationRow, ListingFilter},
    Department, ProjectCategory, WorkerProfile,
};

use crate::db;
use crate::errors::{ApiError, Result};

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
}

// ─────────────────────────────────────────────────────────
// Request / response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct OverviewResponse {
    pub department: Department,
    pub worker_count: i64,
    pub project_count: i64,
}

#[derive(Deserialize)]
pub struct ListingParams {
    pub q: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct ListingResponse {
    pub count: usize,
    pub rows: Vec<payout_engine::report::ListingRow>,
}

#[derive(Serialize)]
pub struct AllocationsResponse {
    pub project_id: i64,
    pub count: usize,
    pub allocations: Vec<AllocationRow>,
}

#[derive(Deserialize)]
pub struct AssignRequest {
    pub worker_id: i64,
    pub tier: String,
}

#[derive(Deserialize)]
pub struct TierRequest {
    pub tier: String,
}

#[derive(Serialize)]
pub struct AssignResponse {
    pub membership_id: i64,
}

// ─────────────────────────────────────────────────────────
// Read handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /departments/:id/overview`
///
/// Landing-page counters for one department.
pub async fn department_overview(
    State(state): State<Arc<ApiState>>,
    Path(department_id): Path<i64>,
) -> Result<Json<OverviewResponse>> {
    let department = db::get_department(&state.pool, department_id)
        .await?
        .ok_or(ApiError::NotFound("department"))?;
    let worker_count = db::worker_count(&state.pool, department_id).await?;
    let project_count = db::project_count(&state.pool, department_id).await?;
    Ok(Json(OverviewResponse {
        department,
        worker_count,
        project_count,
    }))
}

/// `GET /departments/:id/aggregate/:category`
///
/// Category aggregate; `:category` is a category key or `all`.
pub async fn category_aggregate(
    State(state): State<Arc<ApiState>>,
    Path((department_id, category)): Path<(i64, String)>,
) -> Result<Json<CategoryAggregate>> {
    db::get_department(&state.pool, department_id)
        .await?
        .ok_or(ApiError::NotFound("department"))?;
    let selection: CategorySelection = category.parse().map_err(ApiError::Engine)?;
    let projects = db::load_projects(&state.pool, department_id).await?;
    let aggregate = build_category_aggregate(&projects, selection, Utc::now().date_naive());
    Ok(Json(aggregate))
}

/// `GET /departments/:id/workers/:worker_id/profile`
pub async fn worker_profile(
    State(state): State<Arc<ApiState>>,
    Path((department_id, worker_id)): Path<(i64, i64)>,
) -> Result<Json<WorkerProfile>> {
    let worker = db::get_worker(&state.pool, department_id, worker_id)
        .await?
        .ok_or(ApiError::NotFound("worker"))?;
    let projects = db::load_projects(&state.pool, department_id).await?;
    Ok(Json(build_worker_profile(&projects, &worker)))
}

/// `GET /departments/:id/reports/listing/:category`
///
/// Filtered listing rows for export; filters that fail to parse are
/// ignored.
pub async fn listing_report(
    State(state): State<Arc<ApiState>>,
    Path((department_id, category)): Path<(i64, String)>,
    Query(params): Query<ListingParams>,
) -> Result<Json<ListingResponse>> {
    db::get_department(&state.pool, department_id)
        .await?
        .ok_or(ApiError::NotFound("department"))?;
    let selection: CategorySelection = category.parse().map_err(ApiError::Engine)?;

    let selected: Vec<_> = db::load_projects(&state.pool, department_id)
        .await?
        .into_iter()
        .filter(|p| selection.matches(p.category))
        .collect();
    let filter = ListingFilter::from_params(
        params.q.as_deref(),
        params.month.as_deref(),
        params.year.as_deref(),
        params.status.as_deref(),
    );
    let rows = listing_rows(&selected, &filter);
    Ok(Json(ListingResponse {
        count: rows.len(),
        rows,
    }))
}

/// `GET /departments/:id/reports/category/:category`
///
/// Header and rows of one category's report.
pub async fn category_report(
    State(state): State<Arc<ApiState>>,
    Path((department_id, category)): Path<(i64, String)>,
) -> Result<Json<payout_engine::report::CategoryReport>> {
    let department = db::get_department(&state.pool, department_id)
        .await?
        .ok_or(ApiError::NotFound("department"))?;
    let category: ProjectCategory = category.parse().map_err(ApiError::Engine)?;
    let projects = db::load_projects(&state.pool, department_id).await?;
    let report = build_category_report(
        &department.name,
        category,
        &projects,
        Utc::now().naive_utc(),
    );
    Ok(Json(report))
}

/// `GET /projects/:id/allocations`
///
/// The live payment split for one project, recomputed on every call.
pub async fn project_allocations(
    State(state): State<Arc<ApiState>>,
    Path(project_id): Path<i64>,
) -> Result<Json<AllocationsResponse>> {
    let project = db::load_project(&state.pool, project_id)
        .await?
        .ok_or(ApiError::NotFound("project"))?;
    let allocations = allocation_rows(&project);
    Ok(Json(AllocationsResponse {
        project_id,
        count: allocations.len(),
        allocations,
    }))
}

// ─────────────────────────────────────────────────────────
// Membership writes
// ─────────────────────────────────────────────────────────

/// `POST /projects/:id/members`
pub async fn assign_member(
    State(state): State<Arc<ApiState>>,
    Path(project_id): Path<i64>,
    Json(body): Json<AssignRequest>,
) -> Result<impl IntoResponse> {
    let tier = body.tier.parse().map_err(ApiError::Engine)?;
    let membership_id = db::assign_worker(&state.pool, project_id, body.worker_id, tier).await?;
    Ok((StatusCode::CREATED, Json(AssignResponse { membership_id })))
}

/// `PATCH /projects/:id/members/:worker_id`
pub async fn reassign_member(
    State(state): State<Arc<ApiState>>,
    Path((project_id, worker_id)): Path<(i64, i64)>,
    Json(body): Json<TierRequest>,
) -> Result<StatusCode> {
    let tier = body.tier.parse().map_err(ApiError::Engine)?;
    db::reassign_tier(&state.pool, project_id, worker_id, tier).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /projects/:id/members/:worker_id`
pub async fn unassign_member(
    State(state): State<Arc<ApiState>>,
    Path((project_id, worker_id)): Path<(i64, i64)>,
) -> Result<StatusCode> {
    db::unassign_worker(&state.pool, project_id, worker_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
