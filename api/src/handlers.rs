use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use shared::{
    CreatedResponse, EmployeeInput, EmployeePatch, EmployeeSearchParams, MessageResponse,
    SearchResponse, UpdateResponse, UpdateResult,
};

use crate::{
    error::{ApiError, ApiResult},
    metrics,
    state::AppState,
    store::StoreError,
    validation::ValidatedJson,
};

pub const EMPLOYEE_ADDED: &str = "Employee added successfully";
pub const EMPLOYEE_UPDATED: &str = "Employee updated successfully";
pub const EMPLOYEE_DELETED: &str = "Employee deleted successfully";
pub const DUPLICATE_EMPLOYEE_ID: &str = "Employee ID already exists";

fn store_error(operation: &str, err: StoreError) -> ApiError {
    match err {
        StoreError::DuplicateEmployeeId(employee_id) => {
            metrics::EMPLOYEE_CONFLICTS.inc();
            tracing::info!(operation, employee_id = %employee_id, "duplicate employee id rejected");
            ApiError::conflict(DUPLICATE_EMPLOYEE_ID)
        }
        StoreError::Database(err) => {
            tracing::error!(operation, error = ?err, "database operation failed");
            ApiError::persistence()
        }
    }
}

fn map_path_rejection(err: PathRejection) -> ApiError {
    ApiError::bad_request("InvalidEmployeeId", format!("Invalid employee id: {}", err.body_text()))
}

fn map_query_rejection(err: QueryRejection) -> ApiError {
    ApiError::bad_request("InvalidQuery", format!("Invalid query parameters: {}", err.body_text()))
}

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let uptime = state.started_at.elapsed().as_secs();
    let now = chrono::Utc::now().to_rfc3339();

    match state.store.ping().await {
        Ok(()) => {
            tracing::debug!(uptime_secs = uptime, "health check passed");
            (
                StatusCode::OK,
                Json(json!({
                    "status": "ok",
                    "version": env!("CARGO_PKG_VERSION"),
                    "timestamp": now,
                    "uptime_secs": uptime
                })),
            )
        }
        Err(err) => {
            tracing::warn!(uptime_secs = uptime, error = %err, "health check degraded, store unreachable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "version": env!("CARGO_PKG_VERSION"),
                    "timestamp": now,
                    "uptime_secs": uptime
                })),
            )
        }
    }
}

/// POST /employees
pub async fn create_employee(
    State(state): State<AppState>,
    ValidatedJson(employee): ValidatedJson<EmployeeInput>,
) -> ApiResult<Json<CreatedResponse>> {
    let id = state
        .store
        .insert(&employee)
        .await
        .map_err(|err| store_error("insert employee", err))?;

    metrics::EMPLOYEES_CREATED.inc();
    tracing::info!(id, employee_id = %employee.employee_id, "employee added");

    Ok(Json(CreatedResponse {
        message: EMPLOYEE_ADDED.to_string(),
        id,
    }))
}

/// GET /employees, or GET /employees?query=Q for a substring search
pub async fn list_employees(
    State(state): State<AppState>,
    params: Result<Query<EmployeeSearchParams>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(params) = params.map_err(map_query_rejection)?;

    let Some(query) = params.query else {
        let employees = state
            .store
            .list_all()
            .await
            .map_err(|err| store_error("list employees", err))?;
        return Ok(Json(employees).into_response());
    };

    if query.is_empty() {
        return Err(ApiError::missing_query());
    }

    metrics::EMPLOYEE_SEARCHES.inc();
    let results = state
        .store
        .search(&query)
        .await
        .map_err(|err| store_error("search employees", err))?;
    tracing::debug!(query = %query, hits = results.len(), "employee search");

    Ok(Json(SearchResponse { results }).into_response())
}

/// PUT /employees/:id
pub async fn update_employee(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    ValidatedJson(changes): ValidatedJson<EmployeePatch>,
) -> ApiResult<Json<UpdateResponse>> {
    let Path(id) = id.map_err(map_path_rejection)?;

    let affected_rows = state
        .store
        .update_by_id(id, &changes)
        .await
        .map_err(|err| store_error("update employee", err))?;

    if affected_rows == 0 {
        tracing::warn!(id, "update matched no employee");
    } else {
        metrics::EMPLOYEES_UPDATED.inc_by(affected_rows);
        tracing::info!(id, "employee updated");
    }

    Ok(Json(UpdateResponse {
        message: EMPLOYEE_UPDATED.to_string(),
        result: UpdateResult { affected_rows },
    }))
}

/// DELETE /employees/:id. Deleting an id that does not exist still succeeds.
pub async fn delete_employee(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Path(id) = id.map_err(map_path_rejection)?;

    let deleted = state
        .store
        .delete_by_id(id)
        .await
        .map_err(|err| store_error("delete employee", err))?;

    metrics::EMPLOYEES_DELETED.inc_by(deleted);
    tracing::info!(id, deleted, "employee delete");

    Ok(Json(MessageResponse::new(EMPLOYEE_DELETED)))
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}

pub async fn route_not_found() -> ApiError {
    ApiError::not_found("RouteNotFound", "Route not found")
}
