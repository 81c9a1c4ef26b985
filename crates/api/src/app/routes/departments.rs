//! Department lookup list: readable by any authenticated role, mutable
//! by admins.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use assetforge_auth::{ProtectedAction, require};
use assetforge_core::DepartmentId;
use assetforge_infra::DepartmentChanges;

use crate::app::{dto, errors, services::AppServices};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_department).get(list_departments))
        .route(
            "/:id",
            get(get_department).put(update_department).delete(delete_department),
        )
}

/// POST /departments (admin only).
pub async fn create_department(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CreateDepartmentRequest>,
) -> axum::response::Response {
    if let Err(e) = require(principal.claims(), ProtectedAction::DepartmentMutate) {
        return errors::auth_error(&e);
    }
    if let Err(response) = dto::require_non_empty(&[&body.name]) {
        return response;
    }

    let changes = DepartmentChanges {
        name: body.name,
        description: body.description,
    };
    match services.departments.create(changes).await {
        Ok(department) => (
            StatusCode::CREATED,
            Json(json!({ "success": true, "department": dto::department_json(&department) })),
        )
            .into_response(),
        Err(e) => errors::store_error(e),
    }
}

/// GET /departments (any authenticated role).
pub async fn list_departments(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = require(principal.claims(), ProtectedAction::DepartmentRead) {
        return errors::auth_error(&e);
    }

    match services.departments.list().await {
        Ok(departments) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "departments": departments.iter().map(dto::department_json).collect::<Vec<_>>(),
            })),
        )
            .into_response(),
        Err(e) => errors::store_error(e),
    }
}

/// GET /departments/:id (any authenticated role).
pub async fn get_department(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = require(principal.claims(), ProtectedAction::DepartmentRead) {
        return errors::auth_error(&e);
    }
    let id: DepartmentId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "Invalid department id"),
    };

    match services.departments.get(id).await {
        Ok(Some(department)) => (
            StatusCode::OK,
            Json(json!({ "success": true, "department": dto::department_json(&department) })),
        )
            .into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "Department not found"),
        Err(e) => errors::store_error(e),
    }
}

/// PUT /departments/:id (admin only).
pub async fn update_department(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::CreateDepartmentRequest>,
) -> axum::response::Response {
    if let Err(e) = require(principal.claims(), ProtectedAction::DepartmentMutate) {
        return errors::auth_error(&e);
    }
    let id: DepartmentId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "Invalid department id"),
    };
    if let Err(response) = dto::require_non_empty(&[&body.name]) {
        return response;
    }

    let changes = DepartmentChanges {
        name: body.name,
        description: body.description,
    };
    match services.departments.update(id, changes).await {
        Ok(Some(department)) => (
            StatusCode::OK,
            Json(json!({ "success": true, "department": dto::department_json(&department) })),
        )
            .into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "Department not found"),
        Err(e) => errors::store_error(e),
    }
}

/// DELETE /departments/:id (admin only).
pub async fn delete_department(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = require(principal.claims(), ProtectedAction::DepartmentMutate) {
        return errors::auth_error(&e);
    }
    let id: DepartmentId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "Invalid department id"),
    };

    match services.departments.delete(id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(json!({ "success": true, "message": "Department deleted successfully" })),
        )
            .into_response(),
        Ok(false) => errors::json_error(StatusCode::NOT_FOUND, "Department not found"),
        Err(e) => errors::store_error(e),
    }
}
