//! Asset category lookup list: readable by any authenticated role, mutable
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
use assetforge_core::CategoryId;
use assetforge_infra::CategoryChanges;

use crate::app::{dto, errors, services::AppServices};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_category).get(list_categories))
        .route(
            "/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
}

/// POST /categories (admin only).
pub async fn create_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CreateCategoryRequest>,
) -> axum::response::Response {
    if let Err(e) = require(principal.claims(), ProtectedAction::CategoryMutate) {
        return errors::auth_error(&e);
    }
    if let Err(response) = dto::require_non_empty(&[&body.name]) {
        return response;
    }

    let changes = CategoryChanges {
        name: body.name,
        description: body.description,
    };
    match services.categories.create(changes).await {
        Ok(category) => (
            StatusCode::CREATED,
            Json(json!({ "success": true, "category": dto::category_json(&category) })),
        )
            .into_response(),
        Err(e) => errors::store_error(e),
    }
}

/// GET /categories (any authenticated role).
pub async fn list_categories(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = require(principal.claims(), ProtectedAction::CategoryRead) {
        return errors::auth_error(&e);
    }

    match services.categories.list().await {
        Ok(categories) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "categories": categories.iter().map(dto::category_json).collect::<Vec<_>>(),
            })),
        )
            .into_response(),
        Err(e) => errors::store_error(e),
    }
}

/// GET /categories/:id (any authenticated role).
pub async fn get_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = require(principal.claims(), ProtectedAction::CategoryRead) {
        return errors::auth_error(&e);
    }
    let id: CategoryId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "Invalid category id"),
    };

    match services.categories.get(id).await {
        Ok(Some(category)) => (
            StatusCode::OK,
            Json(json!({ "success": true, "category": dto::category_json(&category) })),
        )
            .into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "Category not found"),
        Err(e) => errors::store_error(e),
    }
}

/// PUT /categories/:id (admin only).
pub async fn update_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::CreateCategoryRequest>,
) -> axum::response::Response {
    if let Err(e) = require(principal.claims(), ProtectedAction::CategoryMutate) {
        return errors::auth_error(&e);
    }
    let id: CategoryId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "Invalid category id"),
    };
    if let Err(response) = dto::require_non_empty(&[&body.name]) {
        return response;
    }

    let changes = CategoryChanges {
        name: body.name,
        description: body.description,
    };
    match services.categories.update(id, changes).await {
        Ok(Some(category)) => (
            StatusCode::OK,
            Json(json!({ "success": true, "category": dto::category_json(&category) })),
        )
            .into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "Category not found"),
        Err(e) => errors::store_error(e),
    }
}

/// DELETE /categories/:id (admin only).
pub async fn delete_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = require(principal.claims(), ProtectedAction::CategoryMutate) {
        return errors::auth_error(&e);
    }
    let id: CategoryId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "Invalid category id"),
    };

    match services.categories.delete(id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(json!({ "success": true, "message": "Category deleted successfully" })),
        )
            .into_response(),
        Ok(false) => errors::json_error(StatusCode::NOT_FOUND, "Category not found"),
        Err(e) => errors::store_error(e),
    }
}
