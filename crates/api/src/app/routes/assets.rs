//! Asset CRUD, visibility-scoped per the caller's role.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use assetforge_auth::{ProtectedAction, authorize_record, require, scope_query};
use assetforge_core::{AssetId, CategoryId, DepartmentId};
use assetforge_infra::{AssetChanges, NewAsset};

use crate::app::{dto, errors, services::AppServices};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_asset).get(list_assets))
        .route("/stats", get(owner_stats))
        .route("/:id", get(get_asset).put(update_asset).delete(delete_asset))
}

/// POST /assets - create an asset.
///
/// The new record's owner is always the requester's subject id; any owner
/// field in the payload is discarded.
pub async fn create_asset(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CreateAssetRequest>,
) -> axum::response::Response {
    if let Err(e) = require(principal.claims(), ProtectedAction::AssetCreate) {
        return errors::auth_error(&e);
    }
    if let Err(response) = dto::require_non_empty(&[&body.name]) {
        return response;
    }

    let new = NewAsset {
        name: body.name,
        category_id: CategoryId::from_uuid(body.category_id),
        department_id: DepartmentId::from_uuid(body.department_id),
        date_purchased: body.date_purchased,
        cost: body.cost,
    };

    match services.assets.create(new, principal.subject_id()).await {
        Ok(asset) => (
            StatusCode::CREATED,
            Json(json!({ "success": true, "asset": dto::asset_json(&asset) })),
        )
            .into_response(),
        Err(e) => errors::store_error(e),
    }
}

/// GET /assets - list assets visible to the caller (admins see all, users
/// see their own).
pub async fn list_assets(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = require(principal.claims(), ProtectedAction::AssetRead) {
        return errors::auth_error(&e);
    }

    let scope = scope_query(principal.claims());
    match services.assets.list(&scope).await {
        Ok(assets) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "assets": assets.iter().map(dto::asset_json).collect::<Vec<_>>(),
            })),
        )
            .into_response(),
        Err(e) => errors::store_error(e),
    }
}

/// GET /assets/:id - fetch one asset.
///
/// For non-admin callers a record that exists but belongs to someone else is
/// 403, while a missing record is 404.
pub async fn get_asset(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = require(principal.claims(), ProtectedAction::AssetRead) {
        return errors::auth_error(&e);
    }
    let id: AssetId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "Invalid asset id"),
    };

    match services.assets.get(id).await {
        Ok(Some(asset)) => {
            if let Err(e) = authorize_record(principal.claims(), asset.created_by) {
                return errors::auth_error(&e);
            }
            (
                StatusCode::OK,
                Json(json!({ "success": true, "asset": dto::asset_json(&asset) })),
            )
                .into_response()
        }
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "Asset not found"),
        Err(e) => errors::store_error(e),
    }
}

/// PUT /assets/:id - update an asset (admin only).
pub async fn update_asset(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::CreateAssetRequest>,
) -> axum::response::Response {
    if let Err(e) = require(principal.claims(), ProtectedAction::AssetMutate) {
        return errors::auth_error(&e);
    }
    let id: AssetId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "Invalid asset id"),
    };
    if let Err(response) = dto::require_non_empty(&[&body.name]) {
        return response;
    }

    let changes = AssetChanges {
        name: body.name,
        category_id: CategoryId::from_uuid(body.category_id),
        department_id: DepartmentId::from_uuid(body.department_id),
        date_purchased: body.date_purchased,
        cost: body.cost,
    };

    match services.assets.update(id, changes).await {
        Ok(Some(asset)) => (
            StatusCode::OK,
            Json(json!({ "success": true, "asset": dto::asset_json(&asset) })),
        )
            .into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "Asset not found"),
        Err(e) => errors::store_error(e),
    }
}

/// DELETE /assets/:id - delete an asset (admin only).
pub async fn delete_asset(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = require(principal.claims(), ProtectedAction::AssetMutate) {
        return errors::auth_error(&e);
    }
    let id: AssetId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "Invalid asset id"),
    };

    match services.assets.delete(id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(json!({ "success": true, "message": "Asset deleted successfully" })),
        )
            .into_response(),
        Ok(false) => errors::json_error(StatusCode::NOT_FOUND, "Asset not found"),
        Err(e) => errors::store_error(e),
    }
}

/// GET /assets/stats - the caller's own asset statistics.
pub async fn owner_stats(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = require(principal.claims(), ProtectedAction::AssetRead) {
        return errors::auth_error(&e);
    }

    match services.assets.stats_for_owner(principal.subject_id()).await {
        Ok(stats) => (
            StatusCode::OK,
            Json(json!({ "success": true, "stats": dto::owner_stats_json(&stats) })),
        )
            .into_response(),
        Err(e) => errors::store_error(e),
    }
}
